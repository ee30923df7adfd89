use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{CreateExpenseRequest, UpdateExpenseRequest},
    repo_types::{Expense, ExpenseEdit, NewExpense},
};
use crate::{
    auth::{dto::MessageResponse, AuthUser},
    error::{AppError, AppResult},
    extract::{AppJson, AppPath},
    state::AppState,
};

pub fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/:id", put(update_expense).delete(delete_expense))
}

#[instrument(skip(state))]
pub async fn list_expenses(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<Expense>>> {
    Ok(Json(Expense::list_by_user(&state.db, user_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<CreateExpenseRequest>,
) -> AppResult<(StatusCode, Json<Expense>)> {
    let new = NewExpense::try_from(payload)?;
    let expense = Expense::create(&state.db, user_id, &new).await?;
    info!(user_id, expense_id = expense.id, "expense created");
    Ok((StatusCode::CREATED, Json(expense)))
}

#[instrument(skip(state, payload))]
pub async fn update_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<UpdateExpenseRequest>,
) -> AppResult<Json<Expense>> {
    let edit = ExpenseEdit::try_from(payload)?;
    let expense = Expense::update(&state.db, user_id, id, &edit)
        .await?
        .ok_or_else(|| AppError::not_found("Expense not found"))?;
    Ok(Json(expense))
}

#[instrument(skip(state))]
pub async fn delete_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<MessageResponse>> {
    if !Expense::delete(&state.db, user_id, id).await? {
        return Err(AppError::not_found("Expense not found"));
    }
    info!(user_id, expense_id = id, "expense deleted");
    Ok(Json(MessageResponse::new("Deleted")))
}
