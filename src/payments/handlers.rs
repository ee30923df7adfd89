use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{CreatePaymentRequest, UpdatePaymentRequest},
    repo_types::{NewPayment, Payment, PaymentEdit, PaymentRow},
    services::create_payment,
};
use crate::{
    auth::{dto::MessageResponse, AuthUser},
    error::{AppError, AppResult},
    extract::{AppJson, AppPath},
    state::AppState,
};

pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/payments", get(list_payments).post(add_payment))
        .route("/payments/:id", put(update_payment).delete(delete_payment))
}

#[instrument(skip(state))]
pub async fn list_payments(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<Payment>>> {
    let rows = PaymentRow::list_by_user(&state.db, user_id).await?;
    Ok(Json(rows.into_iter().map(Payment::from).collect()))
}

#[instrument(skip(state, payload))]
pub async fn add_payment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<CreatePaymentRequest>,
) -> AppResult<(StatusCode, Json<Payment>)> {
    let new = NewPayment::try_from(payload)?;
    let payment = create_payment(&state, user_id, new).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

#[instrument(skip(state, payload))]
pub async fn update_payment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<UpdatePaymentRequest>,
) -> AppResult<Json<Payment>> {
    let edit = PaymentEdit::try_from(payload)?;
    let row = PaymentRow::update(&state.db, user_id, id, &edit)
        .await?
        .ok_or_else(|| AppError::not_found("Payment not found"))?;
    Ok(Json(row.into()))
}

#[instrument(skip(state))]
pub async fn delete_payment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<MessageResponse>> {
    if !PaymentRow::delete(&state.db, user_id, id).await? {
        return Err(AppError::not_found("Payment not found"));
    }
    info!(user_id, payment_id = id, "payment deleted");
    Ok(Json(MessageResponse::new("Deleted")))
}
