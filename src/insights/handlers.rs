use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{
    intent::{self, Intent},
    repo::{total, Window},
};
use crate::{
    auth::{AuthUser, User},
    error::{AppError, AppResult},
    extract::AppJson,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
}

pub fn insight_routes() -> Router<AppState> {
    Router::new().route("/chatbot", post(chatbot))
}

#[instrument(skip(state, payload))]
pub async fn chatbot(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    let intent = intent::classify(&payload.message);
    debug!(user_id, ?intent, "chatbot intent");
    let db = &state.db;

    let answer = match intent {
        Intent::Savings => {
            let budget = User::find_by_id(db, user_id)
                .await?
                .ok_or_else(|| AppError::not_found("User not found"))?
                .budget;
            let expenses = total(db, user_id, Window::ExpensesThisMonth).await?;
            intent::savings_answer(budget, expenses)
        }
        Intent::Trend => {
            let this_month = total(db, user_id, Window::ExpensesThisMonth).await?;
            let last_month = total(db, user_id, Window::ExpensesLastMonth).await?;
            intent::trend_answer(this_month, last_month)
        }
        Intent::Tip => format!("Financial Health Tip: {}", intent::random_tip()),
        Intent::PaymentsLastWeek => {
            let t = total(db, user_id, Window::PaymentsLastWeek).await?;
            format!("You have spent ₹{t:.2} in the last week.")
        }
        Intent::PaymentsLastMonth => {
            let t = total(db, user_id, Window::PaymentsLastMonth).await?;
            format!("You have spent ₹{t:.2} last month.")
        }
        Intent::ExpensesThisMonth => {
            let t = total(db, user_id, Window::ExpensesThisMonth).await?;
            format!("Your total expenses this month are ₹{t:.2}.")
        }
        Intent::PaymentsThisMonth => {
            let t = total(db, user_id, Window::PaymentsThisMonth).await?;
            format!("You have spent ₹{t:.2} this month.")
        }
        Intent::Help => intent::HELP_ANSWER.to_owned(),
    };

    Ok(Json(ChatResponse { answer }))
}
