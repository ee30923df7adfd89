use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::{error, info, instrument};

use super::OrderRequest;
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    extract::AppJson,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CategorizeRequest {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub currency: String,
}

pub fn public_routes() -> Router<AppState> {
    Router::new().route("/ai/categorize", post(categorize))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/razorpay/order", post(create_order))
}

#[instrument(skip(state, payload))]
pub async fn categorize(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CategorizeRequest>,
) -> AppResult<Json<serde_json::Value>> {
    if payload.description.trim().is_empty() {
        return Err(AppError::validation("Description required"));
    }
    let answer = state
        .categorizer
        .categorize(&payload.description)
        .await
        .map_err(|e| {
            error!(error = %e, "categorizer unavailable");
            AppError::dependency("AI service unavailable")
        })?;
    Ok(Json(answer))
}

#[instrument(skip(state, payload))]
pub async fn create_order(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<CreateOrderRequest>,
) -> AppResult<Json<serde_json::Value>> {
    if payload.amount <= 0 || payload.currency.trim().is_empty() {
        return Err(AppError::validation("Amount and currency required"));
    }
    let order = OrderRequest::for_user(
        user_id,
        payload.amount,
        payload.currency.trim(),
        OffsetDateTime::now_utc().unix_timestamp(),
    );
    let created = state.orders.create_order(&order).await.map_err(|e| {
        error!(error = %e, user_id, "order creation failed");
        AppError::Dependency {
            message: "Failed to create Razorpay order".into(),
            details: Some(e.to_string()),
        }
    })?;
    info!(user_id, receipt = %order.receipt, "payment order created");
    Ok(Json(created))
}
