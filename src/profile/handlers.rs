use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{BudgetBody, BudgetUpdated, MeResponse, UpdateMeRequest};
use crate::{
    auth::{
        dto::MessageResponse,
        password::hash_password,
        repo::{taken_field, TakenField},
        services::{is_valid_email, normalize_email},
        AuthUser, User,
    },
    error::{AppError, AppResult},
    extract::AppJson,
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me).put(update_me))
        .route("/user/budget", get(get_budget).post(set_budget))
}

async fn load_user(state: &AppState, user_id: i64) -> AppResult<User> {
    User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<MeResponse>> {
    let user = load_user(&state, user_id).await?;
    Ok(Json(MeResponse {
        username: user.username,
        email: user.email,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<UpdateMeRequest>,
) -> AppResult<Json<MessageResponse>> {
    if payload.is_empty() {
        return Err(AppError::validation("No fields to update"));
    }

    let username = payload.username();
    let email = payload.email().map(normalize_email);
    if let Some(email) = email.as_deref() {
        if !is_valid_email(email) {
            return Err(AppError::validation("Invalid email"));
        }
    }

    if let Some(username) = username {
        if User::identity_taken(&state.db, Some(username), None, Some(user_id)).await? {
            warn!(user_id, "username already taken");
            return Err(AppError::Conflict("Username already taken".into()));
        }
    }
    if let Some(email) = email.as_deref() {
        if User::identity_taken(&state.db, None, Some(email), Some(user_id)).await? {
            warn!(user_id, "email already taken");
            return Err(AppError::Conflict("Email already taken".into()));
        }
    }

    let password_hash = payload.password().map(hash_password).transpose()?;

    let updated = User::update_profile(
        &state.db,
        user_id,
        username,
        email.as_deref(),
        password_hash.as_deref(),
    )
    .await
    .map_err(|e| match taken_field(&e) {
        Some(TakenField::Username) => AppError::Conflict("Username already taken".into()),
        Some(TakenField::Email) => AppError::Conflict("Email already taken".into()),
        None => e.into(),
    })?;
    if !updated {
        return Err(AppError::not_found("User not found"));
    }
    info!(user_id, "profile updated");
    Ok(Json(MessageResponse::new("Profile updated")))
}

#[instrument(skip(state))]
pub async fn get_budget(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<BudgetBody>> {
    let user = load_user(&state, user_id).await?;
    Ok(Json(BudgetBody {
        budget: user.budget,
    }))
}

#[instrument(skip(state))]
pub async fn set_budget(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<BudgetBody>,
) -> AppResult<Json<BudgetUpdated>> {
    if !payload.budget.is_finite() || payload.budget < 0.0 {
        return Err(AppError::validation("Budget must be a non-negative number"));
    }
    if !User::set_budget(&state.db, user_id, payload.budget).await? {
        return Err(AppError::not_found("User not found"));
    }
    info!(user_id, budget = payload.budget, "budget updated");
    Ok(Json(BudgetUpdated {
        message: "Budget updated",
        budget: payload.budget,
    }))
}
