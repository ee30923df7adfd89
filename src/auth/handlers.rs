use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::instrument;

use crate::{
    auth::{
        dto::{
            LoginRequest, MessageResponse, RegisterRequest, ResendOtpRequest, TokenResponse,
            VerifyOtpRequest,
        },
        services,
    },
    error::AppResult,
    extract::AppJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/verify-otp", post(verify_otp))
        .route("/resend-otp", post(resend_otp))
        .route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    services::register(&state, &payload.username, &payload.email, &payload.password).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(
            "User registered successfully. Please check your email for the OTP.",
        )),
    ))
}

#[instrument(skip(state, payload))]
pub async fn verify_otp(
    State(state): State<AppState>,
    AppJson(payload): AppJson<VerifyOtpRequest>,
) -> AppResult<Json<MessageResponse>> {
    services::verify_otp(&state, &payload.email, &payload.otp).await?;
    Ok(Json(MessageResponse::new("Email verified successfully!")))
}

#[instrument(skip(state, payload))]
pub async fn resend_otp(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ResendOtpRequest>,
) -> AppResult<Json<MessageResponse>> {
    services::resend_otp(&state, &payload.email).await?;
    Ok(Json(MessageResponse::new(
        "OTP resent successfully. Please check your email.",
    )))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = services::login(&state, &payload.username, &payload.password).await?;
    Ok(Json(TokenResponse { token }))
}
