//! Registration, verification and login flows.
//!
//! Each step is an independent statement; a failed OTP email after the user
//! row is written leaves the user in place with the code stored.
use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::{error, info, warn};

use super::{
    otp::{self, OtpError},
    password::{hash_password, verify_password},
    repo::taken_field,
    repo_types::User,
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl From<OtpError> for AppError {
    fn from(e: OtpError) -> Self {
        match e {
            OtpError::NotFound => AppError::validation("Invalid email or OTP"),
            OtpError::Mismatch => AppError::unauthorized("Incorrect OTP"),
            OtpError::Expired => AppError::unauthorized("OTP expired"),
            OtpError::AlreadyVerified => AppError::validation("User already verified"),
        }
    }
}

async fn deliver_otp(state: &AppState, email: &str, code: &str) -> AppResult<()> {
    state.mailer.send_otp(email, code).await.map_err(|e| {
        error!(error = %e, email, "otp email delivery failed");
        AppError::dependency("Failed to send OTP email")
    })
}

pub async fn register(
    state: &AppState,
    username: &str,
    email: &str,
    password: &str,
) -> AppResult<User> {
    let username = username.trim();
    let email = normalize_email(email);
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::validation("Username, email, and password required"));
    }
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::validation("Invalid email"));
    }

    if User::identity_taken(&state.db, Some(username), Some(&email), None).await? {
        warn!(username, email = %email, "username or email already registered");
        return Err(AppError::Conflict("Username or email already exists".into()));
    }

    let hash = hash_password(password)?;
    let issued = otp::issue(OffsetDateTime::now_utc());
    let user = User::create(
        &state.db,
        username,
        &email,
        &hash,
        &issued.code,
        issued.expires_at,
    )
    .await
    .map_err(|e| match taken_field(&e) {
        Some(_) => {
            warn!(username, email = %email, "concurrent registration lost the race");
            AppError::Conflict("Username or email already exists".into())
        }
        None => e.into(),
    })?;
    info!(user_id = user.id, "user registered");

    deliver_otp(state, &user.email, &issued.code).await?;
    Ok(user)
}

pub async fn verify_otp(state: &AppState, email: &str, submitted: &str) -> AppResult<()> {
    let email = normalize_email(email);
    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| AppError::validation("Invalid email or OTP"))?;

    if let Err(e) = otp::check(user.otp_state(), submitted, OffsetDateTime::now_utc()) {
        warn!(user_id = user.id, reason = %e, "otp rejected");
        return Err(e.into());
    }

    User::mark_verified(&state.db, user.id).await?;
    info!(user_id = user.id, "user verified");
    Ok(())
}

pub async fn resend_otp(state: &AppState, email: &str) -> AppResult<()> {
    let email = normalize_email(email);
    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| AppError::validation("User not found"))?;

    let issued = otp::reissue(user.otp_state(), OffsetDateTime::now_utc())?;
    User::set_otp(&state.db, user.id, &issued.code, issued.expires_at).await?;
    info!(user_id = user.id, "otp reissued");

    deliver_otp(state, &user.email, &issued.code).await
}

/// Returns a signed token for a verified user with matching credentials.
pub async fn login(state: &AppState, username: &str, password: &str) -> AppResult<String> {
    let invalid = || AppError::unauthorized("Invalid username or password");

    let Some(user) = User::find_by_username(&state.db, username.trim()).await? else {
        warn!(username, "login unknown username");
        return Err(invalid());
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = user.id, "login invalid password");
        return Err(invalid());
    }

    if !user.verified {
        warn!(user_id = user.id, "login before verification");
        return Err(AppError::Unverified { email: user.email });
    }

    let token = state.jwt.sign(user.id)?;
    info!(user_id = user.id, "user logged in");
    Ok(token)
}
