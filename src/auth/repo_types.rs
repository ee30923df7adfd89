use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use super::otp::OtpState;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    #[sqlx(rename = "name")]
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, not exposed in JSON
    pub verified: bool,
    #[serde(skip_serializing)]
    pub otp_code: Option<String>,
    #[serde(skip_serializing)]
    pub otp_expires_at: Option<OffsetDateTime>,
    pub budget: f64,
    pub created_at: OffsetDateTime,
}

impl User {
    pub fn otp_state(&self) -> OtpState<'_> {
        OtpState {
            verified: self.verified,
            code: self.otp_code.as_deref(),
            expires_at: self.otp_expires_at,
        }
    }
}
