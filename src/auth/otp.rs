//! One-time codes proving ownership of an email address.
//!
//! A user moves through three states: unverified without a code, unverified
//! with a pending code, and verified. The transitions here are pure; the
//! caller loads the user's OTP columns, asks this module what to do, and
//! persists the outcome.
use rand::{rngs::OsRng, Rng};
use time::{Duration, OffsetDateTime};

/// How long an issued code stays valid.
pub const OTP_TTL: Duration = Duration::minutes(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OtpError {
    #[error("no pending code")]
    NotFound,
    #[error("code mismatch")]
    Mismatch,
    #[error("code expired")]
    Expired,
    #[error("already verified")]
    AlreadyVerified,
}

/// A freshly issued code and the instant after which it is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedOtp {
    pub code: String,
    pub expires_at: OffsetDateTime,
}

/// The OTP-relevant columns of a user row.
#[derive(Debug, Clone, Copy)]
pub struct OtpState<'a> {
    pub verified: bool,
    pub code: Option<&'a str>,
    pub expires_at: Option<OffsetDateTime>,
}

/// Six digits drawn uniformly from 000000..=999999 using the OS CSPRNG.
pub fn generate() -> String {
    let n: u32 = OsRng.gen_range(0..1_000_000);
    format!("{n:06}")
}

pub fn issue(now: OffsetDateTime) -> IssuedOtp {
    IssuedOtp {
        code: generate(),
        expires_at: now + OTP_TTL,
    }
}

/// Resending is only possible before verification; any pending code is replaced.
pub fn reissue(state: OtpState<'_>, now: OffsetDateTime) -> Result<IssuedOtp, OtpError> {
    if state.verified {
        return Err(OtpError::AlreadyVerified);
    }
    Ok(issue(now))
}

/// Checks a submitted code against the pending one.
///
/// Order of checks: pending code present, exact match, then expiry. A code
/// submitted at exactly `expires_at` is still accepted.
pub fn check(state: OtpState<'_>, submitted: &str, now: OffsetDateTime) -> Result<(), OtpError> {
    let (Some(code), Some(expires_at)) = (state.code, state.expires_at) else {
        return Err(OtpError::NotFound);
    };
    if code != submitted {
        return Err(OtpError::Mismatch);
    }
    if now > expires_at {
        return Err(OtpError::Expired);
    }
    Ok(())
}
