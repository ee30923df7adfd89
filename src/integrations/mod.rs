//! External collaborators: OTP mail delivery, payment orders, and expense
//! categorization. Each sits behind a trait so tests can swap in fakes.
mod categorizer;
#[cfg(test)]
pub mod fake;
pub mod handlers;
mod mailer;
mod razorpay;

pub use categorizer::{Categorizer, HttpCategorizer};
pub use mailer::{OtpMailer, SendGridMailer};
pub use razorpay::{OrderGateway, OrderRequest, RazorpayClient};

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::public_routes())
        .merge(handlers::protected_routes())
}
