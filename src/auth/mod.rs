use crate::state::AppState;
use axum::Router;

mod claims;
pub mod dto;
pub mod handlers;
mod jwt;
pub mod otp;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use jwt::{AuthUser, JwtKeys};
pub use repo_types::User;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}
