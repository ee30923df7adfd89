//! Canned answers to spending questions, computed from the caller's own data.
pub mod handlers;
pub mod intent;
mod repo;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::insight_routes()
}
