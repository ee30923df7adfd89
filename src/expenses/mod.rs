mod dto;
pub mod handlers;
mod repo;
pub mod repo_types;

pub(crate) use dto::check_amount;
pub use repo_types::Expense;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::expense_routes()
}
