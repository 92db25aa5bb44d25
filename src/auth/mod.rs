use crate::state::AppState;
use axum::Router;

mod dto;
pub mod extractors;
pub mod handlers;
pub mod repo;
pub mod session;

pub use session::Principal;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
