use crate::state::AppState;
use axum::Router;

pub mod handlers;
pub mod pages;
pub mod repo;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
