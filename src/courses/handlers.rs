use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    routing::get,
    Router,
};
use serde_json::json;
use tracing::instrument;

use super::pages::view_for_slug;
use crate::error::AppError;
use crate::state::AppState;
use crate::views::page;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/login", get(login_redirect))
        .route("/course/:page", get(course_page))
}

#[instrument(skip(state))]
async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    page(&state, "index", &json!({}))
}

async fn login_redirect() -> Redirect {
    Redirect::to("/login/student")
}

#[instrument(skip(state))]
async fn course_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Html<String>, AppError> {
    let view = view_for_slug(&slug).ok_or(AppError::NotFound)?;
    page(&state, &view, &json!({"slug": slug}))
}
