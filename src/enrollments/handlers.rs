use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::{debug, info, instrument};

use super::dto::DashboardQuery;
use super::repo;
use crate::auth::extractors::{AdminSession, StudentSession};
use crate::courses;
use crate::error::AppError;
use crate::state::AppState;
use crate::views::page;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/student", get(student_dashboard))
        .route("/apply/:course_id", post(apply))
        .route("/dashboard/admin", get(admin_dashboard))
}

#[instrument(skip(state))]
async fn student_dashboard(
    State(state): State<AppState>,
    StudentSession(username): StudentSession,
    Query(query): Query<DashboardQuery>,
) -> Result<Html<String>, AppError> {
    let courses = courses::repo::list_courses(&state.db).await?;
    let mut enrolled_ids: Vec<i32> = repo::list_for_student(&state.db, &username)
        .await?
        .into_iter()
        .collect();
    enrolled_ids.sort_unstable();

    let msg = if query.enrolled.is_some() {
        "Enrolled successfully!"
    } else {
        ""
    };
    page(
        &state,
        "student_dashboard",
        &json!({
            "username": username,
            "courses": courses,
            "enrolled_course_ids": enrolled_ids,
            "msg": msg,
        }),
    )
}

#[instrument(skip(state))]
async fn apply(
    State(state): State<AppState>,
    StudentSession(username): StudentSession,
    Path(course_id): Path<i32>,
) -> Result<Redirect, AppError> {
    if repo::enroll(&state.db, &username, course_id).await? {
        info!(username = %username, course_id, "enrolled");
    } else {
        debug!(username = %username, course_id, "already enrolled");
    }
    // Confirmation travels in the query string for the dashboard to render.
    Ok(Redirect::to(&format!(
        "/dashboard/student?enrolled={course_id}"
    )))
}

#[instrument(skip(state))]
async fn admin_dashboard(
    State(state): State<AppState>,
    AdminSession(_admin): AdminSession,
) -> Result<Html<String>, AppError> {
    let enrollments = repo::list_all(&state.db).await?;
    page(&state, "admin_dashboard", &json!({"enrollments": enrollments}))
}
