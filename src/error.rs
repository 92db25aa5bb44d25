use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use thiserror::Error;
use tracing::error;

/// Failures a request handler can see. Registration and login conflicts are
/// normally caught in the handler and re-rendered as form messages; the
/// remaining variants map straight to a response.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("username already exists")]
    UsernameTaken,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("authentication required")]
    Unauthenticated { login: &'static str },

    #[error("page not found")]
    NotFound,

    #[error("database error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Missing or invalid session: send the caller to the login page
            // for its principal kind, never an error page.
            AppError::Unauthenticated { login } => Redirect::to(login).into_response(),
            AppError::NotFound => (StatusCode::NOT_FOUND, "Page not found").into_response(),
            AppError::UsernameTaken => {
                (StatusCode::CONFLICT, "Username already exists.").into_response()
            }
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials.").into_response()
            }
            AppError::Storage(e) => {
                error!(error = %e, "database error");
                failure_page()
            }
            AppError::Internal(e) => {
                error!(error = %e, "internal error");
                failure_page()
            }
        }
    }
}

fn failure_page() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html("<h1>Something went wrong</h1><p>Please try again later.</p>"),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::LOCATION;

    #[test]
    fn unauthenticated_redirects_to_login() {
        let resp = AppError::Unauthenticated {
            login: "/login/student",
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(LOCATION).unwrap(), "/login/student");
    }

    #[test]
    fn not_found_is_404() {
        let resp = AppError::NotFound.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_credentials_is_401() {
        let resp = AppError::InvalidCredentials.into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn storage_errors_render_a_generic_failure_page() {
        let resp = AppError::Storage(sqlx::Error::PoolClosed).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
