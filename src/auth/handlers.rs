use axum::{
    extract::{FromRef, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;
use tracing::{info, instrument, warn};

use super::dto::CredentialsForm;
use super::repo;
use super::session::{expired_session_cookie, session_cookie, Principal, SessionKeys};
use crate::error::AppError;
use crate::state::AppState;
use crate::views::page;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/register/student",
            get(register_student_form).post(register_student),
        )
        .route(
            "/register/admin",
            get(register_admin_form).post(register_admin),
        )
        .route("/login/student", get(login_student_form).post(login_student))
        .route("/admin/login", get(admin_login_form).post(admin_login))
        .route("/logout", get(logout_student))
        .route("/admin/logout", get(logout_admin))
}

struct RegisterCopy {
    view: &'static str,
    taken: &'static str,
    success: &'static str,
}

const STUDENT_REGISTER: RegisterCopy = RegisterCopy {
    view: "register_student",
    taken: "Student username already exists.",
    success: "Student registered successfully!",
};

const ADMIN_REGISTER: RegisterCopy = RegisterCopy {
    view: "admin_register",
    taken: "Admin username already exists.",
    success: "Admin registered successfully!",
};

async fn register(
    state: AppState,
    kind: Principal,
    copy: RegisterCopy,
    form: CredentialsForm,
) -> Result<Html<String>, AppError> {
    let username = form.username.trim();

    let msg = match repo::register(&state.db, kind, username, &form.password).await {
        Ok(()) => {
            info!(username = %username, kind = ?kind, "registered");
            copy.success
        }
        Err(AppError::UsernameTaken) => {
            warn!(username = %username, kind = ?kind, "username already exists");
            copy.taken
        }
        Err(e) => return Err(e),
    };
    page(&state, copy.view, &json!({"msg": msg}))
}

async fn check_credentials(
    state: &AppState,
    kind: Principal,
    username: &str,
    password: &str,
) -> Result<(), AppError> {
    let Some(credential) = repo::find(&state.db, kind, username).await? else {
        return Err(AppError::InvalidCredentials);
    };
    if credential.verify(password)? {
        Ok(())
    } else {
        Err(AppError::InvalidCredentials)
    }
}

async fn login(
    state: AppState,
    jar: CookieJar,
    kind: Principal,
    view: &'static str,
    fail_msg: &'static str,
    form: CredentialsForm,
) -> Result<Response, AppError> {
    let username = form.username.trim();

    match check_credentials(&state, kind, username, &form.password).await {
        Ok(()) => {
            let keys = SessionKeys::from_ref(&state);
            let token = keys.sign(kind, username)?;
            info!(username = %username, kind = ?kind, "logged in");
            Ok((
                jar.add(session_cookie(token)),
                Redirect::to(kind.dashboard_path()),
            )
                .into_response())
        }
        Err(AppError::InvalidCredentials) => {
            // One message for unknown usernames and wrong passwords alike.
            warn!(username = %username, kind = ?kind, "login failed");
            Ok(page(&state, view, &json!({"msg": fail_msg}))?.into_response())
        }
        Err(e) => Err(e),
    }
}

#[instrument(skip(state))]
async fn register_student_form(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    page(&state, "register_student", &json!({"msg": ""}))
}

#[instrument(skip(state, form))]
async fn register_student(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Html<String>, AppError> {
    register(state, Principal::Student, STUDENT_REGISTER, form).await
}

#[instrument(skip(state))]
async fn register_admin_form(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    page(&state, "admin_register", &json!({"msg": ""}))
}

#[instrument(skip(state, form))]
async fn register_admin(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Html<String>, AppError> {
    register(state, Principal::Admin, ADMIN_REGISTER, form).await
}

#[instrument(skip(state))]
async fn login_student_form(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    page(&state, "login_student", &json!({"msg": ""}))
}

#[instrument(skip(state, jar, form))]
async fn login_student(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    login(
        state,
        jar,
        Principal::Student,
        "login_student",
        "Invalid credentials.",
        form,
    )
    .await
}

#[instrument(skip(state))]
async fn admin_login_form(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    page(&state, "admin_login", &json!({"msg": ""}))
}

#[instrument(skip(state, jar, form))]
async fn admin_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    login(
        state,
        jar,
        Principal::Admin,
        "admin_login",
        "Invalid credentials. Please try again.",
        form,
    )
    .await
}

async fn logout_student(jar: CookieJar) -> (CookieJar, Redirect) {
    (
        jar.remove(expired_session_cookie()),
        Redirect::to(Principal::Student.login_path()),
    )
}

async fn logout_admin(jar: CookieJar) -> (CookieJar, Redirect) {
    (
        jar.remove(expired_session_cookie()),
        Redirect::to(Principal::Admin.login_path()),
    )
}
