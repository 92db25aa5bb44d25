use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use super::session::{Principal, SessionKeys, SESSION_COOKIE};
use crate::error::AppError;

/// A verified student session; holds the username.
pub struct StudentSession(pub String);

/// A verified admin session; holds the username.
pub struct AdminSession(pub String);

fn authenticate(parts: &Parts, keys: &SessionKeys, want: Principal) -> Result<String, AppError> {
    let jar = CookieJar::from_headers(&parts.headers);
    let unauthenticated = AppError::Unauthenticated {
        login: want.login_path(),
    };

    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Err(unauthenticated);
    };
    let claims = match keys.verify(cookie.value()) {
        Ok(c) => c,
        Err(_) => {
            warn!("invalid or expired session token");
            return Err(unauthenticated);
        }
    };
    if claims.kind != want {
        warn!(kind = ?claims.kind, "session principal kind mismatch");
        return Err(unauthenticated);
    }
    Ok(claims.sub)
}

#[async_trait]
impl<S> FromRequestParts<S> for StudentSession
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = SessionKeys::from_ref(state);
        authenticate(parts, &keys, Principal::Student).map(Self)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = SessionKeys::from_ref(state);
        authenticate(parts, &keys, Principal::Admin).map(Self)
    }
}
