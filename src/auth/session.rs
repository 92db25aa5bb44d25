use std::time::Duration;

use axum::extract::FromRef;
use axum_extra::extract::cookie::{Cookie, SameSite};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::config::SessionConfig;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "campushub_session";

/// Which namespace a session belongs to. Student and admin are disjoint
/// states, not a hierarchy: a token for one is never accepted as the other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Principal {
    Student,
    Admin,
}

impl Principal {
    pub fn login_path(self) -> &'static str {
        match self {
            Principal::Student => "/login/student",
            Principal::Admin => "/admin/login",
        }
    }

    pub fn dashboard_path(self) -> &'static str {
        match self {
            Principal::Student => "/dashboard/student",
            Principal::Admin => "/dashboard/admin",
        }
    }
}

/// Signed session payload carried in the cookie. Any change to the payload
/// invalidates the HMAC signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub kind: Principal,
    pub iat: usize,
    pub exp: usize,
}

/// HMAC keys for issuing and checking session tokens. Sessions are stateless
/// on the server: logout only clears the cookie, and a token stays valid
/// until its expiry. The TTL bounds that exposure (known hardening gap).
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::from_config(&state.config.session)
    }
}

impl SessionKeys {
    pub fn from_config(cfg: &SessionConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            ttl: Duration::from_secs((cfg.ttl_minutes as u64) * 60),
        }
    }

    pub fn sign(&self, kind: Principal, username: &str) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = SessionClaims {
            sub: username.to_string(),
            kind,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(username = %username, kind = ?kind, "session signed");
        Ok(token)
    }

    /// Check signature and expiry. Missing, malformed, forged, and expired
    /// tokens all come back as errors; callers treat them identically.
    pub fn verify(&self, token: &str) -> anyhow::Result<SessionClaims> {
        let data = decode::<SessionClaims>(token, &self.decoding, &Validation::default())?;
        debug!(username = %data.claims.sub, kind = ?data.claims.kind, "session verified");
        Ok(data.claims)
    }
}

pub fn session_cookie(token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

/// Cookie identity used to clear the session on logout; the jar turns it
/// into an expired removal cookie.
pub fn expired_session_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(secret: &str) -> SessionKeys {
        SessionKeys::from_config(&SessionConfig {
            secret: secret.into(),
            ttl_minutes: 5,
        })
    }

    #[test]
    fn sign_and_verify_roundtrip_for_both_principals() {
        let keys = keys("dev-secret");
        for kind in [Principal::Student, Principal::Admin] {
            let token = keys.sign(kind, "alice").expect("sign");
            let claims = keys.verify(&token).expect("verify");
            assert_eq!(claims.sub, "alice");
            assert_eq!(claims.kind, kind);
        }
    }

    #[test]
    fn verify_rejects_token_signed_with_another_secret() {
        let token = keys("secret-a").sign(Principal::Student, "alice").unwrap();
        assert!(keys("secret-b").verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_tampered_payload() {
        let keys = keys("dev-secret");
        let token = keys.sign(Principal::Student, "alice").unwrap();
        let other = keys.sign(Principal::Student, "mallory").unwrap();

        // Splice mallory's payload onto alice's signature.
        let sig = token.rsplit('.').next().unwrap();
        let mut parts: Vec<&str> = other.split('.').collect();
        parts[2] = sig;
        let forged = parts.join(".");
        assert!(keys.verify(&forged).is_err());
    }

    #[test]
    fn verify_rejects_expired_token() {
        let keys = keys("dev-secret");
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = SessionClaims {
            sub: "alice".into(),
            kind: Principal::Student,
            iat: (now - 7200) as usize,
            exp: (now - 3600) as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"dev-secret"),
        )
        .unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn session_cookie_is_http_only_and_site_scoped() {
        let cookie = session_cookie("token".into());
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }
}
