use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use sqlx::{FromRow, PgPool};

use super::session::Principal;
use crate::error::AppError;

/// Stored credential row. The `users` and `admins` tables share this shape
/// but are independent namespaces: the same username may exist in both.
#[derive(Debug, Clone, FromRow)]
pub struct Credential {
    pub username: String,
    pub password_hash: String,
}

impl Credential {
    /// Check a submitted password against the stored digest. Argon2's
    /// comparison runs in constant time, so a mismatch leaks nothing about
    /// where it occurs.
    pub fn verify(&self, password: &str) -> Result<bool, AppError> {
        let parsed = PasswordHash::new(&self.password_hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("stored digest unreadable: {e}")))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

/// Argon2 digest with a fresh random salt per call. Digesting the same
/// password twice yields different strings; both verify.
fn digest(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("argon2 digest failed: {e}")))
}

/// Digest the password and insert a new credential. Uniqueness is arbitrated
/// by the primary key, so two concurrent registrations of the same username
/// cannot both persist; the loser surfaces as `UsernameTaken`.
pub async fn register(
    db: &PgPool,
    kind: Principal,
    username: &str,
    password: &str,
) -> Result<(), AppError> {
    let password_hash = digest(password)?;
    let sql = match kind {
        Principal::Student => "INSERT INTO users (username, password) VALUES ($1, $2)",
        Principal::Admin => "INSERT INTO admins (username, password) VALUES ($1, $2)",
    };
    sqlx::query(sql)
        .bind(username)
        .bind(&password_hash)
        .execute(db)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::UsernameTaken
            }
            _ => AppError::Storage(e),
        })?;
    Ok(())
}

pub async fn find(
    db: &PgPool,
    kind: Principal,
    username: &str,
) -> Result<Option<Credential>, AppError> {
    let sql = match kind {
        Principal::Student => {
            "SELECT username, password AS password_hash FROM users WHERE username = $1"
        }
        Principal::Admin => {
            "SELECT username, password AS password_hash FROM admins WHERE username = $1"
        }
    };
    let record = sqlx::query_as::<_, Credential>(sql)
        .bind(username)
        .fetch_optional(db)
        .await?;
    Ok(record)
}
