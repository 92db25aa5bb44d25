use serde::Deserialize;

/// Form body shared by the registration and login pages.
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}
