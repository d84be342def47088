use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub uuid: String,
    /// Always stored lowercase.
    pub email: String,
    /// argon2 verifier over the client-sent master password hash.
    pub password_hash: String,
    pub password_hint: Option<String>,
    /// Account encryption key, a cipher string the server never opens.
    pub key: String,
    pub totp_secret: Option<String>,
    pub two_factor_enabled: bool,
    pub culture: String,
    pub premium: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: &str, password_hash: String, key: &str) -> Self {
        let now = Utc::now();
        Self {
            uuid: Uuid::new_v4().to_string(),
            email: email.to_lowercase(),
            password_hash,
            password_hint: None,
            key: key.to_string(),
            totp_secret: None,
            two_factor_enabled: false,
            culture: "en-US".to_string(),
            premium: true,
            created_at: now,
            updated_at: now,
        }
    }
}
