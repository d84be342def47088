use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A client installation. Its uuid is chosen by the client and survives
/// re-registration; its token pair is rotated on every grant.
#[derive(Debug, Clone, FromRow)]
pub struct Device {
    pub uuid: String,
    pub user_uuid: String,
    pub name: String,
    pub device_type: String,
    pub push_token: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_expires_at: Option<DateTime<Utc>>,
    /// 0 until first saved; bumped on every write.
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Device {
    pub fn new(uuid: &str, user_uuid: &str) -> Self {
        let now = Utc::now();
        Self {
            uuid: uuid.to_string(),
            user_uuid: user_uuid.to_string(),
            name: String::new(),
            device_type: String::new(),
            push_token: None,
            access_token: None,
            refresh_token: None,
            token_expires_at: None,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.version > 0
    }

    /// Valid strictly before the expiry instant.
    pub fn access_token_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.access_token.is_some() && self.token_expires_at.is_some_and(|exp| now < exp)
    }
}
