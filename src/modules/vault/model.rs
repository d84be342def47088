use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Folder {
    pub uuid: String,
    pub user_uuid: String,
    /// Cipher string.
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    pub fn new(user_uuid: &str, name: &str) -> Self {
        let now = Utc::now();
        Self {
            uuid: Uuid::new_v4().to_string(),
            user_uuid: user_uuid.to_string(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Type-specific payloads of a cipher, stored and returned as the client
/// sent them. None of it is interpreted server-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CipherData {
    pub fields: Option<Value>,
    pub login: Option<Value>,
    pub card: Option<Value>,
    pub identity: Option<Value>,
    pub securenote: Option<Value>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Cipher {
    pub uuid: String,
    pub user_uuid: String,
    pub folder_uuid: Option<String>,
    /// 1=Login, 2=SecureNote, 3=Card, 4=Identity.
    pub cipher_type: i64,
    pub favorite: bool,
    pub name: String,
    pub notes: Option<String>,
    pub data: Json<CipherData>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cipher {
    pub fn new(user_uuid: &str) -> Self {
        let now = Utc::now();
        Self {
            uuid: Uuid::new_v4().to_string(),
            user_uuid: user_uuid.to_string(),
            folder_uuid: None,
            cipher_type: 0,
            favorite: false,
            name: String::new(),
            notes: None,
            data: Json(CipherData::default()),
            created_at: now,
            updated_at: now,
        }
    }
}
