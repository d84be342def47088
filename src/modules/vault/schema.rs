use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::model::{Cipher, Folder};
use crate::modules::accounts::schema::ProfileResponse;
use crate::services::params::{lenient_bool, lenient_string};

// =============================================================================
// FOLDERS
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct FolderRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FolderResponse {
    pub id: String,
    pub name: String,
    pub revision_date: DateTime<Utc>,
    pub object: &'static str,
}

impl From<&Folder> for FolderResponse {
    fn from(folder: &Folder) -> Self {
        Self {
            id: folder.uuid.clone(),
            name: folder.name.clone(),
            revision_date: folder.updated_at,
            object: "folder",
        }
    }
}

// =============================================================================
// CIPHERS
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct CipherRequest {
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub cipher_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub folderid: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub favorite: Option<bool>,
    #[serde(default)]
    pub fields: Option<Value>,
    #[serde(default)]
    pub login: Option<Value>,
    #[serde(default)]
    pub card: Option<Value>,
    #[serde(default)]
    pub identity: Option<Value>,
    #[serde(default)]
    pub securenote: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CipherResponse {
    pub id: String,
    #[serde(rename = "Type")]
    pub cipher_type: i64,
    pub folder_id: Option<String>,
    pub organization_id: Option<String>,
    pub favorite: bool,
    /// Only set on responses to the caller's own create/update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit: Option<bool>,
    pub name: String,
    pub notes: Option<String>,
    pub fields: Option<Value>,
    pub login: Option<Value>,
    pub card: Option<Value>,
    pub identity: Option<Value>,
    pub secure_note: Option<Value>,
    pub attachments: Option<Value>,
    pub organization_use_totp: bool,
    pub revision_date: DateTime<Utc>,
    pub object: &'static str,
}

impl From<&Cipher> for CipherResponse {
    fn from(cipher: &Cipher) -> Self {
        let data = &cipher.data.0;
        Self {
            id: cipher.uuid.clone(),
            cipher_type: cipher.cipher_type,
            folder_id: cipher.folder_uuid.clone(),
            organization_id: None,
            favorite: cipher.favorite,
            edit: None,
            name: cipher.name.clone(),
            notes: cipher.notes.clone(),
            fields: data.fields.clone(),
            login: data.login.clone(),
            card: data.card.clone(),
            identity: data.identity.clone(),
            secure_note: data.securenote.clone(),
            attachments: None,
            organization_use_totp: false,
            revision_date: cipher.updated_at,
            object: "cipher",
        }
    }
}

impl CipherResponse {
    pub fn editable(mut self) -> Self {
        self.edit = Some(true);
        self
    }
}

// =============================================================================
// SYNC
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DomainsResponse {
    pub equivalent_domains: Option<Vec<Vec<String>>>,
    pub global_equivalent_domains: Vec<Value>,
    pub object: &'static str,
}

impl Default for DomainsResponse {
    fn default() -> Self {
        Self {
            equivalent_domains: None,
            global_equivalent_domains: Vec::new(),
            object: "domains",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SyncResponse {
    pub profile: ProfileResponse,
    pub folders: Vec<FolderResponse>,
    pub ciphers: Vec<CipherResponse>,
    pub domains: DomainsResponse,
    pub object: &'static str,
}
