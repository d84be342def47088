use serde::{Deserialize, Serialize};

use super::model::User;
use crate::services::params::lenient_string;

// =============================================================================
// REGISTER
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub masterpasswordhash: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub masterpasswordhint: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub key: Option<String>,
}

// =============================================================================
// PROFILE
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProfileResponse {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
    pub email_verified: bool,
    pub premium: bool,
    pub master_password_hint: Option<String>,
    pub culture: String,
    pub two_factor_enabled: bool,
    pub key: String,
    pub private_key: Option<String>,
    pub security_stamp: Option<String>,
    pub organizations: Vec<serde_json::Value>,
    pub object: &'static str,
}

impl From<&User> for ProfileResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.uuid.clone(),
            name: None,
            email: user.email.clone(),
            email_verified: false,
            premium: user.premium,
            master_password_hint: user.password_hint.clone(),
            culture: user.culture.clone(),
            two_factor_enabled: user.two_factor_enabled,
            key: user.key.clone(),
            private_key: None,
            security_stamp: None,
            organizations: Vec::new(),
            object: "profile",
        }
    }
}
