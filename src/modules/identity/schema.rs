use serde::{Deserialize, Serialize};

use crate::services::params::lenient_string;

// =============================================================================
// TOKEN GRANT
// =============================================================================

/// `/connect/token` body, keys already lowercased.
#[derive(Debug, Default, Deserialize)]
pub struct TokenRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub grant_type: Option<String>,

    // refresh_token grant
    #[serde(default, deserialize_with = "lenient_string")]
    pub refresh_token: Option<String>,

    // password grant
    #[serde(default, deserialize_with = "lenient_string")]
    pub client_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub deviceidentifier: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub devicename: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub devicetype: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub devicepushtoken: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub scope: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub twofactortoken: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub twofactorprovider: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub token_type: &'static str,
    pub refresh_token: String,
    #[serde(rename = "Key")]
    pub key: String,
}
