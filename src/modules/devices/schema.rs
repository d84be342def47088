use serde::Deserialize;

use crate::services::params::lenient_string;

#[derive(Debug, Default, Deserialize)]
pub struct PushTokenRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub pushtoken: Option<String>,
}
