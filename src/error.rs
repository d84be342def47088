use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value};

use crate::store::StoreError;

/// Second-factor mechanisms a client may be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TwoFactorProvider {
    Authenticator = 0,
}

impl TwoFactorProvider {
    pub fn id(self) -> u8 {
        self as u8
    }
}

/// Every failure a handler can produce. All of them render as HTTP 400.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed field, unsupported scope or grant, duplicate email.
    #[error("{0}")]
    Validation(String),

    /// Bad credentials or an invalid bearer/refresh token.
    #[error("{0}")]
    AuthenticationFailure(String),

    #[error("Two factor required.")]
    TwoFactorRequired(Vec<TwoFactorProvider>),

    /// Folder or cipher missing, or owned by someone else.
    #[error("{0}")]
    OwnershipViolation(&'static str),

    /// A write was rejected; the enclosing unit of work rolled back.
    #[error("{message}")]
    Persistence {
        message: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("Unknown error")]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn blank(field: &str) -> Self {
        Self::Validation(format!("{field} cannot be blank"))
    }

    pub fn invalid_grant(message: impl Into<String>) -> Self {
        Self::AuthenticationFailure(message.into())
    }

    pub fn invalid_bearer() -> Self {
        Self::AuthenticationFailure("invalid bearer".to_string())
    }

    /// Wrap a failed write with the message the caller shows for it.
    pub fn save(message: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Persistence { message, source }
    }
}

/// `{"ValidationErrors": {"": [message]}, "Object": "error"}`
pub fn validation_envelope(message: &str) -> Value {
    json!({
        "ValidationErrors": { "": [message] },
        "Object": "error",
    })
}

fn two_factor_payload(providers: &[TwoFactorProvider]) -> Value {
    let ids: Vec<u8> = providers.iter().map(|p| p.id()).collect();
    let mut by_id = Map::new();
    for id in &ids {
        by_id.insert(id.to_string(), Value::Null);
    }

    json!({
        "error": "invalid_grant",
        "error_description": "Two factor required.",
        "TwoFactorProviders": ids,
        "TwoFactorProviders2": by_id,
    })
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            Self::TwoFactorRequired(providers) => two_factor_payload(providers),
            Self::Persistence { message, source } => {
                tracing::error!(error = %source, "{message}");
                validation_envelope(message)
            }
            Self::Store(source) => {
                tracing::error!(error = %source, "store read failed");
                validation_envelope("Unknown error")
            }
            other => validation_envelope(&other.to_string()),
        };

        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
