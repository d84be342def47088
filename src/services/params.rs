//! Request decoding with case-normalized field names.
//!
//! Clients disagree on key casing (`deviceIdentifier`, `DeviceIdentifier`,
//! `deviceidentifier`). Every top-level key is lowercased here, once, before
//! the body is deserialized into a typed request. Nested objects are kept
//! verbatim; they are opaque vault payloads.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::header,
    Form,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// A request body (JSON or form-encoded) decoded into `T` after key
/// normalization.
#[derive(Debug)]
pub struct Params<T>(pub T);

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}

/// Lowercase every top-level key. Keys are applied in sorted order, not body
/// order, so when two keys normalize to the same name the one that sorts last
/// wins (`name` over `Name`).
pub fn normalize_keys(object: Map<String, Value>) -> Map<String, Value> {
    let mut pairs: Vec<(String, Value)> = object.into_iter().collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_lowercase(), v))
        .collect()
}

pub fn decode<T: DeserializeOwned>(object: Map<String, Value>) -> Result<T, ApiError> {
    serde_json::from_value(Value::Object(normalize_keys(object)))
        .map_err(|e| ApiError::validation(format!("invalid request: {e}")))
}

impl<S, T> FromRequest<S> for Params<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let object = if is_form(&req) {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::validation(format!("invalid form body: {e}")))?;
            pairs
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect()
        } else {
            let body = Bytes::from_request(req, state)
                .await
                .map_err(|e| ApiError::validation(format!("invalid request body: {e}")))?;
            if body.iter().all(u8::is_ascii_whitespace) {
                Map::new()
            } else {
                match serde_json::from_slice::<Value>(&body) {
                    Ok(Value::Object(object)) => object,
                    Ok(_) => return Err(ApiError::validation("request body must be an object")),
                    Err(e) => return Err(ApiError::validation(format!("invalid JSON: {e}"))),
                }
            }
        };

        decode(object).map(Params)
    }
}

/// Accepts strings, numbers and booleans as text; `null` and absence as `None`.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

pub fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::String(s)) => match s.to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        Some(Value::Number(n)) => Some(n.as_i64() != Some(0)),
        _ => None,
    })
}

/// The trimmed value, or `None` when absent or blank.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// A value that must be present and non-blank; the error names `field`.
pub fn required<'a>(field: &str, value: &'a Option<String>) -> Result<&'a str, ApiError> {
    present(value).ok_or_else(|| ApiError::blank(field))
}

/// Like [`present`], but the value comes back exactly as sent.
pub fn present_verbatim(value: &Option<String>) -> Option<&str> {
    present(value).and(value.as_deref())
}

/// Like [`required`], but the value comes back exactly as sent.
pub fn required_verbatim<'a>(field: &str, value: &'a Option<String>) -> Result<&'a str, ApiError> {
    required(field, value)?;
    Ok(value.as_deref().unwrap_or_default())
}
