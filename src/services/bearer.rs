//! Maps an `Authorization: Bearer <token>` header to a device.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use chrono::Utc;
use std::sync::Arc;

use crate::config::DbPool;
use crate::error::ApiError;
use crate::modules::identity::interface::DeviceRepository;
use crate::modules::identity::model::Device;
use crate::store::UnitOfWork;
use crate::AppState;

/// The token part of a `Bearer <token>` credential.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// The device holding this exact access token, if it has not expired.
///
/// Never fails: store errors are logged and read as "no device".
pub async fn resolve(pool: &DbPool, header_value: Option<&str>) -> Option<Device> {
    let token = bearer_token(header_value?)?;

    let found = match UnitOfWork::read(pool).await {
        Ok(mut uow) => uow.find_device_by_access_token(token).await,
        Err(e) => Err(e),
    };

    match found {
        Ok(Some(device)) if device.access_token_valid_at(Utc::now()) => Some(device),
        Ok(Some(device)) => {
            tracing::debug!(device = %device.uuid, "bearer token expired");
            None
        }
        Ok(None) => None,
        Err(e) => {
            tracing::error!(error = %e, "bearer lookup failed");
            None
        }
    }
}

/// Extractor for handlers that need an authenticated device. Rejects with
/// the `invalid bearer` validation error.
#[derive(Debug, Clone)]
pub struct CurrentDevice(pub Device);

impl FromRequestParts<Arc<AppState>> for CurrentDevice {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        resolve(&state.db, header_value)
            .await
            .map(CurrentDevice)
            .ok_or_else(ApiError::invalid_bearer)
    }
}
