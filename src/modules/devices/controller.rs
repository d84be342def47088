use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::schema::PushTokenRequest;
use super::service;
use crate::error::ApiError;
use crate::services::bearer::CurrentDevice;
use crate::services::params::{required, Params};
use crate::store::UnitOfWork;
use crate::AppState;

// The identifier in the path is accepted but not trusted: some clients omit
// or mismatch it, so the bearer-resolved device is the one updated.

// =============================================================================
// PUT /devices/identifier/{uuid}/token
// =============================================================================

pub async fn set_token(
    State(state): State<Arc<AppState>>,
    CurrentDevice(device): CurrentDevice,
    Path(_identifier): Path<String>,
    Params(request): Params<PushTokenRequest>,
) -> Result<StatusCode, ApiError> {
    let push_token = required("pushtoken", &request.pushtoken)?;

    let mut uow = UnitOfWork::begin(&state.db).await?;
    let device = service::set_push_token(&mut uow, device, Some(push_token)).await?;
    uow.commit().await.map_err(ApiError::save("error saving"))?;

    tracing::debug!(device = %device.uuid, "push token set");
    Ok(StatusCode::OK)
}

// =============================================================================
// PUT /devices/identifier/{uuid}/clear-token
// =============================================================================

pub async fn clear_token(
    State(state): State<Arc<AppState>>,
    CurrentDevice(device): CurrentDevice,
    Path(_identifier): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut uow = UnitOfWork::begin(&state.db).await?;
    let device = service::set_push_token(&mut uow, device, None).await?;
    uow.commit().await.map_err(ApiError::save("error saving"))?;

    tracing::debug!(device = %device.uuid, "push token cleared");
    Ok(StatusCode::OK)
}
