use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::schema::{
    CipherRequest, CipherResponse, DomainsResponse, FolderRequest, FolderResponse, SyncResponse,
};
use super::service;
use crate::error::ApiError;
use crate::modules::accounts::schema::ProfileResponse;
use crate::services::bearer::CurrentDevice;
use crate::services::params::Params;
use crate::store::UnitOfWork;
use crate::AppState;

async fn commit(
    state: &AppState,
    uow: UnitOfWork,
    entity: &str,
    action: &str,
) -> Result<(), ApiError> {
    uow.commit().await.map_err(ApiError::save("error saving"))?;
    state.metrics.record_vault_mutation(entity, action);
    Ok(())
}

// =============================================================================
// GET /sync - profile, folders and ciphers
// =============================================================================

pub async fn sync(
    State(state): State<Arc<AppState>>,
    CurrentDevice(device): CurrentDevice,
) -> Result<Json<SyncResponse>, ApiError> {
    let mut uow = UnitOfWork::read(&state.db).await?;
    let snapshot = service::snapshot(&mut uow, &device).await?;
    uow.rollback().await?;

    Ok(Json(SyncResponse {
        profile: ProfileResponse::from(&snapshot.user),
        folders: snapshot.folders.iter().map(FolderResponse::from).collect(),
        ciphers: snapshot.ciphers.iter().map(CipherResponse::from).collect(),
        domains: DomainsResponse::default(),
        object: "sync",
    }))
}

// =============================================================================
// CIPHERS
// =============================================================================

pub async fn create_cipher(
    State(state): State<Arc<AppState>>,
    CurrentDevice(device): CurrentDevice,
    Params(request): Params<CipherRequest>,
) -> Result<Json<CipherResponse>, ApiError> {
    let mut uow = UnitOfWork::begin(&state.db).await?;
    let cipher = service::create_cipher(&mut uow, &device, &request).await?;
    commit(&state, uow, "cipher", "create").await?;

    Ok(Json(CipherResponse::from(&cipher).editable()))
}

pub async fn update_cipher(
    State(state): State<Arc<AppState>>,
    CurrentDevice(device): CurrentDevice,
    Path(uuid): Path<String>,
    Params(request): Params<CipherRequest>,
) -> Result<Json<CipherResponse>, ApiError> {
    let mut uow = UnitOfWork::begin(&state.db).await?;
    let cipher = service::update_cipher(&mut uow, &device, &uuid, &request).await?;
    commit(&state, uow, "cipher", "update").await?;

    Ok(Json(CipherResponse::from(&cipher).editable()))
}

pub async fn delete_cipher(
    State(state): State<Arc<AppState>>,
    CurrentDevice(device): CurrentDevice,
    Path(uuid): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut uow = UnitOfWork::begin(&state.db).await?;
    service::delete_cipher(&mut uow, &device, &uuid).await?;
    commit(&state, uow, "cipher", "delete").await?;

    Ok(StatusCode::OK)
}

// =============================================================================
// FOLDERS
// =============================================================================

pub async fn create_folder(
    State(state): State<Arc<AppState>>,
    CurrentDevice(device): CurrentDevice,
    Params(request): Params<FolderRequest>,
) -> Result<Json<FolderResponse>, ApiError> {
    let mut uow = UnitOfWork::begin(&state.db).await?;
    let folder = service::create_folder(&mut uow, &device, &request).await?;
    commit(&state, uow, "folder", "create").await?;

    Ok(Json(FolderResponse::from(&folder)))
}

pub async fn rename_folder(
    State(state): State<Arc<AppState>>,
    CurrentDevice(device): CurrentDevice,
    Path(uuid): Path<String>,
    Params(request): Params<FolderRequest>,
) -> Result<Json<FolderResponse>, ApiError> {
    let mut uow = UnitOfWork::begin(&state.db).await?;
    let folder = service::rename_folder(&mut uow, &device, &uuid, &request).await?;
    commit(&state, uow, "folder", "update").await?;

    Ok(Json(FolderResponse::from(&folder)))
}

pub async fn delete_folder(
    State(state): State<Arc<AppState>>,
    CurrentDevice(device): CurrentDevice,
    Path(uuid): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut uow = UnitOfWork::begin(&state.db).await?;
    service::delete_folder(&mut uow, &device, &uuid).await?;
    commit(&state, uow, "folder", "delete").await?;

    Ok(StatusCode::OK)
}
