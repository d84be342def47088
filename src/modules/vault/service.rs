//! Folder and cipher operations scoped to the device's owning user.
//!
//! Each function validates its input completely before touching the
//! repository for writes, so a rejected request leaves no trace. Callers
//! own the unit of work and commit it.

use chrono::Utc;
use sqlx::types::Json;

use super::interface::VaultRepository;
use super::model::{Cipher, CipherData, Folder};
use super::schema::{CipherRequest, FolderRequest};
use crate::error::ApiError;
use crate::modules::accounts::interface::UserRepository;
use crate::modules::accounts::model::User;
use crate::modules::identity::model::Device;
use crate::services::cipher_string;
use crate::services::params::{present, present_verbatim, required, required_verbatim};

const SAVE_ERROR: &str = "error saving";

pub struct Snapshot {
    pub user: User,
    pub folders: Vec<Folder>,
    pub ciphers: Vec<Cipher>,
}

pub async fn snapshot<R>(repo: &mut R, device: &Device) -> Result<Snapshot, ApiError>
where
    R: VaultRepository + UserRepository,
{
    let user = repo
        .find_user_by_uuid(&device.user_uuid)
        .await?
        .ok_or_else(ApiError::invalid_bearer)?;
    let folders = repo.list_folders(&user.uuid).await?;
    let ciphers = repo.list_ciphers(&user.uuid).await?;

    Ok(Snapshot {
        user,
        folders,
        ciphers,
    })
}

// =============================================================================
// FOLDERS
// =============================================================================

fn folder_name(request: &FolderRequest) -> Result<&str, ApiError> {
    let name = required_verbatim("name", &request.name)?;
    if !cipher_string::is_valid(name) {
        return Err(ApiError::validation("Invalid name"));
    }
    Ok(name)
}

pub async fn create_folder<R: VaultRepository>(
    repo: &mut R,
    device: &Device,
    request: &FolderRequest,
) -> Result<Folder, ApiError> {
    let name = folder_name(request)?;

    let folder = Folder::new(&device.user_uuid, name);
    repo.insert_folder(&folder)
        .await
        .map_err(ApiError::save(SAVE_ERROR))?;
    Ok(folder)
}

pub async fn rename_folder<R: VaultRepository>(
    repo: &mut R,
    device: &Device,
    uuid: &str,
    request: &FolderRequest,
) -> Result<Folder, ApiError> {
    let mut folder = owned_folder(repo, device, uuid).await?;
    let name = folder_name(request)?;

    folder.name = name.to_string();
    folder.updated_at = Utc::now();
    repo.update_folder(&folder)
        .await
        .map_err(ApiError::save(SAVE_ERROR))?;
    Ok(folder)
}

pub async fn delete_folder<R: VaultRepository>(
    repo: &mut R,
    device: &Device,
    uuid: &str,
) -> Result<(), ApiError> {
    let folder = owned_folder(repo, device, uuid).await?;
    repo.delete_folder(&folder)
        .await
        .map_err(ApiError::save(SAVE_ERROR))
}

async fn owned_folder<R: VaultRepository>(
    repo: &mut R,
    device: &Device,
    uuid: &str,
) -> Result<Folder, ApiError> {
    let uuid = uuid.trim();
    if uuid.is_empty() {
        return Err(ApiError::OwnershipViolation("invalid folder"));
    }
    repo.find_folder(&device.user_uuid, uuid)
        .await?
        .ok_or(ApiError::OwnershipViolation("invalid folder"))
}

// =============================================================================
// CIPHERS
// =============================================================================

/// A cipher request that passed every check.
struct CipherInput {
    cipher_type: i64,
    name: String,
    notes: Option<String>,
    folder_uuid: Option<String>,
    favorite: bool,
    data: CipherData,
}

impl CipherInput {
    fn apply(self, cipher: &mut Cipher) {
        cipher.cipher_type = self.cipher_type;
        cipher.name = self.name;
        cipher.notes = self.notes;
        cipher.folder_uuid = self.folder_uuid;
        cipher.favorite = self.favorite;
        cipher.data = Json(self.data);
        cipher.updated_at = Utc::now();
    }
}

async fn cipher_input<R: VaultRepository>(
    repo: &mut R,
    device: &Device,
    request: &CipherRequest,
) -> Result<CipherInput, ApiError> {
    let cipher_type = required("type", &request.cipher_type)?;
    let name = required_verbatim("name", &request.name)?;

    let cipher_type: i64 = cipher_type
        .parse()
        .map_err(|_| ApiError::validation("Invalid type"))?;

    if !cipher_string::is_valid(name) {
        return Err(ApiError::validation("Invalid name"));
    }

    let notes = present_verbatim(&request.notes);
    if notes.is_some_and(|n| !cipher_string::is_valid(n)) {
        return Err(ApiError::validation("Invalid notes"));
    }

    let folder_uuid = match present(&request.folderid) {
        Some(folder_id) => {
            if repo.find_folder(&device.user_uuid, folder_id).await?.is_none() {
                return Err(ApiError::OwnershipViolation("Invalid folder"));
            }
            Some(folder_id.to_string())
        }
        None => None,
    };

    Ok(CipherInput {
        cipher_type,
        name: name.to_string(),
        notes: notes.map(str::to_string),
        folder_uuid,
        favorite: request.favorite.unwrap_or(false),
        data: CipherData {
            fields: request.fields.clone(),
            login: request.login.clone(),
            card: request.card.clone(),
            identity: request.identity.clone(),
            securenote: request.securenote.clone(),
        },
    })
}

pub async fn create_cipher<R: VaultRepository>(
    repo: &mut R,
    device: &Device,
    request: &CipherRequest,
) -> Result<Cipher, ApiError> {
    let input = cipher_input(repo, device, request).await?;

    let mut cipher = Cipher::new(&device.user_uuid);
    input.apply(&mut cipher);
    repo.insert_cipher(&cipher)
        .await
        .map_err(ApiError::save(SAVE_ERROR))?;
    Ok(cipher)
}

pub async fn update_cipher<R: VaultRepository>(
    repo: &mut R,
    device: &Device,
    uuid: &str,
    request: &CipherRequest,
) -> Result<Cipher, ApiError> {
    let mut cipher = owned_cipher(repo, device, uuid).await?;
    let input = cipher_input(repo, device, request).await?;

    input.apply(&mut cipher);
    repo.update_cipher(&cipher)
        .await
        .map_err(ApiError::save(SAVE_ERROR))?;
    Ok(cipher)
}

pub async fn delete_cipher<R: VaultRepository>(
    repo: &mut R,
    device: &Device,
    uuid: &str,
) -> Result<(), ApiError> {
    let cipher = owned_cipher(repo, device, uuid).await?;
    repo.delete_cipher(&cipher)
        .await
        .map_err(ApiError::save(SAVE_ERROR))
}

async fn owned_cipher<R: VaultRepository>(
    repo: &mut R,
    device: &Device,
    uuid: &str,
) -> Result<Cipher, ApiError> {
    let uuid = uuid.trim();
    if uuid.is_empty() {
        return Err(ApiError::OwnershipViolation("invalid cipher"));
    }
    repo.find_cipher(&device.user_uuid, uuid)
        .await?
        .ok_or(ApiError::OwnershipViolation("invalid cipher"))
}
