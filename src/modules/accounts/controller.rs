use axum::{extract::State, http::StatusCode};
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use validator::ValidateEmail;

use super::interface::UserRepository;
use super::model::User;
use super::schema::RegisterRequest;
use crate::error::ApiError;
use crate::services::params::{present, required, Params};
use crate::services::{cipher_string, hashing};
use crate::store::UnitOfWork;
use crate::AppState;

lazy_static! {
    static ref EMAIL_SHAPE: Regex = Regex::new(r"^.+@.+\..+$").expect("static regex");
    // Symmetric key wrapped as iv|ciphertext[|mac].
    static ref KEY_SHAPE: Regex = Regex::new(r"^[0-2]\..+\|.+").expect("static regex");
}

fn valid_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email) && email.validate_email()
}

fn valid_key(key: &str) -> bool {
    KEY_SHAPE.is_match(key) && cipher_string::is_valid(key)
}

// =============================================================================
// POST /accounts/register
// =============================================================================

pub async fn register(
    State(state): State<Arc<AppState>>,
    Params(request): Params<RegisterRequest>,
) -> Result<StatusCode, ApiError> {
    if !state.config.allow_signups {
        return Err(ApiError::validation("Signups are not permitted"));
    }

    let master_hash = required("masterpasswordhash", &request.masterpasswordhash)?;

    let email = present(&request.email)
        .filter(|e| valid_email(e))
        .ok_or_else(|| ApiError::validation("Invalid e-mail address"))?
        .to_lowercase();

    let key = present(&request.key)
        .filter(|k| valid_key(k))
        .ok_or_else(|| ApiError::validation("Invalid key"))?;

    let verifier = hashing::hash_master_password(master_hash).map_err(|e| {
        tracing::error!(error = %e, "hashing master password failed");
        ApiError::validation("User save failed")
    })?;

    let mut user = User::new(&email, verifier, key);
    user.password_hint = present(&request.masterpasswordhint).map(str::to_string);

    let mut uow = UnitOfWork::begin(&state.db).await?;

    if uow.find_user_by_email(&user.email).await?.is_some() {
        return Err(ApiError::validation("E-mail is already in use"));
    }

    uow.insert_user(&user)
        .await
        .map_err(ApiError::save("User save failed"))?;
    uow.commit().await.map_err(ApiError::save("User save failed"))?;

    tracing::info!(user = %user.uuid, email = %user.email, "registered user");
    Ok(StatusCode::OK)
}
