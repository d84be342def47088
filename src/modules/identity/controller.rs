use axum::{extract::State, Json};
use std::sync::Arc;

use super::schema::{TokenRequest, TokenResponse};
use super::service::{GrantType, IssuedTokens, TokenService};
use crate::error::ApiError;
use crate::services::params::{present, Params};
use crate::store::UnitOfWork;
use crate::AppState;

// =============================================================================
// POST /connect/token - password and refresh_token grants
// =============================================================================

pub async fn token(
    State(state): State<Arc<AppState>>,
    Params(request): Params<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let grant_label = GrantType::parse(present(&request.grant_type))
        .map(GrantType::as_str)
        .unwrap_or("unsupported");

    let result = issue(&state, &request).await;

    let outcome = match &result {
        Ok(_) => "issued",
        Err(ApiError::TwoFactorRequired(_)) => "two_factor_required",
        Err(_) => "rejected",
    };
    state.metrics.record_token_grant(grant_label, outcome);

    let issued = result?;
    Ok(Json(TokenResponse {
        access_token: issued.access_token,
        expires_in: issued.expires_in,
        token_type: "Bearer",
        refresh_token: issued.refresh_token,
        key: issued.key,
    }))
}

async fn issue(state: &AppState, request: &TokenRequest) -> Result<IssuedTokens, ApiError> {
    let mut uow = UnitOfWork::begin(&state.db).await?;

    let service = TokenService::new(&state.tokens, state.config.token_ttl_secs);
    let issued = service.issue_or_refresh(&mut uow, request).await?;

    uow.commit().await.map_err(ApiError::save("Unknown error"))?;
    Ok(issued)
}
