use chrono::{DateTime, Duration, Utc};

use super::interface::DeviceRepository;
use super::model::Device;
use super::schema::TokenRequest;
use crate::error::{ApiError, TwoFactorProvider};
use crate::modules::accounts::interface::UserRepository;
use crate::modules::accounts::model::User;
use crate::services::hashing;
use crate::services::params::{present, required};
use crate::services::tokens::{self, AccessSubject, TokenIssuer};
use crate::services::totp;
use crate::store::StoreError;

pub const SUPPORTED_SCOPE: &str = "api offline_access";

/// Attempts at drawing a token no other device holds.
const MAX_TOKEN_DRAWS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantType {
    Password,
    RefreshToken,
}

impl GrantType {
    pub fn parse(value: Option<&str>) -> Option<Self> {
        match value {
            Some("password") => Some(Self::Password),
            Some("refresh_token") => Some(Self::RefreshToken),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::RefreshToken => "refresh_token",
        }
    }
}

/// Credentials handed back to the client after a successful grant.
#[derive(Debug)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    /// The user's account key blob, passed through untouched.
    pub key: String,
}

pub struct TokenService<'a> {
    issuer: &'a TokenIssuer,
    ttl: Duration,
}

impl<'a> TokenService<'a> {
    pub fn new(issuer: &'a TokenIssuer, ttl_secs: i64) -> Self {
        Self {
            issuer,
            ttl: Duration::seconds(ttl_secs),
        }
    }

    /// Evaluate a grant and rotate the device's credentials.
    ///
    /// Nothing is written unless the grant succeeds; the caller commits `repo`.
    pub async fn issue_or_refresh<R>(
        &self,
        repo: &mut R,
        request: &TokenRequest,
    ) -> Result<IssuedTokens, ApiError>
    where
        R: DeviceRepository + UserRepository,
    {
        let grant = GrantType::parse(present(&request.grant_type))
            .ok_or_else(|| ApiError::validation("grant type not supported"))?;

        let (user, mut device) = match grant {
            GrantType::RefreshToken => self.refresh_grant(repo, request).await?,
            GrantType::Password => self.password_grant(repo, request).await?,
        };

        let now = Utc::now();
        self.rotate(repo, &user, &mut device, now).await?;

        if let Err(e) = repo.save_device(&mut device).await {
            return Err(match (grant, e) {
                (GrantType::RefreshToken, StoreError::Conflict(_)) => {
                    tracing::warn!(
                        device = %device.uuid,
                        "refresh token lost a concurrent rotation"
                    );
                    ApiError::invalid_grant("Invalid refresh token")
                }
                (_, e) => ApiError::save("Unknown error")(e),
            });
        }

        let expires_at = device.token_expires_at.unwrap_or(now);
        tracing::info!(
            device = %device.uuid,
            user = %user.uuid,
            grant_type = grant.as_str(),
            "issued tokens"
        );

        Ok(IssuedTokens {
            access_token: device.access_token.unwrap_or_default(),
            refresh_token: device.refresh_token.unwrap_or_default(),
            expires_in: (expires_at - now).num_seconds(),
            key: user.key,
        })
    }

    async fn refresh_grant<R>(
        &self,
        repo: &mut R,
        request: &TokenRequest,
    ) -> Result<(User, Device), ApiError>
    where
        R: DeviceRepository + UserRepository,
    {
        let token = required("refresh_token", &request.refresh_token)?;

        let Some(device) = repo.find_device_by_refresh_token(token).await? else {
            tracing::warn!("refresh grant with unknown refresh token");
            return Err(ApiError::invalid_grant("Invalid refresh token"));
        };

        let user = repo
            .find_user_by_uuid(&device.user_uuid)
            .await?
            .ok_or_else(|| ApiError::invalid_grant("Invalid refresh token"))?;

        Ok((user, device))
    }

    async fn password_grant<R>(
        &self,
        repo: &mut R,
        request: &TokenRequest,
    ) -> Result<(User, Device), ApiError>
    where
        R: DeviceRepository + UserRepository,
    {
        let _client_id = required("client_id", &request.client_id)?;
        let device_uuid = required("deviceidentifier", &request.deviceidentifier)?;
        let device_name = required("devicename", &request.devicename)?;
        let device_type = required("devicetype", &request.devicetype)?;
        let password = required("password", &request.password)?;
        let scope = required("scope", &request.scope)?;
        let username = required("username", &request.username)?;

        if scope != SUPPORTED_SCOPE {
            return Err(ApiError::validation("scope not supported"));
        }

        let email = username.to_lowercase();
        let Some(user) = repo.find_user_by_email(&email).await? else {
            tracing::warn!(%email, "password grant for unknown user");
            return Err(ApiError::invalid_grant("Invalid username"));
        };

        let password_ok = hashing::verify_master_password(password, &user.password_hash)
            .unwrap_or_else(|e| {
                tracing::error!(
                    user = %user.uuid,
                    error = %e,
                    "stored password verifier is unreadable"
                );
                false
            });
        if !password_ok {
            tracing::warn!(%email, "password grant with wrong password");
            return Err(ApiError::invalid_grant("Invalid password"));
        }

        if user.two_factor_enabled && !second_factor_ok(&user, request, Utc::now()) {
            return Err(ApiError::TwoFactorRequired(vec![TwoFactorProvider::Authenticator]));
        }

        let mut device = match repo.find_device_by_uuid(device_uuid).await? {
            Some(existing) if existing.user_uuid == user.uuid => existing,
            Some(existing) => {
                // A device id reused for a different account: the old
                // identity and every token it held go away.
                tracing::info!(
                    device = %existing.uuid,
                    previous_user = %existing.user_uuid,
                    user = %user.uuid,
                    "device identity conflict, recreating device"
                );
                repo.delete_device(&existing.uuid).await?;
                Device::new(device_uuid, &user.uuid)
            }
            None => Device::new(device_uuid, &user.uuid),
        };

        device.device_type = device_type.to_string();
        device.name = device_name.to_string();
        if let Some(push_token) = present(&request.devicepushtoken) {
            device.push_token = Some(push_token.to_string());
        }

        Ok((user, device))
    }

    /// Draw a fresh access/refresh pair unique across all devices and set the
    /// expiry to `now + ttl`.
    async fn rotate<R>(
        &self,
        repo: &mut R,
        user: &User,
        device: &mut Device,
        now: DateTime<Utc>,
    ) -> Result<(), ApiError>
    where
        R: DeviceRepository,
    {
        let expires_at = now + self.ttl;
        let subject = AccessSubject {
            user_uuid: &user.uuid,
            email: &user.email,
            premium: user.premium,
            device_uuid: &device.uuid,
        };

        let mut access_token = None;
        for _ in 0..MAX_TOKEN_DRAWS {
            let candidate = self
                .issuer
                .access_token(&subject, now, expires_at)
                .map_err(|e| signing_failed(&device.uuid, e))?;
            if repo.find_device_by_access_token(&candidate).await?.is_none() {
                access_token = Some(candidate);
                break;
            }
        }

        let mut refresh_token = None;
        for _ in 0..MAX_TOKEN_DRAWS {
            let candidate = tokens::refresh_token();
            if repo.find_device_by_refresh_token(&candidate).await?.is_none() {
                refresh_token = Some(candidate);
                break;
            }
        }

        let (Some(access_token), Some(refresh_token)) = (access_token, refresh_token) else {
            return Err(ApiError::validation("Unknown error"));
        };

        device.access_token = Some(access_token);
        device.refresh_token = Some(refresh_token);
        device.token_expires_at = Some(expires_at);
        Ok(())
    }
}

/// Signing errors are internal; the client only sees the generic failure.
fn signing_failed(device_uuid: &str, e: jsonwebtoken::errors::Error) -> ApiError {
    tracing::error!(device = %device_uuid, error = %e, "signing access token failed");
    ApiError::validation("Unknown error")
}

fn second_factor_ok(user: &User, request: &TokenRequest, now: DateTime<Utc>) -> bool {
    let (Some(secret), Some(code)) = (user.totp_secret.as_deref(), present(&request.twofactortoken))
    else {
        return false;
    };

    match totp::verify(secret, code, now.timestamp()) {
        Ok(valid) => valid,
        Err(e) => {
            tracing::error!(user = %user.uuid, error = %e, "stored TOTP secret is unreadable");
            false
        }
    }
}
