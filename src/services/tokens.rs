use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use rand::RngCore;
use serde::Serialize;
use uuid::Uuid;

const ISSUER: &str = "vaultsync|login";
const REFRESH_TOKEN_BYTES: usize = 64;

/// Claims carried by an access token. Clients read these; the server
/// authenticates by exact token match instead of decoding them.
#[derive(Debug, Serialize)]
pub struct AccessClaims {
    pub sub: String,        // user uuid
    pub email: String,
    pub name: Option<String>,
    pub premium: bool,
    pub email_verified: bool,
    pub device: String,     // device uuid
    pub iss: String,
    pub nbf: i64,
    pub exp: i64,
    pub jti: String,
}

/// Identity baked into a freshly issued access token.
pub struct AccessSubject<'a> {
    pub user_uuid: &'a str,
    pub email: &'a str,
    pub premium: bool,
    pub device_uuid: &'a str,
}

pub struct TokenIssuer {
    secret: String,
}

impl TokenIssuer {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn access_token(
        &self,
        subject: &AccessSubject<'_>,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = AccessClaims {
            sub: subject.user_uuid.to_string(),
            email: subject.email.to_string(),
            name: None,
            premium: subject.premium,
            email_verified: true,
            device: subject.device_uuid.to_string(),
            iss: ISSUER.to_string(),
            nbf: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }
}

/// 64 bytes from the thread CSPRNG, URL-safe base64.
pub fn refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
