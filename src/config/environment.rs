use std::env;
use std::str::FromStr;

/// Environment configuration.
///
/// Built once at startup and handed to [`crate::create_app`]; nothing reads
/// the environment after that.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    /// Prefix for account, sync, vault and device routes.
    pub api_base_url: String,
    /// Prefix for `/connect/token`.
    pub identity_base_url: String,
    pub allow_signups: bool,
    pub token_ttl_secs: i64,
}

impl Config {
    pub const DEFAULT_TOKEN_TTL_SECS: i64 = 60 * 60;

    /// Defaults for everything except the signing secret.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: "sqlite://vaultsync.db?mode=rwc".to_string(),
            jwt_secret: jwt_secret.into(),
            bind_addr: "0.0.0.0:3000".to_string(),
            api_base_url: "/api".to_string(),
            identity_base_url: "/identity".to_string(),
            allow_signups: false,
            token_ttl_secs: Self::DEFAULT_TOKEN_TTL_SECS,
        }
    }

    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| "JWT_SECRET must be set".to_string())?;
        if jwt_secret.trim().is_empty() {
            return Err("JWT_SECRET must not be empty".to_string());
        }

        let mut config = Self::new(jwt_secret);

        if let Ok(url) = env::var("DATABASE_URL") {
            config.database_url = url;
        }
        if let Ok(addr) = env::var("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(prefix) = env::var("API_BASE_URL") {
            config.api_base_url = prefix;
        }
        if let Ok(prefix) = env::var("IDENTITY_BASE_URL") {
            config.identity_base_url = prefix;
        }
        if let Some(allow) = parse_var("ALLOW_SIGNUPS", parse_bool)? {
            config.allow_signups = allow;
        }
        if let Some(ttl) = parse_var("TOKEN_TTL_SECS", |v| i64::from_str(v).ok())? {
            if ttl <= 0 {
                return Err("TOKEN_TTL_SECS must be positive".to_string());
            }
            config.token_ttl_secs = ttl;
        }

        Ok(config)
    }

    pub fn allow_signups(mut self, allow: bool) -> Self {
        self.allow_signups = allow;
        self
    }
}

fn parse_var<T>(name: &str, parse: impl Fn(&str) -> Option<T>) -> Result<Option<T>, String> {
    match env::var(name) {
        Ok(raw) => parse(raw.trim())
            .map(Some)
            .ok_or_else(|| format!("{name} has an invalid value: {raw:?}")),
        Err(_) => Ok(None),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
