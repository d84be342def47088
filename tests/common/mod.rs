use axum_test::{TestResponse, TestServer};
use serde_json::{json, Value};

use std::path::PathBuf;

use vaultsync::config::{init_db, init_memory_db, Config, DbPool};

pub const MASTER_PASSWORD_HASH: &str = "r5CFRR+n9NQI8a525FY+0BPR0HGOjVJX0cR1KEMnIOo=";
pub const ACCOUNT_KEY: &str = "2.aXY=|Y3Q=|bWFj";
pub const TOTP_SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

// Allow dead_code for utilities used by other test files
#[allow(dead_code)]
pub struct TestContext {
    pub server: TestServer,
    pub db: DbPool,
    /// Set for file-backed contexts; removed by `cleanup`.
    pub db_path: Option<PathBuf>,
}

#[allow(dead_code)]
impl TestContext {
    pub async fn new() -> Self {
        let config = Config::new("test-secret-key-for-testing-only").allow_signups(true);
        Self::with_config(config).await
    }

    pub async fn with_config(config: Config) -> Self {
        let db = init_memory_db()
            .await
            .expect("Failed to open in-memory database");

        Self::serve(db, config, None)
    }

    /// A context over a real database file with the production pool, so
    /// requests can hold separate connections at the same time.
    pub async fn file_backed() -> Self {
        let path = std::env::temp_dir()
            .join(format!("vaultsync-test-{}.db", uuid::Uuid::new_v4()));

        let mut config = Config::new("test-secret-key-for-testing-only").allow_signups(true);
        config.database_url = format!("sqlite://{}?mode=rwc", path.display());

        let db = init_db(&config.database_url)
            .await
            .expect("Failed to open test database file");

        Self::serve(db, config, Some(path))
    }

    fn serve(db: DbPool, config: Config, db_path: Option<PathBuf>) -> Self {
        let app = vaultsync::create_app(db.clone(), config).expect("Failed to build app");
        let server = TestServer::new(app).expect("Failed to create test server");

        Self { server, db, db_path }
    }

    pub async fn cleanup(&self) {
        self.db.close().await;
        if let Some(path) = &self.db_path {
            for suffix in ["", "-wal", "-shm"] {
                let mut file = path.clone().into_os_string();
                file.push(suffix);
                std::fs::remove_file(file).ok();
            }
        }
    }

    pub async fn register(&self, email: &str) -> TestResponse {
        self.server
            .post("/api/accounts/register")
            .json(&json!({
                "email": email,
                "masterPasswordHash": MASTER_PASSWORD_HASH,
                "masterPasswordHint": null,
                "key": ACCOUNT_KEY,
            }))
            .await
    }

    pub async fn password_grant(&self, email: &str, device_id: &str) -> TestResponse {
        self.server
            .post("/identity/connect/token")
            .form(&password_form(email, device_id))
            .await
    }

    /// Register `email` and sign in from a fresh device. Returns the token
    /// response body.
    pub async fn signed_in(&self, email: &str) -> Value {
        self.register(email).await.assert_status_ok();
        let device_id = uuid::Uuid::new_v4().to_string();
        let response = self.password_grant(email, &device_id).await;
        response.assert_status_ok();
        response.json::<Value>()
    }

    /// Register, sign in, and return just the access token.
    pub async fn access_token(&self, email: &str) -> String {
        let body = self.signed_in(email).await;
        body["access_token"].as_str().unwrap().to_string()
    }

    pub async fn enable_two_factor(&self, email: &str) {
        sqlx::query("UPDATE users SET two_factor_enabled = 1, totp_secret = ? WHERE email = ?")
            .bind(TOTP_SECRET)
            .bind(email)
            .execute(&self.db)
            .await
            .unwrap();
    }
}

#[allow(dead_code)]
pub fn password_form(email: &str, device_id: &str) -> Vec<(&'static str, String)> {
    vec![
        ("grant_type", "password".to_string()),
        ("username", email.to_string()),
        ("password", MASTER_PASSWORD_HASH.to_string()),
        ("scope", "api offline_access".to_string()),
        ("client_id", "browser".to_string()),
        ("deviceType", "3".to_string()),
        ("deviceIdentifier", device_id.to_string()),
        ("deviceName", "firefox".to_string()),
    ]
}

// Helper to generate unique test email
#[allow(dead_code)]
pub fn test_email() -> String {
    format!("test_{}@example.com", uuid::Uuid::new_v4())
}

/// The single message inside a validation envelope.
#[allow(dead_code)]
pub fn validation_message(body: &Value) -> &str {
    assert_eq!(body["Object"], "error");
    body["ValidationErrors"][""][0].as_str().unwrap()
}
