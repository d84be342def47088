use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::common::{
    password_form, test_email, validation_message, TestContext, ACCOUNT_KEY,
    MASTER_PASSWORD_HASH, TOTP_SECRET,
};

#[tokio::test]
async fn password_grant_issues_tokens() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register(&email).await.assert_status_ok();

    let response = ctx.password_grant(&email, "4f6a1d7e-0000-4000-8000-000000000001").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["Key"], ACCOUNT_KEY);
    assert!(!body["access_token"].as_str().unwrap().is_empty());
    assert!(!body["refresh_token"].as_str().unwrap().is_empty());

    let expires_in = body["expires_in"].as_i64().unwrap();
    assert!(expires_in > 3590 && expires_in <= 3600);
}

#[tokio::test]
async fn password_grant_accepts_json_with_mixed_case_keys() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register(&email).await.assert_status_ok();

    let response = ctx
        .server
        .post("/identity/connect/token")
        .json(&json!({
            "Grant_Type": "password",
            "UserName": email.to_uppercase(),
            "PASSWORD": MASTER_PASSWORD_HASH,
            "scope": "api offline_access",
            "client_id": "mobile",
            "DeviceType": 0,
            "deviceidentifier": "4f6a1d7e-0000-4000-8000-000000000002",
            "DEVICENAME": "android",
        }))
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn missing_field_is_reported_by_name() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register(&email).await.assert_status_ok();

    let form: Vec<_> = password_form(&email, "dev-1")
        .into_iter()
        .filter(|(k, _)| *k != "deviceName")
        .collect();

    let response = ctx.server.post("/identity/connect/token").form(&form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(validation_message(&response.json()), "devicename cannot be blank");
}

#[tokio::test]
async fn unsupported_scope_is_rejected_without_creating_device() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register(&email).await.assert_status_ok();

    let form: Vec<_> = password_form(&email, "dev-scope")
        .into_iter()
        .map(|(k, v)| if k == "scope" { (k, "api".to_string()) } else { (k, v) })
        .collect();

    let response = ctx.server.post("/identity/connect/token").form(&form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(validation_message(&response.json()), "scope not supported");

    let (devices,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM devices")
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(devices, 0);
}

#[tokio::test]
async fn unknown_user_and_wrong_password_are_distinguished() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register(&email).await.assert_status_ok();

    let response = ctx.password_grant(&test_email(), "dev-1").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(validation_message(&response.json()), "Invalid username");

    let form: Vec<_> = password_form(&email, "dev-1")
        .into_iter()
        .map(|(k, v)| if k == "password" { (k, "wrong".to_string()) } else { (k, v) })
        .collect();
    let response = ctx.server.post("/identity/connect/token").form(&form).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(validation_message(&response.json()), "Invalid password");
}

#[tokio::test]
async fn unsupported_grant_type_is_rejected() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/identity/connect/token")
        .form(&[("grant_type", "client_credentials")])
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(validation_message(&response.json()), "grant type not supported");
}

#[tokio::test]
async fn second_sign_in_from_same_device_invalidates_previous_tokens() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register(&email).await.assert_status_ok();

    let first: Value = ctx.password_grant(&email, "dev-same").await.json();
    let second: Value = ctx.password_grant(&email, "dev-same").await.json();
    assert_ne!(first["access_token"], second["access_token"]);

    let old_token = first["access_token"].as_str().unwrap();
    let response = ctx.server.get("/api/sync").authorization_bearer(old_token).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(validation_message(&response.json()), "invalid bearer");

    let new_token = second["access_token"].as_str().unwrap();
    ctx.server
        .get("/api/sync")
        .authorization_bearer(new_token)
        .await
        .assert_status_ok();

    let (devices,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM devices WHERE uuid = 'dev-same'")
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(devices, 1);
}

#[tokio::test]
async fn device_identifier_reused_by_another_account_is_recreated() {
    let ctx = TestContext::new().await;
    let alice = test_email();
    let bob = test_email();
    ctx.register(&alice).await.assert_status_ok();
    ctx.register(&bob).await.assert_status_ok();

    let alice_tokens: Value = ctx.password_grant(&alice, "shared-device").await.json();
    let bob_tokens: Value = ctx.password_grant(&bob, "shared-device").await.json();

    // Alice's credentials went away with her device row.
    let response = ctx
        .server
        .get("/api/sync")
        .authorization_bearer(alice_tokens["access_token"].as_str().unwrap())
        .await;
    assert_eq!(validation_message(&response.json()), "invalid bearer");

    let response = ctx
        .server
        .post("/identity/connect/token")
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", alice_tokens["refresh_token"].as_str().unwrap()),
        ])
        .await;
    assert_eq!(validation_message(&response.json()), "Invalid refresh token");

    let sync: Value = ctx
        .server
        .get("/api/sync")
        .authorization_bearer(bob_tokens["access_token"].as_str().unwrap())
        .await
        .json();
    assert_eq!(sync["Profile"]["Email"], bob.as_str());
}

#[tokio::test]
async fn push_token_from_grant_is_stored() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register(&email).await.assert_status_ok();

    let mut form = password_form(&email, "dev-push");
    form.push(("devicePushToken", "apns-token".to_string()));
    ctx.server
        .post("/identity/connect/token")
        .form(&form)
        .await
        .assert_status_ok();

    let (push_token,): (Option<String>,) =
        sqlx::query_as("SELECT push_token FROM devices WHERE uuid = 'dev-push'")
            .fetch_one(&ctx.db)
            .await
            .unwrap();
    assert_eq!(push_token.as_deref(), Some("apns-token"));
}

#[tokio::test]
async fn two_factor_user_without_code_gets_provider_list() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register(&email).await.assert_status_ok();
    ctx.enable_two_factor(&email).await;

    let response = ctx.password_grant(&email, "dev-2fa").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "invalid_grant");
    assert_eq!(body["error_description"], "Two factor required.");
    assert_eq!(body["TwoFactorProviders"], json!([0]));
    assert!(body["TwoFactorProviders2"]["0"].is_null());
    assert!(body.get("access_token").is_none());

    let (devices,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM devices")
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(devices, 0);
}

#[tokio::test]
async fn two_factor_user_with_wrong_code_is_asked_again() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register(&email).await.assert_status_ok();
    ctx.enable_two_factor(&email).await;

    let mut form = password_form(&email, "dev-2fa");
    form.push(("twoFactorToken", "000000x".to_string()));
    form.push(("twoFactorProvider", "0".to_string()));
    let response = ctx.server.post("/identity/connect/token").form(&form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error_description"], "Two factor required.");
}

#[tokio::test]
async fn two_factor_user_with_valid_code_gets_tokens() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register(&email).await.assert_status_ok();
    ctx.enable_two_factor(&email).await;

    let code = vaultsync::services::totp::generate(TOTP_SECRET, chrono::Utc::now().timestamp())
        .unwrap();
    let mut form = password_form(&email, "dev-2fa");
    form.push(("twoFactorToken", code));
    form.push(("twoFactorProvider", "0".to_string()));

    let response = ctx.server.post("/identity/connect/token").form(&form).await;

    response.assert_status_ok();
    assert!(response.json::<Value>()["access_token"].is_string());
}
