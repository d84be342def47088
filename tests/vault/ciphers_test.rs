use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::common::{test_email, validation_message, TestContext};

const CIPHER_NAME: &str = "2.aXY=|bG9naW4=|bWFj";

fn login_cipher() -> Value {
    json!({
        "type": 1,
        "name": CIPHER_NAME,
        "notes": "2.aXY=|bm90ZXM=|bWFj",
        "favorite": true,
        "login": {
            "Username": "2.aXY=|dXNlcg==|bWFj",
            "Password": "2.aXY=|cGFzcw==|bWFj",
            "Uris": [{ "Uri": "2.aXY=|dXJp|bWFj", "Match": null }],
        },
        "fields": [{ "Type": 0, "Name": "2.aXY=|Zg==|bWFj", "Value": "2.aXY=|dg==|bWFj" }],
    })
}

async fn create_cipher(ctx: &TestContext, token: &str, body: &Value) -> Value {
    let response = ctx
        .server
        .post("/api/ciphers")
        .authorization_bearer(token)
        .json(body)
        .await;
    response.assert_status_ok();
    response.json()
}

#[tokio::test]
async fn create_cipher_echoes_opaque_fields_and_is_editable() {
    let ctx = TestContext::new().await;
    let token = ctx.access_token(&test_email()).await;
    let body = login_cipher();

    let cipher = create_cipher(&ctx, &token, &body).await;

    assert_eq!(cipher["Type"], 1);
    assert_eq!(cipher["Name"], CIPHER_NAME);
    assert_eq!(cipher["Edit"], true);
    assert_eq!(cipher["Favorite"], true);
    assert_eq!(cipher["Object"], "cipher");
    assert!(cipher["FolderId"].is_null());
    assert_eq!(cipher["Login"], body["login"]);
    assert_eq!(cipher["Fields"], body["fields"]);

    let sync: Value = ctx
        .server
        .get("/api/sync")
        .authorization_bearer(&token)
        .await
        .json();
    let synced = &sync["Ciphers"][0];
    assert_eq!(synced["Id"], cipher["Id"]);
    assert_eq!(synced["Login"], body["login"]);
    assert!(synced.get("Edit").is_none());
}

#[tokio::test]
async fn create_cipher_requires_type_and_valid_name() {
    let ctx = TestContext::new().await;
    let token = ctx.access_token(&test_email()).await;

    let response = ctx
        .server
        .post("/api/ciphers")
        .authorization_bearer(&token)
        .json(&json!({ "name": CIPHER_NAME }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(validation_message(&response.json()), "type cannot be blank");

    let response = ctx
        .server
        .post("/api/ciphers")
        .authorization_bearer(&token)
        .json(&json!({ "type": 1, "name": "plain name" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(validation_message(&response.json()), "Invalid name");
}

#[tokio::test]
async fn create_cipher_in_foreign_folder_is_rejected() {
    let ctx = TestContext::new().await;
    let alice = ctx.access_token(&test_email()).await;
    let bob = ctx.access_token(&test_email()).await;

    let folder: Value = ctx
        .server
        .post("/api/folders")
        .authorization_bearer(&alice)
        .json(&json!({ "name": "2.aXY=|Zm9sZGVy|bWFj" }))
        .await
        .json();

    let response = ctx
        .server
        .post("/api/ciphers")
        .authorization_bearer(&bob)
        .json(&json!({ "type": 1, "name": CIPHER_NAME, "folderId": folder["Id"] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(validation_message(&response.json()), "Invalid folder");

    let (ciphers,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ciphers")
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(ciphers, 0);
}

#[tokio::test]
async fn update_cipher_replaces_content() {
    let ctx = TestContext::new().await;
    let token = ctx.access_token(&test_email()).await;
    let cipher = create_cipher(&ctx, &token, &login_cipher()).await;
    let id = cipher["Id"].as_str().unwrap();

    let renamed = "2.aXY=|bmV3|bWFj";
    let response = ctx
        .server
        .put(&format!("/api/ciphers/{id}"))
        .authorization_bearer(&token)
        .json(&json!({ "Type": 2, "Name": renamed, "SecureNote": { "Type": 0 } }))
        .await;

    response.assert_status_ok();
    let updated: Value = response.json();
    assert_eq!(updated["Id"], id);
    assert_eq!(updated["Type"], 2);
    assert_eq!(updated["Name"], renamed);
    assert_eq!(updated["Edit"], true);
    assert!(updated["Login"].is_null());
    assert_eq!(updated["SecureNote"], json!({ "Type": 0 }));
}

#[tokio::test]
async fn update_of_foreign_cipher_is_rejected() {
    let ctx = TestContext::new().await;
    let alice = ctx.access_token(&test_email()).await;
    let bob = ctx.access_token(&test_email()).await;
    let cipher = create_cipher(&ctx, &alice, &login_cipher()).await;

    let response = ctx
        .server
        .put(&format!("/api/ciphers/{}", cipher["Id"].as_str().unwrap()))
        .authorization_bearer(&bob)
        .json(&login_cipher())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(validation_message(&response.json()), "invalid cipher");
}

#[tokio::test]
async fn delete_cipher_removes_it() {
    let ctx = TestContext::new().await;
    let token = ctx.access_token(&test_email()).await;
    let cipher = create_cipher(&ctx, &token, &login_cipher()).await;

    let response = ctx
        .server
        .delete(&format!("/api/ciphers/{}", cipher["Id"].as_str().unwrap()))
        .authorization_bearer(&token)
        .await;
    response.assert_status_ok();

    let sync: Value = ctx
        .server
        .get("/api/sync")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(sync["Ciphers"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn delete_of_foreign_cipher_is_rejected() {
    let ctx = TestContext::new().await;
    let alice = ctx.access_token(&test_email()).await;
    let bob = ctx.access_token(&test_email()).await;
    let cipher = create_cipher(&ctx, &alice, &login_cipher()).await;

    let response = ctx
        .server
        .delete(&format!("/api/ciphers/{}", cipher["Id"].as_str().unwrap()))
        .authorization_bearer(&bob)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(validation_message(&response.json()), "invalid cipher");

    let (ciphers,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ciphers")
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(ciphers, 1);
}

#[tokio::test]
async fn cipher_name_with_surrounding_whitespace_is_rejected() {
    let ctx = TestContext::new().await;
    let token = ctx.access_token(&test_email()).await;

    let response = ctx
        .server
        .post("/api/ciphers")
        .authorization_bearer(&token)
        .json(&json!({ "type": 1, "name": format!("{CIPHER_NAME}\n") }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(validation_message(&response.json()), "Invalid name");

    let (ciphers,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ciphers")
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(ciphers, 0);
}
