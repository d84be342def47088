use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::AppState;
use super::controller;

pub fn vault_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sync", get(controller::sync))
        .route("/ciphers", post(controller::create_cipher))
        .route(
            "/ciphers/{uuid}",
            put(controller::update_cipher).delete(controller::delete_cipher),
        )
        .route("/folders", post(controller::create_folder))
        .route(
            "/folders/{uuid}",
            put(controller::rename_folder).delete(controller::delete_folder),
        )
}
