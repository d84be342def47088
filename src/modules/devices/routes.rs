use axum::{routing::put, Router};
use std::sync::Arc;

use crate::AppState;
use super::controller;

pub fn devices_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/identifier/{uuid}/token", put(controller::set_token))
        .route("/identifier/{uuid}/clear-token", put(controller::clear_token))
}
