use axum::{routing::post, Router};
use std::sync::Arc;

use crate::AppState;
use super::controller;

pub fn identity_routes() -> Router<Arc<AppState>> {
    Router::new().route("/connect/token", post(controller::token))
}
