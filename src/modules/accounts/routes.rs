use axum::{routing::post, Router};
use std::sync::Arc;

use crate::AppState;
use super::controller;

pub fn accounts_routes() -> Router<Arc<AppState>> {
    Router::new().route("/register", post(controller::register))
}
