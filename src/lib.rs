pub mod config;
pub mod error;
pub mod modules;
pub mod services;
pub mod store;

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use config::{Config, DbPool};
use modules::accounts::accounts_routes;
use modules::devices::devices_routes;
use modules::identity::identity_routes;
use modules::metrics::metrics_routes;
use modules::vault::vault_routes;
use services::metrics::{metrics_middleware, MetricsRegistry};
use services::security::security_headers;
use services::tokens::TokenIssuer;

const MAX_BODY_BYTES: usize = 1024 * 1024;

pub struct AppState {
    pub db: DbPool,
    pub config: Config,
    pub tokens: TokenIssuer,
    pub metrics: Arc<MetricsRegistry>,
}

pub fn create_app(db: DbPool, config: Config) -> Result<Router, prometheus::Error> {
    let metrics = MetricsRegistry::new()?;
    let tokens = TokenIssuer::new(&config.jwt_secret);

    let identity_prefix = route_prefix(&config.identity_base_url);
    let api_prefix = route_prefix(&config.api_base_url);

    let api = Router::new()
        .nest("/accounts", accounts_routes())
        .nest("/devices", devices_routes())
        .merge(vault_routes());

    let mounted = if identity_prefix == api_prefix {
        mount(&api_prefix, identity_routes().merge(api))
    } else {
        mount(&identity_prefix, identity_routes()).merge(mount(&api_prefix, api))
    };

    let state = Arc::new(AppState {
        db,
        config,
        tokens,
        metrics: metrics.clone(),
    });

    Ok(Router::new()
        .route("/", get(root))
        .merge(metrics_routes())
        .merge(mounted)
        .layer(middleware::from_fn_with_state(metrics, metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state))
}

/// `"api/"` and `"/api"` both become `"/api"`; blank or `"/"` becomes `""`.
fn route_prefix(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

fn mount(prefix: &str, router: Router<Arc<AppState>>) -> Router<Arc<AppState>> {
    if prefix.is_empty() {
        router
    } else {
        Router::new().nest(prefix, router)
    }
}

async fn root() -> &'static str {
    "vaultsync"
}
