use vaultsync::config::{init_db, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vaultsync=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let db = init_db(&config.database_url).await?;
    tracing::info!(database = %config.database_url, "database ready");

    let bind_addr = config.bind_addr.clone();
    let app = vaultsync::create_app(db, config)?;

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server running on http://{bind_addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
