//! Librarian - administrative web console for a library backend

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tera::Tera;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use librarian_web::{
    config::AppConfig, create_router, rpc::HttpLibraryClient, services::Services, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("librarian_web={},tower_http=debug", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Librarian v{}", env!("CARGO_PKG_VERSION"));

    let client = HttpLibraryClient::new(&config.backend).context("Invalid backend configuration")?;
    tracing::info!("Using library backend at {}", client.base_url());

    let templates = Tera::new(&config.templates.dir)
        .with_context(|| format!("Failed to load templates from {}", config.templates.dir))?;

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(Services::new(Arc::new(client))),
        templates: Arc::new(templates),
    };

    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
