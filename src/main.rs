//! Community Events Participation Engine
//!
//! Main application entry point

use anyhow::Context;
use tracing::info;

use community_events::{
    app, config::Settings, database::open_store, services::ServiceFactory, utils::logging, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    settings.validate()?;

    // Initialize logging; the guard flushes the log file on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", community_events::info());

    info!(storage = ?settings.engine.storage, "Opening participation store...");
    let store = open_store(&settings).await?;

    let services = ServiceFactory::new(store, &settings.engine);
    let router = app(AppState::new(services));

    let address = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    info!("Serving participation API at http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Participation engine has been shut down.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
