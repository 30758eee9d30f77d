//! Main Entrypoint for the Wisby API Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Initializing the database handle and the auth instance.
//! 3. Constructing the Axum router.
//! 4. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use std::net::SocketAddr;
use tracing::info;
use wisby_api::{config::Config, router::create_router, state::AppState};
use wisby_core::auth::{AuthConfig, AuthPlugin};
use wisby_core::global::{init_database, setup_auth};

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal. Shutting down gracefully...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing application state...");

    // --- 3. Initialize Database and Auth ---
    let db = init_database(&config.database_url, config.db_type)
        .context("Failed to initialize database")?;

    let auth_config = AuthConfig::new(db.clone(), config.auth_secret.clone())
        .with_plugins(vec![AuthPlugin::Admin, AuthPlugin::OpenApi])
        .with_base_url(config.auth_url.clone())
        .with_trusted_origins(config.trusted_origins.clone())
        .with_environment(config.production, Some(config.cookie_domain.clone()));
    let auth = setup_auth(auth_config).context("Failed to initialize auth")?;

    let app_state = AppState::new(db, auth);

    // --- 4. Create Router ---
    let app = create_router(app_state);

    // --- 5. Start Server ---
    info!(
        database = %config.db_type,
        production = config.production,
        bind_address = %config.bind_address,
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server has shut down.");
    Ok(())
}
