//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{Argon2PasswordService, DbAdapter},
    config::Config,
    error::ApiError,
    web::{router, session::SessionManager, state::AppState},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use todo_core::{DatabaseService, InMemoryDatabase};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded ({}). Starting server...", config.app_env);

    // --- 2. Connect to Database & Run Migrations ---
    let db: Arc<dyn DatabaseService> = match &config.database_url {
        Some(url) => {
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
            let db_adapter = DbAdapter::new(db_pool);
            info!("Running database migrations...");
            db_adapter.run_migrations().await?;
            info!("Database migrations complete.");
            Arc::new(db_adapter)
        }
        None => {
            warn!("DATABASE_URL is not set; using an in-memory store. Data is lost on restart.");
            Arc::new(InMemoryDatabase::new())
        }
    };

    // --- 3. Initialize Services ---
    let passwords = Arc::new(Argon2PasswordService::new());
    let sessions = SessionManager::from_secret(
        config.session_secret.as_deref(),
        config.is_production(),
    )?;

    // --- 4. Build the Shared AppState & Router ---
    let app_state = Arc::new(AppState::new(config.clone(), db, passwords, sessions));
    let app = router(app_state);

    // --- 5. Start the Server ---
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    let local_addr = listener.local_addr()?;
    info!("Starting server on {}", local_addr);
    info!("Register at http://{}/register", local_addr);
    info!("Log in at http://{}/login", local_addr);
    if config.is_development() {
        info!("Query explorer available at http://{}/", local_addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
