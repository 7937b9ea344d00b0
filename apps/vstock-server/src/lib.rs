//! # Vehicle Stock Server
//!
//! JSON surface over the vehicle-parts ledger: scan movements in and out,
//! browse stock and history, edit the table, add items, import a workbook.
//!
//! ## Module Organization
//! ```text
//! vstock_server/
//! ├── lib.rs          ◄─── You are here (router, logging, startup)
//! ├── config.rs       ◄─── TOML + environment configuration
//! ├── state.rs        ◄─── Ledger session and the mutate cycle
//! ├── dto.rs          ◄─── Request / response bodies
//! ├── error.rs        ◄─── API error type
//! └── routes/
//!     ├── mod.rs      ◄─── Router and health check
//!     ├── stock.rs    ◄─── Stock table routes
//!     └── movements.rs◄─── Movement and history routes
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing        RUST_LOG, else "info,vstock=debug,sqlx=warn"   │
//! │  2. ServerConfig::load  defaults → file → VSTOCK_* variables           │
//! │  3. Database::new       SQLite (WAL) + pending migrations              │
//! │  4. LedgerState::open   load stock, history and version                │
//! │  5. axum::serve         until Ctrl+C, then close the pool              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vstock_core::SystemClock;
use vstock_db::{Database, DbConfig, DbError};

use crate::config::{ConfigError, ServerConfig};
use crate::state::LedgerState;

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Builds the application router over a loaded session.
pub fn build_app(state: Arc<LedgerState>) -> Router {
    routes::router(state)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=vstock=trace` - Show trace for vstock crates only
/// - Default: INFO, DEBUG for vstock
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,vstock=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Opens the database, loads the ledger and serves until Ctrl+C.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let db_path = config.database_path()?;
    info!(?db_path, "Database path determined");

    let db = Database::new(
        DbConfig::new(db_path).max_connections(config.database.max_connections),
    )
    .await?;

    let state = LedgerState::open(
        Arc::new(db.ledger()),
        Arc::new(SystemClock),
        config.ui.language,
    )
    .await?;
    let app = build_app(Arc::new(state));

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, language = %config.ui.language, "Vehicle stock server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Ctrl+C handler unavailable");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
