//! # Database Pool
//!
//! Opens the SQLite file that holds the stock table, the movement history
//! and the snapshot version.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DbConfig::new(path)                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config) ── WAL, NORMAL sync, create file, migrate       │
//! │       │                                                                 │
//! │       ├── db.stock()    ──► StockRepository                            │
//! │       ├── db.history()  ──► HistoryRepository                          │
//! │       └── db.ledger()   ──► LedgerRepository (dyn LedgerStore)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! WAL lets the `inspect` tool read the file while the server writes to it.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::history::HistoryRepository;
use crate::repository::ledger::LedgerRepository;
use crate::repository::stock::StockRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Where the ledger lives and how the pool around it is sized.
///
/// ```rust,ignore
/// let config = DbConfig::new("./stock_voitures.db").max_connections(5);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_path: PathBuf,

    /// Pool ceiling. The service serializes writes itself, so a handful is
    /// plenty. Default: 5
    pub max_connections: u32,

    pub min_connections: u32,

    /// How long a request waits for a free connection.
    pub acquire_timeout: Duration,

    pub idle_timeout: Duration,

    /// Apply pending migrations on open. The inspection tool turns this off.
    pub run_migrations: bool,
}

impl DbConfig {
    /// Configuration for a database file, created on first open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// In-memory database for tests.
    ///
    /// The database lives as long as its single connection, so the idle
    /// timeout is kept well beyond any test run.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(3600),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle on the ledger database. Clones share the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (or creates) the database and applies migrations if enabled.
    ///
    /// ## Errors
    /// * `DbError::ConnectionFailed` - bad path or unreadable file
    /// * `DbError::MigrationFailed` - schema could not be brought up to date
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.database_path.display(), "Opening stock database");

        // `?mode=rwc` opens read-write and creates the file on first start
        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            // a crash may lose the last snapshot, never corrupt the file
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(max_connections = config.max_connections, "Pool ready");

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await?;
        info!("Stock database schema up to date");
        Ok(())
    }

    /// Raw pool, for queries outside the repositories (inspection, tests).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn stock(&self) -> StockRepository {
        StockRepository::new(self.pool.clone())
    }

    pub fn history(&self) -> HistoryRepository {
        HistoryRepository::new(self.pool.clone())
    }

    /// The versioned store the server runs on.
    pub fn ledger(&self) -> LedgerRepository {
        LedgerRepository::new(self.pool.clone())
    }

    /// Closes the pool. Repositories fail afterwards.
    pub async fn close(&self) {
        info!("Closing stock database");
        self.pool.close().await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_is_migrated() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert_eq!(db.stock().count().await.unwrap(), 0);
        assert_eq!(db.history().count().await.unwrap(), 0);
        assert_eq!(db.ledger().version().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_repositories_fail_after_close() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.close().await;

        assert!(db.stock().count().await.is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/stock.db")
            .max_connections(10)
            .run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert!(!config.run_migrations);
    }
}
