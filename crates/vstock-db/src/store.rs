//! # Ledger Store
//!
//! The persistence seam between the service and the database.
//!
//! ```text
//! ┌──────────────────────┐        ┌──────────────────────────────────────┐
//! │  vstock-server       │        │  dyn LedgerStore                     │
//! │  LedgerState         │───────►│  ├── LedgerRepository (SQLite)       │
//! │                      │        │  └── test doubles                    │
//! └──────────────────────┘        └──────────────────────────────────────┘
//! ```

use async_trait::async_trait;

use crate::error::DbResult;
use vstock_core::{ItemRecord, Ledger, MovementEntry};

/// Durable storage for the stock table and the movement history.
///
/// Every write replaces a whole table. The snapshot version counts
/// completed writes and is what [`LedgerStore::save_snapshot`] checks.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Loads the stock table in table order.
    async fn load_stock(&self) -> DbResult<Vec<ItemRecord>>;

    /// Loads the movement history, oldest first.
    async fn load_history(&self) -> DbResult<Vec<MovementEntry>>;

    /// Replaces the stock table and bumps the version.
    async fn save_stock(&self, stock: &[ItemRecord]) -> DbResult<()>;

    /// Replaces the movement history and bumps the version.
    async fn save_history(&self, history: &[MovementEntry]) -> DbResult<()>;

    /// Current snapshot version.
    async fn current_version(&self) -> DbResult<i64>;

    /// Writes both tables atomically if the stored version still equals
    /// `expected_version`.
    ///
    /// ## Returns
    /// The new version, or `DbError::VersionConflict` when another writer
    /// saved in between (nothing is written in that case).
    async fn save_snapshot(&self, ledger: &Ledger, expected_version: i64) -> DbResult<i64>;

    /// True when the store answers queries.
    async fn health_check(&self) -> bool {
        self.current_version().await.is_ok()
    }

    /// Loads both tables and the version they were read at.
    async fn load_ledger(&self) -> DbResult<(Ledger, i64)> {
        let version = self.current_version().await?;
        let stock = self.load_stock().await?;
        let history = self.load_history().await?;
        Ok((Ledger::new(stock, history), version))
    }
}
