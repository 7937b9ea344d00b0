//! # Ledger Repository
//!
//! SQLite implementation of [`LedgerStore`]: versioned, transactional
//! snapshot writes over the stock and history tables.
//!
//! ## Snapshot Save
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  save_snapshot(ledger, expected = 7)                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                 │
//! │  UPDATE ledger_meta SET version = version + 1                          │
//! │   WHERE id = 1 AND version = 7                                         │
//! │       │                                                                 │
//! │       ├── 0 rows ──► ROLLBACK, VersionConflict { expected 7, actual }  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DELETE + INSERT stock    (positions 0..n)                             │
//! │  DELETE + INSERT history  (append order)                               │
//! │  COMMIT ──► Ok(8)                                                      │
//! │                                                                         │
//! │  Any failure before COMMIT drops the transaction: both tables and      │
//! │  the version stay as they were.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::{history, stock};
use crate::store::LedgerStore;
use crate::{HistoryRepository, StockRepository};
use vstock_core::{ItemRecord, Ledger, MovementEntry};

/// Repository for whole-ledger snapshots.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

impl LedgerRepository {
    /// Creates a new LedgerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LedgerRepository { pool }
    }

    /// Current snapshot version.
    pub async fn version(&self) -> DbResult<i64> {
        let version: i64 = sqlx::query_scalar("SELECT version FROM ledger_meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(version)
    }

    async fn bump_version(conn: &mut SqliteConnection) -> DbResult<i64> {
        let version: i64 = sqlx::query_scalar(
            "UPDATE ledger_meta SET version = version + 1 WHERE id = 1 RETURNING version",
        )
        .fetch_one(&mut *conn)
        .await?;

        Ok(version)
    }
}

#[async_trait]
impl LedgerStore for LedgerRepository {
    async fn load_stock(&self) -> DbResult<Vec<ItemRecord>> {
        StockRepository::new(self.pool.clone()).load_all().await
    }

    async fn load_history(&self) -> DbResult<Vec<MovementEntry>> {
        HistoryRepository::new(self.pool.clone()).load_all().await
    }

    async fn save_stock(&self, records: &[ItemRecord]) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;
        stock::write_all(&mut *tx, records).await?;
        let version = Self::bump_version(&mut *tx).await?;
        tx.commit().await?;

        debug!(version, "Stock table saved");
        Ok(())
    }

    async fn save_history(&self, entries: &[MovementEntry]) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;
        history::write_all(&mut *tx, entries).await?;
        let version = Self::bump_version(&mut *tx).await?;
        tx.commit().await?;

        debug!(version, "Movement history saved");
        Ok(())
    }

    async fn current_version(&self) -> DbResult<i64> {
        self.version().await
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    async fn save_snapshot(&self, ledger: &Ledger, expected_version: i64) -> DbResult<i64> {
        let mut tx = self.pool.begin().await?;

        let bumped = sqlx::query(
            "UPDATE ledger_meta SET version = version + 1 WHERE id = 1 AND version = ?1",
        )
        .bind(expected_version)
        .execute(&mut *tx)
        .await?;

        if bumped.rows_affected() == 0 {
            let actual: i64 = sqlx::query_scalar("SELECT version FROM ledger_meta WHERE id = 1")
                .fetch_one(&mut *tx)
                .await?;
            tx.rollback()
                .await
                .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

            warn!(expected = expected_version, actual, "Snapshot version conflict");
            return Err(DbError::VersionConflict {
                expected: expected_version,
                actual,
            });
        }

        stock::write_all(&mut *tx, &ledger.stock).await?;
        history::write_all(&mut *tx, &ledger.history).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let version = expected_version + 1;
        info!(
            version,
            stock = ledger.stock.len(),
            history = ledger.history.len(),
            "Ledger snapshot saved"
        );
        Ok(version)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
