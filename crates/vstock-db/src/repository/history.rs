//! # History Repository
//!
//! Database operations for the movement history.
//!
//! Entries are stored in append order (`id`), timestamps as the same
//! `YYYY-MM-DD HH:MM:SS` text the exports use.

use chrono::NaiveDateTime;
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use vstock_core::{MovementAction, MovementEntry, MOVEMENT_DATE_FORMAT};

/// One row of the `history` table.
#[derive(Debug, Clone, FromRow)]
struct HistoryRow {
    recorded_at: String,
    action: MovementAction,
    barcode: String,
    tracking_code: String,
    quantity: i64,
    location: String,
}

impl TryFrom<HistoryRow> for MovementEntry {
    type Error = DbError;

    fn try_from(row: HistoryRow) -> Result<Self, Self::Error> {
        let timestamp = NaiveDateTime::parse_from_str(&row.recorded_at, MOVEMENT_DATE_FORMAT)
            .map_err(|e| {
                DbError::corrupt("history", format!("bad timestamp '{}': {e}", row.recorded_at))
            })?;

        Ok(MovementEntry {
            timestamp,
            action: row.action,
            barcode: row.barcode,
            tracking_code: row.tracking_code,
            quantity: row.quantity,
            location: row.location,
        })
    }
}

const SELECT_HISTORY: &str = r#"
    SELECT
        recorded_at,
        action,
        barcode,
        tracking_code,
        quantity,
        location
    FROM history
"#;

/// Repository for the movement history.
#[derive(Debug, Clone)]
pub struct HistoryRepository {
    pool: SqlitePool,
}

impl HistoryRepository {
    /// Creates a new HistoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        HistoryRepository { pool }
    }

    /// Loads the full history, oldest first.
    pub async fn load_all(&self) -> DbResult<Vec<MovementEntry>> {
        let sql = format!("{SELECT_HISTORY} ORDER BY id");
        let rows = sqlx::query_as::<_, HistoryRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Loaded movement history");
        rows.into_iter().map(MovementEntry::try_from).collect()
    }

    /// Loads the `limit` most recent entries, newest first.
    pub async fn recent(&self, limit: u32) -> DbResult<Vec<MovementEntry>> {
        let sql = format!("{SELECT_HISTORY} ORDER BY id DESC LIMIT ?1");
        let rows = sqlx::query_as::<_, HistoryRow>(&sql)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(MovementEntry::try_from).collect()
    }

    /// Replaces the whole history with `entries`, in one transaction.
    pub async fn replace_all(&self, entries: &[MovementEntry]) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;
        write_all(&mut *tx, entries).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Number of history entries.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM history")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Deletes every history row and inserts `entries` in order.
pub(crate) async fn write_all(conn: &mut SqliteConnection, entries: &[MovementEntry]) -> DbResult<()> {
    debug!(count = entries.len(), "Rewriting movement history");

    sqlx::query("DELETE FROM history").execute(&mut *conn).await?;

    for entry in entries {
        sqlx::query(
            r#"
            INSERT INTO history (recorded_at, action, barcode, tracking_code, quantity, location)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(entry.timestamp.format(MOVEMENT_DATE_FORMAT).to_string())
        .bind(entry.action)
        .bind(&entry.barcode)
        .bind(&entry.tracking_code)
        .bind(entry.quantity)
        .bind(&entry.location)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
