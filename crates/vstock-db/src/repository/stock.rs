//! # Stock Repository
//!
//! Database operations for the current stock table.
//!
//! ## Table Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Vec<ItemRecord>            stock table                                │
//! │  ───────────────            ─────────────────────────────────          │
//! │  [0] A1  qty 5      ──►     position 0 │ A1 │ 5                        │
//! │  [1] B2  qty 1      ──►     position 1 │ B2 │ 1                        │
//! │  [2] A1  qty 8      ──►     position 2 │ A1 │ 8   (duplicate allowed)  │
//! │                                                                         │
//! │  load_all() reads back ORDER BY position, so "first match wins"        │
//! │  resolves to the same row before and after a restart.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use vstock_core::ItemRecord;

/// One row of the `stock` table.
#[derive(Debug, Clone, FromRow)]
struct StockRow {
    location: String,
    item_number: String,
    description: String,
    serial_number: String,
    logistic_group: String,
    product_type: String,
    category: String,
    quantity: i64,
    vehicle_placement: String,
    barcode: String,
    tracking_code: String,
    tool_flag: bool,
}

impl From<StockRow> for ItemRecord {
    fn from(row: StockRow) -> Self {
        ItemRecord {
            location: row.location,
            item_number: row.item_number,
            description: row.description,
            serial_number: row.serial_number,
            logistic_group: row.logistic_group,
            product_type: row.product_type,
            category: row.category,
            quantity: row.quantity,
            vehicle_placement: row.vehicle_placement,
            barcode: row.barcode,
            tracking_code: row.tracking_code,
            tool_flag: row.tool_flag,
        }
    }
}

/// Repository for the stock table.
///
/// ## Usage
/// ```rust,ignore
/// let repo = StockRepository::new(pool);
/// repo.replace_all(&ledger.stock).await?;
/// let stock = repo.load_all().await?;
/// ```
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    /// Creates a new StockRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository { pool }
    }

    /// Loads every stock record in table order.
    pub async fn load_all(&self) -> DbResult<Vec<ItemRecord>> {
        let rows = sqlx::query_as::<_, StockRow>(
            r#"
            SELECT
                location,
                item_number,
                description,
                serial_number,
                logistic_group,
                product_type,
                category,
                quantity,
                vehicle_placement,
                barcode,
                tracking_code,
                tool_flag
            FROM stock
            ORDER BY position
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Loaded stock table");
        Ok(rows.into_iter().map(ItemRecord::from).collect())
    }

    /// Replaces the whole table with `records`, in one transaction.
    ///
    /// Does not touch the snapshot version; use
    /// [`crate::LedgerRepository::save_snapshot`] for guarded writes.
    pub async fn replace_all(&self, records: &[ItemRecord]) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;
        write_all(&mut *tx, records).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Number of stock rows.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stock")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Deletes every stock row and inserts `records` with their positions.
///
/// Runs on the caller's connection so it can share a transaction with the
/// history rewrite.
pub(crate) async fn write_all(conn: &mut SqliteConnection, records: &[ItemRecord]) -> DbResult<()> {
    debug!(count = records.len(), "Rewriting stock table");

    sqlx::query("DELETE FROM stock").execute(&mut *conn).await?;

    for (position, record) in records.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO stock (
                position,
                location,
                item_number,
                description,
                serial_number,
                logistic_group,
                product_type,
                category,
                quantity,
                vehicle_placement,
                barcode,
                tracking_code,
                tool_flag
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(position as i64)
        .bind(&record.location)
        .bind(&record.item_number)
        .bind(&record.description)
        .bind(&record.serial_number)
        .bind(&record.logistic_group)
        .bind(&record.product_type)
        .bind(&record.category)
        .bind(record.quantity)
        .bind(&record.vehicle_placement)
        .bind(&record.barcode)
        .bind(&record.tracking_code)
        .bind(record.tool_flag)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};
    use vstock_core::ItemRecord;

    fn record(barcode: &str, quantity: i64) -> ItemRecord {
        ItemRecord {
            barcode: barcode.to_string(),
            quantity,
            description: format!("Pièce {barcode}"),
            serial_number: "Numéro N°1".to_string(),
            ..ItemRecord::default()
        }
    }

    #[tokio::test]
    async fn test_replace_all_round_trip_keeps_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let records = vec![
            record("B2", 1),
            record("A1", 5),
            ItemRecord {
                tool_flag: true,
                ..record("A1", -3)
            },
        ];

        db.stock().replace_all(&records).await.unwrap();

        assert_eq!(db.stock().load_all().await.unwrap(), records);
        assert_eq!(db.stock().count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_replace_all_drops_previous_rows() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.stock().replace_all(&[record("OLD", 2)]).await.unwrap();
        db.stock().replace_all(&[record("NEW", 4)]).await.unwrap();

        let stock = db.stock().load_all().await.unwrap();
        assert_eq!(stock.len(), 1);
        assert_eq!(stock[0].barcode, "NEW");
    }

    #[tokio::test]
    async fn test_replace_with_empty_table() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.stock().replace_all(&[record("A1", 1)]).await.unwrap();
        db.stock().replace_all(&[]).await.unwrap();

        assert_eq!(db.stock().count().await.unwrap(), 0);
    }
}
