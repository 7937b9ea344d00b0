//! # Import Reconciler
//!
//! Turns loosely typed spreadsheet rows into item records and replaces the
//! stock table with them.
//!
//! ## Import Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bulk Import                                      │
//! │                                                                         │
//! │  rows: [{ "Code-barres": "A1", "Quantité": 3.0, "Couleur": "bleu" }]   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  normalize_rows()                                                      │
//! │  ├── match columns by header ("Code-barres") or field ("barcode")      │
//! │  ├── drop unrecognized columns ("Couleur")                             │
//! │  ├── coerce cells to text / whole numbers                              │
//! │  ├── missing text → "", missing quantity → 0                           │
//! │  └── tool flag → false on every row                                    │
//! │       │                                                                 │
//! │       ├── any row malformed ──► Err(ImportMalformed), stock untouched  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ledger.stock = normalized   (history untouched)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{CoreError, CoreResult};
use crate::ledger::Ledger;
use crate::types::ItemRecord;

/// One spreadsheet row: column name to cell value.
pub type RawRow = Map<String, Value>;

// =============================================================================
// Stock Columns
// =============================================================================

/// The recognized stock columns, in spreadsheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockColumn {
    Location,
    ItemNumber,
    Description,
    SerialNumber,
    LogisticGroup,
    ProductType,
    Category,
    Quantity,
    VehiclePlacement,
    Barcode,
    TrackingCode,
    Tool,
}

impl StockColumn {
    /// Every column, in spreadsheet order.
    pub const ALL: [StockColumn; 12] = [
        StockColumn::Location,
        StockColumn::ItemNumber,
        StockColumn::Description,
        StockColumn::SerialNumber,
        StockColumn::LogisticGroup,
        StockColumn::ProductType,
        StockColumn::Category,
        StockColumn::Quantity,
        StockColumn::VehiclePlacement,
        StockColumn::Barcode,
        StockColumn::TrackingCode,
        StockColumn::Tool,
    ];

    /// Spreadsheet header as exported by the stock workbook.
    pub fn header(&self) -> &'static str {
        match self {
            StockColumn::Location => "Localisation",
            StockColumn::ItemNumber => "Item N°",
            StockColumn::Description => "Item Description",
            StockColumn::SerialNumber => "Numéro de série",
            StockColumn::LogisticGroup => "Logistic Groupe",
            StockColumn::ProductType => "Type de Produit",
            StockColumn::Category => "Catégorie",
            StockColumn::Quantity => "Quantité",
            StockColumn::VehiclePlacement => "Emplacement dans la voiture",
            StockColumn::Barcode => "Code-barres",
            StockColumn::TrackingCode => "Code PR / Suivi",
            StockColumn::Tool => "Tool",
        }
    }

    /// JSON field name of the matching [`ItemRecord`] field.
    pub fn field(&self) -> &'static str {
        match self {
            StockColumn::Location => "location",
            StockColumn::ItemNumber => "itemNumber",
            StockColumn::Description => "description",
            StockColumn::SerialNumber => "serialNumber",
            StockColumn::LogisticGroup => "logisticGroup",
            StockColumn::ProductType => "productType",
            StockColumn::Category => "category",
            StockColumn::Quantity => "quantity",
            StockColumn::VehiclePlacement => "vehiclePlacement",
            StockColumn::Barcode => "barcode",
            StockColumn::TrackingCode => "trackingCode",
            StockColumn::Tool => "toolFlag",
        }
    }

    /// Cell for this column, preferring the header spelling over the field
    /// spelling when a row carries both.
    fn cell<'a>(&self, row: &'a RawRow) -> Option<&'a Value> {
        row.get(self.header()).or_else(|| row.get(self.field()))
    }
}

// =============================================================================
// Normalization
// =============================================================================

/// Normalizes every row, failing on the first malformed cell.
///
/// `row` numbers in errors are 1-based.
pub fn normalize_rows(rows: &[RawRow]) -> CoreResult<Vec<ItemRecord>> {
    rows.iter()
        .enumerate()
        .map(|(idx, row)| normalize_row(idx + 1, row))
        .collect()
}

fn normalize_row(row_number: usize, row: &RawRow) -> CoreResult<ItemRecord> {
    let mut record = ItemRecord::default();

    for column in StockColumn::ALL {
        let Some(value) = column.cell(row) else {
            continue;
        };

        match column {
            StockColumn::Quantity => {
                record.quantity = coerce_quantity(row_number, column, value)?;
            }
            // Imported rows never carry the tool flag.
            StockColumn::Tool => {}
            _ => {
                let text = coerce_text(row_number, column, value)?;
                if let Some(field) = text_field(&mut record, column) {
                    *field = text;
                }
            }
        }
    }

    record.tool_flag = false;
    Ok(record)
}

fn text_field(record: &mut ItemRecord, column: StockColumn) -> Option<&mut String> {
    let field = match column {
        StockColumn::Location => &mut record.location,
        StockColumn::ItemNumber => &mut record.item_number,
        StockColumn::Description => &mut record.description,
        StockColumn::SerialNumber => &mut record.serial_number,
        StockColumn::LogisticGroup => &mut record.logistic_group,
        StockColumn::ProductType => &mut record.product_type,
        StockColumn::Category => &mut record.category,
        StockColumn::VehiclePlacement => &mut record.vehicle_placement,
        StockColumn::Barcode => &mut record.barcode,
        StockColumn::TrackingCode => &mut record.tracking_code,
        StockColumn::Quantity | StockColumn::Tool => return None,
    };
    Some(field)
}

fn coerce_text(row: usize, column: StockColumn, value: &Value) -> CoreResult<String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(number_text(n)),
        Value::Array(_) | Value::Object(_) => Err(CoreError::import_malformed(
            row,
            column.header(),
            "nested values are not allowed in a cell",
        )),
    }
}

/// Spreadsheet readers hand integer cells back as floats; `12.0` becomes `12`.
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

fn coerce_quantity(row: usize, column: StockColumn, value: &Value) -> CoreResult<i64> {
    let malformed =
        |reason: String| CoreError::import_malformed(row, column.header(), reason);

    match value {
        Value::Null => Ok(0),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Ok(f as i64),
                _ => Err(malformed(format!("'{}' is not a whole number", n))),
            }
        }
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0);
            }
            if let Ok(i) = trimmed.parse::<i64>() {
                return Ok(i);
            }
            match trimmed.parse::<f64>() {
                Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => Ok(f as i64),
                _ => Err(malformed(format!("'{}' is not a whole number", s))),
            }
        }
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
            Err(malformed(format!("{} is not a whole number", value)))
        }
    }
}

// =============================================================================
// Reconciliation
// =============================================================================

impl Ledger {
    /// Replaces the whole stock table with the imported rows.
    ///
    /// All rows are normalized before the table is touched; on error the
    /// current stock is left as it was. History is never modified.
    ///
    /// ## Returns
    /// Number of records now in stock.
    pub fn reconcile_from_import(&mut self, rows: &[RawRow]) -> CoreResult<usize> {
        debug!(rows = rows.len(), "Normalizing import rows");

        let records = normalize_rows(rows)?;
        let imported = records.len();
        self.stock = records;

        info!(imported, "Stock table replaced from import");
        Ok(imported)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
