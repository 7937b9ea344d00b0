//! # Domain Types
//!
//! Core domain types used throughout Vehicle Stock.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐          ┌─────────────────────┐              │
//! │  │     ItemRecord      │          │    MovementEntry    │              │
//! │  │  ─────────────────  │          │  ─────────────────  │              │
//! │  │  location           │  barcode │  timestamp          │              │
//! │  │  item_number        │◄─────────│  action (In / Out)  │              │
//! │  │  description ...    │  (weak)  │  barcode            │              │
//! │  │  quantity           │          │  tracking_code      │              │
//! │  │  barcode            │          │  quantity (delta)   │              │
//! │  │  tracking_code      │          │  location           │              │
//! │  │  tool_flag          │          └─────────────────────┘              │
//! │  └─────────────────────┘                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Barcode as Natural Key
//! Item records carry no surrogate id. The barcode is the lookup key but the
//! table does not enforce its uniqueness: lookups take the first match in
//! table order. A movement entry references a barcode and may outlive the
//! record it once matched.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Item Record
// =============================================================================

/// One line of current stock.
///
/// Every field defaults to empty / zero / false, so a partially filled
/// manual-entry form deserializes into a complete record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct ItemRecord {
    /// Where the item is stored (warehouse, vehicle, client).
    pub location: String,

    /// Manufacturer / catalogue item number.
    pub item_number: String,

    pub description: String,

    pub serial_number: String,

    pub logistic_group: String,

    pub product_type: String,

    pub category: String,

    /// Units currently in stock.
    ///
    /// Only the OUT movement path removes a record at zero or below; direct
    /// grid edits may leave any value here.
    pub quantity: i64,

    /// Placement inside the vehicle.
    pub vehicle_placement: String,

    /// Lookup key for scan in / scan out.
    pub barcode: String,

    /// PR / tracking code copied onto movement entries.
    pub tracking_code: String,

    /// Whether the item is a tool rather than a consumable part.
    pub tool_flag: bool,
}

impl ItemRecord {
    /// Returns true if this record answers to the given barcode.
    ///
    /// Exact, case-sensitive comparison.
    #[inline]
    pub fn matches_barcode(&self, barcode: &str) -> bool {
        self.barcode == barcode
    }
}

// =============================================================================
// Movement Action
// =============================================================================

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum MovementAction {
    /// Units scanned into stock.
    In,
    /// Units scanned out of stock.
    Out,
}

impl MovementAction {
    /// Signed stock change for a positive delta.
    #[inline]
    pub fn signed(&self, quantity: i64) -> i64 {
        match self {
            MovementAction::In => quantity,
            MovementAction::Out => -quantity,
        }
    }
}

impl std::fmt::Display for MovementAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovementAction::In => write!(f, "in"),
            MovementAction::Out => write!(f, "out"),
        }
    }
}

// =============================================================================
// Movement Entry
// =============================================================================

/// One executed scan in / scan out, immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MovementEntry {
    /// Local wall-clock time the movement was recorded.
    #[serde(with = "movement_time")]
    #[ts(as = "String")]
    pub timestamp: NaiveDateTime,

    pub action: MovementAction,

    /// Barcode as scanned, matched or not.
    pub barcode: String,

    /// Tracking code of the matched record, empty when nothing matched.
    pub tracking_code: String,

    /// Requested delta, always positive whatever the direction.
    pub quantity: i64,

    /// Free-text movement context (vehicle, client, depot).
    pub location: String,
}

/// Serde adapter writing timestamps as `YYYY-MM-DD HH:MM:SS`.
pub mod movement_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::MOVEMENT_DATE_FORMAT;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(MOVEMENT_DATE_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, MOVEMENT_DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
