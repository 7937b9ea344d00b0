//! # Validation Module
//!
//! Input validation utilities for Vehicle Stock.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation (forms)                                         │
//! │  ├── Quantity spinners: min 0 (manual entry), min 1 (scan)             │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Server (Rust)                                                │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: the same minimums, enforced again                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── NOT NULL constraints                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Grid edits deliberately skip this module: any value the user types into
//! the stock grid is kept as-is.

use tracing::warn;

use crate::error::ValidationError;
use crate::types::ItemRecord;
use crate::MIN_MOVEMENT_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Item Validators
// =============================================================================

/// Validates a manually entered item record.
///
/// ## Rules
/// - Quantity must be non-negative (zero is allowed)
/// - Duplicate barcodes are allowed
///
/// ## Example
/// ```rust
/// use vstock_core::validation::validate_manual_item;
/// use vstock_core::ItemRecord;
///
/// let record = ItemRecord { quantity: 0, ..ItemRecord::default() };
/// assert!(validate_manual_item(&record).is_ok());
///
/// let record = ItemRecord { quantity: -2, ..ItemRecord::default() };
/// assert!(validate_manual_item(&record).is_err());
/// ```
pub fn validate_manual_item(record: &ItemRecord) -> ValidationResult<()> {
    if record.quantity < 0 {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Movement Validators
// =============================================================================

/// Brings a requested movement delta up to the scan minimum.
///
/// ## User Workflow
/// ```text
/// Scan form: quantity spinner (min 1)
///      │
///      ▼
/// clamp_movement_quantity(qty) ← THIS FUNCTION
///      │
///      ├── qty >= 1 → unchanged
///      │
///      └── qty <= 0 → 1 (logged)
/// ```
pub fn clamp_movement_quantity(quantity: i64) -> i64 {
    if quantity < MIN_MOVEMENT_QUANTITY {
        warn!(
            requested = quantity,
            applied = MIN_MOVEMENT_QUANTITY,
            "Movement quantity below minimum, clamping"
        );
        return MIN_MOVEMENT_QUANTITY;
    }

    quantity
}

// =============================================================================
// Unit Tests
// =============================================================================
