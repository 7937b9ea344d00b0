//! # vstock-core: Pure Ledger Logic for Vehicle Stock
//!
//! This crate is the **heart** of Vehicle Stock. It holds the rules that decide
//! how stock quantities change, how a movement is recorded, and how the stock
//! table and the movement history stay consistent. Zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Vehicle Stock Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation layer (external)                   │   │
//! │  │   Manual entry form ─► Editable grid ─► Scan in/out ─► Import   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP / JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    vstock-server routes                         │   │
//! │  │   POST /movements, POST /stock/items, PUT /stock, import        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vstock-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  ledger   │  │  import   │  │  locale   │  │   │
//! │  │   │ItemRecord │  │  Ledger   │  │ Reconcile │  │  Notices  │  │   │
//! │  │   │ Movement  │  │  Clock    │  │  Columns  │  │  FR / EN  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    vstock-db (Database Layer)                   │   │
//! │  │         SQLite stock + history tables, versioned snapshots      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Item records and movement entries
//! - [`ledger`] - The ledger engine (movements, manual add, grid edits)
//! - [`import`] - Bulk import reconciliation
//! - [`locale`] - French / English labels and user notices
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use vstock_core::ledger::{FixedClock, Ledger, MovementOutcome};
//! use vstock_core::{ItemRecord, MovementAction};
//!
//! let mut ledger = Ledger::default();
//! ledger.add_item_manually(ItemRecord {
//!     barcode: "A1".to_string(),
//!     tracking_code: "PR9".to_string(),
//!     quantity: 5,
//!     ..ItemRecord::default()
//! }).unwrap();
//!
//! let t1 = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap().and_hms_opt(9, 30, 0).unwrap();
//! let outcome = ledger.record_movement("A1", MovementAction::Out, 5, "bay3", &FixedClock(t1));
//!
//! assert!(matches!(outcome, MovementOutcome::Applied { removed: true, .. }));
//! assert!(ledger.stock.is_empty());
//! assert_eq!(ledger.history.len(), 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod import;
pub mod ledger;
pub mod locale;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::{Clock, Ledger, MovementOutcome, SystemClock};
pub use locale::{Language, Notice, NoticeLevel};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Smallest delta a movement may carry.
///
/// Scanning forms never submit less than one unit; the engine clamps smaller
/// requests up to this value.
pub const MIN_MOVEMENT_QUANTITY: i64 = 1;

/// Text form of movement timestamps, as stored and displayed.
pub const MOVEMENT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
