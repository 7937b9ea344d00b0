//! # Ledger Engine
//!
//! Applies quantity changes to the stock table and appends a trace of every
//! change to the movement history, keeping both in sync.
//!
//! ## Explicit State
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Snapshot Threading                                   │
//! │                                                                         │
//! │  Caller holds: Ledger { stock, history }                               │
//! │       │                                                                 │
//! │       │  let mut working = current.clone();                            │
//! │       ▼                                                                 │
//! │  working.record_movement(...)   ← mutate the working copy              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  persist(working)  ──── ok ────► current = working                     │
//! │       │                                                                 │
//! │       └──────────── err ───────► drop working, current unchanged       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Movement Rules
//! ```text
//! record_movement(barcode, action, qty, location)
//!      │
//!      ▼
//! first record with record.barcode == barcode ?
//!      │
//!      ├── none ──► stock untouched, outcome ItemNotFound
//!      │
//!      ├── In   ──► quantity += qty
//!      │
//!      └── Out  ──► quantity -= qty ──► quantity <= 0 ? remove record
//!      │
//!      ▼
//! history.push(MovementEntry { now, action, barcode, tracking_code, qty, location })
//!      (always, matched or not)
//! ```

use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::types::{ItemRecord, MovementAction, MovementEntry};
use crate::validation::{clamp_movement_quantity, validate_manual_item};

// =============================================================================
// Clock
// =============================================================================

/// Source of movement timestamps.
pub trait Clock {
    /// Current local wall-clock time.
    fn now(&self) -> NaiveDateTime;
}

/// Local system clock, truncated to whole seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local().trunc_subsecs(0)
    }
}

/// A clock stuck at one instant. Used by tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

// =============================================================================
// Movement Outcome
// =============================================================================

/// What a movement did to the stock table.
///
/// Neither variant is an error: the movement entry is appended in both cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[ts(export)]
pub enum MovementOutcome {
    /// The barcode matched a record and its quantity changed.
    Applied {
        barcode: String,
        action: MovementAction,
        quantity: i64,
        /// Quantity left on the record after the change.
        remaining: i64,
        /// True when an Out drove the record to zero or below and it was
        /// dropped from stock.
        removed: bool,
    },

    /// No record carries this barcode; only the history changed.
    ItemNotFound {
        barcode: String,
        action: MovementAction,
        quantity: i64,
    },
}

impl MovementOutcome {
    /// Returns true if a stock record was found.
    pub fn is_applied(&self) -> bool {
        matches!(self, MovementOutcome::Applied { .. })
    }
}

// =============================================================================
// Ledger
// =============================================================================

/// Current stock plus the full movement history.
///
/// ## Invariants
/// - `history` only grows, and only through [`Ledger::record_movement`]
/// - Every `record_movement` call appends exactly one entry
/// - An Out that leaves a record at zero or below removes that record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    /// Current stock, in table order.
    pub stock: Vec<ItemRecord>,

    /// Movement history, oldest first.
    pub history: Vec<MovementEntry>,
}

impl Ledger {
    /// Creates a ledger from loaded tables.
    pub fn new(stock: Vec<ItemRecord>, history: Vec<MovementEntry>) -> Self {
        Ledger { stock, history }
    }

    /// Index of the first record carrying `barcode`.
    pub fn position_of(&self, barcode: &str) -> Option<usize> {
        self.stock.iter().position(|r| r.matches_barcode(barcode))
    }

    /// First record carrying `barcode`.
    pub fn find_item(&self, barcode: &str) -> Option<&ItemRecord> {
        self.position_of(barcode).map(|idx| &self.stock[idx])
    }

    /// Applies a scan in / scan out and records it in the history.
    ///
    /// ## Arguments
    /// * `barcode` - Scanned code, may be empty or unknown
    /// * `action` - In or Out
    /// * `quantity` - Requested delta; values below 1 are clamped to 1
    /// * `location` - Free-text movement context
    /// * `clock` - Timestamp source for the history entry
    ///
    /// ## Returns
    /// [`MovementOutcome::Applied`] when a record matched,
    /// [`MovementOutcome::ItemNotFound`] otherwise.
    pub fn record_movement<C: Clock + ?Sized>(
        &mut self,
        barcode: &str,
        action: MovementAction,
        quantity: i64,
        location: &str,
        clock: &C,
    ) -> MovementOutcome {
        let quantity = clamp_movement_quantity(quantity);

        let (tracking_code, outcome) = match self.position_of(barcode) {
            Some(idx) => {
                let record = &mut self.stock[idx];
                // saturates so a huge OUT still lands at or below zero
                record.quantity = record.quantity.saturating_add(action.signed(quantity));

                let remaining = record.quantity;
                let tracking_code = record.tracking_code.clone();
                let removed = action == MovementAction::Out && remaining <= 0;

                if removed {
                    self.stock.remove(idx);
                    info!(barcode = %barcode, remaining, "Record depleted and removed from stock");
                } else {
                    debug!(barcode = %barcode, %action, quantity, remaining, "Movement applied");
                }

                (
                    tracking_code,
                    MovementOutcome::Applied {
                        barcode: barcode.to_string(),
                        action,
                        quantity,
                        remaining,
                        removed,
                    },
                )
            }
            None => {
                warn!(barcode = %barcode, %action, quantity, "No stock record for barcode");
                (
                    String::new(),
                    MovementOutcome::ItemNotFound {
                        barcode: barcode.to_string(),
                        action,
                        quantity,
                    },
                )
            }
        };

        self.history.push(MovementEntry {
            timestamp: clock.now(),
            action,
            barcode: barcode.to_string(),
            tracking_code,
            quantity,
            location: location.to_string(),
        });

        outcome
    }

    /// Appends a manually entered record.
    ///
    /// The record is always added as a new row, even when another row
    /// already carries the same barcode. A negative quantity is refused, so
    /// the row count grows by one only for quantities of zero or more.
    pub fn add_item_manually(&mut self, record: ItemRecord) -> CoreResult<()> {
        validate_manual_item(&record)?;

        debug!(barcode = %record.barcode, quantity = record.quantity, "Adding item manually");
        self.stock.push(record);
        Ok(())
    }

    /// Replaces the stock table with a grid edited by the user.
    ///
    /// No validation: zero and negative quantities are kept as typed.
    /// History is not touched.
    pub fn edit_stock_table(&mut self, new_table: Vec<ItemRecord>) {
        debug!(
            before = self.stock.len(),
            after = new_table.len(),
            "Replacing stock table from grid edit"
        );
        self.stock = new_table;
    }

    /// Sum of quantities across every record carrying `barcode`.
    pub fn quantity_on_hand(&self, barcode: &str) -> i64 {
        self.stock
            .iter()
            .filter(|r| r.matches_barcode(barcode))
            .fold(0i64, |total, r| total.saturating_add(r.quantity))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn t(hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    fn record(barcode: &str, quantity: i64, tracking_code: &str) -> ItemRecord {
        ItemRecord {
            barcode: barcode.to_string(),
            quantity,
            tracking_code: tracking_code.to_string(),
            ..ItemRecord::default()
        }
    }

    #[test]
    fn depleting_out_removes_record_and_logs_entry() {
        let mut ledger = Ledger::new(vec![record("A1", 5, "PR9")], Vec::new());

        let outcome =
            ledger.record_movement("A1", MovementAction::Out, 5, "bay3", &FixedClock(t(9, 0)));

        assert_eq!(
            outcome,
            MovementOutcome::Applied {
                barcode: "A1".to_string(),
                action: MovementAction::Out,
                quantity: 5,
                remaining: 0,
                removed: true,
            }
        );
        assert!(ledger.find_item("A1").is_none());
        assert_eq!(
            ledger.history,
            vec![MovementEntry {
                timestamp: t(9, 0),
                action: MovementAction::Out,
                barcode: "A1".to_string(),
                tracking_code: "PR9".to_string(),
                quantity: 5,
                location: "bay3".to_string(),
            }]
        );
    }

    #[test]
    fn unknown_barcode_only_appends_history() {
        let mut ledger = Ledger::default();

        let outcome = ledger.record_movement("Z9", MovementAction::In, 2, "", &FixedClock(t(10, 0)));

        assert!(!outcome.is_applied());
        assert!(ledger.stock.is_empty());
        assert_eq!(ledger.history.len(), 1);
        let entry = &ledger.history[0];
        assert_eq!(entry.action, MovementAction::In);
        assert_eq!(entry.barcode, "Z9");
        assert_eq!(entry.tracking_code, "");
        assert_eq!(entry.quantity, 2);
        assert_eq!(entry.location, "");
        assert_eq!(entry.timestamp, t(10, 0));
    }

    #[test]
    fn scan_in_never_removes() {
        let mut ledger = Ledger::new(vec![record("B2", -4, "")], Vec::new());

        let outcome = ledger.record_movement("B2", MovementAction::In, 1, "van", &SystemClock);

        assert!(matches!(
            outcome,
            MovementOutcome::Applied { remaining: -3, removed: false, .. }
        ));
        assert_eq!(ledger.stock.len(), 1);
    }

    #[test]
    fn partial_out_keeps_record() {
        let mut ledger = Ledger::new(vec![record("C3", 10, "PR1")], Vec::new());

        ledger.record_movement("C3", MovementAction::Out, 3, "", &SystemClock);

        assert_eq!(ledger.quantity_on_hand("C3"), 7);
    }

    #[test]
    fn over_depleting_out_removes_instead_of_going_negative() {
        let mut ledger = Ledger::new(vec![record("D4", 2, "")], Vec::new());

        let outcome = ledger.record_movement("D4", MovementAction::Out, 9, "", &SystemClock);

        assert!(matches!(
            outcome,
            MovementOutcome::Applied { remaining: -7, removed: true, .. }
        ));
        assert!(ledger.stock.is_empty());
        assert_eq!(ledger.history[0].quantity, 9);
    }

    #[test]
    fn first_matching_row_wins() {
        let mut ledger = Ledger::new(
            vec![record("E5", 1, "first"), record("E5", 8, "second")],
            Vec::new(),
        );

        ledger.record_movement("E5", MovementAction::Out, 1, "", &SystemClock);

        // first row depleted and removed, second untouched
        assert_eq!(ledger.stock, vec![record("E5", 8, "second")]);
        assert_eq!(ledger.history[0].tracking_code, "first");
    }

    #[test]
    fn quantity_below_one_is_clamped() {
        let mut ledger = Ledger::new(vec![record("F6", 5, "")], Vec::new());

        ledger.record_movement("F6", MovementAction::In, 0, "", &SystemClock);

        assert_eq!(ledger.quantity_on_hand("F6"), 6);
        assert_eq!(ledger.history[0].quantity, 1);
    }

    #[test]
    fn manual_add_always_appends() {
        let mut ledger = Ledger::new(vec![record("G7", 2, "")], Vec::new());

        ledger.add_item_manually(record("G7", 3, "")).unwrap();

        assert_eq!(ledger.stock.len(), 2);
        assert_eq!(ledger.quantity_on_hand("G7"), 5);
        assert!(ledger.history.is_empty());
    }

    #[test]
    fn manual_add_rejects_negative_quantity() {
        let mut ledger = Ledger::default();

        assert!(ledger.add_item_manually(record("H8", -1, "")).is_err());
        assert!(ledger.stock.is_empty());
    }

    #[test]
    fn in_on_max_quantity_saturates() {
        let mut ledger = Ledger::new(vec![record("K1", i64::MAX, "")], Vec::new());

        let outcome =
            ledger.record_movement("K1", MovementAction::In, 1, "", &FixedClock(t(11, 0)));

        assert!(outcome.is_applied());
        assert_eq!(ledger.quantity_on_hand("K1"), i64::MAX);
        assert_eq!(ledger.history.len(), 1);
    }

    #[test]
    fn huge_out_on_negative_record_removes_it() {
        let mut ledger = Ledger::new(vec![record("K2", -2, "")], Vec::new());

        let outcome =
            ledger.record_movement("K2", MovementAction::Out, i64::MAX, "", &FixedClock(t(11, 5)));

        match outcome {
            MovementOutcome::Applied {
                remaining, removed, ..
            } => {
                assert_eq!(remaining, i64::MIN);
                assert!(removed);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(ledger.find_item("K2").is_none());
        assert_eq!(ledger.history[0].quantity, i64::MAX);
    }

    #[test]
    fn grid_edit_keeps_non_positive_quantities() {
        let mut ledger = Ledger::new(vec![record("I9", 4, "")], Vec::new());

        ledger.edit_stock_table(vec![record("I9", 0, ""), record("J1", -2, "")]);

        assert_eq!(ledger.stock.len(), 2);
        assert_eq!(ledger.quantity_on_hand("J1"), -2);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: IN minus OUT equals the net change until the record
        /// crosses zero, after which it is gone.
        #[test]
        fn net_quantity_tracks_movements(
            start in 1i64..50,
            moves in prop::collection::vec((any::<bool>(), 1i64..20), 1..30)
        ) {
            let mut ledger = Ledger::new(vec![record("P1", start, "PR")], Vec::new());
            let mut expected = start;
            let mut present = true;

            for (is_in, qty) in moves {
                let action = if is_in { MovementAction::In } else { MovementAction::Out };
                ledger.record_movement("P1", action, qty, "", &SystemClock);

                if present {
                    expected += action.signed(qty);
                    if action == MovementAction::Out && expected <= 0 {
                        present = false;
                    }
                }

                if present {
                    prop_assert_eq!(ledger.quantity_on_hand("P1"), expected);
                } else {
                    prop_assert!(ledger.find_item("P1").is_none());
                }
            }
        }

        /// Property: every call appends exactly one history entry.
        #[test]
        fn every_movement_appends_one_entry(
            calls in prop::collection::vec(("[A-C]{0,2}", any::<bool>(), -3i64..10), 0..40)
        ) {
            let mut ledger = Ledger::new(
                vec![record("A", 3, ""), record("B", 1, "")],
                vec![],
            );
            let initial = ledger.history.len();
            let n = calls.len();

            for (barcode, is_in, qty) in calls {
                let action = if is_in { MovementAction::In } else { MovementAction::Out };
                ledger.record_movement(&barcode, action, qty, "", &SystemClock);
                prop_assert!(ledger.history.last().map(|e| e.quantity >= 1).unwrap_or(false));
            }

            prop_assert_eq!(ledger.history.len(), initial + n);
        }

        /// Property: manual add grows the table by exactly one row.
        #[test]
        fn manual_add_grows_by_one(existing in 0usize..10, qty in 0i64..100) {
            let mut ledger = Ledger::new(
                (0..existing).map(|_| record("DUP", 1, "")).collect(),
                vec![],
            );

            ledger.add_item_manually(record("DUP", qty, "")).unwrap();

            prop_assert_eq!(ledger.stock.len(), existing + 1);
        }
    }
}
