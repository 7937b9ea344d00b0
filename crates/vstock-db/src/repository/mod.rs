//! # Repository Module
//!
//! Database repository implementations for Vehicle Stock.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories                                         │
//! │                                                                         │
//! │  vstock-server                                                         │
//! │       │                                                                 │
//! │       │  store.save_snapshot(&ledger, version)                         │
//! │       ▼                                                                 │
//! │  LedgerRepository  (one transaction, version-checked)                  │
//! │  ├── stock::write_all     ──► StockRepository's table                  │
//! │  └── history::write_all   ──► HistoryRepository's table                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`StockRepository`](stock::StockRepository) - Current stock table
//! - [`HistoryRepository`](history::HistoryRepository) - Movement history
//! - [`LedgerRepository`](ledger::LedgerRepository) - Versioned snapshots

pub mod history;
pub mod ledger;
pub mod stock;
