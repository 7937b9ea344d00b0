//! # Ledger Session State
//!
//! The service's in-memory copy of the ledger, kept in lockstep with the
//! database.
//!
//! ## Thread Safety
//! The session is wrapped in a `tokio::sync::Mutex` held across the whole
//! read-modify-persist cycle, so mutating requests run one at a time.
//!
//! ## Mutation Cycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  mutate(op)                                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lock session { ledger, version }                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  working = ledger.clone(); op(&mut working)?                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store.save_snapshot(&working, version)                                │
//! │       │                                                                 │
//! │       ├── Ok(v)            ──► session = { working, v }                 │
//! │       ├── VersionConflict  ──► session reloaded from the store         │
//! │       └── other error      ──► session unchanged                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info, warn};

use vstock_core::{Clock, Language, Ledger};
use vstock_db::{DbError, LedgerStore};

use crate::error::ApiError;

/// Ledger plus the store version it matches.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub ledger: Ledger,
    pub version: i64,
}

/// Shared state behind every route.
pub struct LedgerState {
    store: Arc<dyn LedgerStore>,
    clock: Arc<dyn Clock + Send + Sync>,
    language: Language,
    session: Mutex<Session>,
}

impl LedgerState {
    /// Loads the current ledger from the store.
    pub async fn open(
        store: Arc<dyn LedgerStore>,
        clock: Arc<dyn Clock + Send + Sync>,
        language: Language,
    ) -> Result<Self, DbError> {
        let (ledger, version) = store.load_ledger().await?;

        info!(
            stock = ledger.stock.len(),
            history = ledger.history.len(),
            version,
            "Ledger session loaded"
        );

        Ok(LedgerState {
            store,
            clock,
            language,
            session: Mutex::new(Session { ledger, version }),
        })
    }

    /// Configured notice language.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Timestamp source for movements.
    pub fn clock(&self) -> &(dyn Clock + Send + Sync) {
        self.clock.as_ref()
    }

    /// True when the store answers queries.
    pub async fn healthy(&self) -> bool {
        self.store.health_check().await
    }

    /// Copy of the current session.
    pub async fn snapshot(&self) -> Session {
        self.session.lock().await.clone()
    }

    /// Applies `op` to a working copy and persists it.
    ///
    /// The session only changes when the save succeeds. If `op` fails,
    /// nothing is saved.
    pub async fn mutate<T, F>(&self, op: F) -> Result<(T, Session), ApiError>
    where
        F: FnOnce(&mut Ledger) -> Result<T, ApiError>,
    {
        let mut session = self.session.lock().await;

        let mut working = session.ledger.clone();
        let value = op(&mut working)?;

        match self.store.save_snapshot(&working, session.version).await {
            Ok(version) => {
                *session = Session {
                    ledger: working,
                    version,
                };
                Ok((value, session.clone()))
            }
            Err(err @ DbError::VersionConflict { .. }) => {
                warn!(error = %err, "Stale session, reloading from store");
                match self.store.load_ledger().await {
                    Ok((ledger, version)) => *session = Session { ledger, version },
                    Err(reload_err) => error!(error = %reload_err, "Session reload failed"),
                }
                Err(err.into())
            }
            Err(err) => {
                error!(error = %err, "Snapshot save failed, previous state kept");
                Err(err.into())
            }
        }
    }
}
