//! Scan in / scan out and the movement history.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use tracing::info;

use vstock_core::locale;

use crate::dto::{HistorySnapshot, LangQuery, LocalizedEntry, MovementRequest, MovementResponse};
use crate::error::ApiError;
use crate::state::LedgerState;

pub async fn record_movement(
    State(state): State<Arc<LedgerState>>,
    Query(query): Query<LangQuery>,
    Json(body): Json<MovementRequest>,
) -> Result<Json<MovementResponse>, ApiError> {
    let lang = query.resolve(state.language())?;
    let clock = state.clock();

    let (outcome, session) = state
        .mutate(|ledger| {
            Ok(ledger.record_movement(
                &body.barcode,
                body.action,
                body.quantity,
                &body.location,
                clock,
            ))
        })
        .await?;

    info!(
        barcode = %body.barcode,
        action = %body.action,
        applied = outcome.is_applied(),
        version = session.version,
        "Movement recorded"
    );

    let notices = locale::movement_notices(&outcome, lang);
    Ok(Json(MovementResponse {
        outcome,
        notices,
        stock: session.ledger.stock,
        history: session.ledger.history,
        version: session.version,
    }))
}

pub async fn get_history(
    State(state): State<Arc<LedgerState>>,
    Query(query): Query<LangQuery>,
) -> Result<Json<HistorySnapshot>, ApiError> {
    let lang = query.resolve(state.language())?;
    let session = state.snapshot().await;

    Ok(Json(HistorySnapshot {
        version: session.version,
        entries: session
            .ledger
            .history
            .into_iter()
            .map(|entry| LocalizedEntry::new(entry, lang))
            .collect(),
    }))
}
