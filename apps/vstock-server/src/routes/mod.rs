//! # HTTP Routes
//!
//! ```text
//! GET  /health          store health check
//! GET  /stock           stock snapshot
//! PUT  /stock           grid edit (whole table)
//! POST /stock/items     manual add
//! POST /stock/import    bulk import (whole table)
//! GET  /history         movement history snapshot
//! POST /movements       scan in / scan out
//! ```
//!
//! Every route accepts `?lang=fr|en`; without it notices use the configured
//! language.

pub mod movements;
pub mod stock;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;

use crate::state::LedgerState;

/// Builds the service router.
pub fn router(state: Arc<LedgerState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stock", get(stock::get_stock).put(stock::edit_stock))
        .route("/stock/items", post(stock::add_item))
        .route("/stock/import", post(stock::import_stock))
        .route("/history", get(movements::get_history))
        .route("/movements", post(movements::record_movement))
        .with_state(state)
}

async fn health(State(state): State<Arc<LedgerState>>) -> (StatusCode, &'static str) {
    if state.healthy().await {
        (StatusCode::OK, "OK")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE")
    }
}
