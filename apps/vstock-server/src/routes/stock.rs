//! Stock table routes: snapshot, grid edit, manual add, bulk import.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use vstock_core::{locale, CoreError, Language};

use crate::dto::{
    AddItemResponse, EditStockRequest, EditStockResponse, ImportRequest, ImportResponse,
    LangQuery, LocalizedItem, StockSnapshot,
};
use crate::error::{ApiError, ErrorCode};
use crate::state::LedgerState;
use vstock_core::ItemRecord;

pub async fn get_stock(
    State(state): State<Arc<LedgerState>>,
    Query(query): Query<LangQuery>,
) -> Result<Json<StockSnapshot>, ApiError> {
    let lang = query.resolve(state.language())?;
    let session = state.snapshot().await;

    Ok(Json(StockSnapshot {
        version: session.version,
        items: session
            .ledger
            .stock
            .into_iter()
            .map(|item| LocalizedItem::new(item, lang))
            .collect(),
    }))
}

pub async fn edit_stock(
    State(state): State<Arc<LedgerState>>,
    Json(body): Json<EditStockRequest>,
) -> Result<Json<EditStockResponse>, ApiError> {
    let ((), session) = state
        .mutate(|ledger| {
            ledger.edit_stock_table(body.items);
            Ok(())
        })
        .await?;

    info!(rows = session.ledger.stock.len(), "Stock table edited");
    Ok(Json(EditStockResponse {
        stock: session.ledger.stock,
        version: session.version,
    }))
}

pub async fn add_item(
    State(state): State<Arc<LedgerState>>,
    Query(query): Query<LangQuery>,
    Json(record): Json<ItemRecord>,
) -> Result<(StatusCode, Json<AddItemResponse>), ApiError> {
    // validated for its error only; the confirmation is language-neutral
    query.resolve(state.language())?;

    let barcode = record.barcode.clone();
    let ((), session) = state
        .mutate(|ledger| Ok(ledger.add_item_manually(record)?))
        .await?;

    info!(barcode = %barcode, "Item added manually");
    Ok((
        StatusCode::CREATED,
        Json(AddItemResponse {
            notices: vec![locale::item_added()],
            stock: session.ledger.stock,
            version: session.version,
        }),
    ))
}

pub async fn import_stock(
    State(state): State<Arc<LedgerState>>,
    Query(query): Query<LangQuery>,
    Json(body): Json<ImportRequest>,
) -> Result<Json<ImportResponse>, ApiError> {
    let lang = query.resolve(state.language())?;

    let (imported, session) = state
        .mutate(|ledger| {
            ledger
                .reconcile_from_import(&body.rows)
                .map_err(|e| import_failure(lang, e))
        })
        .await?;

    info!(imported, "Stock imported");
    Ok(Json(ImportResponse {
        imported,
        notices: vec![locale::import_success(lang)],
        stock: session.ledger.stock,
        version: session.version,
    }))
}

fn import_failure(lang: Language, err: CoreError) -> ApiError {
    match err {
        CoreError::ImportMalformed { .. } => ApiError::new(
            ErrorCode::ImportMalformed,
            locale::import_error(lang, &err).message,
        ),
        other => other.into(),
    }
}
