//! Request and response bodies.

use serde::{Deserialize, Serialize};

use vstock_core::import::RawRow;
use vstock_core::{ItemRecord, Language, MovementAction, MovementEntry, MovementOutcome, Notice};

use crate::error::ApiError;

// =============================================================================
// Requests
// =============================================================================

/// Optional `?lang=fr|en` on every route.
#[derive(Debug, Default, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

impl LangQuery {
    /// Requested language, or `fallback` when none was given.
    pub fn resolve(&self, fallback: Language) -> Result<Language, ApiError> {
        match &self.lang {
            Some(raw) => Ok(raw.parse::<Language>()?),
            None => Ok(fallback),
        }
    }
}

/// Body of `POST /movements`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementRequest {
    #[serde(default)]
    pub barcode: String,

    pub action: MovementAction,

    #[serde(default = "default_movement_quantity")]
    pub quantity: i64,

    #[serde(default)]
    pub location: String,
}

fn default_movement_quantity() -> i64 {
    vstock_core::MIN_MOVEMENT_QUANTITY
}

/// Body of `PUT /stock`.
#[derive(Debug, Deserialize)]
pub struct EditStockRequest {
    pub items: Vec<ItemRecord>,
}

/// Body of `POST /stock/import`.
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub rows: Vec<RawRow>,
}

// =============================================================================
// Responses
// =============================================================================

/// A stock record with its tool flag spelled out ("Oui" / "No").
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedItem {
    #[serde(flatten)]
    pub item: ItemRecord,
    pub tool_label: &'static str,
}

impl LocalizedItem {
    pub fn new(item: ItemRecord, lang: Language) -> Self {
        let tool_label = lang.yes_no(item.tool_flag);
        LocalizedItem { item, tool_label }
    }
}

/// A movement entry with its direction spelled out ("Entrée" / "Out").
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedEntry {
    #[serde(flatten)]
    pub entry: MovementEntry,
    pub action_label: &'static str,
}

impl LocalizedEntry {
    pub fn new(entry: MovementEntry, lang: Language) -> Self {
        let action_label = lang.action_label(entry.action);
        LocalizedEntry {
            entry,
            action_label,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StockSnapshot {
    pub version: i64,
    pub items: Vec<LocalizedItem>,
}

#[derive(Debug, Serialize)]
pub struct HistorySnapshot {
    pub version: i64,
    pub entries: Vec<LocalizedEntry>,
}

#[derive(Debug, Serialize)]
pub struct MovementResponse {
    pub outcome: MovementOutcome,
    pub notices: Vec<Notice>,
    pub stock: Vec<ItemRecord>,
    pub history: Vec<MovementEntry>,
    pub version: i64,
}

#[derive(Debug, Serialize)]
pub struct AddItemResponse {
    pub notices: Vec<Notice>,
    pub stock: Vec<ItemRecord>,
    pub version: i64,
}

#[derive(Debug, Serialize)]
pub struct EditStockResponse {
    pub stock: Vec<ItemRecord>,
    pub version: i64,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub imported: usize,
    pub notices: Vec<Notice>,
    pub stock: Vec<ItemRecord>,
    pub version: i64,
}
