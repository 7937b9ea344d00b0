//! End-to-end tests through the router, backed by in-memory SQLite.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value};
use tower::ServiceExt;

use vstock_core::ledger::FixedClock;
use vstock_core::{ItemRecord, Language, Ledger, MovementEntry};
use vstock_db::{Database, DbConfig, DbError, DbResult, LedgerRepository, LedgerStore};
use vstock_server::build_app;
use vstock_server::state::LedgerState;

// =============================================================================
// Helpers
// =============================================================================

fn scan_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

async fn test_db() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("Failed to create test database")
}

async fn app_over(store: Arc<dyn LedgerStore>) -> Router {
    let state = LedgerState::open(store, Arc::new(FixedClock(scan_time())), Language::Fr)
        .await
        .expect("Failed to open ledger state");
    build_app(Arc::new(state))
}

async fn app_for(db: &Database) -> Router {
    app_over(Arc::new(db.ledger())).await
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

    (status, value)
}

fn item(barcode: &str, quantity: i64, tracking: &str) -> Value {
    json!({
        "location": "Dépôt",
        "description": format!("Part {barcode}"),
        "quantity": quantity,
        "barcode": barcode,
        "trackingCode": tracking,
    })
}

async fn seed(app: &Router, items: Vec<Value>) {
    let (status, _) = send(app, Method::PUT, "/stock", Some(json!({ "items": items }))).await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let db = test_db().await;
    let app = app_for(&db).await;

    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("OK"));
}

// =============================================================================
// Movements
// =============================================================================

#[tokio::test]
async fn test_scan_in_increases_quantity_and_logs() {
    let db = test_db().await;
    let app = app_for(&db).await;
    seed(&app, vec![item("A1", 5, "PR-1")]).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/movements?lang=en",
        Some(json!({ "barcode": "A1", "action": "in", "quantity": 3, "location": "Van 2" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"]["kind"], "applied");
    assert_eq!(body["outcome"]["remaining"], 8);
    assert_eq!(body["stock"][0]["quantity"], 8);
    assert_eq!(body["notices"][0]["level"], "success");
    assert_eq!(body["notices"][0]["message"], "✅ Added 3 unit(s) for A1");

    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["timestamp"], "2024-03-01 10:00:00");
    assert_eq!(history[0]["action"], "in");
    assert_eq!(history[0]["trackingCode"], "PR-1");
    assert_eq!(history[0]["location"], "Van 2");
}

#[tokio::test]
async fn test_scan_out_to_zero_removes_record() {
    let db = test_db().await;
    let app = app_for(&db).await;
    seed(&app, vec![item("A1", 2, "PR-1"), item("B2", 4, "PR-2")]).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/movements",
        Some(json!({ "barcode": "A1", "action": "out", "quantity": 5 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"]["removed"], true);
    assert_eq!(body["stock"].as_array().unwrap().len(), 1);
    assert_eq!(body["stock"][0]["barcode"], "B2");

    let notices = body["notices"].as_array().unwrap();
    assert_eq!(notices.len(), 2);
    assert_eq!(notices[0]["message"], "✅ Retrait de 5 unité(s) pour A1");
    assert_eq!(notices[1]["level"], "info");
}

#[tokio::test]
async fn test_unknown_barcode_warns_and_still_logs() {
    let db = test_db().await;
    let app = app_for(&db).await;
    seed(&app, vec![item("A1", 2, "PR-1")]).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/movements",
        Some(json!({ "barcode": "ZZZ", "action": "in", "quantity": 1 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"]["kind"], "itemNotFound");
    assert_eq!(body["notices"].as_array().unwrap().len(), 1);
    assert_eq!(body["notices"][0]["level"], "warning");
    assert_eq!(body["stock"][0]["quantity"], 2);
    assert_eq!(body["history"][0]["barcode"], "ZZZ");
    assert_eq!(body["history"][0]["trackingCode"], "");
}

#[tokio::test]
async fn test_zero_quantity_movement_counts_as_one() {
    let db = test_db().await;
    let app = app_for(&db).await;
    seed(&app, vec![item("A1", 2, "")]).await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/movements",
        Some(json!({ "barcode": "A1", "action": "in", "quantity": 0 })),
    )
    .await;

    assert_eq!(body["stock"][0]["quantity"], 3);
    assert_eq!(body["history"][0]["quantity"], 1);
}

#[tokio::test]
async fn test_history_carries_localized_labels() {
    let db = test_db().await;
    let app = app_for(&db).await;
    seed(&app, vec![item("A1", 2, "")]).await;
    send(
        &app,
        Method::POST,
        "/movements",
        Some(json!({ "barcode": "A1", "action": "out" })),
    )
    .await;

    let (_, fr) = send(&app, Method::GET, "/history", None).await;
    let (_, en) = send(&app, Method::GET, "/history?lang=en", None).await;

    assert_eq!(fr["entries"][0]["actionLabel"], "Sortie");
    assert_eq!(en["entries"][0]["actionLabel"], "Out");
    assert_eq!(fr["entries"][0]["quantity"], 1);
}

// =============================================================================
// Stock Table
// =============================================================================

#[tokio::test]
async fn test_manual_add_appends_record() {
    let db = test_db().await;
    let app = app_for(&db).await;
    seed(&app, vec![item("A1", 2, "")]).await;

    let (status, body) = send(&app, Method::POST, "/stock/items", Some(item("A1", 0, "dup"))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["notices"][0]["message"], "✅");
    // duplicate barcodes are kept as separate rows
    assert_eq!(body["stock"].as_array().unwrap().len(), 2);
    assert_eq!(body["stock"][1]["trackingCode"], "dup");
}

#[tokio::test]
async fn test_manual_add_rejects_negative_quantity() {
    let db = test_db().await;
    let app = app_for(&db).await;

    let (status, body) = send(&app, Method::POST, "/stock/items", Some(item("A1", -1, ""))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (_, stock) = send(&app, Method::GET, "/stock", None).await;
    assert!(stock["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_grid_edit_replaces_table() {
    let db = test_db().await;
    let app = app_for(&db).await;
    seed(&app, vec![item("A1", 2, ""), item("B2", 3, "")]).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/stock",
        Some(json!({ "items": [item("C3", -4, "")] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stock"].as_array().unwrap().len(), 1);
    assert_eq!(body["stock"][0]["quantity"], -4);
}

#[tokio::test]
async fn test_import_replaces_stock_keeps_history() {
    let db = test_db().await;
    let app = app_for(&db).await;
    seed(&app, vec![item("A1", 2, "")]).await;
    send(
        &app,
        Method::POST,
        "/movements",
        Some(json!({ "barcode": "A1", "action": "in" })),
    )
    .await;

    let rows = json!({ "rows": [
        { "Code-barres": "X1", "Quantité": 4, "Localisation": "Dépôt", "Tool": "Oui" },
        { "barcode": "X2", "quantity": "7", "trackingCode": 991 },
    ]});
    let (status, body) = send(&app, Method::POST, "/stock/import?lang=en", Some(rows)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["imported"], 2);
    assert_eq!(body["notices"][0]["message"], "✅ File imported successfully!");
    assert_eq!(body["stock"][0]["barcode"], "X1");
    assert_eq!(body["stock"][0]["toolFlag"], false);
    assert_eq!(body["stock"][1]["quantity"], 7);
    assert_eq!(body["stock"][1]["trackingCode"], "991");

    let (_, stock) = send(&app, Method::GET, "/stock", None).await;
    assert_eq!(stock["items"][0]["toolLabel"], "Non");

    let (_, history) = send(&app, Method::GET, "/history", None).await;
    assert_eq!(history["entries"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_malformed_import_leaves_stock_untouched() {
    let db = test_db().await;
    let app = app_for(&db).await;
    seed(&app, vec![item("A1", 2, "")]).await;

    let rows = json!({ "rows": [
        { "Code-barres": "X1", "Quantité": 1 },
        { "Code-barres": "X2", "Quantité": "beaucoup" },
    ]});
    let (status, body) = send(&app, Method::POST, "/stock/import", Some(rows)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "IMPORT_MALFORMED");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Erreur lors de l'import : "));

    let (_, stock) = send(&app, Method::GET, "/stock", None).await;
    assert_eq!(stock["items"].as_array().unwrap().len(), 1);
    assert_eq!(stock["items"][0]["barcode"], "A1");
}

#[tokio::test]
async fn test_unknown_language_is_rejected() {
    let db = test_db().await;
    let app = app_for(&db).await;

    let (status, body) = send(&app, Method::GET, "/stock?lang=de", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn test_state_survives_reopen() {
    let db = test_db().await;
    let app = app_for(&db).await;
    seed(&app, vec![item("A1", 2, "PR-1")]).await;
    send(
        &app,
        Method::POST,
        "/movements",
        Some(json!({ "barcode": "A1", "action": "out" })),
    )
    .await;

    let reopened = app_for(&db).await;
    let (_, stock) = send(&reopened, Method::GET, "/stock", None).await;
    let (_, history) = send(&reopened, Method::GET, "/history", None).await;

    assert_eq!(stock["items"][0]["quantity"], 1);
    assert_eq!(history["entries"][0]["timestamp"], "2024-03-01 10:00:00");
    assert_eq!(stock["version"], history["version"]);
}

#[tokio::test]
async fn test_stale_session_gets_conflict_then_recovers() {
    let db = test_db().await;
    let first = app_for(&db).await;
    let second = app_for(&db).await;

    seed(&first, vec![item("A1", 2, "")]).await;

    let movement = json!({ "barcode": "A1", "action": "in" });
    let (status, body) = send(&second, Method::POST, "/movements", Some(movement.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    // the stale session was reloaded, so a retry applies on top of the seed
    let (status, body) = send(&second, Method::POST, "/movements", Some(movement)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stock"][0]["quantity"], 3);
}

/// Store that reads normally but refuses every snapshot.
struct ReadOnlyStore {
    inner: LedgerRepository,
}

#[async_trait]
impl LedgerStore for ReadOnlyStore {
    async fn load_stock(&self) -> DbResult<Vec<ItemRecord>> {
        self.inner.load_stock().await
    }

    async fn load_history(&self) -> DbResult<Vec<MovementEntry>> {
        self.inner.load_history().await
    }

    async fn save_stock(&self, _stock: &[ItemRecord]) -> DbResult<()> {
        Err(DbError::QueryFailed("attempt to write a readonly database".into()))
    }

    async fn save_history(&self, _history: &[MovementEntry]) -> DbResult<()> {
        Err(DbError::QueryFailed("attempt to write a readonly database".into()))
    }

    async fn current_version(&self) -> DbResult<i64> {
        self.inner.current_version().await
    }

    async fn save_snapshot(&self, _ledger: &Ledger, _expected: i64) -> DbResult<i64> {
        Err(DbError::QueryFailed("attempt to write a readonly database".into()))
    }
}

#[tokio::test]
async fn test_failed_save_keeps_previous_snapshot() {
    let db = test_db().await;
    seed(&app_for(&db).await, vec![item("A1", 2, "")]).await;

    let app = app_over(Arc::new(ReadOnlyStore { inner: db.ledger() })).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/movements",
        Some(json!({ "barcode": "A1", "action": "out", "quantity": 2 })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "DATABASE_ERROR");

    let (_, stock) = send(&app, Method::GET, "/stock", None).await;
    let (_, history) = send(&app, Method::GET, "/history", None).await;
    assert_eq!(stock["items"][0]["quantity"], 2);
    assert!(history["entries"].as_array().unwrap().is_empty());
}
