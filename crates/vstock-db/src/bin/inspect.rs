//! # Database Inspector
//!
//! Prints what a Vehicle Stock database file holds, without modifying it.
//!
//! ## Usage
//! ```bash
//! # Inspect ./stock_voitures.db (default), 5 rows per table
//! cargo run -p vstock-db --bin inspect
//!
//! # Another file, more rows
//! cargo run -p vstock-db --bin inspect -- --db ./data/stock_voitures.db --limit 20
//! ```
//!
//! ## Output
//! - Tables found in the file
//! - Migration status
//! - Row counts for `stock` and `history`
//! - The first stock rows and the most recent movements, one JSON object
//!   per line

use std::env;
use std::path::Path;

use vstock_db::migrations::migration_status;
use vstock_db::{Database, DbConfig};

const DEFAULT_DB_PATH: &str = "./stock_voitures.db";
const DEFAULT_LIMIT: u32 = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from(DEFAULT_DB_PATH);
    let mut limit = DEFAULT_LIMIT;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--limit" | "-n" => {
                if i + 1 < args.len() {
                    limit = args[i + 1].parse().unwrap_or(DEFAULT_LIMIT);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Vehicle Stock Database Inspector");
                println!();
                println!("Usage: inspect [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: {DEFAULT_DB_PATH})");
                println!("  -n, --limit <N>    Rows shown per table (default: {DEFAULT_LIMIT})");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {other}");
            }
        }
        i += 1;
    }

    if !Path::new(&db_path).exists() {
        eprintln!("✗ No database at {db_path}");
        std::process::exit(1);
    }

    println!("🔎 Vehicle Stock Database Inspector");
    println!("===================================");
    println!("Database: {db_path}");
    println!();

    // Never migrate a file we are only looking at
    let db = Database::new(DbConfig::new(&db_path).run_migrations(false)).await?;

    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(db.pool())
    .await?;
    println!("📋 Tables: {}", tables.join(", "));

    let status = migration_status(db.pool()).await?;
    println!(
        "Migrations: {}/{} applied{}",
        status.applied,
        status.total,
        if status.is_current() { "" } else { " (outdated)" }
    );

    if !tables.iter().any(|t| t == "stock") || !tables.iter().any(|t| t == "history") {
        println!();
        println!("⚠ Stock tables missing; start the server once to create them.");
        return Ok(());
    }

    println!();
    println!("--- Stock ---");
    let stock = db.stock().load_all().await?;
    for record in stock.iter().take(limit as usize) {
        println!("{}", serde_json::to_string(record)?);
    }
    println!("Rows: {}", db.stock().count().await?);

    println!();
    println!("--- History (most recent first) ---");
    for entry in db.history().recent(limit).await? {
        println!("{}", serde_json::to_string(&entry)?);
    }
    println!("Rows: {}", db.history().count().await?);

    println!();
    println!("Snapshot version: {}", db.ledger().version().await?);

    db.close().await;
    Ok(())
}
