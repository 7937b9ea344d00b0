//! Vehicle stock server entry point.
//!
//! ```text
//! vstock-server [--config <path>]
//! ```

use std::path::PathBuf;

use tracing::error;

use vstock_server::config::ServerConfig;

#[tokio::main]
async fn main() {
    let mut config_path: Option<PathBuf> = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => match args.next() {
                Some(path) => config_path = Some(PathBuf::from(path)),
                None => {
                    eprintln!("--config needs a path");
                    std::process::exit(2);
                }
            },
            "--help" | "-h" => {
                println!("Usage: vstock-server [--config <path>]");
                println!();
                println!("Environment: VSTOCK_BIND_ADDR, VSTOCK_PORT, VSTOCK_DB_PATH, VSTOCK_LANG");
                return;
            }
            other => {
                eprintln!("Unknown argument: {other}");
                std::process::exit(2);
            }
        }
    }

    vstock_server::init_tracing();

    let config = match ServerConfig::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    if let Err(e) = vstock_server::run(config).await {
        error!(error = %e, "Server stopped with an error");
        std::process::exit(1);
    }
}
