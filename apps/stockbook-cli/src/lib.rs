//! # Stockbook CLI Library
//!
//! Command-line front end for the shop's stock book.
//!
//! ## Module Organization
//! ```text
//! stockbook_cli/
//! ├── lib.rs          ◄─── You are here (logging, startup, output)
//! ├── cli.rs          ◄─── clap argument definitions
//! ├── config.rs       ◄─── AppConfig (env vars, data directory)
//! ├── error.rs        ◄─── AppError / ErrorCode
//! └── commands/
//!     ├── mod.rs      ◄─── Context, CommandOutput, dispatch
//!     ├── login.rs    ◄─── Credential check and login gate
//!     ├── purchase.rs ◄─── Purchase entry
//!     ├── sale.rs     ◄─── Sale entry
//!     ├── inventory.rs◄─── Inventory view and CSV export
//!     ├── report.rs   ◄─── Reports and text export
//!     └── products.rs ◄─── Product names
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

use clap::Parser;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use commands::{CommandOutput, Context};
use config::AppConfig;
use error::{AppError, AppResult};
use stockbook_db::{Database, DbConfig};

/// Runs the CLI.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Command Startup                                   │
/// │                                                                         │
/// │  1. Parse Arguments ──────────────────────────────────────────────────► │
/// │     • clap; usage errors exit before anything else happens              │
/// │                                                                         │
/// │  2. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber to stderr, RUST_LOG overrides the default      │
/// │                                                                         │
/// │  3. Determine Database Path ──────────────────────────────────────────► │
/// │     • --db, then STOCKBOOK_DB_PATH, then the platform data directory    │
/// │                                                                         │
/// │  4. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode, pending migrations applied                  │
/// │                                                                         │
/// │  5. Dispatch Command ─────────────────────────────────────────────────► │
/// │     • text to stdout, or JSON with --json                               │
/// │     • errors to stderr (or JSON), exit status from ErrorCode            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    init_tracing();

    let json = cli.json;
    match execute(cli, AppConfig::from_env()).await {
        Ok(output) => {
            print_output(&output, json);
            ExitCode::SUCCESS
        }
        Err(err) => {
            print_error(&err, json);
            ExitCode::from(err.code.exit_status())
        }
    }
}

/// Opens the store and runs one parsed command against it.
pub async fn execute(cli: Cli, config: AppConfig) -> AppResult<CommandOutput> {
    let db_path = config.database_path(cli.db.clone())?;
    info!(?db_path, "Database path determined");

    let db = Database::new(DbConfig::new(db_path)).await?;
    let ctx = Context::new(db, config);

    let result = commands::dispatch(&ctx, cli).await;
    ctx.db.close().await;
    result
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=stockbook=trace` - Show trace for stockbook crates only
/// - Default: INFO, DEBUG for stockbook crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stockbook=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_output(output: &CommandOutput, json: bool) {
    if json {
        match serde_json::to_string_pretty(&output.json) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("Error: {}", e),
        }
    } else {
        for line in &output.lines {
            println!("{}", line);
        }
    }
}

fn print_error(err: &AppError, json: bool) {
    if json {
        match serde_json::to_string_pretty(err) {
            Ok(text) => println!("{}", text),
            Err(_) => eprintln!("Error: {}", err),
        }
    } else {
        eprintln!("Error: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn cli(dir: &tempfile::TempDir, args: &[&str]) -> Cli {
        let db = dir.path().join("stockbook.db");
        let mut argv = vec!["stockbook", "--db", db.to_str().unwrap()];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[tokio::test]
    async fn test_execute_against_file_database() {
        let dir = tempfile::tempdir().unwrap();

        let output = execute(
            cli(
                &dir,
                &[
                    "-u",
                    "admin",
                    "-p",
                    "123",
                    "purchase",
                    "--product",
                    "Gold Flake",
                    "--supplier",
                    "ABC Distributors",
                    "--quantity",
                    "100",
                    "--unit-cost",
                    "10.50",
                    "--date",
                    "2024-01-01",
                ],
            ),
            AppConfig::default(),
        )
        .await
        .unwrap();
        assert_eq!(output.json["product"]["stock_quantity"], 100);

        // A second process sees the same store
        let output = execute(cli(&dir, &["products"]), AppConfig::default())
            .await
            .unwrap();
        assert_eq!(output.lines, vec!["Gold Flake"]);
    }

    #[tokio::test]
    async fn test_entry_commands_require_login() {
        let dir = tempfile::tempdir().unwrap();

        let err = execute(
            cli(
                &dir,
                &[
                    "sale",
                    "--product",
                    "Gold Flake",
                    "--customer",
                    "John",
                    "--quantity",
                    "1",
                ],
            ),
            AppConfig::default(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::Unauthorized);
    }
}
