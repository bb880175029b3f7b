//! # Stockbook CLI Entry Point
//!
//! All logic lives in the library (`stockbook_cli::run`) so commands can be
//! exercised from tests without spawning a process.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    stockbook_cli::run().await
}
