//! # Commands
//!
//! One module per subcommand. Every command takes the shared [`Context`]
//! and returns a [`CommandOutput`]: text lines for the terminal plus the
//! same result as JSON for `--json`.
//!
//! ## Access
//! ```text
//! login ─────────────► credentials checked, nothing written
//! purchase, sale ────► login required (global -u/-p), then the stock ledger
//! inventory, report,
//! products ──────────► read only, no login
//! ```

pub mod inventory;
pub mod login;
pub mod products;
pub mod purchase;
pub mod report;
pub mod sale;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use stockbook_db::Database;

use crate::cli::{Cli, Command};
use crate::config::AppConfig;
use crate::error::AppResult;

/// Everything a command needs: the store, the settings and the date used
/// when an entry or report leaves its date out.
#[derive(Debug, Clone)]
pub struct Context {
    pub db: Database,
    pub config: AppConfig,
    pub today: NaiveDate,
}

impl Context {
    pub fn new(db: Database, config: AppConfig) -> Self {
        Context {
            db,
            config,
            today: Local::now().date_naive(),
        }
    }

    /// Same context with a fixed "today".
    pub fn on(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
}

/// What a command produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
    /// Human-readable lines.
    pub lines: Vec<String>,

    /// Structured result for `--json`.
    pub json: serde_json::Value,
}

impl CommandOutput {
    pub fn new(lines: Vec<String>, data: &impl Serialize) -> AppResult<Self> {
        Ok(CommandOutput {
            lines,
            json: serde_json::to_value(data)?,
        })
    }
}

/// Runs the parsed command.
pub async fn dispatch(ctx: &Context, cli: Cli) -> AppResult<CommandOutput> {
    let credentials = login::Credentials {
        username: cli.username,
        password: cli.password,
    };

    match cli.command {
        Command::Login => login::run(ctx, &credentials).await,
        Command::Purchase(args) => {
            let user = login::require_login(ctx, &credentials).await?;
            purchase::run(ctx, &user, args).await
        }
        Command::Sale(args) => {
            let user = login::require_login(ctx, &credentials).await?;
            sale::run(ctx, &user, args).await
        }
        Command::Inventory(args) => inventory::run(ctx, args).await,
        Command::Report(args) => report::run(ctx, args).await,
        Command::Products => products::run(ctx).await,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use stockbook_core::User;
    use stockbook_db::DbConfig;

    pub fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    pub async fn context() -> Context {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        Context::new(db, AppConfig::default()).on(day(31))
    }

    pub async fn admin(ctx: &Context) -> User {
        ctx.db
            .users()
            .find_by_username("admin")
            .await
            .unwrap()
            .unwrap()
    }
}
