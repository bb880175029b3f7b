//! # Login
//!
//! The gate in front of the entry commands. Any stored operator may record
//! purchases and sales; roles are reported but not enforced.

use tracing::{info, warn};

use stockbook_core::validation::validate_credentials;
use stockbook_core::{Role, User};

use super::{CommandOutput, Context};
use crate::error::{AppError, AppResult};

/// Credentials from the global `--username` / `--password` flags.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Checks a username and password against the store.
///
/// Both values are trimmed and required.
pub async fn authenticate(ctx: &Context, username: &str, password: &str) -> AppResult<User> {
    let (username, password) = validate_credentials(username, password)?;

    match ctx.db.users().authenticate(&username, &password).await? {
        Some(user) => {
            info!(username = %user.username, "Operator logged in");
            Ok(user)
        }
        None => {
            warn!(username = %username, "Rejected login");
            Err(AppError::unauthorized("Invalid username or password"))
        }
    }
}

/// Authenticates the global credentials, or fails when they are missing.
pub async fn require_login(ctx: &Context, credentials: &Credentials) -> AppResult<User> {
    match (&credentials.username, &credentials.password) {
        (Some(username), Some(password)) => authenticate(ctx, username, password).await,
        _ => Err(AppError::unauthorized(
            "Login required: pass --username and --password",
        )),
    }
}

/// `stockbook login`
pub async fn run(ctx: &Context, credentials: &Credentials) -> AppResult<CommandOutput> {
    let user = require_login(ctx, credentials).await?;

    let role = match user.role {
        Role::Admin => "admin",
        Role::User => "user",
    };
    let lines = vec![format!("Welcome, {} ({})", user.username, role)];

    CommandOutput::new(lines, &user)
}
