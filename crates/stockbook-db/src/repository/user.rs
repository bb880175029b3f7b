//! # User Repository
//!
//! Operator lookups for the login gate. Passwords are compared as stored
//! (clear text).

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use stockbook_core::User;

/// Repository for shop operators.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Returns the operator whose username and password both match.
    ///
    /// Callers trim and require both values first (see
    /// `stockbook_core::validation::validate_credentials`).
    pub async fn authenticate(&self, username: &str, password: &str) -> DbResult<Option<User>> {
        debug!(username = %username, "Checking credentials");

        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password, role FROM users WHERE username = ?1 AND password = ?2",
        )
        .bind(username)
        .bind(password)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets an operator by username.
    pub async fn find_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password, role FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
