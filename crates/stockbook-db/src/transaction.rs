//! # Transaction Scopes
//!
//! Every logical operation (one purchase, one sale, one report) runs on its
//! own pooled connection inside its own transaction:
//!
//! ```text
//! pool ──► BEGIN IMMEDIATE (write) / BEGIN (read)
//!                   │
//!                   ▼
//!             operation body
//!                   │
//!          ┌────────┼─────────────────┐
//!          ▼        ▼                 ▼
//!   Ok → COMMIT  Err → ROLLBACK   future dropped → ROLLBACK
//!          │        │                 │
//!          └────────┴──► connection returned to pool
//! ```
//!
//! `BEGIN IMMEDIATE` takes SQLite's write lock before the first read, so a
//! check made inside the transaction still holds when the write happens.
//! The scope is a `sqlx::Transaction`, so a caller that is cancelled between
//! begin and finish still releases the lock and the connection.

use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::warn;

use crate::error::{DbError, DbResult};

/// Kind of transaction to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    /// Reads only; snapshot taken at the first read.
    Read,
    /// Reads then writes; write lock taken up front.
    Write,
}

impl Scope {
    fn statement(self) -> &'static str {
        match self {
            Scope::Read => "BEGIN",
            Scope::Write => "BEGIN IMMEDIATE",
        }
    }
}

/// Takes a connection from `pool` and opens a transaction on it.
///
/// Dropping the returned transaction without [`finish`] rolls it back.
pub(crate) async fn begin(pool: &SqlitePool, scope: Scope) -> DbResult<Transaction<'static, Sqlite>> {
    let tx = pool.begin_with(scope.statement()).await?;
    Ok(tx)
}

/// Commits on success and rolls back on failure, handing `result` back.
///
/// A failed COMMIT turns a successful body into a storage error.
pub(crate) async fn finish<T, E>(tx: Transaction<'_, Sqlite>, result: Result<T, E>) -> Result<T, E>
where
    E: From<DbError>,
{
    match result {
        Ok(value) => {
            tx.commit()
                .await
                .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
            Ok(value)
        }
        Err(err) => {
            if let Err(e) = tx.rollback().await {
                warn!(error = %e, "Rollback failed");
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use sqlx::SqliteConnection;

    async fn product_count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    async fn insert_product(conn: &mut SqliteConnection, name: &str) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO products (id, name, stock_quantity, unit_price, created_at) \
             VALUES (?1, ?2, 0, 0, '2024-01-01T00:00:00Z')",
        )
        .bind(stockbook_core::new_id())
        .bind(name)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_commit_on_success() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut tx = begin(db.pool(), Scope::Write).await.unwrap();
        let result = insert_product(&mut tx, "Gold Flake").await;
        finish(tx, result).await.unwrap();

        assert_eq!(product_count(db.pool()).await, 1);
    }

    #[tokio::test]
    async fn test_rollback_on_failure() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut tx = begin(db.pool(), Scope::Write).await.unwrap();
        let result = async {
            insert_product(&mut tx, "Gold Flake").await?;
            // Second insert violates UNIQUE(name)
            insert_product(&mut tx, "Gold Flake").await
        }
        .await;
        let result = finish(tx, result).await;

        assert!(matches!(result, Err(DbError::UniqueViolation { .. })));
        assert_eq!(product_count(db.pool()).await, 0);
    }

    #[tokio::test]
    async fn test_dropped_scope_rolls_back_and_frees_connection() {
        // Single-connection pool: the next scope reuses the same connection
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        {
            let mut tx = begin(db.pool(), Scope::Write).await.unwrap();
            insert_product(&mut tx, "Gold Flake").await.unwrap();
        }

        let mut tx = begin(db.pool(), Scope::Write).await.unwrap();
        let result = insert_product(&mut tx, "Navy Cut").await;
        finish(tx, result).await.unwrap();

        let names: Vec<String> = sqlx::query_scalar("SELECT name FROM products")
            .fetch_all(db.pool())
            .await
            .unwrap();
        assert_eq!(names, vec!["Navy Cut"]);
    }
}
