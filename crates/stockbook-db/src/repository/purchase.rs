//! # Purchase Repository
//!
//! Append-only storage of purchase ledger entries. Rows are written by the
//! stock ledger inside its transaction and never updated or deleted.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use stockbook_core::Purchase;

const PURCHASE_COLUMNS: &str = "id, product_id, supplier, quantity, unit_cost, total_cost, \
                                payment_type, purchase_date, recorded_at";

/// Repository for purchase ledger entries.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    pool: SqlitePool,
}

impl PurchaseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseRepository { pool }
    }

    pub(crate) async fn insert_in(conn: &mut SqliteConnection, purchase: &Purchase) -> DbResult<()> {
        debug!(
            id = %purchase.id,
            product_id = %purchase.product_id,
            quantity = purchase.quantity,
            "Inserting purchase"
        );

        sqlx::query(&format!(
            "INSERT INTO purchases ({PURCHASE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
        ))
        .bind(&purchase.id)
        .bind(&purchase.product_id)
        .bind(&purchase.supplier)
        .bind(purchase.quantity)
        .bind(purchase.unit_cost)
        .bind(purchase.total_cost)
        .bind(purchase.payment_type)
        .bind(purchase.purchase_date)
        .bind(purchase.recorded_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Gets a purchase by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Purchase>> {
        let purchase = sqlx::query_as::<_, Purchase>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM purchases WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(purchase)
    }

    /// Purchase history of one product, newest first.
    pub async fn list_for_product(&self, product_id: &str) -> DbResult<Vec<Purchase>> {
        let purchases = sqlx::query_as::<_, Purchase>(&format!(
            r#"
            SELECT {PURCHASE_COLUMNS}
            FROM purchases
            WHERE product_id = ?1
            ORDER BY purchase_date DESC, rowid DESC
            "#
        ))
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(purchases)
    }

    /// Number of purchase entries.
    pub async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM purchases")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
