//! # Sale Repository
//!
//! Append-only storage of sale ledger entries.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Sale form ──► StockLedger::record_sale                                │
//! │                   │                                                     │
//! │                   ├── stock check (inside BEGIN IMMEDIATE)             │
//! │                   ├── SaleRepository::insert_in   ← THIS MODULE       │
//! │                   └── ProductRepository::adjust_stock_in(-qty)         │
//! │                                                                         │
//! │  Rows are never updated or deleted afterwards.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use stockbook_core::Sale;

const SALE_COLUMNS: &str = "id, product_id, customer_name, quantity, unit_price, total_amount, \
                            payment_type, sale_date, recorded_at";

/// Repository for sale ledger entries.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    pub(crate) async fn insert_in(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
        debug!(
            id = %sale.id,
            product_id = %sale.product_id,
            quantity = sale.quantity,
            "Inserting sale"
        );

        sqlx::query(&format!(
            "INSERT INTO sales ({SALE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
        ))
        .bind(&sale.id)
        .bind(&sale.product_id)
        .bind(&sale.customer_name)
        .bind(sale.quantity)
        .bind(sale.unit_price)
        .bind(sale.total_amount)
        .bind(sale.payment_type)
        .bind(sale.sale_date)
        .bind(sale.recorded_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Gets a sale by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Sales history of one product, newest first.
    pub async fn list_for_product(&self, product_id: &str) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            r#"
            SELECT {SALE_COLUMNS}
            FROM sales
            WHERE product_id = ?1
            ORDER BY sale_date DESC, rowid DESC
            "#
        ))
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Number of sale entries.
    pub async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::{NaiveDate, Utc};
    use stockbook_core::{new_id, Money, NewSale, PaymentType, Product};

    #[tokio::test]
    async fn test_insert_and_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = Product {
            id: new_id(),
            name: "Gold Flake".to_string(),
            category: None,
            stock_quantity: 100,
            unit_price: Money::from_cents(1050),
            created_at: Utc::now(),
        };
        db.products().create(&product).await.unwrap();

        let sale = NewSale {
            product_name: "Gold Flake".to_string(),
            customer_name: "John".to_string(),
            quantity: 30,
            unit_price: Money::from_cents(1200),
            payment_type: PaymentType::Cheque,
            sale_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        }
        .into_sale(&product.id, Utc::now());

        let mut conn = db.pool().acquire().await.unwrap();
        SaleRepository::insert_in(&mut conn, &sale).await.unwrap();
        drop(conn);

        let repo = db.sales();
        let stored = repo.get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(stored.customer_name, "John");
        assert_eq!(stored.payment_type, PaymentType::Cheque);
        assert_eq!(stored.sale_date, sale.sale_date);
        assert_eq!(stored.total_amount.cents(), 36_000);
        assert_eq!(repo.list_for_product(&product.id).await.unwrap().len(), 1);
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
