//! # Stock Ledger
//!
//! The only path by which `products.stock_quantity` changes.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_purchase(entry)                                                 │
//! │    validate ──► BEGIN IMMEDIATE                                        │
//! │                   ├── find_by_name ── none ──► create (stock 0)        │
//! │                   │                      └── UNIQUE hit ──► re-fetch   │
//! │                   ├── insert purchase (total = qty × unit cost)        │
//! │                   └── stock += qty, unit_price = unit cost             │
//! │                 COMMIT                                                  │
//! │                                                                         │
//! │  record_sale(entry)                                                     │
//! │    validate ──► BEGIN IMMEDIATE                                        │
//! │                   ├── find_by_name ── none ──► ProductNotFound         │
//! │                   ├── stock < qty ──────────► InsufficientStock        │
//! │                   ├── insert sale (total = qty × unit price)           │
//! │                   └── stock -= qty  (unit_price untouched)             │
//! │                 COMMIT                                                  │
//! │                                                                         │
//! │  Any failure ──► ROLLBACK, nothing written                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! The write lock is taken by `BEGIN IMMEDIATE` before the stock check, so
//! two sales racing for the last units are serialized: the second one sees
//! the first one's decrement and fails with `InsufficientStock`.

use chrono::Utc;
use serde::Serialize;
use sqlx::SqliteConnection;
use tracing::{debug, info, warn};

use crate::error::{DbError, LedgerError, LedgerResult};
use crate::pool::Database;
use crate::repository::product::ProductRepository;
use crate::repository::purchase::PurchaseRepository;
use crate::repository::sale::SaleRepository;
use crate::transaction::{self, Scope};
use stockbook_core::{new_id, Money, NewPurchase, NewSale, Product, Purchase, Sale};

/// Result of a recorded purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseReceipt {
    pub purchase: Purchase,
    /// The product after the purchase was applied.
    pub product: Product,
    /// True when this purchase introduced the product.
    pub created_product: bool,
}

/// Result of a recorded sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleReceipt {
    pub sale: Sale,
    /// The product after the sale was applied.
    pub product: Product,
}

/// Transactional purchase/sale recording.
#[derive(Debug, Clone)]
pub struct StockLedger {
    db: Database,
}

impl StockLedger {
    pub fn new(db: Database) -> Self {
        StockLedger { db }
    }

    /// Records a stock receipt.
    ///
    /// Creates the product on first sight of its name, adds the quantity to
    /// stock and makes the unit cost the product's new reference price.
    ///
    /// ## Errors
    /// - `Validation` - bad input, nothing written
    /// - `Storage` - the store failed, the whole unit rolled back
    pub async fn record_purchase(&self, entry: NewPurchase) -> LedgerResult<PurchaseReceipt> {
        let entry = entry.validate()?;

        let mut tx = transaction::begin(self.db.pool(), Scope::Write).await?;
        let result = Self::apply_purchase(&mut tx, entry).await;
        let receipt = transaction::finish(tx, result).await?;

        info!(
            product = %receipt.product.name,
            quantity = receipt.purchase.quantity,
            total_cost = %receipt.purchase.total_cost,
            stock = receipt.product.stock_quantity,
            "Purchase recorded"
        );

        Ok(receipt)
    }

    async fn apply_purchase(
        conn: &mut SqliteConnection,
        entry: NewPurchase,
    ) -> LedgerResult<PurchaseReceipt> {
        let (product, created_product) = Self::resolve_or_create(conn, &entry.product_name).await?;

        let quantity = entry.quantity;
        let unit_cost = entry.unit_cost;
        let purchase = entry.into_purchase(&product.id, Utc::now());
        PurchaseRepository::insert_in(conn, &purchase).await?;

        let product =
            ProductRepository::adjust_stock_in(conn, &product.id, quantity, Some(unit_cost)).await?;

        Ok(PurchaseReceipt {
            purchase,
            product,
            created_product,
        })
    }

    /// Finds the product by exact name, creating it with zero stock when
    /// absent. A concurrent creator winning the UNIQUE race is not an error:
    /// its row is re-read and used.
    async fn resolve_or_create(
        conn: &mut SqliteConnection,
        name: &str,
    ) -> LedgerResult<(Product, bool)> {
        if let Some(product) = ProductRepository::find_by_name_in(conn, name).await? {
            return Ok((product, false));
        }

        let product = Product {
            id: new_id(),
            name: name.to_string(),
            category: None,
            stock_quantity: 0,
            unit_price: Money::zero(),
            created_at: Utc::now(),
        };

        match ProductRepository::create_in(conn, &product).await {
            Ok(()) => {
                debug!(name = %name, "New product created by purchase");
                Ok((product, true))
            }
            Err(err) if err.is_unique_violation() => {
                debug!(name = %name, "Product created concurrently, re-reading");
                let existing = ProductRepository::find_by_name_in(conn, name)
                    .await?
                    .ok_or_else(|| DbError::not_found("Product", name))?;
                Ok((existing, false))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Records a sale.
    ///
    /// ## Errors
    /// - `Validation` - bad input, nothing written
    /// - `ProductNotFound` - the name was never purchased
    /// - `InsufficientStock` - fewer units on hand than requested; stock is
    ///   left unchanged and the error carries the available quantity
    /// - `Storage` - the store failed, the whole unit rolled back
    pub async fn record_sale(&self, entry: NewSale) -> LedgerResult<SaleReceipt> {
        let entry = entry.validate()?;

        let mut tx = transaction::begin(self.db.pool(), Scope::Write).await?;
        let result = Self::apply_sale(&mut tx, entry).await;
        let receipt = transaction::finish(tx, result).await?;

        info!(
            product = %receipt.product.name,
            quantity = receipt.sale.quantity,
            total_amount = %receipt.sale.total_amount,
            stock = receipt.product.stock_quantity,
            "Sale recorded"
        );

        Ok(receipt)
    }

    async fn apply_sale(conn: &mut SqliteConnection, entry: NewSale) -> LedgerResult<SaleReceipt> {
        let product = ProductRepository::find_by_name_in(conn, &entry.product_name)
            .await?
            .ok_or_else(|| LedgerError::ProductNotFound {
                name: entry.product_name.clone(),
            })?;

        if !product.can_fulfil(entry.quantity) {
            warn!(
                product = %product.name,
                available = product.stock_quantity,
                requested = entry.quantity,
                "Sale rejected: insufficient stock"
            );
            return Err(LedgerError::InsufficientStock {
                product: product.name,
                available: product.stock_quantity,
                requested: entry.quantity,
            });
        }

        let quantity = entry.quantity;
        let sale = entry.into_sale(&product.id, Utc::now());
        SaleRepository::insert_in(conn, &sale).await?;

        let product = ProductRepository::adjust_stock_in(conn, &product.id, -quantity, None).await?;

        Ok(SaleReceipt { sale, product })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbConfig;
    use chrono::NaiveDate;
    use std::future::Future;
    use std::task::Poll;
    use std::time::Duration;
    use stockbook_core::{PaymentType, ValidationError};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn purchase(name: &str, quantity: i64, cents: i64) -> NewPurchase {
        NewPurchase {
            product_name: name.to_string(),
            supplier: "ABC Distributors".to_string(),
            quantity,
            unit_cost: Money::from_cents(cents),
            payment_type: PaymentType::Cash,
            purchase_date: day(1),
        }
    }

    fn sale(name: &str, quantity: i64, cents: i64) -> NewSale {
        NewSale {
            product_name: name.to_string(),
            customer_name: "John".to_string(),
            quantity,
            unit_price: Money::from_cents(cents),
            payment_type: PaymentType::Cash,
            sale_date: day(2),
        }
    }

    async fn ledger() -> (Database, StockLedger) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let ledger = db.ledger();
        (db, ledger)
    }

    #[tokio::test]
    async fn test_purchase_creates_product() {
        let (db, ledger) = ledger().await;

        let receipt = ledger
            .record_purchase(purchase("Gold Flake", 100, 1050))
            .await
            .unwrap();

        assert!(receipt.created_product);
        assert_eq!(receipt.product.stock_quantity, 100);
        assert_eq!(receipt.product.unit_price.cents(), 1050);
        assert_eq!(receipt.purchase.total_cost.cents(), 105_000);
        assert_eq!(db.products().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_repeat_purchase_adds_stock_and_takes_latest_cost() {
        let (db, ledger) = ledger().await;

        ledger.record_purchase(purchase("Gold Flake", 100, 1050)).await.unwrap();
        let receipt = ledger
            .record_purchase(purchase("Gold Flake", 50, 1100))
            .await
            .unwrap();

        assert!(!receipt.created_product);
        assert_eq!(receipt.product.stock_quantity, 150);
        assert_eq!(receipt.product.unit_price.cents(), 1100);
        assert_eq!(db.products().count().await.unwrap(), 1);
        assert_eq!(db.purchases().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_purchase_names_are_trimmed_and_case_sensitive() {
        let (db, ledger) = ledger().await;

        ledger.record_purchase(purchase(" Gold Flake ", 10, 1050)).await.unwrap();
        ledger.record_purchase(purchase("gold flake", 10, 1050)).await.unwrap();

        assert_eq!(
            db.products().names().await.unwrap(),
            vec!["Gold Flake", "gold flake"]
        );
    }

    #[tokio::test]
    async fn test_invalid_purchase_writes_nothing() {
        let (db, ledger) = ledger().await;

        let err = ledger
            .record_purchase(purchase("Gold Flake", 0, 1050))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Validation(ValidationError::MustBePositive { .. })
        ));

        let err = ledger
            .record_purchase(purchase("", 10, 1050))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));

        assert_eq!(db.products().count().await.unwrap(), 0);
        assert_eq!(db.purchases().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_oversized_amounts_are_rejected_before_writing() {
        let (db, ledger) = ledger().await;
        let huge: Money = "92233720368547758.07".parse().unwrap();

        let mut entry = purchase("Gold Flake", 2, 0);
        entry.unit_cost = huge;
        let err = ledger.record_purchase(entry).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Validation(ValidationError::AmountOutOfRange { .. })
        ));
        assert_eq!(db.products().count().await.unwrap(), 0);
        assert_eq!(db.purchases().count().await.unwrap(), 0);

        ledger.record_purchase(purchase("Gold Flake", 10, 1050)).await.unwrap();
        let mut entry = sale("Gold Flake", 2, 0);
        entry.unit_price = huge;
        let err = ledger.record_sale(entry).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Validation(ValidationError::AmountOutOfRange { .. })
        ));
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_sale_decrements_stock_only() {
        let (_db, ledger) = ledger().await;
        ledger.record_purchase(purchase("Gold Flake", 100, 1050)).await.unwrap();

        let receipt = ledger.record_sale(sale("Gold Flake", 30, 1200)).await.unwrap();

        assert_eq!(receipt.product.stock_quantity, 70);
        assert_eq!(receipt.product.unit_price.cents(), 1050);
        assert_eq!(receipt.sale.total_amount.cents(), 36_000);
    }

    #[tokio::test]
    async fn test_sale_of_whole_stock_is_allowed() {
        let (_db, ledger) = ledger().await;
        ledger.record_purchase(purchase("Classic", 5, 800)).await.unwrap();

        let receipt = ledger.record_sale(sale("Classic", 5, 900)).await.unwrap();
        assert_eq!(receipt.product.stock_quantity, 0);
    }

    #[tokio::test]
    async fn test_oversell_is_rejected_without_writes() {
        let (db, ledger) = ledger().await;
        ledger.record_purchase(purchase("Gold Flake", 20, 1050)).await.unwrap();

        let err = ledger
            .record_sale(sale("Gold Flake", 30, 1200))
            .await
            .unwrap_err();

        match err {
            LedgerError::InsufficientStock {
                product,
                available,
                requested,
            } => {
                assert_eq!(product, "Gold Flake");
                assert_eq!(available, 20);
                assert_eq!(requested, 30);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        let product = db.products().find_by_name("Gold Flake").await.unwrap().unwrap();
        assert_eq!(product.stock_quantity, 20);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_sale_of_unknown_product() {
        let (db, ledger) = ledger().await;

        let err = ledger.record_sale(sale("Classic", 1, 900)).await.unwrap_err();

        assert!(matches!(err, LedgerError::ProductNotFound { ref name } if name == "Classic"));
        assert_eq!(db.products().count().await.unwrap(), 0);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_pool_stays_usable_after_rollback() {
        let (_db, ledger) = ledger().await;
        ledger.record_purchase(purchase("Gold Flake", 5, 1050)).await.unwrap();

        // Single-connection pool: a leaked transaction would break the next call
        assert!(ledger.record_sale(sale("Gold Flake", 6, 1200)).await.is_err());
        assert!(ledger.record_sale(sale("Missing", 1, 1200)).await.is_err());

        let receipt = ledger.record_sale(sale("Gold Flake", 5, 1200)).await.unwrap();
        assert_eq!(receipt.product.stock_quantity, 0);
    }

    /// Polls `fut` up to `polls` times, giving the SQLite worker a moment
    /// between polls, then drops it wherever it stopped.
    async fn abandon_after<F: Future>(fut: F, polls: usize) {
        let mut fut = std::pin::pin!(fut);
        for _ in 0..polls {
            let done = std::future::poll_fn(|cx| Poll::Ready(fut.as_mut().poll(cx).is_ready())).await;
            if done {
                return;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    }

    #[tokio::test]
    async fn test_cancelled_calls_release_the_connection() {
        let (db, ledger) = ledger().await;
        ledger.record_purchase(purchase("Gold Flake", 100, 1050)).await.unwrap();

        // Single-connection pool: an abandoned open transaction would make
        // every later call fail with "cannot start a transaction within a transaction"
        for polls in 1..=12 {
            abandon_after(ledger.record_sale(sale("Gold Flake", 1, 1200)), polls).await;
            abandon_after(ledger.record_purchase(purchase("Navy Cut", 1, 900)), polls).await;

            ledger.record_purchase(purchase("Classic", 1, 800)).await.unwrap();
            let receipt = ledger.record_sale(sale("Classic", 1, 900)).await.unwrap();
            assert_eq!(receipt.product.stock_quantity, 0);
        }

        // Each abandoned sale either committed whole or left no trace
        let gold = db.products().find_by_name("Gold Flake").await.unwrap().unwrap();
        let gold_sales = db.sales().list_for_product(&gold.id).await.unwrap().len() as i64;
        assert_eq!(gold.stock_quantity, 100 - gold_sales);

        let navy_stock = db
            .products()
            .find_by_name("Navy Cut")
            .await
            .unwrap()
            .map_or(0, |p| p.stock_quantity);
        let navy_purchases = db.purchases().count().await.unwrap() as i64 - 1 - 12;
        assert_eq!(navy_stock, navy_purchases);
    }
}
