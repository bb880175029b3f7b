//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Lookup by natural key (exact, case-sensitive name)
//! - Creation with the UNIQUE name constraint as the race guard
//! - Delta stock adjustment (the stock ledger's write primitive)
//! - Inventory listing with a case-insensitive substring filter
//!
//! ## Connection-Scoped Variants
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  find_by_name(&self, ..)       acquires its own pooled connection      │
//! │  find_by_name_in(conn, ..)     runs on a caller's connection, so the   │
//! │                                stock ledger can compose several calls  │
//! │                                inside one transaction                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockbook_core::{InventoryRow, Money, Product, StockStatus};

const PRODUCT_COLUMNS: &str = "id, name, category, stock_quantity, unit_price, created_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let product = repo.find_by_name("Gold Flake").await?;
/// let names = repo.names().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its exact name.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - No product with that name (case matters)
    pub async fn find_by_name(&self, name: &str) -> DbResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        Self::find_by_name_in(&mut conn, name).await
    }

    pub(crate) async fn find_by_name_in(
        conn: &mut SqliteConnection,
        name: &str,
    ) -> DbResult<Option<Product>> {
        debug!(name = %name, "Looking up product by name");

        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE name = ?1"
        ))
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(product)
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(())` - Inserted
    /// * `Err(DbError::UniqueViolation)` - The name already exists
    pub async fn create(&self, product: &Product) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        Self::create_in(&mut conn, product).await
    }

    pub(crate) async fn create_in(conn: &mut SqliteConnection, product: &Product) -> DbResult<()> {
        debug!(name = %product.name, id = %product.id, "Creating product");

        sqlx::query(
            r#"
            INSERT INTO products (id, name, category, stock_quantity, unit_price, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.stock_quantity)
        .bind(product.unit_price)
        .bind(product.created_at)
        .execute(&mut *conn)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("product name", &product.name),
            other => other,
        })?;

        Ok(())
    }

    /// Applies a stock delta and, when given, a new reference price.
    ///
    /// ## Delta Update
    /// ```text
    /// UPDATE products SET stock_quantity = stock_quantity + delta
    /// ```
    /// The delta form never overwrites a concurrent writer's change with a
    /// stale absolute value.
    ///
    /// ## Returns
    /// The product as it stands after the update.
    pub(crate) async fn adjust_stock_in(
        conn: &mut SqliteConnection,
        id: &str,
        delta: i64,
        new_unit_price: Option<Money>,
    ) -> DbResult<Product> {
        debug!(id = %id, delta = %delta, "Adjusting stock");

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET stock_quantity = stock_quantity + ?2,
                unit_price = COALESCE(?3, unit_price)
            WHERE id = ?1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(delta)
        .bind(new_unit_price)
        .fetch_optional(&mut *conn)
        .await?;

        product.ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Lists every product, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Product names, sorted. Feeds the sale form's product picker.
    pub async fn names(&self) -> DbResult<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>("SELECT name FROM products ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(names)
    }

    /// Products whose name contains `query`, ignoring ASCII case.
    ///
    /// An empty query lists everything.
    pub async fn search(&self, query: &str) -> DbResult<Vec<Product>> {
        let query = query.trim();

        debug!(query = %query, "Searching products");

        if query.is_empty() {
            return self.list().await;
        }

        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE instr(lower(name), lower(?1)) > 0
            ORDER BY name
            "#
        ))
        .bind(query)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Inventory screen rows: the search result with stock value and status.
    pub async fn inventory(
        &self,
        query: &str,
        low_stock_threshold: i64,
    ) -> DbResult<Vec<InventoryRow>> {
        let rows = self
            .search(query)
            .await?
            .into_iter()
            .map(|p| InventoryRow {
                stock_value: p.stock_value(),
                status: StockStatus::classify(p.stock_quantity, low_stock_threshold),
                name: p.name,
                category: p.category,
                stock_quantity: p.stock_quantity,
                unit_price: p.unit_price,
            })
            .collect();

        Ok(rows)
    }

    /// Number of products.
    pub async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::Utc;
    use stockbook_core::new_id;

    fn product(name: &str, stock: i64, cents: i64) -> Product {
        Product {
            id: new_id(),
            name: name.to_string(),
            category: Some("Cigarettes".to_string()),
            stock_quantity: stock,
            unit_price: Money::from_cents(cents),
            created_at: Utc::now(),
        }
    }

    async fn repo_with(products: &[Product]) -> (Database, ProductRepository) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();
        for p in products {
            repo.create(p).await.unwrap();
        }
        (db, repo)
    }

    #[tokio::test]
    async fn test_find_by_name_is_case_sensitive() {
        let (_db, repo) = repo_with(&[product("Gold Flake", 10, 1050)]).await;

        let found = repo.find_by_name("Gold Flake").await.unwrap().unwrap();
        assert_eq!(found.stock_quantity, 10);
        assert_eq!(found.unit_price.cents(), 1050);
        assert_eq!(found.category.as_deref(), Some("Cigarettes"));

        assert!(repo.find_by_name("gold flake").await.unwrap().is_none());
        assert!(repo.get_by_id(&found.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_duplicate_name_is_unique_violation() {
        let (_db, repo) = repo_with(&[product("Gold Flake", 0, 1050)]).await;

        let err = repo.create(&product("Gold Flake", 0, 900)).await.unwrap_err();
        assert!(err.is_unique_violation());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_adjust_stock_delta_and_price() {
        let p = product("Classic", 5, 800);
        let (db, _repo) = repo_with(&[p.clone()]).await;
        let mut conn = db.pool().acquire().await.unwrap();

        let after = ProductRepository::adjust_stock_in(&mut conn, &p.id, 10, Some(Money::from_cents(850)))
            .await
            .unwrap();
        assert_eq!(after.stock_quantity, 15);
        assert_eq!(after.unit_price.cents(), 850);

        let after = ProductRepository::adjust_stock_in(&mut conn, &p.id, -3, None)
            .await
            .unwrap();
        assert_eq!(after.stock_quantity, 12);
        assert_eq!(after.unit_price.cents(), 850);

        let missing = ProductRepository::adjust_stock_in(&mut conn, "nope", 1, None).await;
        assert!(matches!(missing, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_search_and_names() {
        let (_db, repo) = repo_with(&[
            product("Marlboro Red", 20, 1500),
            product("Gold Flake Kings", 0, 1100),
            product("Gold Flake", 5, 1050),
        ])
        .await;

        let names = repo.names().await.unwrap();
        assert_eq!(names, vec!["Gold Flake", "Gold Flake Kings", "Marlboro Red"]);

        let hits = repo.search("  flake ").await.unwrap();
        let hit_names: Vec<_> = hits.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(hit_names, vec!["Gold Flake", "Gold Flake Kings"]);

        assert_eq!(repo.search("").await.unwrap().len(), 3);
        assert!(repo.search("cigar").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_inventory_rows() {
        let (_db, repo) = repo_with(&[
            product("Gold Flake", 70, 1050),
            product("Classic", 3, 800),
            product("Navy Cut", 0, 700),
        ])
        .await;

        let rows = repo.inventory("", 10).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].name, "Classic");
        assert_eq!(rows[0].status, StockStatus::LowStock);
        assert_eq!(rows[1].stock_value.cents(), 73_500);
        assert_eq!(rows[1].status, StockStatus::InStock);
        assert_eq!(rows[2].status, StockStatus::OutOfStock);
    }
}
