//! # Report Engine
//!
//! Read-only aggregation over the ledger.
//!
//! ## Consistency
//! Each report runs its detail query and its summary query inside one read
//! transaction, so rows and totals always describe the same snapshot.
//!
//! ## Empty Results
//! ```text
//! no tables at all        ──► empty report
//! tables but no rows      ──► empty report
//! rows but none in range  ──► empty report
//! from > to               ──► empty report (BETWEEN matches nothing)
//! ```
//! None of these are errors.

use std::collections::HashSet;

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::DbResult;
use crate::pool::Database;
use crate::transaction::{self, Scope};
use stockbook_core::{
    DateRange, InventoryRow, InventorySummary, LedgerTotals, Money, PurchaseReport,
    PurchaseReportRow, Report, ReportKind, ReportRequest, SalesReport, SalesReportRow,
    StockReport, StockReportRow, StockTotals, SummaryReport, TopProductRow, TOP_PRODUCTS_LIMIT,
};

/// Tables the reports read from.
#[derive(Debug, Default)]
struct Schema {
    tables: HashSet<String>,
}

impl Schema {
    async fn inspect(conn: &mut SqliteConnection) -> DbResult<Self> {
        let tables = sqlx::query_scalar::<_, String>(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name IN ('products', 'purchases', 'sales')",
        )
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .collect();

        Ok(Schema { tables })
    }

    fn has(&self, table: &str) -> bool {
        self.tables.contains(table)
    }

    fn has_sales(&self) -> bool {
        self.has("sales") && self.has("products")
    }

    fn has_purchases(&self) -> bool {
        self.has("purchases") && self.has("products")
    }
}

/// Builds the four reports and the inventory view.
///
/// ## Usage
/// ```rust,ignore
/// let engine = db.reports();
/// let report = engine
///     .generate(ReportRequest { kind: ReportKind::Summary, range })
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct ReportEngine {
    db: Database,
}

impl ReportEngine {
    pub fn new(db: Database) -> Self {
        ReportEngine { db }
    }

    /// Dispatches a report request.
    pub async fn generate(&self, request: ReportRequest) -> DbResult<Report> {
        debug!(kind = ?request.kind, range = %request.range, "Generating report");

        let report = match request.kind {
            ReportKind::Sales => Report::Sales(self.sales(request.range).await?),
            ReportKind::Purchases => Report::Purchases(self.purchases(request.range).await?),
            ReportKind::Stock => Report::Stock(self.stock().await?),
            ReportKind::Summary => Report::Summary(self.summary(request.range).await?),
        };

        debug!(rows = report.row_count(), "Report generated");
        Ok(report)
    }

    /// Sales in range, newest first, with count / total / average.
    pub async fn sales(&self, range: DateRange) -> DbResult<SalesReport> {
        let mut tx = transaction::begin(self.db.pool(), Scope::Read).await?;
        let result = Self::read_sales(&mut tx, range).await;
        transaction::finish(tx, result).await
    }

    async fn read_sales(conn: &mut SqliteConnection, range: DateRange) -> DbResult<SalesReport> {
        if !Schema::inspect(conn).await?.has_sales() {
            return Ok(SalesReport::empty(range));
        }

        let rows = sqlx::query_as::<_, SalesReportRow>(
            r#"
            SELECT s.sale_date, p.name AS product_name, s.customer_name, s.quantity,
                   s.unit_price, s.total_amount, s.payment_type
            FROM sales s
            JOIN products p ON p.id = s.product_id
            WHERE s.sale_date BETWEEN ?1 AND ?2
            ORDER BY s.sale_date DESC, s.rowid DESC
            "#,
        )
        .bind(range.from)
        .bind(range.to)
        .fetch_all(&mut *conn)
        .await?;

        let summary = Self::sales_totals(conn, range).await?;

        Ok(SalesReport {
            range,
            rows,
            summary,
        })
    }

    async fn sales_totals(conn: &mut SqliteConnection, range: DateRange) -> DbResult<LedgerTotals> {
        let (count, total) = sqlx::query_as::<_, (i64, Money)>(
            r#"
            SELECT COUNT(*), COALESCE(SUM(total_amount), 0)
            FROM sales
            WHERE sale_date BETWEEN ?1 AND ?2
            "#,
        )
        .bind(range.from)
        .bind(range.to)
        .fetch_one(&mut *conn)
        .await?;

        Ok(LedgerTotals::from_totals(count, total))
    }

    /// Purchases in range, newest first, with count / total / average.
    pub async fn purchases(&self, range: DateRange) -> DbResult<PurchaseReport> {
        let mut tx = transaction::begin(self.db.pool(), Scope::Read).await?;
        let result = Self::read_purchases(&mut tx, range).await;
        transaction::finish(tx, result).await
    }

    async fn read_purchases(
        conn: &mut SqliteConnection,
        range: DateRange,
    ) -> DbResult<PurchaseReport> {
        if !Schema::inspect(conn).await?.has_purchases() {
            return Ok(PurchaseReport::empty(range));
        }

        let rows = sqlx::query_as::<_, PurchaseReportRow>(
            r#"
            SELECT pu.purchase_date, p.name AS product_name, pu.supplier, pu.quantity,
                   pu.unit_cost, pu.total_cost, pu.payment_type
            FROM purchases pu
            JOIN products p ON p.id = pu.product_id
            WHERE pu.purchase_date BETWEEN ?1 AND ?2
            ORDER BY pu.purchase_date DESC, pu.rowid DESC
            "#,
        )
        .bind(range.from)
        .bind(range.to)
        .fetch_all(&mut *conn)
        .await?;

        let summary = Self::purchase_totals(conn, range).await?;

        Ok(PurchaseReport {
            range,
            rows,
            summary,
        })
    }

    async fn purchase_totals(
        conn: &mut SqliteConnection,
        range: DateRange,
    ) -> DbResult<LedgerTotals> {
        let (count, total) = sqlx::query_as::<_, (i64, Money)>(
            r#"
            SELECT COUNT(*), COALESCE(SUM(total_cost), 0)
            FROM purchases
            WHERE purchase_date BETWEEN ?1 AND ?2
            "#,
        )
        .bind(range.from)
        .bind(range.to)
        .fetch_one(&mut *conn)
        .await?;

        Ok(LedgerTotals::from_totals(count, total))
    }

    /// Every product, lowest stock first. Not date filtered.
    pub async fn stock(&self) -> DbResult<StockReport> {
        let mut tx = transaction::begin(self.db.pool(), Scope::Read).await?;
        let result = Self::read_stock(&mut tx).await;
        transaction::finish(tx, result).await
    }

    async fn read_stock(conn: &mut SqliteConnection) -> DbResult<StockReport> {
        if !Schema::inspect(conn).await?.has("products") {
            return Ok(StockReport::default());
        }

        let rows = sqlx::query_as::<_, StockReportRow>(
            r#"
            SELECT name, stock_quantity, unit_price, stock_quantity * unit_price AS stock_value
            FROM products
            ORDER BY stock_quantity ASC, name ASC
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        let summary = Self::stock_totals(conn).await?;

        Ok(StockReport { rows, summary })
    }

    async fn stock_totals(conn: &mut SqliteConnection) -> DbResult<StockTotals> {
        let (product_count, total_stock_units, total_stock_value) =
            sqlx::query_as::<_, (i64, i64, Money)>(
                r#"
                SELECT COUNT(*),
                       COALESCE(SUM(stock_quantity), 0),
                       COALESCE(SUM(stock_quantity * unit_price), 0)
                FROM products
                "#,
            )
            .fetch_one(&mut *conn)
            .await?;

        Ok(StockTotals {
            product_count,
            total_stock_units,
            total_stock_value,
        })
    }

    /// Business summary: sales and purchases in range, profit, margin, top
    /// sellers in range, and the current product count and stock units.
    pub async fn summary(&self, range: DateRange) -> DbResult<SummaryReport> {
        let mut tx = transaction::begin(self.db.pool(), Scope::Read).await?;
        let result = Self::read_summary(&mut tx, range).await;
        transaction::finish(tx, result).await
    }

    async fn read_summary(conn: &mut SqliteConnection, range: DateRange) -> DbResult<SummaryReport> {
        let schema = Schema::inspect(conn).await?;

        let sales = if schema.has("sales") {
            Self::sales_totals(conn, range).await?
        } else {
            LedgerTotals::default()
        };

        let purchases = if schema.has("purchases") {
            Self::purchase_totals(conn, range).await?
        } else {
            LedgerTotals::default()
        };

        let stock = if schema.has("products") {
            Self::stock_totals(conn).await?
        } else {
            StockTotals::default()
        };

        let top_products = if schema.has_sales() {
            Self::top_products(conn, range).await?
        } else {
            Vec::new()
        };

        Ok(SummaryReport::compose(
            range,
            sales,
            purchases,
            top_products,
            stock,
        ))
    }

    /// Best sellers by units. Ties: revenue descending, then name.
    async fn top_products(
        conn: &mut SqliteConnection,
        range: DateRange,
    ) -> DbResult<Vec<TopProductRow>> {
        let rows = sqlx::query_as::<_, TopProductRow>(
            r#"
            SELECT p.name AS product_name,
                   SUM(s.quantity) AS units_sold,
                   SUM(s.total_amount) AS revenue
            FROM sales s
            JOIN products p ON p.id = s.product_id
            WHERE s.sale_date BETWEEN ?1 AND ?2
            GROUP BY p.id, p.name
            ORDER BY units_sold DESC, revenue DESC, p.name ASC
            LIMIT ?3
            "#,
        )
        .bind(range.from)
        .bind(range.to)
        .bind(TOP_PRODUCTS_LIMIT as i64)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows)
    }

    /// Inventory screen: filtered rows plus their totals.
    pub async fn inventory(
        &self,
        query: &str,
        low_stock_threshold: i64,
    ) -> DbResult<(Vec<InventoryRow>, InventorySummary)> {
        let rows = self
            .db
            .products()
            .inventory(query, low_stock_threshold)
            .await?;
        let summary = InventorySummary::from_rows(&rows);
        Ok((rows, summary))
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
    use stockbook_core::{NewPurchase, NewSale, PaymentType, StockStatus};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    async fn buy(db: &Database, name: &str, qty: i64, cents: i64, on: u32) {
        db.ledger()
            .record_purchase(NewPurchase {
                product_name: name.to_string(),
                supplier: "ABC Distributors".to_string(),
                quantity: qty,
                unit_cost: Money::from_cents(cents),
                payment_type: PaymentType::Credit,
                purchase_date: day(on),
            })
            .await
            .unwrap();
    }

    async fn sell(db: &Database, name: &str, qty: i64, cents: i64, on: u32) {
        db.ledger()
            .record_sale(NewSale {
                product_name: name.to_string(),
                customer_name: "Walk-in".to_string(),
                quantity: qty,
                unit_price: Money::from_cents(cents),
                payment_type: PaymentType::Cash,
                sale_date: day(on),
            })
            .await
            .unwrap();
    }

    async fn stocked_db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        buy(&db, "Gold Flake", 100, 1050, 1).await;
        buy(&db, "Classic", 50, 800, 1).await;
        buy(&db, "Navy Cut", 5, 700, 3).await;
        sell(&db, "Gold Flake", 30, 1200, 2).await;
        sell(&db, "Classic", 10, 900, 2).await;
        sell(&db, "Classic", 20, 900, 4).await;
        db
    }

    #[tokio::test]
    async fn test_sales_report_rows_and_totals() {
        let db = stocked_db().await;

        let report = db.reports().sales(DateRange::new(day(1), day(31))).await.unwrap();

        assert_eq!(report.rows.len(), 3);
        // Newest date first, same-day entries newest first
        assert_eq!(report.rows[0].sale_date, day(4));
        assert_eq!(report.rows[1].product_name, "Classic");
        assert_eq!(report.rows[2].product_name, "Gold Flake");
        assert_eq!(report.summary.count, 3);
        assert_eq!(report.summary.total.cents(), 36_000 + 9_000 + 18_000);
        assert_eq!(report.summary.average.cents(), 21_000);
    }

    #[tokio::test]
    async fn test_purchase_report_range_is_inclusive() {
        let db = stocked_db().await;

        let report = db.reports().purchases(DateRange::new(day(1), day(1))).await.unwrap();
        assert_eq!(report.summary.count, 2);
        assert_eq!(report.summary.total.cents(), 105_000 + 40_000);
        assert!(report.rows.iter().all(|r| r.supplier == "ABC Distributors"));

        let report = db.reports().purchases(DateRange::new(day(3), day(3))).await.unwrap();
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].product_name, "Navy Cut");
    }

    #[tokio::test]
    async fn test_reversed_range_is_empty_not_error() {
        let db = stocked_db().await;
        let reversed = DateRange::new(day(31), day(1));

        let sales = db.reports().sales(reversed).await.unwrap();
        assert!(sales.rows.is_empty());
        assert_eq!(sales.summary, LedgerTotals::default());

        let purchases = db.reports().purchases(reversed).await.unwrap();
        assert!(purchases.rows.is_empty());
        assert_eq!(purchases.summary.count, 0);
    }

    #[tokio::test]
    async fn test_stock_report_orders_low_stock_first() {
        let db = stocked_db().await;

        let report = db.reports().stock().await.unwrap();
        let names: Vec<_> = report.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Navy Cut", "Classic", "Gold Flake"]);

        assert_eq!(report.rows[2].stock_value.cents(), 70 * 1050);
        assert_eq!(report.summary.product_count, 3);
        assert_eq!(report.summary.total_stock_units, 5 + 20 + 70);
        assert_eq!(
            report.summary.total_stock_value.cents(),
            5 * 700 + 20 * 800 + 70 * 1050
        );
    }

    #[tokio::test]
    async fn test_summary_top_products_tie_break() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        for name in ["Alpha", "Bravo", "Charlie"] {
            buy(&db, name, 100, 500, 1).await;
        }
        sell(&db, "Charlie", 10, 600, 2).await;
        sell(&db, "Bravo", 10, 700, 2).await;
        sell(&db, "Alpha", 10, 600, 2).await;

        let report = db.reports().summary(DateRange::new(day(1), day(2))).await.unwrap();
        let names: Vec<_> = report
            .top_products
            .iter()
            .map(|t| t.product_name.as_str())
            .collect();
        // Equal units: higher revenue first, then by name
        assert_eq!(names, vec!["Bravo", "Alpha", "Charlie"]);
    }

    #[tokio::test]
    async fn test_summary_limits_top_products() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        for (i, name) in ["A", "B", "C", "D", "E", "F", "G"].iter().enumerate() {
            buy(&db, name, 100, 500, 1).await;
            sell(&db, name, (i + 1) as i64, 600, 2).await;
        }

        let report = db.reports().summary(DateRange::new(day(1), day(2))).await.unwrap();
        assert_eq!(report.top_products.len(), TOP_PRODUCTS_LIMIT);
        assert_eq!(report.top_products[0].product_name, "G");
        assert_eq!(report.top_products[0].units_sold, 7);
    }

    #[tokio::test]
    async fn test_summary_inventory_figures_ignore_range() {
        let db = stocked_db().await;

        let report = db.reports().summary(DateRange::new(day(20), day(21))).await.unwrap();
        assert_eq!(report.sales_count, 0);
        assert_eq!(report.purchase_count, 0);
        assert_eq!(report.profit_margin_bps, 0);
        assert!(report.top_products.is_empty());
        assert_eq!(report.product_count, 3);
        assert_eq!(report.total_stock_units, 95);
    }

    #[tokio::test]
    async fn test_reports_on_absent_schema_are_empty() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();
        let engine = db.reports();
        let range = DateRange::new(day(1), day(2));

        assert!(engine.sales(range).await.unwrap().rows.is_empty());
        assert!(engine.purchases(range).await.unwrap().rows.is_empty());
        assert_eq!(engine.stock().await.unwrap(), StockReport::default());
        assert_eq!(
            engine.summary(range).await.unwrap(),
            SummaryReport::empty(range)
        );
    }

    #[tokio::test]
    async fn test_generate_dispatches_by_kind() {
        let db = stocked_db().await;
        let range = DateRange::new(day(1), day(4));

        for kind in [
            ReportKind::Sales,
            ReportKind::Purchases,
            ReportKind::Stock,
            ReportKind::Summary,
        ] {
            let report = db.reports().generate(ReportRequest { kind, range }).await.unwrap();
            assert_eq!(report.kind(), kind);
        }
    }

    #[tokio::test]
    async fn test_inventory_view() {
        let db = stocked_db().await;

        let (rows, summary) = db.reports().inventory("", 10).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(summary.low_stock, 1);
        assert_eq!(summary.in_stock, 2);

        let (rows, _) = db.reports().inventory("NAVY", 10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, StockStatus::LowStock);
    }
}
