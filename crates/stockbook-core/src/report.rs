//! # Report Records
//!
//! Structured results of the report engine plus the pure arithmetic behind
//! their summaries (averages, profit, margin, inventory status counts).
//!
//! ## Report Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ReportRequest { kind, range: [from, to] }                              │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  Report::Sales      rows: SalesReportRow[]     summary: LedgerTotals   │
//! │  Report::Purchases  rows: PurchaseReportRow[]  summary: LedgerTotals   │
//! │  Report::Stock      rows: StockReportRow[]     summary: StockTotals    │
//! │  Report::Summary    top_products: TopProductRow[] + business figures   │
//! │                                                                         │
//! │  Export and text rendering are pure functions over these records      │
//! │  (see `render`); nothing is re-queried.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Empty Results
//! Every report has a well-defined empty value: zero counts, zero money,
//! no rows. A reversed range (`from > to`) is not an error; it simply
//! matches nothing.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{PaymentType, StockStatus};

// =============================================================================
// Requests
// =============================================================================

/// Inclusive calendar date range `[from, to]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DateRange {
    #[ts(as = "String")]
    pub from: NaiveDate,
    #[ts(as = "String")]
    pub to: NaiveDate,
}

impl DateRange {
    /// Creates a range. `from > to` is allowed and matches nothing.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// The `days` days leading up to and including `today`.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use stockbook_core::DateRange;
    ///
    /// let today = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    /// let range = DateRange::last_days(today, 30);
    /// assert_eq!(range.from.to_string(), "2024-01-01");
    /// assert_eq!(range.to, today);
    /// ```
    pub fn last_days(today: NaiveDate, days: i64) -> Self {
        Self {
            from: today - Duration::days(days),
            to: today,
        }
    }

    /// True when the range cannot match any date.
    #[inline]
    pub fn is_reversed(&self) -> bool {
        self.from > self.to
    }

    /// Checks whether `date` falls inside the range.
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.from, self.to)
    }
}

/// The four report kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Sales,
    Purchases,
    Stock,
    Summary,
}

impl ReportKind {
    /// Title used on screen and on exported documents.
    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Sales => "Sales Report",
            ReportKind::Purchases => "Purchase Report",
            ReportKind::Stock => "Stock Report",
            ReportKind::Summary => "Summary Report",
        }
    }

    /// Lower-case file-name stem ("sales_report").
    pub fn file_stem(&self) -> String {
        self.title().replace(' ', "_").to_lowercase()
    }
}

impl FromStr for ReportKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sales" | "sale" => Ok(ReportKind::Sales),
            "purchases" | "purchase" => Ok(ReportKind::Purchases),
            "stock" => Ok(ReportKind::Stock),
            "summary" | "business" => Ok(ReportKind::Summary),
            _ => Err(ValidationError::NotAllowed {
                field: "report type".to_string(),
                allowed: vec![
                    "sales".to_string(),
                    "purchases".to_string(),
                    "stock".to_string(),
                    "summary".to_string(),
                ],
            }),
        }
    }
}

/// What the presentation layer asks the report engine for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub kind: ReportKind,
    pub range: DateRange,
}

// =============================================================================
// Detail Rows
// =============================================================================

/// One sale as listed in the sales report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SalesReportRow {
    #[ts(as = "String")]
    pub sale_date: NaiveDate,
    pub product_name: String,
    pub customer_name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub total_amount: Money,
    pub payment_type: PaymentType,
}

/// One purchase as listed in the purchase report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PurchaseReportRow {
    #[ts(as = "String")]
    pub purchase_date: NaiveDate,
    pub product_name: String,
    pub supplier: String,
    pub quantity: i64,
    pub unit_cost: Money,
    pub total_cost: Money,
    pub payment_type: PaymentType,
}

/// One product as listed in the stock report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StockReportRow {
    pub name: String,
    pub stock_quantity: i64,
    pub unit_price: Money,
    pub stock_value: Money,
}

/// A best seller in the summary report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct TopProductRow {
    pub product_name: String,
    pub units_sold: i64,
    pub revenue: Money,
}

// =============================================================================
// Summaries
// =============================================================================

/// Count, total and average of a run of ledger entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LedgerTotals {
    pub count: i64,
    pub total: Money,
    /// `total / count`, rounded to the minor unit; zero when there are no
    /// entries.
    pub average: Money,
}

impl LedgerTotals {
    /// Builds the summary from a `COUNT(*)` and a `SUM(...)`.
    ///
    /// ## Example
    /// ```rust
    /// use stockbook_core::{LedgerTotals, Money};
    ///
    /// let totals = LedgerTotals::from_totals(3, Money::from_cents(1000));
    /// assert_eq!(totals.average.cents(), 333);
    ///
    /// let empty = LedgerTotals::from_totals(0, Money::zero());
    /// assert!(empty.average.is_zero());
    /// ```
    pub fn from_totals(count: i64, total: Money) -> Self {
        Self {
            count,
            total,
            average: total.average_over(count),
        }
    }
}

/// Inventory-wide figures of the stock report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockTotals {
    pub product_count: i64,
    pub total_stock_units: i64,
    pub total_stock_value: Money,
}

// =============================================================================
// Reports
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesReport {
    pub range: DateRange,
    pub rows: Vec<SalesReportRow>,
    pub summary: LedgerTotals,
}

impl SalesReport {
    pub fn empty(range: DateRange) -> Self {
        Self {
            range,
            rows: Vec::new(),
            summary: LedgerTotals::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PurchaseReport {
    pub range: DateRange,
    pub rows: Vec<PurchaseReportRow>,
    pub summary: LedgerTotals,
}

impl PurchaseReport {
    pub fn empty(range: DateRange) -> Self {
        Self {
            range,
            rows: Vec::new(),
            summary: LedgerTotals::default(),
        }
    }
}

/// Current stock of every product. Not date filtered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockReport {
    pub rows: Vec<StockReportRow>,
    pub summary: StockTotals,
}

/// Business summary over a date range.
///
/// `product_count` and `total_stock_units` describe the shop as it stands
/// now; only the sales and purchase figures are date filtered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SummaryReport {
    pub range: DateRange,
    pub sales_count: i64,
    pub sales_revenue: Money,
    pub purchase_count: i64,
    pub purchase_cost: Money,
    pub gross_profit: Money,
    /// `gross_profit / sales_revenue` in basis points (`-19167` is -191.67%).
    /// Zero when there is no revenue.
    pub profit_margin_bps: i64,
    pub top_products: Vec<TopProductRow>,
    pub product_count: i64,
    pub total_stock_units: i64,
}

impl SummaryReport {
    /// Derives profit and margin from the raw figures.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use stockbook_core::{DateRange, LedgerTotals, Money, StockTotals, SummaryReport};
    ///
    /// let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
    /// let report = SummaryReport::compose(
    ///     DateRange::new(day(1), day(2)),
    ///     LedgerTotals::from_totals(1, Money::from_cents(36_000)),
    ///     LedgerTotals::from_totals(1, Money::from_cents(105_000)),
    ///     Vec::new(),
    ///     StockTotals { product_count: 1, total_stock_units: 70, ..Default::default() },
    /// );
    /// assert_eq!(report.gross_profit.cents(), -69_000);
    /// assert_eq!(report.profit_margin_bps, -19_167);
    /// ```
    pub fn compose(
        range: DateRange,
        sales: LedgerTotals,
        purchases: LedgerTotals,
        top_products: Vec<TopProductRow>,
        stock: StockTotals,
    ) -> Self {
        let gross_profit = sales.total - purchases.total;
        let profit_margin_bps = if sales.total.is_positive() {
            gross_profit.basis_points_of(sales.total)
        } else {
            0
        };

        Self {
            range,
            sales_count: sales.count,
            sales_revenue: sales.total,
            purchase_count: purchases.count,
            purchase_cost: purchases.total,
            gross_profit,
            profit_margin_bps,
            top_products,
            product_count: stock.product_count,
            total_stock_units: stock.total_stock_units,
        }
    }

    pub fn empty(range: DateRange) -> Self {
        Self::compose(
            range,
            LedgerTotals::default(),
            LedgerTotals::default(),
            Vec::new(),
            StockTotals::default(),
        )
    }

    /// True when nothing was bought or sold in range.
    pub fn has_activity(&self) -> bool {
        self.sales_count > 0 || self.purchase_count > 0
    }
}

/// Any generated report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "report", rename_all = "snake_case")]
pub enum Report {
    Sales(SalesReport),
    Purchases(PurchaseReport),
    Stock(StockReport),
    Summary(SummaryReport),
}

impl Report {
    pub fn kind(&self) -> ReportKind {
        match self {
            Report::Sales(_) => ReportKind::Sales,
            Report::Purchases(_) => ReportKind::Purchases,
            Report::Stock(_) => ReportKind::Stock,
            Report::Summary(_) => ReportKind::Summary,
        }
    }

    /// Number of detail rows (top products for the summary report).
    pub fn row_count(&self) -> usize {
        match self {
            Report::Sales(r) => r.rows.len(),
            Report::Purchases(r) => r.rows.len(),
            Report::Stock(r) => r.rows.len(),
            Report::Summary(r) => r.top_products.len(),
        }
    }
}

// =============================================================================
// Inventory View
// =============================================================================

/// One line of the inventory screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryRow {
    pub name: String,
    pub category: Option<String>,
    pub stock_quantity: i64,
    pub unit_price: Money,
    pub stock_value: Money,
    pub status: StockStatus,
}

/// Totals shown under the inventory table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventorySummary {
    pub product_count: i64,
    pub total_value: Money,
    pub in_stock: i64,
    pub low_stock: i64,
    pub out_of_stock: i64,
}

impl InventorySummary {
    pub fn from_rows(rows: &[InventoryRow]) -> Self {
        rows.iter().fold(Self::default(), |mut acc, row| {
            acc.product_count += 1;
            acc.total_value += row.stock_value;
            match row.status {
                StockStatus::InStock => acc.in_stock += 1,
                StockStatus::LowStock => acc.low_stock += 1,
                StockStatus::OutOfStock => acc.out_of_stock += 1,
            }
            acc
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
