//! # Report Rendering
//!
//! Plain-text rendering of reports. Everything here is a pure function over
//! the structured records in [`crate::report`]; no report is re-queried to
//! render or export it.
//!
//! ```text
//! Report ──► summary_lines() ──► screen
//!                  │
//!                  └──► export_document() ──► export_lines() ──► file
//!                                              (ASCII, ≤ 80 chars + "...")
//! ```

use crate::money::Money;
use crate::report::{
    PurchaseReport, Report, SalesReport, StockReport, SummaryReport,
};

/// Longest exported line before truncation.
pub const EXPORT_LINE_WIDTH: usize = 80;

/// Currency prefix used when none is configured.
pub const DEFAULT_CURRENCY: &str = "Rs.";

/// Formats an amount with a currency prefix ("Rs.1050.00").
pub fn format_amount(currency: &str, amount: Money) -> String {
    format!("{currency}{amount}")
}

/// Formats a margin in basis points as a percentage with one decimal
/// ("-191.7%").
///
/// ## Example
/// ```rust
/// use stockbook_core::render::format_margin;
///
/// assert_eq!(format_margin(-19_167), "-191.7%");
/// assert_eq!(format_margin(2_500), "25.0%");
/// assert_eq!(format_margin(0), "0.0%");
/// ```
pub fn format_margin(bps: i64) -> String {
    // Basis points to tenths of a percent, half away from zero.
    let tenths = if bps >= 0 { (bps + 5) / 10 } else { (bps - 5) / 10 };
    let sign = if tenths < 0 { "-" } else { "" };
    let abs = tenths.abs();
    format!("{sign}{}.{}%", abs / 10, abs % 10)
}

// =============================================================================
// Summary Text
// =============================================================================

/// The summary block shown above a report's detail table.
pub fn summary_lines(report: &Report, currency: &str) -> Vec<String> {
    match report {
        Report::Sales(r) => sales_summary(r, currency),
        Report::Purchases(r) => purchase_summary(r, currency),
        Report::Stock(r) => stock_summary(r, currency),
        Report::Summary(r) => business_summary(r, currency),
    }
}

fn heading(title: String) -> Vec<String> {
    let rule = "=".repeat(title.chars().count());
    vec![title, rule]
}

fn sales_summary(report: &SalesReport, currency: &str) -> Vec<String> {
    let mut lines = heading(format!("SALES REPORT SUMMARY ({})", report.range));
    lines.push(format!("Total Sales: {}", report.summary.count));
    lines.push(format!(
        "Total Revenue: {}",
        format_amount(currency, report.summary.total)
    ));
    lines.push(format!(
        "Average Sale Amount: {}",
        format_amount(currency, report.summary.average)
    ));
    if report.rows.is_empty() {
        lines.push("Note: No sales data found for the selected period.".to_string());
    }
    lines
}

fn purchase_summary(report: &PurchaseReport, currency: &str) -> Vec<String> {
    let mut lines = heading(format!("PURCHASE REPORT SUMMARY ({})", report.range));
    lines.push(format!("Total Purchases: {}", report.summary.count));
    lines.push(format!(
        "Total Cost: {}",
        format_amount(currency, report.summary.total)
    ));
    lines.push(format!(
        "Average Purchase Cost: {}",
        format_amount(currency, report.summary.average)
    ));
    if report.rows.is_empty() {
        lines.push("Note: No purchase data found for the selected period.".to_string());
    }
    lines
}

fn stock_summary(report: &StockReport, currency: &str) -> Vec<String> {
    let mut lines = heading("STOCK REPORT SUMMARY".to_string());
    lines.push(format!("Total Products: {}", report.summary.product_count));
    lines.push(format!(
        "Total Stock Units: {}",
        report.summary.total_stock_units
    ));
    lines.push(format!(
        "Total Stock Value: {}",
        format_amount(currency, report.summary.total_stock_value)
    ));
    if report.rows.is_empty() {
        lines.push("Note: No products found in inventory.".to_string());
    }
    lines
}

fn business_summary(report: &SummaryReport, currency: &str) -> Vec<String> {
    let mut lines = heading(format!("BUSINESS SUMMARY REPORT ({})", report.range));
    lines.extend([
        "SALES:".to_string(),
        format!("  Total Sales: {}", report.sales_count),
        format!(
            "  Sales Revenue: {}",
            format_amount(currency, report.sales_revenue)
        ),
        String::new(),
        "PURCHASES:".to_string(),
        format!("  Total Purchases: {}", report.purchase_count),
        format!(
            "  Purchase Cost: {}",
            format_amount(currency, report.purchase_cost)
        ),
        String::new(),
        "PROFIT/LOSS:".to_string(),
        format!(
            "  Gross Profit: {}",
            format_amount(currency, report.gross_profit)
        ),
        format!("  Profit Margin: {}", format_margin(report.profit_margin_bps)),
        String::new(),
        "INVENTORY:".to_string(),
        format!("  Total Products: {}", report.product_count),
        format!("  Total Stock: {} units", report.total_stock_units),
        String::new(),
    ]);

    if report.has_activity() {
        lines.push("TOP SELLING PRODUCTS:".to_string());
        for (rank, top) in report.top_products.iter().enumerate() {
            lines.push(format!(
                "  {}. {} - {} units, {}",
                rank + 1,
                top.product_name,
                top.units_sold,
                format_amount(currency, top.revenue)
            ));
        }
    } else {
        lines.push("Note: No data found for the selected period.".to_string());
    }
    lines
}

// =============================================================================
// Export
// =============================================================================

/// Title, blank line, then the summary block: the text of an exported
/// report, before sanitising.
pub fn export_document(report: &Report, currency: &str) -> Vec<String> {
    let mut lines = vec![report.kind().title().to_string(), String::new()];
    lines.extend(summary_lines(report, currency));
    export_lines(&lines)
}

/// Makes lines safe for the plain-ASCII export target.
///
/// ## Rules
/// - the rupee and dollar signs become `Rs.`
/// - lines longer than 80 characters are cut to 80 and suffixed with `...`
/// - any remaining non-ASCII character is dropped
pub fn export_lines(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|line| {
            let line = line
                .replace('\u{20B9}', DEFAULT_CURRENCY)
                .replace('$', DEFAULT_CURRENCY);
            let line = if line.chars().count() > EXPORT_LINE_WIDTH {
                let mut cut: String = line.chars().take(EXPORT_LINE_WIDTH).collect();
                cut.push_str("...");
                cut
            } else {
                line
            };
            line.chars().filter(char::is_ascii).collect()
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
