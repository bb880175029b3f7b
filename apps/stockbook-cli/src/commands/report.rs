//! # Reports
//!
//! Generates one report, prints its summary block and detail table, and
//! optionally writes the plain-text export.
//!
//! ## Date Range Defaults
//! ```text
//! --to    missing ──► today
//! --from  missing ──► 30 days before --to
//! --from > --to   ──► empty report (not an error)
//! ```

use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::info;

use stockbook_core::render::{export_document, summary_lines};
use stockbook_core::{
    DateRange, PurchaseReport, Report, ReportKind, ReportRequest, SalesReport, StockReport,
    DEFAULT_REPORT_DAYS,
};

use super::{CommandOutput, Context};
use crate::cli::ReportArgs;
use crate::error::AppResult;

/// Fills in whichever end of the range the operator left out.
pub fn resolve_range(today: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> DateRange {
    let to = to.unwrap_or(today);
    let from = from.unwrap_or_else(|| DateRange::last_days(to, DEFAULT_REPORT_DAYS).from);
    DateRange::new(from, to)
}

/// Export file name used when `--export` is given without a path
/// (`sales_report_2024_01_31.txt`).
pub fn default_export_path(kind: ReportKind, today: NaiveDate) -> PathBuf {
    PathBuf::from(format!("{}_{}.txt", kind.file_stem(), today.format("%Y_%m_%d")))
}

/// `stockbook report`
pub async fn run(ctx: &Context, args: ReportArgs) -> AppResult<CommandOutput> {
    let request = ReportRequest {
        kind: args.kind,
        range: resolve_range(ctx.today, args.from, args.to),
    };
    let report = ctx.db.reports().generate(request).await?;
    let currency = &ctx.config.currency;

    let mut lines = vec![ctx.config.store_name.clone(), String::new()];
    lines.extend(summary_lines(&report, currency));

    let details = detail_lines(&report);
    if !details.is_empty() {
        lines.push(String::new());
        lines.extend(details);
    }

    if let Some(target) = args.export {
        let path = target.unwrap_or_else(|| default_export_path(request.kind, ctx.today));
        let mut text = export_document(&report, currency).join("\n");
        text.push('\n');
        std::fs::write(&path, text)?;

        info!(path = %path.display(), kind = ?request.kind, "Report exported");
        lines.push(String::new());
        lines.push(format!("Report exported successfully! Saved as: {}", path.display()));
    }

    CommandOutput::new(lines, &report)
}

/// The detail table under the summary block. The business summary has none.
fn detail_lines(report: &Report) -> Vec<String> {
    match report {
        Report::Sales(r) => sales_table(r),
        Report::Purchases(r) => purchase_table(r),
        Report::Stock(r) => stock_table(r),
        Report::Summary(_) => Vec::new(),
    }
}

fn with_rule(header: String) -> Vec<String> {
    let rule = "─".repeat(header.chars().count());
    vec![header, rule]
}

fn sales_table(report: &SalesReport) -> Vec<String> {
    if report.rows.is_empty() {
        return Vec::new();
    }
    let mut lines = with_rule(format!(
        "{:<10}  {:<22} {:<18} {:>5} {:>10} {:>11}  {}",
        "Date", "Product", "Customer", "Qty", "Unit Price", "Total", "Payment"
    ));
    lines.extend(report.rows.iter().map(|row| {
        format!(
            "{:<10}  {:<22} {:<18} {:>5} {:>10} {:>11}  {}",
            row.sale_date.to_string(),
            row.product_name,
            row.customer_name,
            row.quantity,
            row.unit_price.to_string(),
            row.total_amount.to_string(),
            row.payment_type
        )
    }));
    lines
}

fn purchase_table(report: &PurchaseReport) -> Vec<String> {
    if report.rows.is_empty() {
        return Vec::new();
    }
    let mut lines = with_rule(format!(
        "{:<10}  {:<22} {:<18} {:>5} {:>10} {:>11}  {}",
        "Date", "Product", "Supplier", "Qty", "Unit Cost", "Total", "Payment"
    ));
    lines.extend(report.rows.iter().map(|row| {
        format!(
            "{:<10}  {:<22} {:<18} {:>5} {:>10} {:>11}  {}",
            row.purchase_date.to_string(),
            row.product_name,
            row.supplier,
            row.quantity,
            row.unit_cost.to_string(),
            row.total_cost.to_string(),
            row.payment_type
        )
    }));
    lines
}

fn stock_table(report: &StockReport) -> Vec<String> {
    if report.rows.is_empty() {
        return Vec::new();
    }
    let mut lines = with_rule(format!(
        "{:<26} {:>6} {:>12} {:>12}",
        "Product", "Stock", "Unit Price", "Stock Value"
    ));
    lines.extend(report.rows.iter().map(|row| {
        format!(
            "{:<26} {:>6} {:>12} {:>12}",
            row.name,
            row.stock_quantity,
            row.unit_price.to_string(),
            row.stock_value.to_string()
        )
    }));
    lines
}
