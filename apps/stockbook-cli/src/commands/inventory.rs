//! # Inventory View
//!
//! Stock on hand, optionally filtered by name, with totals underneath.
//!
//! ```text
//! Name                       Category          Stock   Unit Price  Stock Value  Status
//! ─────────────────────────────────────────────────────────────────────────────────────
//! Gold Flake                 -                    70        10.50       735.00  In Stock
//! Navy Cut                   -                     4         7.00        28.00  Low Stock
//!
//! Products: 2 | Total value: Rs.763.00 | In stock: 1 | Low stock: 1 | Out of stock: 0
//! ```

use serde::Serialize;
use std::path::Path;
use tracing::info;

use stockbook_core::render::format_amount;
use stockbook_core::validation::validate_search_query;
use stockbook_core::{InventoryRow, InventorySummary};

use super::{CommandOutput, Context};
use crate::cli::InventoryArgs;
use crate::error::AppResult;

/// Inventory rows and totals, as printed by `--json`.
#[derive(Debug, Serialize)]
pub struct InventoryView {
    pub rows: Vec<InventoryRow>,
    pub summary: InventorySummary,
}

/// One CSV record: amounts as decimal text, status as its label.
#[derive(Debug, Serialize)]
struct CsvRecord<'a> {
    #[serde(rename = "Product")]
    name: &'a str,
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Stock")]
    stock_quantity: i64,
    #[serde(rename = "Unit Price")]
    unit_price: String,
    #[serde(rename = "Stock Value")]
    stock_value: String,
    #[serde(rename = "Status")]
    status: &'static str,
}

/// `stockbook inventory`
pub async fn run(ctx: &Context, args: InventoryArgs) -> AppResult<CommandOutput> {
    let query = validate_search_query(&args.search)?;
    let (rows, summary) = ctx
        .db
        .reports()
        .inventory(&query, ctx.config.low_stock_threshold)
        .await?;

    if let Some(path) = &args.csv {
        write_csv(path, &rows)?;
        info!(path = %path.display(), rows = rows.len(), "Inventory exported");
    }

    let mut lines = table_lines(&rows);
    lines.push(String::new());
    lines.push(summary_line(&summary, &ctx.config.currency));
    if let Some(path) = &args.csv {
        lines.push(format!("Exported to {}", path.display()));
    }

    CommandOutput::new(lines, &InventoryView { rows, summary })
}

fn table_lines(rows: &[InventoryRow]) -> Vec<String> {
    let header = format!(
        "{:<26} {:<16} {:>6} {:>12} {:>12}  {}",
        "Name", "Category", "Stock", "Unit Price", "Stock Value", "Status"
    );
    let rule = "─".repeat(header.chars().count());

    let mut lines = vec![header, rule];
    if rows.is_empty() {
        lines.push("No products found".to_string());
        return lines;
    }

    lines.extend(rows.iter().map(|row| {
        format!(
            "{:<26} {:<16} {:>6} {:>12} {:>12}  {}",
            row.name,
            row.category.as_deref().unwrap_or("-"),
            row.stock_quantity,
            row.unit_price.to_string(),
            row.stock_value.to_string(),
            row.status
        )
    }));
    lines
}

fn summary_line(summary: &InventorySummary, currency: &str) -> String {
    format!(
        "Products: {} | Total value: {} | In stock: {} | Low stock: {} | Out of stock: {}",
        summary.product_count,
        format_amount(currency, summary.total_value),
        summary.in_stock,
        summary.low_stock,
        summary.out_of_stock
    )
}

/// Writes the inventory table to `path`, header first.
pub fn write_csv(path: &Path, rows: &[InventoryRow]) -> AppResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(CsvRecord {
            name: &row.name,
            category: row.category.as_deref().unwrap_or(""),
            stock_quantity: row.stock_quantity,
            unit_price: row.unit_price.to_string(),
            stock_value: row.stock_value.to_string(),
            status: row.status.label(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{context, day};
    use stockbook_core::{Money, NewPurchase, NewSale, PaymentType};

    async fn stocked_context() -> Context {
        let ctx = context().await;
        let ledger = ctx.db.ledger();
        for (name, qty) in [("Gold Flake", 100), ("Navy Cut", 4), ("Bristol", 3)] {
            ledger
                .record_purchase(NewPurchase {
                    product_name: name.to_string(),
                    supplier: "ABC Distributors".to_string(),
                    quantity: qty,
                    unit_cost: Money::from_cents(1000),
                    payment_type: PaymentType::Cash,
                    purchase_date: day(1),
                })
                .await
                .unwrap();
        }
        ledger
            .record_sale(NewSale {
                product_name: "Bristol".to_string(),
                customer_name: "Walk-in".to_string(),
                quantity: 3,
                unit_price: Money::from_cents(1200),
                payment_type: PaymentType::Cash,
                sale_date: day(2),
            })
            .await
            .unwrap();
        ctx
    }

    #[tokio::test]
    async fn test_inventory_table_and_totals() {
        let ctx = stocked_context().await;

        let output = run(&ctx, InventoryArgs::default()).await.unwrap();

        // header, rule, three products, blank, summary
        assert_eq!(output.lines.len(), 7);
        assert!(output.lines[2].starts_with("Bristol"));
        assert!(output.lines[2].ends_with("Out of Stock"));
        assert!(output.lines[3].ends_with("In Stock"));
        assert!(output.lines[4].ends_with("Low Stock"));
        assert_eq!(
            output.lines[6],
            "Products: 3 | Total value: Rs.1040.00 | In stock: 1 | Low stock: 1 | Out of stock: 1"
        );
        assert_eq!(output.json["summary"]["product_count"], 3);
    }

    #[tokio::test]
    async fn test_search_filters_case_insensitively() {
        let ctx = stocked_context().await;

        let output = run(
            &ctx,
            InventoryArgs {
                search: "  FLAKE ".to_string(),
                csv: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(output.json["rows"].as_array().unwrap().len(), 1);
        assert_eq!(output.json["rows"][0]["name"], "Gold Flake");
    }

    #[tokio::test]
    async fn test_no_match() {
        let ctx = stocked_context().await;

        let output = run(
            &ctx,
            InventoryArgs {
                search: "cigar".to_string(),
                csv: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(output.lines[2], "No products found");
    }

    #[tokio::test]
    async fn test_csv_export() {
        let ctx = stocked_context().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.csv");

        run(
            &ctx,
            InventoryArgs {
                search: String::new(),
                csv: Some(path.clone()),
            },
        )
        .await
        .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Product,Category,Stock,Unit Price,Stock Value,Status");
        assert_eq!(lines[1], "Bristol,,0,10.00,0.00,Out of Stock");
        assert_eq!(lines[2], "Gold Flake,,100,10.00,1000.00,In Stock");
        assert_eq!(lines.len(), 4);
    }
}
