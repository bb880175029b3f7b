//! # Command-Line Surface
//!
//! ```text
//! stockbook [--db PATH] [--json] [-u USER -p PASS] <command>
//!
//!   login                                   check credentials
//!   purchase --product --supplier ...       record a stock receipt   (login)
//!   sale --product --customer ...           record a sale            (login)
//!   inventory [--search TEXT] [--csv PATH]  stock on hand
//!   report <sales|purchases|stock|summary>  [--from] [--to] [--export [PATH]]
//!   products                                product names for the sale form
//! ```

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use stockbook_core::{Money, PaymentType, ReportKind};

#[derive(Debug, Parser)]
#[command(name = "stockbook")]
#[command(about = "Stock book for a tobacco shop: purchases, sales, inventory and reports")]
#[command(version)]
pub struct Cli {
    /// Database file (default: STOCKBOOK_DB_PATH, then the platform data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Operator username (required for purchase and sale)
    #[arg(short, long, global = true)]
    pub username: Option<String>,

    /// Operator password
    #[arg(short, long, global = true)]
    pub password: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check operator credentials
    Login,

    /// Record a purchase (stock in)
    Purchase(PurchaseArgs),

    /// Record a sale (stock out)
    Sale(SaleArgs),

    /// Show stock on hand
    Inventory(InventoryArgs),

    /// Generate a report
    Report(ReportArgs),

    /// List product names
    Products,
}

#[derive(Debug, Clone, Args)]
pub struct PurchaseArgs {
    /// Product name; created on first purchase
    #[arg(long)]
    pub product: String,

    #[arg(long)]
    pub supplier: String,

    #[arg(long, allow_negative_numbers = true)]
    pub quantity: i64,

    /// Cost per unit, e.g. 10.50
    #[arg(long)]
    pub unit_cost: Money,

    /// cash, credit, bank_transfer or cheque
    #[arg(long, default_value = "cash")]
    pub payment: PaymentType,

    /// Purchase date, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Args)]
pub struct SaleArgs {
    /// Product name; must already be stocked
    #[arg(long)]
    pub product: String,

    #[arg(long)]
    pub customer: String,

    #[arg(long, allow_negative_numbers = true)]
    pub quantity: i64,

    /// Price per unit (default: the product's current unit price)
    #[arg(long)]
    pub unit_price: Option<Money>,

    /// cash, credit, bank_transfer or cheque
    #[arg(long, default_value = "cash")]
    pub payment: PaymentType,

    /// Sale date, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct InventoryArgs {
    /// Case-insensitive product name filter
    #[arg(long, default_value = "")]
    pub search: String,

    /// Also write the table to a CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct ReportArgs {
    /// sales, purchases, stock or summary
    pub kind: ReportKind,

    /// First day, YYYY-MM-DD (default: 30 days before --to)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Write a plain-text export; without PATH it is named after the report
    /// and today's date
    #[arg(long)]
    pub export: Option<Option<PathBuf>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_purchase() {
        let cli = Cli::try_parse_from([
            "stockbook",
            "-u",
            "admin",
            "-p",
            "123",
            "purchase",
            "--product",
            "Gold Flake",
            "--supplier",
            "ABC Distributors",
            "--quantity",
            "100",
            "--unit-cost",
            "10.50",
            "--payment",
            "Bank Transfer",
            "--date",
            "2024-01-01",
        ])
        .unwrap();

        assert_eq!(cli.username.as_deref(), Some("admin"));
        match cli.command {
            Command::Purchase(args) => {
                assert_eq!(args.quantity, 100);
                assert_eq!(args.unit_cost, Money::from_cents(1050));
                assert_eq!(args.payment, PaymentType::BankTransfer);
                assert_eq!(args.date, NaiveDate::from_ymd_opt(2024, 1, 1));
            }
            other => panic!("expected purchase, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_report_defaults() {
        let cli = Cli::try_parse_from(["stockbook", "report", "summary", "--export"]).unwrap();
        match cli.command {
            Command::Report(args) => {
                assert_eq!(args.kind, ReportKind::Summary);
                assert!(args.from.is_none());
                assert!(args.to.is_none());
                assert_eq!(args.export, Some(None));
            }
            other => panic!("expected report, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Cli::try_parse_from(["stockbook", "report", "weekly"]).is_err());
        assert!(Cli::try_parse_from([
            "stockbook",
            "sale",
            "--product",
            "Gold Flake",
            "--customer",
            "John",
            "--quantity",
            "1",
            "--unit-price",
            "12.005",
        ])
        .is_err());
    }
}
