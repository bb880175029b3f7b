//! # Seed Data Generator
//!
//! Loads a small demo ledger for development: a month of purchases and sales
//! across the shop's usual lines.
//!
//! ## Usage
//! ```bash
//! # Seed ./stockbook_dev.db (default)
//! cargo run -p stockbook-db --bin seed
//!
//! # Specify database path and the last day of demo activity
//! cargo run -p stockbook-db --bin seed -- --db ./data/stockbook.db --until 2024-01-31
//! ```
//!
//! Every entry goes through the stock ledger, so stock levels and reference
//! prices end up exactly as if an operator had typed them in.

use chrono::{Duration, Local, NaiveDate};
use std::env;
use stockbook_core::validation::parse_iso_date;
use stockbook_core::{Money, NewPurchase, NewSale, PaymentType};
use stockbook_db::{Database, DbConfig, LedgerError};

/// (product, supplier, unit cost in paisa, shelf price in paisa)
const LINES: &[(&str, &str, i64, i64)] = &[
    ("Gold Flake", "ABC Distributors", 1050, 1200),
    ("Gold Flake Kings", "ABC Distributors", 1150, 1300),
    ("Classic Milds", "ABC Distributors", 900, 1050),
    ("Navy Cut", "Eastern Traders", 700, 820),
    ("Marlboro Red", "Eastern Traders", 1500, 1700),
    ("Four Square", "City Wholesale", 650, 760),
    ("Bristol", "City Wholesale", 500, 600),
    ("Cavendish Pipe Tobacco", "Pipe & Leaf", 2400, 2900),
];

const CUSTOMERS: &[&str] = &["Walk-in", "Ravi", "Imran", "Sunil", "Hotel Lakeview"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./stockbook_dev.db");
    let mut until = Local::now().date_naive();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--until" | "-u" => {
                if i + 1 < args.len() {
                    until = parse_iso_date("until", &args[i + 1])?;
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Stockbook Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>          Database file path (default: ./stockbook_dev.db)");
                println!("  -u, --until <YYYY-MM-DD> Last day of demo activity (default: today)");
                println!("  -h, --help               Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Stockbook Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = until - Duration::days(29);
    let ledger = db.ledger();

    println!();
    println!("Recording purchases...");
    for (idx, (name, supplier, cost, _)) in LINES.iter().enumerate() {
        ledger
            .record_purchase(demo_purchase(name, supplier, *cost, 120 + idx as i64 * 20, start, idx))
            .await?;
        // A restock mid-month at a slightly higher cost
        ledger
            .record_purchase(demo_purchase(name, supplier, cost + 25, 60, start + Duration::days(14), idx + 1))
            .await?;
    }

    println!("Recording sales...");
    let mut recorded = 0;
    let mut rejected = 0;
    for day in 1..30 {
        let date = start + Duration::days(day);
        for (idx, (name, _, _, price)) in LINES.iter().enumerate() {
            // Not every line sells every day
            if (day as usize + idx) % 3 == 0 {
                continue;
            }
            let quantity = 1 + ((day as usize * 7 + idx * 3) % 12) as i64;
            let sale = NewSale {
                product_name: name.to_string(),
                customer_name: CUSTOMERS[(day as usize + idx) % CUSTOMERS.len()].to_string(),
                quantity,
                unit_price: Money::from_cents(*price),
                payment_type: PaymentType::ALL[idx % PaymentType::ALL.len()],
                sale_date: date,
            };
            match ledger.record_sale(sale).await {
                Ok(_) => recorded += 1,
                Err(LedgerError::InsufficientStock { .. }) => rejected += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }

    println!();
    println!("✓ Recorded {} purchases", db.purchases().count().await?);
    println!("✓ Recorded {} sales ({} skipped for stock)", recorded, rejected);
    println!("✓ Seed complete!");

    Ok(())
}

fn demo_purchase(
    name: &str,
    supplier: &str,
    cost: i64,
    quantity: i64,
    date: NaiveDate,
    payment: usize,
) -> NewPurchase {
    NewPurchase {
        product_name: name.to_string(),
        supplier: supplier.to_string(),
        quantity,
        unit_cost: Money::from_cents(cost),
        payment_type: PaymentType::ALL[payment % PaymentType::ALL.len()],
        purchase_date: date,
    }
}
