//! # Repository Module
//!
//! Database repository implementations for Stockbook.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  CLI command / StockLedger / ReportEngine                              │
//! │       │                                                                 │
//! │       │  db.products().find_by_name("Gold Flake")                      │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── find_by_name / get_by_id                                          │
//! │  ├── create                                                            │
//! │  ├── adjust_stock_in (ledger only)                                     │
//! │  └── search / inventory / names                                        │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Products and stock levels
//! - [`purchase::PurchaseRepository`] - Purchase ledger entries
//! - [`sale::SaleRepository`] - Sale ledger entries
//! - [`user::UserRepository`] - Operators and login

pub mod product;
pub mod purchase;
pub mod sale;
pub mod user;
