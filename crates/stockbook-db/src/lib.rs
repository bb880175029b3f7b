//! # stockbook-db: Store, Stock Ledger and Report Engine
//!
//! This crate provides database access for Stockbook. It uses SQLite for
//! local storage with sqlx for async operations, and owns every change to
//! stock.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockbook Data Flow                              │
//! │                                                                         │
//! │  CLI command (purchase / sale / report)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   stockbook-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐       │   │
//! │  │   │ StockLedger  │   │ ReportEngine │   │  Migrations  │       │   │
//! │  │   │ (ledger.rs)  │   │ (reports.rs) │   │  (embedded)  │       │   │
//! │  │   └──────┬───────┘   └──────┬───────┘   └──────────────┘       │   │
//! │  │          │                  │                                   │   │
//! │  │   ┌──────▼──────────────────▼───────┐   ┌──────────────┐       │   │
//! │  │   │ Repositories                    │──►│   Database   │       │   │
//! │  │   │ Product / Purchase / Sale / User│   │  (pool.rs)   │       │   │
//! │  │   └─────────────────────────────────┘   └──────────────┘       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (platform data dir or --db PATH)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and ledger error types
//! - [`repository`] - Repository implementations
//! - [`ledger`] - Purchase and sale recording
//! - [`reports`] - Sales, purchase, stock and summary reports
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockbook_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("stockbook.db")).await?;
//!
//! let receipt = db.ledger().record_purchase(entry).await?;
//! let summary = db.reports().summary(range).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod reports;
pub mod repository;
mod transaction;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, LedgerError, LedgerResult};
pub use ledger::{PurchaseReceipt, SaleReceipt, StockLedger};
pub use pool::{Database, DbConfig};
pub use reports::ReportEngine;

// Repository re-exports for convenience
pub use repository::product::ProductRepository;
pub use repository::purchase::PurchaseRepository;
pub use repository::sale::SaleRepository;
pub use repository::user::UserRepository;
