//! # stockbook-core: Pure Business Logic for Stockbook
//!
//! This crate holds the domain model of the shop's stock book: products,
//! purchase and sale ledger entries, users, money, validation rules and the
//! arithmetic behind every report. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockbook Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation (stockbook-cli)                    │   │
//! │  │   login ──► purchase ──► sale ──► inventory ──► report         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        stockbook-db (Stock Ledger, Report Engine, Store)        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockbook-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  report   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  Summary  │  │   rules   │  │   │
//! │  │   │ Purchase  │  │  parsing  │  │  margins  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Purchase, Sale, User, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`report`] - Report records and the pure math behind them
//! - [`render`] - Plain-text report summaries and export line sanitising
//!
//! ## Example Usage
//!
//! ```rust
//! use stockbook_core::money::Money;
//!
//! // Parse what the purchase form typed
//! let unit_cost: Money = "10.50".parse().unwrap();
//!
//! // Ledger totals are always quantity × unit amount
//! let total = unit_cost.multiply_quantity(100);
//! assert_eq!(total.cents(), 105_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod render;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use report::*;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Stock level below which a product is flagged as low stock.
///
/// The inventory screen accepts an override (see `AppConfig` in the CLI).
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Number of products listed in the summary report's best-seller table.
pub const TOP_PRODUCTS_LIMIT: usize = 5;

/// Maximum quantity accepted on a single purchase or sale entry.
///
/// ## Business Reason
/// Mirrors the entry form's spin box range and catches a mistyped extra zero.
pub const MAX_ENTRY_QUANTITY: i64 = 10_000;

/// Largest unit cost or unit price accepted on an entry (999999.99).
///
/// With [`MAX_ENTRY_QUANTITY`] this bounds every ledger total well inside
/// `i64` cents.
pub const MAX_UNIT_AMOUNT: Money = Money::from_cents(99_999_999);

/// Number of days covered by a report when the caller gives no range.
pub const DEFAULT_REPORT_DAYS: i64 = 30;
