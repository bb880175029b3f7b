//! # Domain Types
//!
//! Core domain types used throughout Stockbook.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Purchase     │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  product_id     │   │  product_id ───►│       │
//! │  │  name (natural) │   │  supplier       │   │  customer_name  │       │
//! │  │  stock_quantity │   │  unit_cost      │   │  unit_price     │       │
//! │  │  unit_price     │   │  total_cost     │   │  total_amount   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  PaymentType    │   │   StockStatus   │   │      User       │       │
//! │  │  Cash, Credit,  │   │  InStock        │   │  username       │       │
//! │  │  BankTransfer,  │   │  LowStock       │   │  role           │       │
//! │  │  Cheque         │   │  OutOfStock     │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business key: the product name / username - what operators type
//!
//! ## Ledger Entries Are Snapshots
//! `Purchase` and `Sale` rows freeze the quantity and unit amount at the time
//! of the transaction. Their totals are never recomputed, even if the
//! product's reference price changes later.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{self, ValidationResult};

/// Generates a new entity ID (UUID v4).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// =============================================================================
// Payment Type
// =============================================================================

/// How a purchase or sale was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// Cash over the counter.
    Cash,
    /// On account, settled later.
    Credit,
    /// Direct bank transfer.
    BankTransfer,
    /// Paid by cheque.
    Cheque,
}

impl PaymentType {
    /// Every payment type, in the order the entry forms list them.
    pub const ALL: [PaymentType; 4] = [
        PaymentType::Cash,
        PaymentType::Credit,
        PaymentType::BankTransfer,
        PaymentType::Cheque,
    ];

    /// Display label ("Bank Transfer").
    pub fn label(&self) -> &'static str {
        match self {
            PaymentType::Cash => "Cash",
            PaymentType::Credit => "Credit",
            PaymentType::BankTransfer => "Bank Transfer",
            PaymentType::Cheque => "Cheque",
        }
    }
}

impl Default for PaymentType {
    fn default() -> Self {
        PaymentType::Cash
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts the display label or the stored form, ignoring case, spaces,
/// hyphens and underscores ("Bank Transfer", "bank_transfer", "bank-transfer").
impl FromStr for PaymentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "cash" => Ok(PaymentType::Cash),
            "credit" => Ok(PaymentType::Credit),
            "banktransfer" => Ok(PaymentType::BankTransfer),
            "cheque" | "check" => Ok(PaymentType::Cheque),
            _ => Err(ValidationError::NotAllowed {
                field: "payment type".to_string(),
                allowed: PaymentType::ALL
                    .iter()
                    .map(|p| p.label().to_string())
                    .collect(),
            }),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A stocked product.
///
/// Created implicitly by the first purchase of a new name and never deleted.
/// Only the stock ledger mutates `stock_quantity` and `unit_price`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name; the natural key (unique, case-sensitive).
    pub name: String,

    /// Optional grouping (cigarettes, cigars, loose tobacco...).
    pub category: Option<String>,

    /// Units on hand. Denormalized from the purchase/sale ledger.
    pub stock_quantity: i64,

    /// Reference price: the unit cost of the most recent purchase.
    pub unit_price: Money,

    /// When the product was first purchased.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Value of the stock on hand at the reference price.
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.unit_price.multiply_quantity(self.stock_quantity)
    }

    /// Checks if `quantity` units can be sold from current stock.
    #[inline]
    pub fn can_fulfil(&self, quantity: i64) -> bool {
        self.stock_quantity >= quantity
    }

    /// Classifies the stock level against a low-stock threshold.
    pub fn stock_status(&self, low_stock_threshold: i64) -> StockStatus {
        StockStatus::classify(self.stock_quantity, low_stock_threshold)
    }
}

// =============================================================================
// Stock Status
// =============================================================================

/// Stock level band shown on the inventory screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// At or above the threshold.
    InStock,
    /// Above zero but below the threshold.
    LowStock,
    /// Nothing (or less than nothing) on hand.
    OutOfStock,
}

impl StockStatus {
    /// Classifies a stock level.
    ///
    /// ## Example
    /// ```rust
    /// use stockbook_core::StockStatus;
    ///
    /// assert_eq!(StockStatus::classify(0, 10), StockStatus::OutOfStock);
    /// assert_eq!(StockStatus::classify(9, 10), StockStatus::LowStock);
    /// assert_eq!(StockStatus::classify(10, 10), StockStatus::InStock);
    /// ```
    pub fn classify(stock_quantity: i64, low_stock_threshold: i64) -> Self {
        if stock_quantity <= 0 {
            StockStatus::OutOfStock
        } else if stock_quantity < low_stock_threshold {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    /// Display label ("Low Stock").
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::InStock => "In Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::OutOfStock => "Out of Stock",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Purchase
// =============================================================================

/// A stock receipt from a supplier. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Purchase {
    pub id: String,
    pub product_id: String,
    pub supplier: String,
    pub quantity: i64,
    /// Cost per unit at the time of purchase (frozen).
    pub unit_cost: Money,
    /// `quantity × unit_cost` (frozen).
    pub total_cost: Money,
    pub payment_type: PaymentType,
    #[ts(as = "String")]
    pub purchase_date: NaiveDate,
    /// When the entry was written (orders same-day entries).
    #[ts(as = "String")]
    pub recorded_at: DateTime<Utc>,
}

/// Purchase entry as submitted by the purchase form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPurchase {
    pub product_name: String,
    pub supplier: String,
    pub quantity: i64,
    pub unit_cost: Money,
    pub payment_type: PaymentType,
    pub purchase_date: NaiveDate,
}

impl NewPurchase {
    /// Checks the business constraints and returns the entry with its text
    /// fields trimmed.
    ///
    /// ## Rules
    /// - product name and supplier are required
    /// - quantity is positive and within the entry limit
    /// - unit cost is positive
    pub fn validate(self) -> ValidationResult<NewPurchase> {
        let product_name = validation::validate_product_name(&self.product_name)?;
        let supplier = validation::validate_party_name("supplier", &self.supplier)?;
        validation::validate_quantity(self.quantity)?;
        validation::validate_unit_amount("unit cost", self.unit_cost)?;

        Ok(NewPurchase {
            product_name,
            supplier,
            ..self
        })
    }

    /// Ledger total for this entry.
    #[inline]
    pub fn total_cost(&self) -> Money {
        self.unit_cost.multiply_quantity(self.quantity)
    }

    /// Builds the ledger row for an already-resolved product.
    pub fn into_purchase(self, product_id: &str, recorded_at: DateTime<Utc>) -> Purchase {
        let total_cost = self.total_cost();
        Purchase {
            id: new_id(),
            product_id: product_id.to_string(),
            supplier: self.supplier,
            quantity: self.quantity,
            unit_cost: self.unit_cost,
            total_cost,
            payment_type: self.payment_type,
            purchase_date: self.purchase_date,
            recorded_at,
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A sale to a customer. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub product_id: String,
    pub customer_name: String,
    pub quantity: i64,
    /// Price per unit charged (frozen).
    pub unit_price: Money,
    /// `quantity × unit_price` (frozen).
    pub total_amount: Money,
    pub payment_type: PaymentType,
    #[ts(as = "String")]
    pub sale_date: NaiveDate,
    #[ts(as = "String")]
    pub recorded_at: DateTime<Utc>,
}

/// Sale entry as submitted by the sale form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSale {
    pub product_name: String,
    pub customer_name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub payment_type: PaymentType,
    pub sale_date: NaiveDate,
}

impl NewSale {
    /// Checks the business constraints and returns the entry with its text
    /// fields trimmed. Stock sufficiency is checked by the ledger, under the
    /// write lock.
    pub fn validate(self) -> ValidationResult<NewSale> {
        let product_name = validation::validate_product_name(&self.product_name)?;
        let customer_name = validation::validate_party_name("customer name", &self.customer_name)?;
        validation::validate_quantity(self.quantity)?;
        validation::validate_unit_amount("unit price", self.unit_price)?;

        Ok(NewSale {
            product_name,
            customer_name,
            ..self
        })
    }

    /// Ledger total for this entry.
    #[inline]
    pub fn total_amount(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// Builds the ledger row for an already-resolved product.
    pub fn into_sale(self, product_id: &str, recorded_at: DateTime<Utc>) -> Sale {
        let total_amount = self.total_amount();
        Sale {
            id: new_id(),
            product_id: product_id.to_string(),
            customer_name: self.customer_name,
            quantity: self.quantity,
            unit_price: self.unit_price,
            total_amount,
            payment_type: self.payment_type,
            sale_date: self.sale_date,
            recorded_at,
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// Access level of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

/// A shop operator.
///
/// Passwords are stored and compared in clear text; securing them is out of
/// scope for this system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip)]
    pub password: String,
    pub role: Role,
}

// =============================================================================
// Unit Tests
// =============================================================================
