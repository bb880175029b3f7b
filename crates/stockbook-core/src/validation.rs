//! # Validation Module
//!
//! Input validation for ledger entries, logins and report requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end (CLI arguments)                                    │
//! │  ├── Type parsing (quantity, money, dates, payment type)               │
//! │  └── Immediate operator feedback                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Stock Ledger / Report Engine                                 │
//! │  └── THIS MODULE: business rules re-checked before any write           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE product name                                               │
//! │  └── Foreign keys from ledger rows to products                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockbook_core::validation::{validate_product_name, validate_quantity};
//!
//! assert_eq!(validate_product_name("  Gold Flake ").unwrap(), "Gold Flake");
//! assert!(validate_quantity(100).is_ok());
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_ENTRY_QUANTITY, MAX_UNIT_AMOUNT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of product, supplier and customer names.
pub const MAX_NAME_LEN: usize = 200;

/// Ledger dates are stored and typed in this form.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
///
/// Case is preserved: "Gold Flake" and "gold flake" are different products.
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    validate_name("product name", name)
}

/// Validates a supplier or customer name and returns it trimmed.
///
/// ## Example
/// ```rust
/// use stockbook_core::validation::validate_party_name;
///
/// assert_eq!(validate_party_name("supplier", " ABC ").unwrap(), "ABC");
/// assert!(validate_party_name("customer name", "").is_err());
/// ```
pub fn validate_party_name(field: &str, name: &str) -> ValidationResult<String> {
    validate_name(field, name)
}

fn validate_name(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(value.to_string())
}

/// Validates a login attempt and returns the trimmed username and password.
///
/// ## Rules
/// - Username and password are both required
/// - Both are trimmed before comparison
pub fn validate_credentials(username: &str, password: &str) -> ValidationResult<(String, String)> {
    let username = username.trim();
    let password = password.trim();

    if username.is_empty() {
        return Err(ValidationError::required("username"));
    }
    if password.is_empty() {
        return Err(ValidationError::required("password"));
    }

    Ok((username.to_string(), password.to_string()))
}

/// Validates an inventory search query.
///
/// ## Rules
/// - Can be empty (lists everything)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an entry quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ENTRY_QUANTITY (10000)
///
/// ## Operator Workflow
/// ```text
/// Sale entry: quantity 0
///      │
///      ▼
/// validate_quantity(0) ← THIS FUNCTION
///      │
///      ├── qty <= 0?     → "quantity must be positive"
///      ├── qty > 10000?  → "quantity must be between 1 and 10000"
///      └── OK            → stock ledger takes over
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::must_be_positive("quantity"));
    }

    if qty > MAX_ENTRY_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ENTRY_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit cost or unit price.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_UNIT_AMOUNT (999999.99)
pub fn validate_unit_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::must_be_positive(field));
    }

    if amount > MAX_UNIT_AMOUNT {
        return Err(ValidationError::AmountOutOfRange {
            field: field.to_string(),
            min: Money::from_cents(1),
            max: MAX_UNIT_AMOUNT,
        });
    }

    Ok(())
}

/// Validates a low-stock threshold (used by the inventory view).
pub fn validate_low_stock_threshold(threshold: i64) -> ValidationResult<()> {
    if threshold < 0 {
        return Err(ValidationError::OutOfRange {
            field: "low stock threshold".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Parses an ISO `YYYY-MM-DD` calendar date.
///
/// ## Example
/// ```rust
/// use stockbook_core::validation::parse_iso_date;
///
/// let date = parse_iso_date("sale date", "2024-01-02").unwrap();
/// assert_eq!(date.to_string(), "2024-01-02");
/// assert!(parse_iso_date("sale date", "02/01/2024").is_err());
/// ```
pub fn parse_iso_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| ValidationError::invalid_format(field, "expected YYYY-MM-DD"))
}

// =============================================================================
// Unit Tests
// =============================================================================
