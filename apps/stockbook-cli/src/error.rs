//! # Application Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Stockbook                              │
//! │                                                                         │
//! │  stockbook sale --product "Gold Flake" --quantity 30 ...               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  AppResult<CommandOutput>                                        │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Bad input? ──── ValidationError ─────────────────┐              │  │
//! │  │         │                                         │              │  │
//! │  │         ▼                                         ▼              │  │
//! │  │  Ledger refused? ── LedgerError::InsufficientStock ─► AppError ─►│  │
//! │  │         │                                         ▲              │  │
//! │  │         ▼                                         │              │  │
//! │  │  Store failed? ──── DbError (logged, generic) ────┘              │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr:  Error: Insufficient stock for Gold Flake. Available: 20 units │
//! │  --json:  {"code":"INSUFFICIENT_STOCK","message":"..."}                │
//! │  exit status: ErrorCode::exit_status()                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use stockbook_core::ValidationError;
use stockbook_db::{DbError, LedgerError};

/// Error returned from CLI commands.
///
/// ## Serialization
/// This is what `--json` prints when a command fails:
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Insufficient stock for Gold Flake. Available: 20 units"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct AppError {
    /// Machine-readable error code for scripts
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Named product does not exist
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Sale exceeds stock on hand
    InsufficientStock,

    /// Missing or wrong credentials
    Unauthorized,

    /// Database operation failed
    DatabaseError,

    /// File export or other local I/O failed
    Io,

    /// Anything else
    Internal,
}

impl ErrorCode {
    /// Process exit status for this kind of failure.
    ///
    /// Operator mistakes and refused entries exit with 1, infrastructure
    /// failures with 2.
    pub fn exit_status(&self) -> u8 {
        match self {
            ErrorCode::NotFound
            | ErrorCode::ValidationError
            | ErrorCode::InsufficientStock
            | ErrorCode::Unauthorized => 1,
            ErrorCode::DatabaseError | ErrorCode::Io | ErrorCode::Internal => 2,
        }
    }
}

impl AppError {
    /// Creates a new application error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        AppError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an authentication error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Unauthorized, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }
}

/// Result type for CLI commands.
pub type AppResult<T> = Result<T, AppError>;

// =============================================================================
// Conversions
// =============================================================================

/// Converts database errors to application errors.
impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AppError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => AppError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                AppError::new(ErrorCode::DatabaseError, "Invalid reference")
            }
            DbError::PoolExhausted => {
                AppError::new(ErrorCode::DatabaseError, "Database is busy, try again")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts ledger errors to application errors.
impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Validation(e) => e.into(),
            LedgerError::ProductNotFound { name } => AppError::not_found("Product", &name),
            err @ LedgerError::InsufficientStock { .. } => {
                AppError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            LedgerError::Storage(e) => e.into(),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("I/O error: {}", err);
        AppError::new(ErrorCode::Io, format!("File operation failed: {}", err))
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        tracing::error!("CSV export failed: {}", err);
        AppError::new(ErrorCode::Io, format!("CSV export failed: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::internal(format!("JSON encoding failed: {}", err))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_reports_available() {
        let err: AppError = LedgerError::InsufficientStock {
            product: "Gold Flake".to_string(),
            available: 20,
            requested: 30,
        }
        .into();

        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.message, "Insufficient stock for Gold Flake. Available: 20 units");
        assert_eq!(err.code.exit_status(), 1);
    }

    #[test]
    fn test_storage_errors_are_generic() {
        let err: AppError =
            LedgerError::Storage(DbError::QueryFailed("no such column: x".to_string())).into();

        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Database operation failed");
        assert_eq!(err.code.exit_status(), 2);
    }

    #[test]
    fn test_not_found_and_validation() {
        let err: AppError = LedgerError::ProductNotFound {
            name: "Navy Cut".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Product not found: Navy Cut");

        let err: AppError = LedgerError::Validation(ValidationError::required("supplier")).into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "supplier is required");
    }

    #[test]
    fn test_json_shape() {
        let err = AppError::unauthorized("Invalid username or password");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "UNAUTHORIZED");
        assert_eq!(json["message"], "Invalid username or password");
    }
}
