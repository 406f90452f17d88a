//! # Database Error Types
//!
//! Error types for database operations, plus the unified `StockError` that
//! the request layer consumes.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StockError (this module) ← Merges DbError with CoreError               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Request layer renders a user-facing message                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use adega_core::{CoreError, ValidationError};
use thiserror::Error;

// =============================================================================
// Db Error
// =============================================================================

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context for
/// debugging and user feedback.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Inserting a (shop, barcode) pair that already exists
    /// - Duplicate category name
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Referencing a non-existent category or product
    /// - Deleting a category that products still reference
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Another writer holds the database lock.
    ///
    /// Ledger operations retry once on this before surfacing
    /// [`StockError::Conflict`].
    #[error("Database is busy: {0}")]
    Busy(String),

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// True when retrying the whole transaction may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, DbError::Busy(_) | DbError::PoolExhausted)
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint/lock type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite reports constraint and lock failures as message
                // text:
                //   UNIQUE:  "UNIQUE constraint failed: <table>.<column>"
                //   FK:      "FOREIGN KEY constraint failed"
                //   Lock:    "database is locked" / "database table is locked"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else if msg.contains("database is locked")
                    || msg.contains("database table is locked")
                {
                    DbError::Busy(msg.to_string())
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Stock Error
// =============================================================================

/// Unified error for ledger, catalog and reporting operations.
///
/// This is the type the request-handler layer matches on: domain refusals
/// (insufficient stock, duplicate barcode) are values it renders as
/// messages, `Conflict` is a transient failure surfaced only after an
/// internal retry, and `Db` is fatal for the current request.
#[derive(Debug, Error)]
pub enum StockError {
    /// A domain rule refused the operation. No state changed.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// A write lock could not be acquired even after retrying.
    #[error("Write conflict on product {product_id}; try again")]
    Conflict { product_id: String },

    /// Storage failure. Fatal for the current request, nothing was written.
    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<ValidationError> for StockError {
    fn from(err: ValidationError) -> Self {
        StockError::Domain(CoreError::Validation(err))
    }
}

impl StockError {
    /// True for conditions the operator can fix and resubmit.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StockError::Domain(_) | StockError::Conflict { .. }
        )
    }

    /// The inner domain error, when this is a domain refusal.
    pub fn as_domain(&self) -> Option<&CoreError> {
        match self {
            StockError::Domain(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type for ledger, catalog and reporting operations.
pub type StockResult<T> = Result<T, StockError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        let insufficient = StockError::Domain(CoreError::InsufficientStock {
            product: "Red Wine".to_string(),
            available: 4,
            requested: 6,
        });
        assert!(insufficient.is_recoverable());
        assert!(insufficient.as_domain().is_some());

        let conflict = StockError::Conflict {
            product_id: "p1".to_string(),
        };
        assert!(conflict.is_recoverable());

        let fatal = StockError::Db(DbError::ConnectionFailed("down".to_string()));
        assert!(!fatal.is_recoverable());
        assert!(fatal.as_domain().is_none());
    }

    #[test]
    fn test_transient_db_errors() {
        assert!(DbError::Busy("database is locked".to_string()).is_transient());
        assert!(DbError::PoolExhausted.is_transient());
        assert!(!DbError::QueryFailed("syntax".to_string()).is_transient());
    }
}
