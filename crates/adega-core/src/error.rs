//! # Error Types
//!
//! Domain-specific error types for adega-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  adega-core errors (this file)                                          │
//! │  ├── CoreError        - Domain rule violations                          │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  adega-db errors (separate crate)                                       │
//! │  ├── DbError          - Database operation failures                     │
//! │  └── StockError       - What the request layer sees (merged)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StockError → user message          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (barcode, counts, names)
//! 3. Errors are enum variants, never String
//! 4. Recoverable conditions are values; only programming errors panic

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Domain rule violations.
///
/// Every variant here is a recoverable, user-visible condition: the request
/// layer renders it as a message and no ledger state changes.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found by id.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Insufficient stock to record an exit.
    ///
    /// `available` is the freshest committed stock count at the moment the
    /// exit was refused, so the operator sees what is actually on the shelf.
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// The barcode is already registered for another product in this shop.
    ///
    /// The same code may exist in a different shop; the uniqueness scope is
    /// (shop, barcode).
    #[error("Barcode '{barcode}' is already registered in this shop")]
    DuplicateBarcode { barcode: String },

    /// Category still referenced by products cannot be deleted.
    #[error("Category '{name}' still has products and cannot be deleted")]
    CategoryInUse { name: String },

    /// Category cannot be found by id.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// The product exists but belongs to a different shop.
    #[error("Product {product_id} does not belong to shop {shop_id}")]
    ShopMismatch {
        product_id: String,
        shop_id: String,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Produced by the parsing/validation boundary before any value reaches a
/// ledger or catalog operation.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (bad number, bad decimal, bad UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product: "Red Wine".to_string(),
            available: 7,
            requested: 10,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Red Wine: available 7, requested 10"
        );

        let err = CoreError::DuplicateBarcode {
            barcode: "000111".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Barcode '000111' is already registered in this shop"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::TooLong {
            field: "barcode".to_string(),
            max: 60,
        };
        assert_eq!(err.to_string(), "barcode must be at most 60 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
