//! # Validation Module
//!
//! The single parsing/validation boundary for request-supplied input.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request layer (out of scope)                                  │
//! │  ├── Form field presence, HTTP-level checks                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Raw strings become typed values exactly once                       │
//! │  └── Quantities positive, money fixed-point, lengths bounded            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL / CHECK constraints                                       │
//! │  ├── UNIQUE (shop_id, barcode)                                          │
//! │  └── Foreign key constraints                                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Scattered ad hoc string-to-number coercion is exactly the failure mode
//! this module replaces: a quantity or price that reaches the ledger has
//! been validated here, once.
//!
//! ## Usage
//! ```rust
//! use adega_core::validation::{parse_quantity, validate_barcode};
//!
//! // Scanner forms default a blank quantity to 1
//! assert_eq!(parse_quantity("").unwrap(), 1);
//! assert_eq!(parse_quantity("3").unwrap(), 3);
//!
//! validate_barcode("7891000100103").unwrap();
//! ```

use crate::error::ValidationError;
use crate::{BARCODE_MAX_LEN, MAX_MOVEMENT_QUANTITY, PRODUCT_NAME_MAX_LEN, SEARCH_TERM_MAX_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Quantity Parsing
// =============================================================================

/// Parses a movement quantity typed next to the barcode field.
///
/// ## Rules
/// - Empty input defaults to 1 (the scan-and-enter workflow rarely types a
///   quantity)
/// - Must parse as an integer; garbage is an error, not a silent 1
/// - Must be positive and at most [`MAX_MOVEMENT_QUANTITY`]
pub fn parse_quantity(raw: &str) -> ValidationResult<i64> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Ok(1);
    }

    let qty: i64 = raw.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "quantity".to_string(),
        reason: "expected a whole number".to_string(),
    })?;

    validate_quantity(qty)?;
    Ok(qty)
}

/// Validates an already-numeric movement quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_MOVEMENT_QUANTITY`]
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_MOVEMENT_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_MOVEMENT_QUANTITY,
        });
    }

    Ok(())
}

/// Parses the initial stock field of the new-product form.
///
/// ## Rules
/// - Empty input defaults to 0
/// - Must parse as an integer ≥ 0 (a baseline, not a movement, so zero is
///   allowed)
pub fn parse_initial_stock(raw: &str) -> ValidationResult<i64> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Ok(0);
    }

    let qty: i64 = raw.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "initial stock".to_string(),
        reason: "expected a whole number".to_string(),
    })?;

    if qty < 0 {
        return Err(ValidationError::OutOfRange {
            field: "initial stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(qty)
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 150 characters
///
/// Returns the trimmed name.
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > PRODUCT_NAME_MAX_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: PRODUCT_NAME_MAX_LEN,
        });
    }

    Ok(name.to_string())
}

/// Validates a scanned barcode.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 60 characters
/// - No format/checksum validation: the scanner hardware is trusted and
///   hand-typed codes are allowed
///
/// Returns the trimmed barcode.
pub fn validate_barcode(barcode: &str) -> ValidationResult<String> {
    let barcode = barcode.trim();

    if barcode.is_empty() {
        return Err(ValidationError::Required {
            field: "barcode".to_string(),
        });
    }

    if barcode.chars().count() > BARCODE_MAX_LEN {
        return Err(ValidationError::TooLong {
            field: "barcode".to_string(),
            max: BARCODE_MAX_LEN,
        });
    }

    Ok(barcode.to_string())
}

/// Validates a catalog search term.
///
/// ## Rules
/// - Can be empty (matches everything, capped by the search limit)
/// - Maximum 100 characters
///
/// Returns the trimmed term.
pub fn validate_search_term(term: &str) -> ValidationResult<String> {
    let term = term.trim();

    if term.chars().count() > SEARCH_TERM_MAX_LEN {
        return Err(ValidationError::TooLong {
            field: "search term".to_string(),
            max: SEARCH_TERM_MAX_LEN,
        });
    }

    Ok(term.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price.
///
/// ## Rules
/// - Must be non-negative (zero is allowed: tasting items are given away)
pub fn validate_price(centavos: i64) -> ValidationResult<()> {
    if centavos < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a low-stock threshold.
///
/// ## Rules
/// - Must be non-negative
pub fn validate_threshold(threshold: i64) -> ValidationResult<()> {
    if threshold < 0 {
        return Err(ValidationError::OutOfRange {
            field: "threshold".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity_defaults_to_one() {
        assert_eq!(parse_quantity("").unwrap(), 1);
        assert_eq!(parse_quantity("   ").unwrap(), 1);
    }

    #[test]
    fn test_parse_quantity_valid() {
        assert_eq!(parse_quantity("1").unwrap(), 1);
        assert_eq!(parse_quantity(" 42 ").unwrap(), 42);
        assert_eq!(parse_quantity("9999").unwrap(), 9999);
    }

    #[test]
    fn test_parse_quantity_rejects_bad_input() {
        // Garbage is an error, not a silent fallback to 1
        assert!(parse_quantity("abc").is_err());
        assert!(parse_quantity("1.5").is_err());
        assert!(parse_quantity("0").is_err());
        assert!(parse_quantity("-3").is_err());
        assert!(parse_quantity("10000").is_err());
    }

    #[test]
    fn test_parse_initial_stock() {
        assert_eq!(parse_initial_stock("").unwrap(), 0);
        assert_eq!(parse_initial_stock("0").unwrap(), 0);
        assert_eq!(parse_initial_stock("25").unwrap(), 25);
        assert!(parse_initial_stock("-1").is_err());
        assert!(parse_initial_stock("many").is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert_eq!(
            validate_product_name("  Vinho Tinto Seco  ").unwrap(),
            "Vinho Tinto Seco"
        );
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"a".repeat(151)).is_err());
    }

    #[test]
    fn test_validate_barcode() {
        assert_eq!(validate_barcode(" 7891000100103 ").unwrap(), "7891000100103");
        assert!(validate_barcode("").is_err());
        assert!(validate_barcode(&"9".repeat(61)).is_err());
    }

    #[test]
    fn test_validate_search_term() {
        assert_eq!(validate_search_term("  vinho ").unwrap(), "vinho");
        assert_eq!(validate_search_term("").unwrap(), "");
        assert!(validate_search_term(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(0).is_ok());
        assert!(validate_price(1800).is_ok());
        assert!(validate_price(-1).is_err());
    }

    #[test]
    fn test_validate_threshold() {
        assert!(validate_threshold(0).is_ok());
        assert!(validate_threshold(5).is_ok());
        assert!(validate_threshold(-1).is_err());
    }
}
