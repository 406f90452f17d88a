//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    R$ 10,50 is stored as 1050                                           │
//! │    Every price and report total in the system is exact                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use adega_core::money::Money;
//!
//! // Create from centavos (preferred)
//! let price = Money::from_centavos(1050); // R$ 10,50
//!
//! // Parse operator input ("10,50" or "10.50")
//! let typed = Money::parse("10,50").unwrap();
//! assert_eq!(typed, price);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (centavos).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for corrections and deltas
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Two fixed decimal places**: `Money::parse` rounds half-up anything
///   more precise before it enters the system
///
/// Prices on `Product` and totals on `SalesSummary` all flow through this
/// type; the database stores the raw centavos column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use adega_core::money::Money;
    ///
    /// let price = Money::from_centavos(1099); // R$ 10,99
    /// assert_eq!(price.centavos(), 1099);
    /// ```
    #[inline]
    pub const fn from_centavos(centavos: i64) -> Self {
        Money(centavos)
    }

    /// Creates a Money value from major and minor units (reais and centavos).
    ///
    /// ## Example
    /// ```rust
    /// use adega_core::money::Money;
    ///
    /// let price = Money::from_major_minor(10, 99); // R$ 10,99
    /// assert_eq!(price.centavos(), 1099);
    ///
    /// let negative = Money::from_major_minor(-5, 50); // -R$ 5,50
    /// assert_eq!(negative.centavos(), -550);
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -R$ 5,50, not -R$ 4,50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Parses operator-typed input into a Money value.
    ///
    /// Accepts both the Brazilian comma separator (`"10,50"`) and a dot
    /// (`"10.50"`). Empty input is zero, matching the blank price field on
    /// the new-product form. Anything beyond two decimal places is rounded
    /// half-up. Thousands separators are rejected rather than guessed at.
    ///
    /// ## Example
    /// ```rust
    /// use adega_core::money::Money;
    ///
    /// assert_eq!(Money::parse("18,00").unwrap().centavos(), 1800);
    /// assert_eq!(Money::parse("18.005").unwrap().centavos(), 1801);
    /// assert_eq!(Money::parse("").unwrap().centavos(), 0);
    /// assert!(Money::parse("abc").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Money, ValidationError> {
        let raw = input.trim();
        if raw.is_empty() {
            return Ok(Money::zero());
        }

        let (negative, raw) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        // Comma is the decimal separator on Brazilian keyboards
        let normalized = raw.replace(',', ".");
        let mut parts = normalized.splitn(2, '.');
        let int_part = parts.next().unwrap_or("");
        let frac_part = parts.next().unwrap_or("");

        if frac_part.contains('.') {
            return Err(invalid("more than one decimal separator"));
        }
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid("no digits"));
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid("expected digits like 10,50"));
        }

        let major: i64 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| invalid("amount too large"))?
        };

        let digit = |b: Option<u8>| i64::from(b.map(|d| d - b'0').unwrap_or(0));
        let mut frac = frac_part.bytes();
        let mut minor = digit(frac.next()) * 10 + digit(frac.next());

        // Round half-up on the first dropped digit
        if digit(frac.next()) >= 5 {
            minor += 1;
        }

        let centavos = major
            .checked_mul(100)
            .and_then(|v| v.checked_add(minor))
            .ok_or_else(|| invalid("amount too large"))?;

        Ok(Money(if negative { -centavos } else { centavos }))
    }

    /// Returns the value in centavos (smallest currency unit).
    #[inline]
    pub const fn centavos(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (reais) portion.
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (centavos) portion (always 0-99).
    #[inline]
    pub const fn centavos_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use adega_core::money::Money;
    ///
    /// let unit_price = Money::from_centavos(1800); // R$ 18,00
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.centavos(), 5400); // R$ 54,00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and debugging. The rendering layer formats for
/// localization itself.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}R$ {},{:02}",
            sign,
            self.reais().abs(),
            self.centavos_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summation over report lines.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_centavos() {
        let money = Money::from_centavos(1099);
        assert_eq!(money.centavos(), 1099);
        assert_eq!(money.reais(), 10);
        assert_eq!(money.centavos_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        let money = Money::from_major_minor(10, 99);
        assert_eq!(money.centavos(), 1099);

        let negative = Money::from_major_minor(-5, 50);
        assert_eq!(negative.centavos(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_centavos(1099)), "R$ 10,99");
        assert_eq!(format!("{}", Money::from_centavos(500)), "R$ 5,00");
        assert_eq!(format!("{}", Money::from_centavos(-550)), "-R$ 5,50");
        assert_eq!(format!("{}", Money::from_centavos(0)), "R$ 0,00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_centavos(1000);
        let b = Money::from_centavos(500);

        assert_eq!((a + b).centavos(), 1500);
        assert_eq!((a - b).centavos(), 500);
        let result: Money = a * 3;
        assert_eq!(result.centavos(), 3000);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 399]
            .into_iter()
            .map(Money::from_centavos)
            .sum();
        assert_eq!(total.centavos(), 749);
    }

    #[test]
    fn test_parse_plain() {
        assert_eq!(Money::parse("10").unwrap().centavos(), 1000);
        assert_eq!(Money::parse("10.5").unwrap().centavos(), 1050);
        assert_eq!(Money::parse("10.50").unwrap().centavos(), 1050);
        assert_eq!(Money::parse("0.07").unwrap().centavos(), 7);
        assert_eq!(Money::parse(".50").unwrap().centavos(), 50);
    }

    #[test]
    fn test_parse_comma_separator() {
        assert_eq!(Money::parse("10,50").unwrap().centavos(), 1050);
        assert_eq!(Money::parse("18,00").unwrap().centavos(), 1800);
        assert_eq!(Money::parse("0,99").unwrap().centavos(), 99);
    }

    #[test]
    fn test_parse_empty_is_zero() {
        assert_eq!(Money::parse("").unwrap(), Money::zero());
        assert_eq!(Money::parse("   ").unwrap(), Money::zero());
    }

    #[test]
    fn test_parse_rounds_half_up() {
        assert_eq!(Money::parse("1.004").unwrap().centavos(), 100);
        assert_eq!(Money::parse("1.005").unwrap().centavos(), 101);
        assert_eq!(Money::parse("1.0049").unwrap().centavos(), 100);
        // carry into the major unit
        assert_eq!(Money::parse("0.999").unwrap().centavos(), 100);
        assert_eq!(Money::parse("-1.005").unwrap().centavos(), -101);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("10,50,00").is_err());
        assert!(Money::parse("1.234,56").is_err());
        assert!(Money::parse("R$ 10").is_err());
        assert!(Money::parse("-").is_err());
        assert!(Money::parse("99999999999999999999").is_err());
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_centavos(1800);
        let line_total = unit_price.multiply_quantity(3);
        assert_eq!(line_total.centavos(), 5400);
    }
}
