//! # Domain Types
//!
//! Core domain types for the adega stock system.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Shop       │   │     Product     │   │    Movement     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  shop_id (FK)   │◄──│  product_id(FK) │       │
//! │  │  name           │   │  barcode        │   │  kind           │       │
//! │  │                 │   │  sale_price     │   │  quantity       │       │
//! │  └─────────────────┘   │  stock_quantity │   │  note           │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                 │                                       │
//! │                        ┌────────┴────────┐   ┌─────────────────┐       │
//! │                        │    Category     │   │  MovementKind   │       │
//! │                        │  ─────────────  │   │  ─────────────  │       │
//! │                        │  unique name    │   │  Entry | Exit   │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Movement` rows are append-only: `stock_quantity` on `Product` must equal
//! the product's baseline plus the signed sum of its movements at all times.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Shop
// =============================================================================

/// The single tenant scope owning all catalog and ledger data.
///
/// One shop record exists by convention; `ShopRepository::get_or_create`
/// bootstraps it at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Shop {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, e.g. "Adega Principal".
    pub name: String,

    /// When the shop was created.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Category
// =============================================================================

/// A product category. Independent of any shop.
///
/// Categories referenced by products are protected from deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Unique display name, e.g. "Vinhos Tintos".
    pub name: String,

    /// When the category was created.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product in a shop's catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Shop this product belongs to.
    pub shop_id: String,

    /// Display name shown to the operator.
    pub name: String,

    /// Category reference.
    pub category_id: String,

    /// Scanned barcode. Unique per shop when present; the same code may
    /// exist in a different shop.
    pub barcode: Option<String>,

    /// Purchase cost, integer centavos.
    pub cost_price: Money,

    /// Sale price, integer centavos.
    pub sale_price: Money,

    /// Current on-hand count. Written only by the ledger, product creation
    /// and the explicit admin override.
    pub stock_quantity: i64,

    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Checks whether an exit of `quantity` units can be recorded.
    ///
    /// Advisory only: the ledger re-checks against the freshest committed
    /// value inside its transaction.
    #[inline]
    pub fn can_exit(&self, quantity: i64) -> bool {
        self.stock_quantity >= quantity
    }

    /// Checks if the product is at or below a low-stock threshold.
    #[inline]
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.stock_quantity <= threshold
    }
}

// =============================================================================
// Movement Kind
// =============================================================================

/// The direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Stock-increasing movement (restock).
    Entry,
    /// Stock-decreasing movement (sale).
    Exit,
}

impl MovementKind {
    /// Stable lowercase name, as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Entry => "entry",
            MovementKind::Exit => "exit",
        }
    }
}

// =============================================================================
// Movement
// =============================================================================

/// An immutable ledger record of a stock entry or exit.
///
/// Movements are created exactly once per confirmed scan and never updated.
/// The only deletion path is the bulk report clear, which removes exit
/// history without touching stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Movement {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Shop scope, denormalized for report queries.
    pub shop_id: String,

    /// Product this movement applies to.
    pub product_id: String,

    /// Entry (restock) or Exit (sale).
    pub kind: MovementKind,

    /// Units moved. Always positive; the kind carries the sign.
    pub quantity: i64,

    /// Optional free-text note, e.g. "restock truck #3".
    pub note: Option<String>,

    /// When the movement was recorded. Immutable.
    pub created_at: DateTime<Utc>,
}

impl Movement {
    /// The movement's effect on stock: positive for entries, negative for
    /// exits.
    #[inline]
    pub fn signed_quantity(&self) -> i64 {
        match self.kind {
            MovementKind::Entry => self.quantity,
            MovementKind::Exit => -self.quantity,
        }
    }
}

// =============================================================================
// Report Types
// =============================================================================

/// One sale line in a period report.
///
/// `unit_price` is the product's sale price **at query time**, not at sale
/// time. Editing a price rewrites history in the report; accepted behavior,
/// see `Reports::summarize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SalesLine {
    /// The exit movement behind this line.
    pub movement_id: String,

    /// Product sold.
    pub product_id: String,

    /// Product name at query time.
    pub product_name: String,

    /// Product barcode at query time.
    pub barcode: Option<String>,

    /// Units sold in this movement.
    pub quantity: i64,

    /// Current sale price per unit.
    pub unit_price: Money,

    /// When the sale was recorded.
    pub created_at: DateTime<Utc>,
}

impl SalesLine {
    /// Line value: quantity × current unit price.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// Aggregated sales for a period. Lines are ordered newest first; the
/// totals are order-independent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesSummary {
    /// Shop the report covers.
    pub shop_id: String,

    /// Inclusive start of the reporting window.
    pub start: DateTime<Utc>,

    /// Inclusive end of the reporting window.
    pub end: DateTime<Utc>,

    /// Exit movements in the window, newest first.
    pub lines: Vec<SalesLine>,

    /// Total units sold.
    pub total_quantity: i64,

    /// Total value at current sale prices.
    pub total_value: Money,

    /// Number of exit movements.
    pub movement_count: i64,
}

impl SalesSummary {
    /// Builds a summary from already-fetched lines.
    ///
    /// Pure aggregation, no I/O; `Reports::summarize` feeds it rows ordered
    /// newest first.
    pub fn from_lines(
        shop_id: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        lines: Vec<SalesLine>,
    ) -> Self {
        let total_quantity = lines.iter().map(|l| l.quantity).sum();
        let total_value = lines.iter().map(|l| l.line_total()).sum();
        let movement_count = lines.len() as i64;

        SalesSummary {
            shop_id: shop_id.into(),
            start,
            end,
            lines,
            total_quantity,
            total_value,
            movement_count,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(qty: i64, price_centavos: i64) -> SalesLine {
        SalesLine {
            movement_id: "m".to_string(),
            product_id: "p".to_string(),
            product_name: "Red Wine".to_string(),
            barcode: Some("000111".to_string()),
            quantity: qty,
            unit_price: Money::from_centavos(price_centavos),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_signed_quantity() {
        let now = Utc::now();
        let mut movement = Movement {
            id: "m".to_string(),
            shop_id: "s".to_string(),
            product_id: "p".to_string(),
            kind: MovementKind::Entry,
            quantity: 5,
            note: None,
            created_at: now,
        };
        assert_eq!(movement.signed_quantity(), 5);

        movement.kind = MovementKind::Exit;
        assert_eq!(movement.signed_quantity(), -5);
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line(3, 1800).line_total().centavos(), 5400);
    }

    #[test]
    fn test_summary_totals() {
        let now = Utc::now();
        let summary =
            SalesSummary::from_lines("shop", now, now, vec![line(3, 1800), line(2, 1000)]);

        assert_eq!(summary.total_quantity, 5);
        assert_eq!(summary.total_value.centavos(), 3 * 1800 + 2 * 1000);
        assert_eq!(summary.movement_count, 2);
    }

    #[test]
    fn test_summary_empty() {
        let now = Utc::now();
        let summary = SalesSummary::from_lines("shop", now, now, Vec::new());

        assert_eq!(summary.total_quantity, 0);
        assert!(summary.total_value.is_zero());
        assert_eq!(summary.movement_count, 0);
    }

    #[test]
    fn test_can_exit() {
        let product = Product {
            id: "p".to_string(),
            shop_id: "s".to_string(),
            name: "Red Wine".to_string(),
            category_id: "c".to_string(),
            barcode: Some("000111".to_string()),
            cost_price: Money::from_centavos(1000),
            sale_price: Money::from_centavos(1800),
            stock_quantity: 10,
            created_at: Utc::now(),
        };

        assert!(product.can_exit(10));
        assert!(!product.can_exit(11));
        assert!(product.is_low_stock(10));
        assert!(!product.is_low_stock(9));
    }
}
