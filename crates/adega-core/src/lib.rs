//! # adega-core: Pure Domain Logic for Adega Stock
//!
//! This crate is the **heart** of the adega stock system. It contains the
//! domain vocabulary and rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Adega Stock Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Request layer (out of scope)                       │   │
//! │  │    entry scan ── exit scan ── new product ── search ── reports  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ adega-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │   types   │  │   money   │  │   error   │  │ validation│   │   │
//! │  │   │  Product  │  │   Money   │  │ CoreError │  │   rules   │   │   │
//! │  │   │  Movement │  │  parsing  │  │           │  │   checks  │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  adega-db (Database Layer)                      │   │
//! │  │        SQLite queries, migrations, ledger transactions          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Shop, Category, Product, Movement, reports)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - The single parsing/validation boundary for raw input

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use adega_core::Money` instead of
// `use adega_core::money::Money`

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Name given to the shop record when none exists yet.
///
/// The system is single-tenant by convention: one shop row, bootstrapped on
/// first access and passed explicitly through every operation.
pub const DEFAULT_SHOP_NAME: &str = "Adega Principal";

/// Category assigned when the new-product form leaves the field blank.
pub const DEFAULT_CATEGORY_NAME: &str = "Geral";

/// Maximum quantity of a single movement.
///
/// Prevents a mistyped barcode digit landing in the quantity field from
/// moving thousands of units.
pub const MAX_MOVEMENT_QUANTITY: i64 = 9_999;

/// Maximum barcode length accepted from the scanner field.
pub const BARCODE_MAX_LEN: usize = 60;

/// Maximum product name length.
pub const PRODUCT_NAME_MAX_LEN: usize = 150;

/// Maximum catalog search term length.
pub const SEARCH_TERM_MAX_LEN: usize = 100;

/// Result cap for catalog search when the caller gives none.
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Conventional low-stock threshold for the report filter.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// Days covered by the sales report when no period is given.
pub const DEFAULT_REPORT_DAYS: i64 = 7;
