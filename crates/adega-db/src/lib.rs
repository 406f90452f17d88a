//! # adega-db: Database Layer for Adega Stock
//!
//! This crate provides database access for the adega stock system.
//! It uses SQLite for local storage with sqlx for async operations, and it
//! hosts the three operation surfaces the request layer calls: the stock
//! [`ledger`], the [`catalog`] lookup/create workflow and the [`reporting`]
//! aggregator.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Adega Stock Data Flow                             │
//! │                                                                         │
//! │  Request handler (scan, search, report)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                     adega-db (THIS CRATE)                       │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐   ┌───────────────┐   ┌─────────────────┐  │    │
//! │  │   │   Database    │   │ Repositories  │   │    Surfaces     │  │    │
//! │  │   │   (pool.rs)   │   │ shop/category │   │ Ledger, Catalog │  │    │
//! │  │   │               │◄──│ product/      │◄──│ Reports         │  │    │
//! │  │   │ SqlitePool    │   │ movement      │   │                 │  │    │
//! │  │   └───────────────┘   └───────────────┘   └─────────────────┘  │    │
//! │  │                          + embedded migrations                 │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL mode)                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use adega_db::{Database, DbConfig};
//! use adega_core::DEFAULT_SHOP_NAME;
//!
//! let db = Database::new(DbConfig::new("./adega.db")).await?;
//! let shop = db.shops().get_or_create(DEFAULT_SHOP_NAME).await?;
//!
//! // Scan workflow
//! match db.catalog().resolve_barcode(&shop.id, "7891000100103").await? {
//!     Some(product) => {
//!         db.ledger().record_exit(&shop.id, &product.id, 1, None).await?;
//!     }
//!     None => { /* route to the new-product form */ }
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod reporting;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, StockError, StockResult};
pub use pool::{Database, DbConfig};

// Operation-surface re-exports for convenience
pub use catalog::{Catalog, NewProduct};
pub use ledger::Ledger;
pub use reporting::Reports;

// Repository re-exports
pub use repository::category::CategoryRepository;
pub use repository::movement::MovementRepository;
pub use repository::product::ProductRepository;
pub use repository::shop::ShopRepository;
