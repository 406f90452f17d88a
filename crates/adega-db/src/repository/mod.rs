//! # Repository Module
//!
//! Database repository implementations for the adega stock system.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Request layer                                                          │
//! │       │                                                                 │
//! │       │  db.products().search(shop, "vinho", 10)                        │
//! │       ▼                                                                 │
//! │  ProductRepository                                                      │
//! │  ├── search(&self, shop_id, term, limit)                                │
//! │  ├── get_by_barcode(&self, shop_id, barcode)                            │
//! │  └── insert(&self, product)                                             │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`shop::ShopRepository`] - Shop bootstrap and lookup
//! - [`category::CategoryRepository`] - Category CRUD with protect-on-delete
//! - [`product::ProductRepository`] - Product CRUD, barcode lookup, search
//! - [`movement::MovementRepository`] - Read access to the movement ledger
//!
//! Movements are inserted only by [`crate::ledger::Ledger`], inside its
//! transaction; there is deliberately no `MovementRepository::insert`.

pub mod category;
pub mod movement;
pub mod product;
pub mod shop;
