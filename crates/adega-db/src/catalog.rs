//! # Catalog Workflow
//!
//! Barcode lookup, product creation and search: the workflow behind the
//! scan screens.
//!
//! ## The Scan Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operator scans a barcode                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  resolve_barcode(shop, code)                                            │
//! │       │                                                                 │
//! │       ├── Some(product) ──► entry/exit screen confirms a quantity       │
//! │       │                     └──► Ledger::record_entry / record_exit     │
//! │       │                                                                 │
//! │       └── None ──► new-product form, barcode pre-filled                 │
//! │                    └──► create_product(shop, form)                      │
//! │                         └──► back to the screen the scan came from      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An unknown barcode is an expected outcome, not an error: it returns
//! `Ok(None)` and the request layer routes to the create form.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, StockError, StockResult};
use crate::repository::category::CategoryRepository;
use crate::repository::product::ProductRepository;
use adega_core::validation::{
    validate_barcode, validate_price, validate_product_name, validate_search_term,
};
use adega_core::{
    Category, CoreError, Money, Product, ValidationError, DEFAULT_CATEGORY_NAME,
    DEFAULT_SEARCH_LIMIT,
};
use chrono::Utc;

// =============================================================================
// Input
// =============================================================================

/// Validated-on-use input for product creation.
///
/// Field values come from the new-product form; `Catalog::create_product`
/// runs them through the validation boundary before touching the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    /// Display name (required, ≤150 chars).
    pub name: String,

    /// Barcode pre-filled from the scan that missed. Optional: products
    /// sold loose have none.
    pub barcode: Option<String>,

    /// Category id; `None` falls back to the "Geral" default category.
    pub category_id: Option<String>,

    /// Purchase cost (non-negative).
    pub cost_price: Money,

    /// Sale price (non-negative).
    pub sale_price: Money,

    /// Opening stock count (≥ 0). A baseline, not a ledger event: no
    /// movement row is written for it.
    pub initial_quantity: i64,
}

// =============================================================================
// Catalog
// =============================================================================

/// The lookup/create workflow surface.
#[derive(Debug, Clone)]
pub struct Catalog {
    pool: SqlitePool,
}

impl Catalog {
    /// Creates a new Catalog.
    pub fn new(pool: SqlitePool) -> Self {
        Catalog { pool }
    }

    fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.pool.clone())
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Resolves a scanned barcode to a product of this shop.
    ///
    /// `Ok(None)` means "unknown barcode": the caller routes to product
    /// creation. Blank scans resolve to `None` as well; this operation
    /// never fails on user input.
    ///
    /// Pure read: calling it repeatedly with no intervening writes returns
    /// the same result.
    pub async fn resolve_barcode(
        &self,
        shop_id: &str,
        barcode: &str,
    ) -> StockResult<Option<Product>> {
        let barcode = barcode.trim();
        if barcode.is_empty() {
            return Ok(None);
        }

        Ok(self.products().get_by_barcode(shop_id, barcode).await?)
    }

    /// Case-insensitive substring search on name or barcode.
    ///
    /// Results are ordered by name ascending and capped at `limit`
    /// (default 10).
    pub async fn search(
        &self,
        shop_id: &str,
        term: &str,
        limit: Option<u32>,
    ) -> StockResult<Vec<Product>> {
        let term = validate_search_term(term)?;
        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT);

        Ok(self.products().search(shop_id, &term, limit).await?)
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Creates a product from the new-product form.
    ///
    /// ## Validation
    /// Name, barcode, prices and initial quantity pass the validation
    /// boundary first; nothing is written when any of them fail.
    ///
    /// ## Uniqueness
    /// A barcode already present in this shop is refused with
    /// [`CoreError::DuplicateBarcode`] regardless of differing name or
    /// prices. The `(shop_id, barcode)` unique index backs this under
    /// concurrent creation.
    pub async fn create_product(&self, shop_id: &str, new: NewProduct) -> StockResult<Product> {
        let name = validate_product_name(&new.name)?;
        let barcode = match new.barcode.as_deref() {
            Some(code) => Some(validate_barcode(code)?),
            None => None,
        };
        validate_price(new.cost_price.centavos())?;
        validate_price(new.sale_price.centavos())?;
        if new.initial_quantity < 0 {
            return Err(ValidationError::OutOfRange {
                field: "initial stock".to_string(),
                min: 0,
                max: i64::MAX,
            }
            .into());
        }

        if let Some(code) = barcode.as_deref() {
            if self.products().get_by_barcode(shop_id, code).await?.is_some() {
                return Err(CoreError::DuplicateBarcode {
                    barcode: code.to_string(),
                }
                .into());
            }
        }

        let category_id = match new.category_id {
            Some(id) => {
                self.categories()
                    .get_by_id(&id)
                    .await?
                    .ok_or(CoreError::CategoryNotFound(id))?
                    .id
            }
            None => {
                self.categories()
                    .get_or_create(DEFAULT_CATEGORY_NAME)
                    .await?
                    .id
            }
        };

        let product = Product {
            id: Uuid::new_v4().to_string(),
            shop_id: shop_id.to_string(),
            name,
            category_id,
            barcode,
            cost_price: new.cost_price,
            sale_price: new.sale_price,
            stock_quantity: new.initial_quantity,
            created_at: Utc::now(),
        };

        match self.products().insert(&product).await {
            Ok(()) => {
                info!(
                    id = %product.id,
                    name = %product.name,
                    stock = product.stock_quantity,
                    "Product created"
                );
                Ok(product)
            }
            // Raced another creation of the same barcode past the pre-check
            Err(DbError::UniqueViolation { .. }) => Err(CoreError::DuplicateBarcode {
                barcode: product.barcode.clone().unwrap_or_default(),
            }
            .into()),
            Err(e) => Err(e.into()),
        }
    }

    // =========================================================================
    // Category administration
    // =========================================================================

    /// Creates a category.
    pub async fn create_category(&self, name: &str) -> StockResult<Category> {
        let name = validate_product_name(name)?;

        match self.categories().insert(&name).await {
            Ok(category) => Ok(category),
            Err(DbError::UniqueViolation { .. }) => {
                Err(ValidationError::InvalidFormat {
                    field: "category".to_string(),
                    reason: format!("'{name}' already exists"),
                }
                .into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Lists all categories ordered by name.
    pub async fn list_categories(&self) -> StockResult<Vec<Category>> {
        Ok(self.categories().list().await?)
    }

    /// Deletes a category.
    ///
    /// Refused with [`CoreError::CategoryInUse`] while any product still
    /// references it (protect-on-delete).
    pub async fn delete_category(&self, category_id: &str) -> StockResult<()> {
        let category = self
            .categories()
            .get_by_id(category_id)
            .await?
            .ok_or_else(|| CoreError::CategoryNotFound(category_id.to_string()))?;

        match self.categories().delete(category_id).await {
            Ok(()) => {
                debug!(id = %category_id, name = %category.name, "Category deleted");
                Ok(())
            }
            Err(DbError::ForeignKeyViolation { .. }) => Err(CoreError::CategoryInUse {
                name: category.name,
            }
            .into()),
            Err(e) => Err(e.into()),
        }
    }

    // =========================================================================
    // Admin overrides
    // =========================================================================

    /// Sets a product's stock to an absolute value, outside the ledger.
    ///
    /// This is the admin's inline correction: it resets the baseline that
    /// the movement invariant builds on and writes no movement. The caller
    /// is expected to have gated access.
    pub async fn override_stock(
        &self,
        shop_id: &str,
        product_id: &str,
        stock_quantity: i64,
    ) -> StockResult<()> {
        self.owned_product(shop_id, product_id).await?;
        Ok(self.products().override_stock(product_id, stock_quantity).await?)
    }

    /// Updates a product's cost and sale prices.
    pub async fn update_prices(
        &self,
        shop_id: &str,
        product_id: &str,
        cost_price: Money,
        sale_price: Money,
    ) -> StockResult<()> {
        validate_price(cost_price.centavos())?;
        validate_price(sale_price.centavos())?;

        self.owned_product(shop_id, product_id).await?;
        Ok(self
            .products()
            .update_prices(product_id, cost_price, sale_price)
            .await?)
    }

    /// Fetches a product and verifies it belongs to the shop.
    async fn owned_product(&self, shop_id: &str, product_id: &str) -> StockResult<Product> {
        let product = self
            .products()
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        if product.shop_id != shop_id {
            return Err(CoreError::ShopMismatch {
                product_id: product_id.to_string(),
                shop_id: shop_id.to_string(),
            }
            .into());
        }

        Ok(product)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
