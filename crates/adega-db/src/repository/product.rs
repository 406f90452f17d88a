//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Exact barcode lookup scoped to a shop (the scan workflow's hot path)
//! - Case-insensitive substring search on name or barcode
//! - Insert; admin-only stock override and price updates
//!
//! `stock_quantity` is NOT updated here during normal operation: the ledger
//! owns that column. The only writers outside [`crate::ledger::Ledger`] are
//! [`ProductRepository::insert`] (the initial baseline) and
//! [`ProductRepository::override_stock`] (the explicit admin reset).

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use adega_core::{Money, Product};

/// Columns selected for a full `Product` row.
const PRODUCT_COLUMNS: &str = "id, shop_id, name, category_id, barcode, \
     cost_price, sale_price, stock_quantity, created_at";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?;

        Ok(product)
    }

    /// Exact barcode lookup within one shop.
    ///
    /// `Ok(None)` is the expected unknown-barcode case that the scan
    /// workflow routes to product creation; it is not an error.
    pub async fn get_by_barcode(&self, shop_id: &str, barcode: &str) -> DbResult<Option<Product>> {
        debug!(shop_id = %shop_id, barcode = %barcode, "Barcode lookup");

        let sql =
            format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE shop_id = ?1 AND barcode = ?2");

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(shop_id)
            .bind(barcode)
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?;

        Ok(product)
    }

    /// Case-insensitive substring search on product name or barcode.
    ///
    /// ## Arguments
    /// * `term` - Already-trimmed search term; empty lists the catalog head
    /// * `limit` - Maximum results
    ///
    /// Ordered by name ascending. Pure read: repeating the call with no
    /// intervening writes returns the same rows.
    pub async fn search(&self, shop_id: &str, term: &str, limit: u32) -> DbResult<Vec<Product>> {
        debug!(shop_id = %shop_id, term = %term, limit = %limit, "Searching products");

        if term.is_empty() {
            return self.list_by_name(shop_id, limit).await;
        }

        // LIKE wildcards in the operator's input are literals, not patterns
        let escaped = term
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        let pattern = format!("%{escaped}%");

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE shop_id = ?1 \
               AND (name LIKE ?2 ESCAPE '\\' OR barcode LIKE ?2 ESCAPE '\\') \
             ORDER BY name COLLATE NOCASE ASC \
             LIMIT ?3"
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(shop_id)
            .bind(&pattern)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::from)?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Lists products by name (no search filter).
    async fn list_by_name(&self, shop_id: &str, limit: u32) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE shop_id = ?1 \
             ORDER BY name COLLATE NOCASE ASC \
             LIMIT ?2"
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(shop_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::from)?;

        Ok(products)
    }

    /// Products at or below a stock threshold.
    ///
    /// Ordered by stock ascending, then name ascending, so the emptiest
    /// shelves come first.
    pub async fn low_stock(&self, shop_id: &str, threshold: i64) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE shop_id = ?1 AND stock_quantity <= ?2 \
             ORDER BY stock_quantity ASC, name COLLATE NOCASE ASC"
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(shop_id)
            .bind(threshold)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::from)?;

        Ok(products)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(())` - Inserted
    /// * `Err(DbError::UniqueViolation)` - (shop, barcode) already exists
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            "INSERT INTO products (
                id, shop_id, name, category_id, barcode,
                cost_price, sale_price, stock_quantity, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(&product.id)
        .bind(&product.shop_id)
        .bind(&product.name)
        .bind(&product.category_id)
        .bind(&product.barcode)
        .bind(product.cost_price)
        .bind(product.sale_price)
        .bind(product.stock_quantity)
        .bind(product.created_at)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(())
    }

    /// Sets `stock_quantity` to an absolute value, outside the ledger.
    ///
    /// This is the admin's inline stock correction. It resets the baseline
    /// the movement history builds on; it does not write a movement.
    pub async fn override_stock(&self, id: &str, stock_quantity: i64) -> DbResult<()> {
        debug!(id = %id, stock_quantity = %stock_quantity, "Overriding stock baseline");

        let result = sqlx::query("UPDATE products SET stock_quantity = ?2 WHERE id = ?1")
            .bind(id)
            .bind(stock_quantity)
            .execute(&self.pool)
            .await
            .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Updates cost and sale prices.
    ///
    /// Report totals use the current sale price, so this retroactively
    /// changes the value of past sales in reports. Known behavior, see
    /// `Reports::summarize`.
    pub async fn update_prices(&self, id: &str, cost: Money, sale: Money) -> DbResult<()> {
        debug!(id = %id, cost = %cost, sale = %sale, "Updating prices");

        let result =
            sqlx::query("UPDATE products SET cost_price = ?2, sale_price = ?3 WHERE id = ?1")
                .bind(id)
                .bind(cost)
                .bind(sale)
                .execute(&self.pool)
                .await
                .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts products in a shop (for diagnostics).
    pub async fn count(&self, shop_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE shop_id = ?1")
            .bind(shop_id)
            .fetch_one(&self.pool)
            .await
            .map_err(DbError::from)?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
