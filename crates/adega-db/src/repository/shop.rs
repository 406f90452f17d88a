//! # Shop Repository
//!
//! Bootstrap and lookup for the single shop record.
//!
//! The system is single-tenant: one shop row is created lazily on first
//! access and its id is then passed explicitly through every ledger,
//! catalog and reporting call. There is no process-wide "current shop"
//! global.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use adega_core::Shop;

/// Repository for shop database operations.
#[derive(Debug, Clone)]
pub struct ShopRepository {
    pool: SqlitePool,
}

impl ShopRepository {
    /// Creates a new ShopRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ShopRepository { pool }
    }

    /// Returns the shop record, creating it with `name` if none exists.
    ///
    /// Idempotent; meant to run once at startup. The returned shop's id is
    /// the handle every other operation takes.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let shop = db.shops().get_or_create(DEFAULT_SHOP_NAME).await?;
    /// ```
    pub async fn get_or_create(&self, name: &str) -> DbResult<Shop> {
        if let Some(shop) = self.first().await? {
            return Ok(shop);
        }

        let shop = Shop {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        };

        info!(id = %shop.id, name = %shop.name, "Creating shop record");

        sqlx::query("INSERT INTO shops (id, name, created_at) VALUES (?1, ?2, ?3)")
            .bind(&shop.id)
            .bind(&shop.name)
            .bind(shop.created_at)
            .execute(&self.pool)
            .await
            .map_err(DbError::from)?;

        Ok(shop)
    }

    /// Gets the oldest shop record, if any.
    pub async fn first(&self) -> DbResult<Option<Shop>> {
        let shop = sqlx::query_as::<_, Shop>(
            "SELECT id, name, created_at FROM shops ORDER BY created_at LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(shop)
    }

    /// Gets a shop by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Shop>> {
        debug!(id = %id, "Fetching shop");

        let shop =
            sqlx::query_as::<_, Shop>("SELECT id, name, created_at FROM shops WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(DbError::from)?;

        Ok(shop)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use adega_core::DEFAULT_SHOP_NAME;

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let first = db.shops().get_or_create(DEFAULT_SHOP_NAME).await.unwrap();
        let second = db.shops().get_or_create("Outra Adega").await.unwrap();

        // Second call returns the existing record, name argument ignored
        assert_eq!(first.id, second.id);
        assert_eq!(second.name, DEFAULT_SHOP_NAME);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let shop = db.shops().get_or_create(DEFAULT_SHOP_NAME).await.unwrap();
        let fetched = db.shops().get_by_id(&shop.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, shop.name);

        assert!(db.shops().get_by_id("missing").await.unwrap().is_none());
    }
}
