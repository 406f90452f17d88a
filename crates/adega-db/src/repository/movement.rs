//! # Movement Repository
//!
//! Read access to the append-only movement ledger.
//!
//! There is no insert, update or single-row delete here:
//! - Inserts happen only inside [`crate::ledger::Ledger`] transactions,
//!   together with the matching stock change.
//! - Updates never happen; a movement is immutable once created.
//! - The only delete path is the bulk report clear in
//!   [`crate::reporting::Reports::clear_report`].

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use adega_core::Movement;

/// Columns selected for a full `Movement` row.
const MOVEMENT_COLUMNS: &str = "id, shop_id, product_id, kind, quantity, note, created_at";

/// Repository for movement ledger reads.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    pool: SqlitePool,
}

impl MovementRepository {
    /// Creates a new MovementRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MovementRepository { pool }
    }

    /// Gets a movement by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Movement>> {
        let sql = format!("SELECT {MOVEMENT_COLUMNS} FROM movements WHERE id = ?1");

        let movement = sqlx::query_as::<_, Movement>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?;

        Ok(movement)
    }

    /// Most recent movements for a shop, newest first.
    ///
    /// Backs the movement history screen.
    pub async fn recent(&self, shop_id: &str, limit: u32) -> DbResult<Vec<Movement>> {
        debug!(shop_id = %shop_id, limit = %limit, "Listing recent movements");

        let sql = format!(
            "SELECT {MOVEMENT_COLUMNS} FROM movements \
             WHERE shop_id = ?1 \
             ORDER BY created_at DESC \
             LIMIT ?2"
        );

        let movements = sqlx::query_as::<_, Movement>(&sql)
            .bind(shop_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::from)?;

        Ok(movements)
    }

    /// Full movement history of one product, oldest first.
    ///
    /// Replaying this in order from the product's baseline reproduces its
    /// current stock count.
    pub async fn by_product(&self, product_id: &str) -> DbResult<Vec<Movement>> {
        let sql = format!(
            "SELECT {MOVEMENT_COLUMNS} FROM movements \
             WHERE product_id = ?1 \
             ORDER BY created_at ASC"
        );

        let movements = sqlx::query_as::<_, Movement>(&sql)
            .bind(product_id)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::from)?;

        Ok(movements)
    }

    /// Counts all movements for a shop (for diagnostics).
    pub async fn count(&self, shop_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movements WHERE shop_id = ?1")
            .bind(shop_id)
            .fetch_one(&self.pool)
            .await
            .map_err(DbError::from)?;

        Ok(count)
    }
}
