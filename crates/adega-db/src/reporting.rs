//! # Reporting Aggregator
//!
//! Period-scoped sales summaries, the low-stock list and the destructive
//! report clear.
//!
//! ## Read Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  summarize(shop, start, end)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SELECT exit movements ⋈ products  (kind = 'exit' only)                 │
//! │       │                            Entries never appear in sales        │
//! │       ▼                                                                 │
//! │  SalesSummary::from_lines ── totals computed in adega-core, pure        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Line values use the product's **current** sale price. A price edit
//! therefore retroactively changes reported totals for past sales. That is
//! the intended behavior of this system, not an accident; fixing it would
//! need per-movement price snapshots and a product-owner decision.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DbError, StockResult};
use crate::repository::product::ProductRepository;
use adega_core::validation::validate_threshold;
use adega_core::{Product, SalesLine, SalesSummary, DEFAULT_LOW_STOCK_THRESHOLD, DEFAULT_REPORT_DAYS};

/// The reporting operation surface. Read-only except for
/// [`Reports::clear_report`].
#[derive(Debug, Clone)]
pub struct Reports {
    pool: SqlitePool,
}

impl Reports {
    /// Creates a new Reports surface.
    pub fn new(pool: SqlitePool) -> Self {
        Reports { pool }
    }

    /// Aggregates exit movements (sales) in `[start, end]` for a shop.
    ///
    /// Lines are ordered newest first for display; the totals are
    /// order-independent. Entry movements are never counted as sales.
    pub async fn summarize(
        &self,
        shop_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StockResult<SalesSummary> {
        debug!(shop_id = %shop_id, %start, %end, "Summarizing sales");

        let lines = sqlx::query_as::<_, SalesLine>(
            "SELECT m.id AS movement_id, m.product_id, p.name AS product_name, \
                    p.barcode, m.quantity, p.sale_price AS unit_price, m.created_at \
             FROM movements m \
             JOIN products p ON p.id = m.product_id \
             WHERE m.shop_id = ?1 \
               AND m.kind = 'exit' \
               AND m.created_at >= ?2 \
               AND m.created_at <= ?3 \
             ORDER BY m.created_at DESC",
        )
        .bind(shop_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(SalesSummary::from_lines(shop_id, start, end, lines))
    }

    /// Today's sales: start of the current UTC day through now.
    pub async fn sales_today(&self, shop_id: &str) -> StockResult<SalesSummary> {
        let now = Utc::now();
        let start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        self.summarize(shop_id, start, now).await
    }

    /// The reporting window used when the period filter is blank: the last
    /// seven days through now.
    pub fn default_period() -> (DateTime<Utc>, DateTime<Utc>) {
        let now = Utc::now();
        (now - Duration::days(DEFAULT_REPORT_DAYS), now)
    }

    /// Products at or below `threshold` (default 5), emptiest shelves
    /// first, ties broken by name.
    pub async fn low_stock(
        &self,
        shop_id: &str,
        threshold: Option<i64>,
    ) -> StockResult<Vec<Product>> {
        let threshold = threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
        validate_threshold(threshold)?;

        Ok(ProductRepository::new(self.pool.clone())
            .low_stock(shop_id, threshold)
            .await?)
    }

    /// Deletes exit movements in `[start, end]` and returns how many rows
    /// were removed.
    ///
    /// ## This is a history wipe, not an inventory rollback
    /// - Entry movements are untouched
    /// - `stock_quantity` is untouched
    ///
    /// Afterwards the surviving movement history no longer reconciles with
    /// `stock_quantity`; the baseline-plus-movements invariant holds only
    /// from the clear onwards. Preserved behavior of the original system.
    ///
    /// Destructive and admin-only: access gating is the **caller's**
    /// responsibility, this crate performs none.
    pub async fn clear_report(
        &self,
        shop_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StockResult<u64> {
        let result = sqlx::query(
            "DELETE FROM movements \
             WHERE shop_id = ?1 \
               AND kind = 'exit' \
               AND created_at >= ?2 \
               AND created_at <= ?3",
        )
        .bind(shop_id)
        .bind(start)
        .bind(end)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        let removed = result.rows_affected();
        warn!(
            shop_id = %shop_id,
            removed,
            "Sales report cleared; stock no longer reconciles with remaining history"
        );

        Ok(removed)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::NewProduct;
    use crate::pool::{Database, DbConfig};
    use adega_core::{Money, MovementKind, DEFAULT_SHOP_NAME};

    async fn setup() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let shop = db.shops().get_or_create(DEFAULT_SHOP_NAME).await.unwrap();
        (db, shop.id)
    }

    async fn add_product(
        db: &Database,
        shop_id: &str,
        name: &str,
        barcode: &str,
        sale_centavos: i64,
        stock: i64,
    ) -> String {
        db.catalog()
            .create_product(
                shop_id,
                NewProduct {
                    name: name.to_string(),
                    barcode: Some(barcode.to_string()),
                    category_id: None,
                    cost_price: Money::from_centavos(sale_centavos / 2),
                    sale_price: Money::from_centavos(sale_centavos),
                    initial_quantity: stock,
                },
            )
            .await
            .unwrap()
            .id
    }

    fn wide_window() -> (DateTime<Utc>, DateTime<Utc>) {
        let now = Utc::now();
        (now - Duration::hours(1), now + Duration::hours(1))
    }

    #[tokio::test]
    async fn test_summarize_counts_exits_only() {
        // Entries must never show up in a sales report
        let (db, shop_id) = setup().await;
        let product = add_product(&db, &shop_id, "Vinho", "000111", 1800, 10).await;
        let ledger = db.ledger();

        ledger.record_exit(&shop_id, &product, 3, None).await.unwrap();
        ledger.record_entry(&shop_id, &product, 5, Some("restock")).await.unwrap();
        ledger.record_exit(&shop_id, &product, 2, None).await.unwrap();

        let (start, end) = wide_window();
        let summary = db.reports().summarize(&shop_id, start, end).await.unwrap();

        assert_eq!(summary.movement_count, 2);
        assert_eq!(summary.total_quantity, 5);
        assert_eq!(summary.total_value, Money::from_centavos(5 * 1800));
        assert!(summary.lines.iter().all(|l| l.quantity > 0));
    }

    #[tokio::test]
    async fn test_summarize_orders_newest_first() {
        let (db, shop_id) = setup().await;
        let product = add_product(&db, &shop_id, "Vinho", "000111", 1800, 10).await;
        let ledger = db.ledger();

        let first = ledger.record_exit(&shop_id, &product, 1, None).await.unwrap();
        let second = ledger.record_exit(&shop_id, &product, 2, None).await.unwrap();

        let (start, end) = wide_window();
        let summary = db.reports().summarize(&shop_id, start, end).await.unwrap();

        assert_eq!(summary.lines.len(), 2);
        assert_eq!(summary.lines[0].movement_id, second.id);
        assert_eq!(summary.lines[1].movement_id, first.id);
    }

    #[tokio::test]
    async fn test_summarize_respects_window() {
        let (db, shop_id) = setup().await;
        let product = add_product(&db, &shop_id, "Vinho", "000111", 1800, 10).await;

        db.ledger().record_exit(&shop_id, &product, 1, None).await.unwrap();

        // A window entirely in the past sees nothing
        let now = Utc::now();
        let summary = db
            .reports()
            .summarize(&shop_id, now - Duration::hours(3), now - Duration::hours(2))
            .await
            .unwrap();
        assert_eq!(summary.movement_count, 0);
        assert!(summary.total_value.is_zero());

        let today = db.reports().sales_today(&shop_id).await.unwrap();
        assert_eq!(today.movement_count, 1);
    }

    #[tokio::test]
    async fn test_price_edit_rewrites_report_totals() {
        // Documented quirk: totals use the price at query time
        let (db, shop_id) = setup().await;
        let product = add_product(&db, &shop_id, "Vinho", "000111", 1800, 10).await;

        db.ledger().record_exit(&shop_id, &product, 2, None).await.unwrap();

        let (start, end) = wide_window();
        let before = db.reports().summarize(&shop_id, start, end).await.unwrap();
        assert_eq!(before.total_value, Money::from_centavos(3600));

        db.catalog()
            .update_prices(
                &shop_id,
                &product,
                Money::from_centavos(1000),
                Money::from_centavos(2500),
            )
            .await
            .unwrap();

        let after = db.reports().summarize(&shop_id, start, end).await.unwrap();
        assert_eq!(after.total_value, Money::from_centavos(5000));
    }

    #[tokio::test]
    async fn test_low_stock_uses_default_threshold() {
        let (db, shop_id) = setup().await;
        add_product(&db, &shop_id, "Quase Vazio", "000111", 1800, 2).await;
        add_product(&db, &shop_id, "No Limite", "000222", 1800, 5).await;
        add_product(&db, &shop_id, "Cheio", "000333", 1800, 40).await;

        let low = db.reports().low_stock(&shop_id, None).await.unwrap();
        let names: Vec<&str> = low.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Quase Vazio", "No Limite"]);

        assert!(db.reports().low_stock(&shop_id, Some(-1)).await.is_err());
    }

    #[tokio::test]
    async fn test_clear_report_removes_exits_only_and_keeps_stock() {
        // Scenario: the clear is a pure history wipe. Stock stays where the
        // full history left it and is afterwards inconsistent with what
        // remains; expected, not a bug.
        let (db, shop_id) = setup().await;
        let product = add_product(&db, &shop_id, "Vinho", "000111", 1800, 10).await;
        let ledger = db.ledger();

        ledger.record_entry(&shop_id, &product, 5, None).await.unwrap();
        ledger.record_exit(&shop_id, &product, 4, None).await.unwrap();
        ledger.record_exit(&shop_id, &product, 1, None).await.unwrap();
        // 10 + 5 - 4 - 1 = 10

        let (start, end) = wide_window();
        let removed = db.reports().clear_report(&shop_id, start, end).await.unwrap();
        assert_eq!(removed, 2);

        // Entries survive; exits are gone
        let history = db.movements().by_product(&product).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].kind, MovementKind::Entry);

        // Stock untouched by the clear...
        let stock = db
            .products()
            .get_by_id(&product)
            .await
            .unwrap()
            .unwrap()
            .stock_quantity;
        assert_eq!(stock, 10);

        // ...and therefore no longer derivable from the surviving history
        let replayed: i64 = 10 + history.iter().map(|m| m.signed_quantity()).sum::<i64>();
        assert_ne!(stock, replayed);

        // The report itself is now empty
        let summary = db.reports().summarize(&shop_id, start, end).await.unwrap();
        assert_eq!(summary.movement_count, 0);
    }

    #[test]
    fn test_default_period_spans_a_week() {
        let (start, end) = Reports::default_period();
        assert_eq!((end - start).num_days(), 7);
    }
}
