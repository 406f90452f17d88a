//! # Stock Ledger
//!
//! The authoritative mutation path for `Product.stock_quantity`.
//!
//! ## The Update Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 record_exit(shop, product, qty)                         │
//! │                                                                         │
//! │  BEGIN TRANSACTION                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SELECT shop_id, name ── unknown product / wrong shop? → typed error    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UPDATE products                                                        │
//! │     SET stock_quantity = stock_quantity - qty                           │
//! │   WHERE id = ? AND stock_quantity >= qty   ← check and decrement are    │
//! │       │                                      ONE statement              │
//! │       ├── 0 rows? → read current count, ROLLBACK,                       │
//! │       │             InsufficientStock { available }                     │
//! │       ▼                                                                 │
//! │  INSERT INTO movements (kind = 'exit', ...)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT ── movement row and stock change land together or not at all    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! Two cashiers scanning the same item race on the product row. SQLite
//! serializes writers; the guarded UPDATE means whichever transaction
//! commits second re-evaluates `stock_quantity >= qty` against the first
//! one's committed result, so the combined exits can never drive stock
//! negative. A writer that loses its snapshot to a concurrent commit gets a
//! busy/locked error; both operations retry once internally with fresh
//! state before surfacing [`StockError::Conflict`].

use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, StockError, StockResult};
use adega_core::validation::validate_quantity;
use adega_core::{CoreError, Movement, MovementKind};
use chrono::Utc;

/// The stock ledger operation surface.
///
/// ## Usage
/// ```rust,ignore
/// let ledger = db.ledger();
///
/// // Restock arrives
/// ledger.record_entry(&shop.id, &product.id, 12, Some("truck #3")).await?;
///
/// // Sale
/// match ledger.record_exit(&shop.id, &product.id, 1, None).await {
///     Ok(movement) => println!("sold, movement {}", movement.id),
///     Err(e) if e.is_recoverable() => println!("{e}"),
///     Err(e) => return Err(e),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Ledger {
    pool: SqlitePool,
}

impl Ledger {
    /// Creates a new Ledger.
    pub fn new(pool: SqlitePool) -> Self {
        Ledger { pool }
    }

    /// Records a stock entry (restock) and increments the product's stock.
    ///
    /// ## Guarantees
    /// - `quantity` is validated positive before any I/O
    /// - The movement row and the stock increment commit in one
    ///   transaction; a failure leaves neither
    pub async fn record_entry(
        &self,
        shop_id: &str,
        product_id: &str,
        quantity: i64,
        note: Option<&str>,
    ) -> StockResult<Movement> {
        validate_quantity(quantity)?;

        self.with_retry(product_id, || {
            self.apply(shop_id, product_id, MovementKind::Entry, quantity, note)
        })
        .await
    }

    /// Records a stock exit (sale) and decrements the product's stock.
    ///
    /// ## Preconditions
    /// Checked against the **freshest** committed stock count inside the
    /// transaction: if `stock_quantity < quantity` the call fails with
    /// [`CoreError::InsufficientStock`] carrying the current count, and
    /// nothing is written.
    ///
    /// ## Concurrency
    /// Concurrent exits against the same product never jointly oversell;
    /// see the module docs for the protocol.
    pub async fn record_exit(
        &self,
        shop_id: &str,
        product_id: &str,
        quantity: i64,
        note: Option<&str>,
    ) -> StockResult<Movement> {
        validate_quantity(quantity)?;

        self.with_retry(product_id, || {
            self.apply(shop_id, product_id, MovementKind::Exit, quantity, note)
        })
        .await
    }

    /// Runs `attempt` once, retrying a single time on transient lock
    /// contention before surfacing [`StockError::Conflict`].
    async fn with_retry<F, Fut>(&self, product_id: &str, attempt: F) -> StockResult<Movement>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = StockResult<Movement>>,
    {
        match attempt().await {
            Err(StockError::Db(err)) if err.is_transient() => {
                debug!(product_id = %product_id, error = %err, "Retrying after lock contention");

                match attempt().await {
                    Err(StockError::Db(err)) if err.is_transient() => {
                        warn!(product_id = %product_id, error = %err, "Lock contention persisted");
                        Err(StockError::Conflict {
                            product_id: product_id.to_string(),
                        })
                    }
                    other => other,
                }
            }
            other => other,
        }
    }

    /// One transactional attempt at a movement.
    async fn apply(
        &self,
        shop_id: &str,
        product_id: &str,
        kind: MovementKind,
        quantity: i64,
        note: Option<&str>,
    ) -> StockResult<Movement> {
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        // Ownership check. Products of other shops are invisible here.
        let row: Option<(String, String)> =
            sqlx::query_as("SELECT shop_id, name FROM products WHERE id = ?1")
                .bind(product_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(DbError::from)?;

        let (owner, name) = match row {
            None => return Err(CoreError::ProductNotFound(product_id.to_string()).into()),
            Some(r) => r,
        };
        if owner != shop_id {
            return Err(CoreError::ShopMismatch {
                product_id: product_id.to_string(),
                shop_id: shop_id.to_string(),
            }
            .into());
        }

        match kind {
            MovementKind::Entry => {
                sqlx::query(
                    "UPDATE products SET stock_quantity = stock_quantity + ?2 WHERE id = ?1",
                )
                .bind(product_id)
                .bind(quantity)
                .execute(&mut *tx)
                .await
                .map_err(DbError::from)?;
            }
            MovementKind::Exit => {
                // The precondition and the decrement are one statement: the
                // freshest committed value decides, never a count read
                // before this transaction.
                let updated = sqlx::query(
                    "UPDATE products SET stock_quantity = stock_quantity - ?2 \
                     WHERE id = ?1 AND stock_quantity >= ?2",
                )
                .bind(product_id)
                .bind(quantity)
                .execute(&mut *tx)
                .await
                .map_err(DbError::from)?;

                if updated.rows_affected() == 0 {
                    let (available,): (i64,) =
                        sqlx::query_as("SELECT stock_quantity FROM products WHERE id = ?1")
                            .bind(product_id)
                            .fetch_one(&mut *tx)
                            .await
                            .map_err(DbError::from)?;

                    tx.rollback().await.map_err(DbError::from)?;

                    warn!(
                        product = %name,
                        available,
                        requested = quantity,
                        "Exit refused: insufficient stock"
                    );
                    return Err(CoreError::InsufficientStock {
                        product: name,
                        available,
                        requested: quantity,
                    }
                    .into());
                }
            }
        }

        let movement = Movement {
            id: Uuid::new_v4().to_string(),
            shop_id: shop_id.to_string(),
            product_id: product_id.to_string(),
            kind,
            quantity,
            note: note.map(str::to_string),
            created_at: Utc::now(),
        };

        insert_movement(&mut tx, &movement).await?;

        tx.commit().await.map_err(DbError::from)?;

        info!(
            movement_id = %movement.id,
            product = %name,
            kind = movement.kind.as_str(),
            quantity,
            "Movement recorded"
        );

        Ok(movement)
    }
}

/// Inserts a movement row inside the caller's transaction.
async fn insert_movement(
    tx: &mut Transaction<'_, Sqlite>,
    movement: &Movement,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO movements (id, shop_id, product_id, kind, quantity, note, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(&movement.id)
    .bind(&movement.shop_id)
    .bind(&movement.product_id)
    .bind(movement.kind)
    .bind(movement.quantity)
    .bind(&movement.note)
    .bind(movement.created_at)
    .execute(&mut **tx)
    .await
    .map_err(DbError::from)?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::error::StockError;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::generate_product_id;
    use adega_core::{CoreError, Money, MovementKind, Product, DEFAULT_SHOP_NAME};
    use chrono::Utc;

    async fn setup(stock: i64) -> (Database, String, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let shop = db.shops().get_or_create(DEFAULT_SHOP_NAME).await.unwrap();
        let category = db.categories().insert("Vinhos").await.unwrap();

        let product = Product {
            id: generate_product_id(),
            shop_id: shop.id.clone(),
            name: "Vinho Tinto".to_string(),
            category_id: category.id,
            barcode: Some("000111".to_string()),
            cost_price: Money::from_centavos(1000),
            sale_price: Money::from_centavos(1800),
            stock_quantity: stock,
            created_at: Utc::now(),
        };
        db.products().insert(&product).await.unwrap();

        (db, shop.id, product.id)
    }

    async fn stock_of(db: &Database, product_id: &str) -> i64 {
        db.products()
            .get_by_id(product_id)
            .await
            .unwrap()
            .unwrap()
            .stock_quantity
    }

    #[tokio::test]
    async fn test_entry_increments_stock_and_records_movement() {
        let (db, shop_id, product_id) = setup(0).await;

        let movement = db
            .ledger()
            .record_entry(&shop_id, &product_id, 5, Some("restock"))
            .await
            .unwrap();

        assert_eq!(movement.kind, MovementKind::Entry);
        assert_eq!(movement.quantity, 5);
        assert_eq!(movement.note.as_deref(), Some("restock"));
        assert_eq!(stock_of(&db, &product_id).await, 5);

        let history = db.movements().by_product(&product_id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, movement.id);
    }

    #[tokio::test]
    async fn test_exit_then_refusal_leaves_state_untouched() {
        // Scenario: stock 10, sell 3, then try to sell 10
        let (db, shop_id, product_id) = setup(10).await;
        let ledger = db.ledger();

        ledger
            .record_exit(&shop_id, &product_id, 3, None)
            .await
            .unwrap();
        assert_eq!(stock_of(&db, &product_id).await, 7);

        let err = ledger
            .record_exit(&shop_id, &product_id, 10, None)
            .await
            .unwrap_err();
        match err {
            StockError::Domain(CoreError::InsufficientStock {
                available,
                requested,
                ..
            }) => {
                assert_eq!(available, 7);
                assert_eq!(requested, 10);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        // The refusal wrote nothing
        assert_eq!(stock_of(&db, &product_id).await, 7);
        assert_eq!(db.movements().by_product(&product_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_exit_down_to_zero_is_allowed() {
        let (db, shop_id, product_id) = setup(4).await;

        db.ledger()
            .record_exit(&shop_id, &product_id, 4, None)
            .await
            .unwrap();
        assert_eq!(stock_of(&db, &product_id).await, 0);
    }

    #[tokio::test]
    async fn test_concurrent_exits_never_oversell() {
        // Scenario: stock 10, two simultaneous exits of 6.
        // Exactly one succeeds; the other is refused with the survivor's
        // committed count.
        let (db, shop_id, product_id) = setup(10).await;

        let ledger_a = db.ledger();
        let ledger_b = db.ledger();
        let (shop_a, prod_a) = (shop_id.clone(), product_id.clone());
        let (shop_b, prod_b) = (shop_id.clone(), product_id.clone());

        let task_a =
            tokio::spawn(async move { ledger_a.record_exit(&shop_a, &prod_a, 6, None).await });
        let task_b =
            tokio::spawn(async move { ledger_b.record_exit(&shop_b, &prod_b, 6, None).await });

        let results = [task_a.await.unwrap(), task_b.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);

        let failure = results
            .iter()
            .find_map(|r| r.as_ref().err())
            .expect("one exit must be refused");
        match failure {
            StockError::Domain(CoreError::InsufficientStock { available, .. }) => {
                assert_eq!(*available, 4)
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        assert_eq!(stock_of(&db, &product_id).await, 4);
        assert_eq!(db.movements().by_product(&product_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_stock_always_equals_baseline_plus_signed_movements() {
        let (db, shop_id, product_id) = setup(10).await;
        let ledger = db.ledger();

        ledger.record_entry(&shop_id, &product_id, 7, None).await.unwrap();
        ledger.record_exit(&shop_id, &product_id, 5, None).await.unwrap();
        ledger.record_exit(&shop_id, &product_id, 2, None).await.unwrap();
        ledger.record_entry(&shop_id, &product_id, 1, None).await.unwrap();
        // Refused exit must not disturb the ledger
        ledger.record_exit(&shop_id, &product_id, 999, None).await.unwrap_err();

        let movements = db.movements().by_product(&product_id).await.unwrap();
        let signed: i64 = movements.iter().map(|m| m.signed_quantity()).sum();

        assert_eq!(stock_of(&db, &product_id).await, 10 + signed);
        assert_eq!(movements.len(), 4);
    }

    #[tokio::test]
    async fn test_quantity_validation_before_io() {
        let (db, shop_id, product_id) = setup(10).await;
        let ledger = db.ledger();

        for bad in [0, -3, 10_000] {
            assert!(ledger.record_entry(&shop_id, &product_id, bad, None).await.is_err());
            assert!(ledger.record_exit(&shop_id, &product_id, bad, None).await.is_err());
        }

        assert_eq!(stock_of(&db, &product_id).await, 10);
        assert!(db.movements().by_product(&product_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_product_and_wrong_shop() {
        let (db, shop_id, product_id) = setup(10).await;
        let ledger = db.ledger();

        let err = ledger
            .record_entry(&shop_id, "missing", 1, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StockError::Domain(CoreError::ProductNotFound(_))
        ));

        let err = ledger
            .record_exit("some-other-shop", &product_id, 1, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StockError::Domain(CoreError::ShopMismatch { .. })
        ));

        assert_eq!(stock_of(&db, &product_id).await, 10);
    }
}
