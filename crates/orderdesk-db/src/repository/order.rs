//! # Order Repository
//!
//! The order engine: places orders atomically and reads them back.
//!
//! ## Placing an Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    create_order(customer, lines)                        │
//! │                                                                         │
//! │  BEGIN ─────────────────────────────────────────────────────────────┐   │
//! │  │ OrderNumber = next Orders sequence value   (takes write lock)    │   │
//! │  │ customer exists?            no → ReferenceNotFound (nothing kept)│   │
//! │  │ validate lines (quantity ≥ 1)                                    │   │
//! │  │ CREATE VIEW "Order_<n>"                                          │   │
//! │  │ for each line:                                                   │   │
//! │  │   unit price of product     missing → ReferenceNotFound          │   │
//! │  │   TotalPrice = price × qty                                       │   │
//! │  │   INSERT OrderLines (n, position, product, qty, total)           │   │
//! │  │ Cost = SUM(TotalPrice) over "Order_<n>"                          │   │
//! │  │ INSERT Orders (n, customer, Cost, 'in_preparation')              │   │
//! │  COMMIT ────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  Any error drops the transaction: no order row, no lines, no view,     │
//! │  and the order number is handed out again.                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::customer::CustomerRepository;
use crate::repository::product::ProductRepository;
use crate::schema;
use crate::sequence::{self, Sequence};
use orderdesk_core::encode::join_literals;
use orderdesk_core::money::line_total;
use orderdesk_core::validation::validate_order_lines;
use orderdesk_core::{
    detail_relation_name, Money, Order, OrderDetailLine, OrderLine, OrderStatus, SqlValue,
};

/// Repository for order database operations.
///
/// ## Usage
/// ```rust,ignore
/// let order = db
///     .orders()
///     .create_order(customer.id, &[OrderLine::new(1, 2), OrderLine::new(3, 1)])
///     .await?;
///
/// let lines = db.orders().get_lines(order.order_number).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Places an order for `customer_id`.
    ///
    /// Lines keep their given order and may name the same product more than
    /// once. An empty slice places an order with cost zero.
    ///
    /// ## Returns
    /// The committed order row with its status `in_preparation`.
    ///
    /// ## Errors
    /// * `DbError::ReferenceNotFound` - unknown customer or product; an
    ///   unknown customer is reported before any line is looked at
    /// * `DbError::Validation` - a quantity below 1
    ///
    /// On any error nothing of the order remains in the store.
    pub async fn create_order(&self, customer_id: i64, lines: &[OrderLine]) -> DbResult<Order> {
        let mut tx = self.pool.begin().await?;

        // The first statement must write, so the write lock is held before
        // any read; otherwise concurrent orders fail with SQLITE_BUSY.
        let order_number = sequence::next_id(&mut tx, Sequence::Orders).await?;

        if !CustomerRepository::exists_on(&mut tx, customer_id).await? {
            warn!(customer_id, "Order for unknown customer");
            return Err(DbError::reference_not_found("Customer", customer_id));
        }

        validate_order_lines(lines)?;

        let relation = schema::create_order_detail_relation(&mut tx, order_number).await?;

        debug!(
            order_number,
            customer_id,
            lines = lines.len(),
            relation = %relation,
            "Creating order"
        );

        let mut totals = Vec::with_capacity(lines.len());

        for (position, line) in lines.iter().enumerate() {
            let unit_price = ProductRepository::unit_price_on(&mut tx, line.product_number)
                .await?
                .ok_or_else(|| {
                    warn!(
                        order_number,
                        product_number = line.product_number,
                        "Order line names unknown product, rolling back"
                    );
                    DbError::reference_not_found("Product", line.product_number)
                })?;

            let total = line_total(unit_price, line.quantity)?;

            debug!(
                order_number,
                values = %join_literals(&[
                    SqlValue::from(line.product_number),
                    SqlValue::from(line.quantity),
                    SqlValue::from(total.cents()),
                ]),
                "Inserting order line"
            );

            sqlx::query(
                r#"
                INSERT INTO OrderLines (OrderNumber, Position, ProductNumber, Quantity, TotalPrice)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(order_number)
            .bind(position as i64)
            .bind(line.product_number)
            .bind(line.quantity)
            .bind(total)
            .execute(&mut *tx)
            .await?;

            totals.push(total);
        }

        let expected = Money::checked_sum(totals).ok_or_else(|| {
            DbError::Internal(format!("cost of order {} overflows", order_number))
        })?;

        // The stored cost is read back from the detail relation.
        let cost: Money = sqlx::query_scalar(&format!(
            r#"SELECT COALESCE(SUM(TotalPrice), 0) FROM "{}""#,
            relation
        ))
        .fetch_one(&mut *tx)
        .await?;

        if cost != expected {
            return Err(DbError::Internal(format!(
                "{} sums to {} but its lines total {}",
                relation, cost, expected
            )));
        }

        let status = OrderStatus::InPreparation;

        sqlx::query(
            r#"
            INSERT INTO Orders (OrderNumber, CustomerID, Cost, Status)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(order_number)
        .bind(customer_id)
        .bind(cost)
        .bind(status)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(order_number, customer_id, cost = %cost, "Order created");

        Ok(Order {
            order_number,
            customer_id,
            cost,
            status,
        })
    }

    /// Gets an order by number.
    pub async fn get_by_id(&self, order_number: i64) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT OrderNumber, CustomerID, Cost, Status
            FROM Orders
            WHERE OrderNumber = ?1
            "#,
        )
        .bind(order_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Reads an order's lines through its detail relation, in placement order.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - the order has no detail relation
    pub async fn get_lines(&self, order_number: i64) -> DbResult<Vec<OrderDetailLine>> {
        if !schema::detail_relation_exists(&self.pool, order_number).await? {
            return Err(DbError::not_found("Order", order_number.to_string()));
        }

        let lines = sqlx::query_as::<_, OrderDetailLine>(&format!(
            r#"SELECT ProductNumber, Quantity, TotalPrice FROM "{}""#,
            detail_relation_name(order_number)
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// All orders of one customer, oldest first.
    pub async fn orders_for_customer(&self, customer_id: i64) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT OrderNumber, CustomerID, Cost, Status
            FROM Orders
            WHERE CustomerID = ?1
            ORDER BY OrderNumber
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Counts orders.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use orderdesk_core::{CustomerFields, ValidationError};

    /// One customer, two products (3.00 and 12.99).
    async fn setup() -> (Database, i64, i64, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let customer = db
            .customers()
            .create(&CustomerFields::new().name("Erika Mustermann"))
            .await
            .unwrap();
        let tea = db
            .products()
            .add("Tea", None, Money::from_cents(300))
            .await
            .unwrap();
        let mug = db
            .products()
            .add("Mug", Some("Stoneware"), Money::from_cents(1299))
            .await
            .unwrap();

        (db, customer.id, tea.product_number, mug.product_number)
    }

    async fn order_line_rows(db: &Database) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM OrderLines")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_order_prices_lines() {
        let (db, customer, tea, mug) = setup().await;

        let order = db
            .orders()
            .create_order(customer, &[OrderLine::new(tea, 2), OrderLine::new(mug, 1)])
            .await
            .unwrap();

        assert_eq!(order.order_number, 1);
        assert_eq!(order.customer_id, customer);
        assert_eq!(order.cost, Money::from_cents(1899));
        assert_eq!(order.status, OrderStatus::InPreparation);

        let stored = db.orders().get_by_id(1).await.unwrap().unwrap();
        assert_eq!(stored, order);

        let lines = db.orders().get_lines(1).await.unwrap();
        assert_eq!(
            lines,
            vec![
                OrderDetailLine {
                    product_number: tea,
                    quantity: 2,
                    total_price: Money::from_cents(600),
                },
                OrderDetailLine {
                    product_number: mug,
                    quantity: 1,
                    total_price: Money::from_cents(1299),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_status_is_stored_as_text() {
        let (db, customer, tea, _) = setup().await;
        db.orders()
            .create_order(customer, &[OrderLine::new(tea, 1)])
            .await
            .unwrap();

        let status: String = sqlx::query_scalar("SELECT Status FROM Orders WHERE OrderNumber = 1")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(status, "in_preparation");
    }

    #[tokio::test]
    async fn test_same_product_twice_keeps_both_lines() {
        let (db, customer, tea, _) = setup().await;

        let order = db
            .orders()
            .create_order(customer, &[OrderLine::new(tea, 1), OrderLine::new(tea, 3)])
            .await
            .unwrap();

        assert_eq!(order.cost, Money::from_cents(1200));
        let quantities: Vec<i64> = db
            .orders()
            .get_lines(order.order_number)
            .await
            .unwrap()
            .iter()
            .map(|l| l.quantity)
            .collect();
        assert_eq!(quantities, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_empty_order_costs_nothing() {
        let (db, customer, _, _) = setup().await;

        let order = db.orders().create_order(customer, &[]).await.unwrap();

        assert_eq!(order.cost, Money::zero());
        assert!(db.orders().get_lines(order.order_number).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_customer_changes_nothing() {
        let (db, _, tea, _) = setup().await;

        let err = db
            .orders()
            .create_order(99, &[OrderLine::new(tea, 1)])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::ReferenceNotFound { ref entity, id: 99 } if entity == "Customer"
        ));
        assert_eq!(db.orders().count().await.unwrap(), 0);
        assert_eq!(order_line_rows(&db).await, 0);
        assert!(!schema::detail_relation_exists(db.pool(), 1).await.unwrap());
        assert_eq!(db.customers().count().await.unwrap(), 1);
        assert_eq!(db.products().count().await.unwrap(), 2);

        let mut conn = db.pool().acquire().await.unwrap();
        assert_eq!(
            sequence::current_value(&mut conn, Sequence::Orders).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_unknown_customer_wins_over_invalid_lines() {
        let (db, _, tea, _) = setup().await;

        let err = db
            .orders()
            .create_order(99, &[OrderLine::new(tea, 0)])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::ReferenceNotFound { ref entity, id: 99 } if entity == "Customer"
        ));
        assert_eq!(db.orders().count().await.unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_orders_are_serialized() {
        let path = std::env::temp_dir().join(format!(
            "orderdesk-concurrent-orders-{}.db",
            std::process::id()
        ));
        let remove_files = |path: &std::path::Path| {
            for suffix in ["", "-wal", "-shm"] {
                let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
            }
        };
        remove_files(&path);

        let db = Database::new(DbConfig::new(&path).max_connections(5))
            .await
            .unwrap();
        let customer = db
            .customers()
            .create(&CustomerFields::new().name("Erika Mustermann"))
            .await
            .unwrap();
        let tea = db
            .products()
            .add("Tea", None, Money::from_cents(300))
            .await
            .unwrap();

        let customer_id = customer.id;
        let handles: Vec<_> = (0..20)
            .map(|_| {
                let orders = db.orders();
                let line = OrderLine::new(tea.product_number, 1);
                tokio::spawn(async move { orders.create_order(customer_id, &[line]).await })
            })
            .collect();

        let mut numbers = Vec::new();
        for handle in handles {
            numbers.push(handle.await.unwrap().unwrap().order_number);
        }
        numbers.sort_unstable();

        assert_eq!(numbers, (1..=20).collect::<Vec<i64>>());
        assert_eq!(db.orders().count().await.unwrap(), 20);

        db.close().await;
        remove_files(&path);
    }

    #[tokio::test]
    async fn test_unknown_product_rolls_back_everything() {
        let (db, customer, tea, _) = setup().await;

        let err = db
            .orders()
            .create_order(customer, &[OrderLine::new(tea, 2), OrderLine::new(42, 1)])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::ReferenceNotFound { ref entity, id: 42 } if entity == "Product"
        ));
        assert_eq!(db.orders().count().await.unwrap(), 0);
        assert_eq!(order_line_rows(&db).await, 0);
        assert!(!schema::detail_relation_exists(db.pool(), 1).await.unwrap());
        assert!(matches!(
            db.orders().get_lines(1).await.unwrap_err(),
            DbError::NotFound { .. }
        ));

        // The failed order did not consume its number.
        let order = db
            .orders()
            .create_order(customer, &[OrderLine::new(tea, 1)])
            .await
            .unwrap();
        assert_eq!(order.order_number, 1);
    }

    #[tokio::test]
    async fn test_zero_quantity_is_rejected() {
        let (db, customer, tea, _) = setup().await;

        let err = db
            .orders()
            .create_order(customer, &[OrderLine::new(tea, 0)])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::Validation(ValidationError::MustBePositive { .. })
        ));
        assert_eq!(db.orders().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_price_overflow_rolls_back() {
        let (db, customer, _, _) = setup().await;
        let pricey = db
            .products()
            .add("Yacht", None, Money::from_cents(i64::MAX / 2))
            .await
            .unwrap();

        let err = db
            .orders()
            .create_order(customer, &[OrderLine::new(pricey.product_number, 3)])
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Internal(_)));
        assert_eq!(db.orders().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_orders_for_customer() {
        let (db, customer, tea, mug) = setup().await;
        let other = db
            .customers()
            .create(&CustomerFields::new().name("Hans Wurst"))
            .await
            .unwrap();

        db.orders()
            .create_order(customer, &[OrderLine::new(tea, 1)])
            .await
            .unwrap();
        db.orders()
            .create_order(other.id, &[OrderLine::new(mug, 1)])
            .await
            .unwrap();
        db.orders()
            .create_order(customer, &[OrderLine::new(mug, 2)])
            .await
            .unwrap();

        let numbers: Vec<i64> = db
            .orders()
            .orders_for_customer(customer)
            .await
            .unwrap()
            .iter()
            .map(|o| o.order_number)
            .collect();
        assert_eq!(numbers, vec![1, 3]);
        assert_eq!(db.orders().count().await.unwrap(), 3);
    }
}
