//! # Schema Manager
//!
//! Creates the base relations and the per-order detail relations.
//!
//! ## Relations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Embedded migrations (initialize_schema)                               │
//! │  ├── Customers   (ID, Name, Road, HouseNumber, PostCode, Town)         │
//! │  ├── Products    (ProductNumber, Name, Description, Price)             │
//! │  ├── Orders      (OrderNumber, CustomerID, Cost, Status)               │
//! │  ├── OrderLines  (OrderNumber, Position, ProductNumber, Quantity,      │
//! │  │                TotalPrice)                                           │
//! │  └── Sequences   (Name, Value)                                         │
//! │                                                                         │
//! │  Per order (create_order_detail_relation)                              │
//! │  └── Order_<id>  VIEW (ProductNumber, Quantity, TotalPrice)            │
//! │                  over OrderLines WHERE OrderNumber = <id>              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Adding New Migrations
//!
//! 1. Create a new file in `migrations/sqlite/` with the next sequence number
//! 2. Name format: `NNN_description.sql`
//! 3. Use `IF NOT EXISTS` where possible
//! 4. **NEVER** modify existing migrations - always add new ones

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::DbResult;
use orderdesk_core::{detail_relation_name, SqlValue};

/// Embedded migrations from the workspace `migrations/sqlite` directory.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Creates the base relations.
///
/// ## Safety
/// - Idempotent: applied migrations are recorded in `_sqlx_migrations` and
///   skipped on later runs, so existing rows are never touched
/// - A store whose recorded migrations disagree with the embedded ones fails
///   with `DbError::MigrationFailed` instead of being altered
pub async fn initialize_schema(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Returns `(total_migrations, applied_migrations)`.
pub async fn schema_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    // Before the first run the bookkeeping table doesn't exist yet.
    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((total, applied as usize))
}

/// Creates the detail relation `Order_<id>` for one order.
///
/// Takes a connection rather than the pool so the view is created inside the
/// order transaction and disappears with it on rollback. Creating the same
/// relation twice is a no-op.
pub async fn create_order_detail_relation(
    conn: &mut SqliteConnection,
    order_number: i64,
) -> DbResult<String> {
    let relation = detail_relation_name(order_number);

    // Views can't take bind parameters; the id is an integer literal.
    let ddl = format!(
        r#"CREATE VIEW IF NOT EXISTS "{relation}" (ProductNumber, Quantity, TotalPrice) AS
           SELECT ProductNumber, Quantity, TotalPrice
           FROM OrderLines
           WHERE OrderNumber = {id}
           ORDER BY Position"#,
        relation = relation,
        id = SqlValue::Integer(order_number).to_literal(),
    );

    debug!(relation = %relation, "Creating order detail relation");

    sqlx::query(&ddl).execute(&mut *conn).await?;

    Ok(relation)
}

/// Checks whether the detail relation of an order exists.
pub async fn detail_relation_exists(pool: &SqlitePool, order_number: i64) -> DbResult<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE type = 'view' AND name = ?1")
            .bind(detail_relation_name(order_number))
            .fetch_one(pool)
            .await?;

    Ok(count > 0)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    async fn table_names(pool: &SqlitePool) -> Vec<String> {
        sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE '\\_%' ESCAPE '\\' \
             AND name NOT LIKE 'sqlite%' ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_initialize_creates_base_relations() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert_eq!(
            table_names(db.pool()).await,
            vec!["Customers", "OrderLines", "Orders", "Products", "Sequences"]
        );

        let (total, applied) = schema_status(db.pool()).await.unwrap();
        assert_eq!(total, applied);
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.customers()
            .create(&orderdesk_core::CustomerFields::new().name("Erika Mustermann"))
            .await
            .unwrap();

        initialize_schema(db.pool()).await.unwrap();
        initialize_schema(db.pool()).await.unwrap();

        assert_eq!(db.customers().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_status_before_initialization() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();

        let (total, applied) = schema_status(db.pool()).await.unwrap();
        assert!(total > 0);
        assert_eq!(applied, 0);
    }

    #[tokio::test]
    async fn test_detail_relation_creation() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(!detail_relation_exists(db.pool(), 9).await.unwrap());

        {
            let mut conn = db.pool().acquire().await.unwrap();
            let name = create_order_detail_relation(&mut conn, 9).await.unwrap();
            assert_eq!(name, "Order_9");
            // Second call is a no-op.
            create_order_detail_relation(&mut conn, 9).await.unwrap();
        }

        assert!(detail_relation_exists(db.pool(), 9).await.unwrap());

        let rows: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "Order_9""#)
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(rows, 0);
    }
}
