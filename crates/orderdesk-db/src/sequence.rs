//! # Identifier Sequences
//!
//! Allocates customer, product, and order identifiers from the `Sequences`
//! counter table.
//!
//! ## Allocation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │    UPDATE Sequences SET Value = Value + 1                              │
//! │    WHERE Name = 'Orders' RETURNING Value        → 7                     │
//! │    INSERT ... (7, ...)                                                  │
//! │  COMMIT                                 (or ROLLBACK: 7 is handed out   │
//! │                                          again by the next caller)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The UPDATE takes SQLite's write lock, so two writers can never read the
//! same value. Allocation must run on the connection of the transaction that
//! inserts the row; a rollback then also undoes the increment and ids stay
//! gapless: N successful creations yield exactly 1..=N.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// A counter in the `Sequences` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sequence {
    Customers,
    Products,
    Orders,
}

impl Sequence {
    /// Row name in `Sequences`, equal to the relation it numbers.
    pub const fn name(&self) -> &'static str {
        match self {
            Sequence::Customers => "Customers",
            Sequence::Products => "Products",
            Sequence::Orders => "Orders",
        }
    }
}

/// Allocates the next identifier of `sequence`.
///
/// ## Errors
/// - `DbError::Internal` if the counter row is missing (schema not initialized)
pub async fn next_id(conn: &mut SqliteConnection, sequence: Sequence) -> DbResult<i64> {
    let id: Option<i64> = sqlx::query_scalar(
        "UPDATE Sequences SET Value = Value + 1 WHERE Name = ?1 RETURNING Value",
    )
    .bind(sequence.name())
    .fetch_optional(&mut *conn)
    .await?;

    let id = id.ok_or_else(|| {
        DbError::Internal(format!("sequence '{}' is not initialized", sequence.name()))
    })?;

    debug!(sequence = sequence.name(), id, "Allocated identifier");
    Ok(id)
}

/// Returns the last identifier handed out, 0 if none.
pub async fn current_value(conn: &mut SqliteConnection, sequence: Sequence) -> DbResult<i64> {
    let value: Option<i64> = sqlx::query_scalar("SELECT Value FROM Sequences WHERE Name = ?1")
        .bind(sequence.name())
        .fetch_optional(&mut *conn)
        .await?;

    Ok(value.unwrap_or(0))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_ids_are_sequential_per_relation() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        assert_eq!(next_id(&mut conn, Sequence::Orders).await.unwrap(), 1);
        assert_eq!(next_id(&mut conn, Sequence::Orders).await.unwrap(), 2);
        assert_eq!(next_id(&mut conn, Sequence::Products).await.unwrap(), 1);
        assert_eq!(current_value(&mut conn, Sequence::Orders).await.unwrap(), 2);
        assert_eq!(current_value(&mut conn, Sequence::Customers).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_rollback_returns_the_id() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        assert_eq!(next_id(&mut tx, Sequence::Customers).await.unwrap(), 1);
        tx.rollback().await.unwrap();

        let mut conn = db.pool().acquire().await.unwrap();
        assert_eq!(next_id(&mut conn, Sequence::Customers).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_schema_is_reported() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        // No Sequences table at all: the store reports the missing relation.
        assert!(next_id(&mut conn, Sequence::Orders).await.is_err());
    }
}
