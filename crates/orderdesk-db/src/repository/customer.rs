//! # Customer Repository
//!
//! Registers customers and searches them by attribute.
//!
//! ## Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Attribute Search Works                           │
//! │                                                                         │
//! │  search(Or, Town = "Irgendwo", HouseNumber = 1)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SELECT ID FROM Customers                                              │
//! │  WHERE HouseNumber = ?1 OR Town = ?2        (values bound, not inlined)│
//! │  ORDER BY ID                                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  [2]  ← one row per customer, however many predicates it matches       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::sequence::{self, Sequence};
use orderdesk_core::encode::join_literals;
use orderdesk_core::{Customer, CustomerField, CustomerFields, SearchLogic, SqlValue};

/// Repository for customer database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.customers();
///
/// let hans = repo.create(&CustomerFields::new().name("Hans Wurst")).await?;
/// let ids = repo.search(SearchLogic::Or, &CustomerFields::new().town("Irgendwo")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Registers a customer.
    ///
    /// Every attribute may be left unset. The identifier is the next value of
    /// the `Customers` sequence, so the N-th customer ever created gets N.
    /// Commits before returning.
    pub async fn create(&self, fields: &CustomerFields) -> DbResult<Customer> {
        let mut tx = self.pool.begin().await?;

        let id = sequence::next_id(&mut tx, Sequence::Customers).await?;

        debug!(id, values = %join_literals(&fields.values()), "Inserting customer");

        sqlx::query(
            r#"
            INSERT INTO Customers (ID, Name, Road, HouseNumber, PostCode, Town)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.road)
        .bind(fields.house_number)
        .bind(&fields.post_code)
        .bind(&fields.town)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(id, "Customer created");

        Ok(Customer {
            id,
            name: fields.name.clone(),
            road: fields.road.clone(),
            house_number: fields.house_number,
            post_code: fields.post_code.clone(),
            town: fields.town.clone(),
        })
    }

    /// Returns the ids of customers matching the given attributes.
    ///
    /// ## Arguments
    /// * `logic` - `And`: all attributes must match; `Or`: any may match
    /// * `fields` - the attributes to compare for equality; unset ones are
    ///   not part of the search
    ///
    /// ## Returns
    /// Matching ids in ascending order, each at most once.
    ///
    /// ## Errors
    /// * `DbError::MalformedQuery` - no attribute set, so there is nothing to
    ///   search for
    pub async fn search(&self, logic: SearchLogic, fields: &CustomerFields) -> DbResult<Vec<i64>> {
        let predicates = fields.predicates();

        if predicates.is_empty() {
            return Err(DbError::MalformedQuery(format!(
                "customer search ({}) needs at least one attribute",
                logic.keyword()
            )));
        }

        let values: Vec<SqlValue> = predicates.iter().map(|(_, v)| v.clone()).collect();
        debug!(
            logic = logic.keyword(),
            values = %join_literals(&values),
            "Searching customers"
        );

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT ID FROM Customers WHERE ");

        for (i, (field, value)) in predicates.into_iter().enumerate() {
            if i > 0 {
                query.push(" ").push(logic.keyword()).push(" ");
            }
            push_predicate(&mut query, field, value);
        }

        query.push(" ORDER BY ID");

        let ids: Vec<i64> = query.build_query_scalar().fetch_all(&self.pool).await?;

        debug!(count = ids.len(), "Search returned customers");
        Ok(ids)
    }

    /// Gets a customer by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Customer))` - Customer found
    /// * `Ok(None)` - Customer not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT ID, Name, Road, HouseNumber, PostCode, Town
            FROM Customers
            WHERE ID = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Checks whether a customer exists.
    pub async fn exists(&self, id: i64) -> DbResult<bool> {
        let mut conn = self.pool.acquire().await?;
        Self::exists_on(&mut conn, id).await
    }

    /// Existence check on a given connection (used inside transactions).
    pub async fn exists_on(conn: &mut SqliteConnection, id: i64) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT ID FROM Customers WHERE ID = ?1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(found.is_some())
    }

    /// Counts customers.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Appends `<column> = ?` (or `<column> IS NULL`) with the value bound.
fn push_predicate(query: &mut QueryBuilder<'_, Sqlite>, field: CustomerField, value: SqlValue) {
    query.push(field.column());
    match value {
        SqlValue::Null => {
            query.push(" IS NULL");
        }
        SqlValue::Integer(i) => {
            query.push(" = ").push_bind(i);
        }
        SqlValue::Float(f) => {
            query.push(" = ").push_bind(f);
        }
        SqlValue::Text(s) => {
            query.push(" = ").push_bind(s);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
