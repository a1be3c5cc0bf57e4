//! # Product Repository
//!
//! Catalog of orderable products and their unit prices.
//!
//! Prices are stored as integer cents in the `Price` column; see
//! [`orderdesk_core::Money`].

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::DbResult;
use crate::sequence::{self, Sequence};
use orderdesk_core::encode::join_literals;
use orderdesk_core::validation::validate_price;
use orderdesk_core::{Money, Product, SqlValue};

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

    /// Adds a product to the catalog.
    ///
    /// ## Arguments
    /// * `name` - display name
    /// * `description` - optional free text
    /// * `price` - unit price, must not be negative
    ///
    /// ## Returns
    /// The stored product; its number is the next value of the `Products`
    /// sequence.
    ///
    /// ## Errors
    /// * `DbError::Validation` - negative price (nothing is written)
    pub async fn add(
        &self,
        name: &str,
        description: Option<&str>,
        price: Money,
    ) -> DbResult<Product> {
        validate_price(price)?;

        let mut tx = self.pool.begin().await?;

        let product_number = sequence::next_id(&mut tx, Sequence::Products).await?;

        debug!(
            product_number,
            values = %join_literals(&[
                SqlValue::from(name),
                SqlValue::from(description),
                SqlValue::from(price.cents()),
            ]),
            "Inserting product"
        );

        sqlx::query(
            r#"
            INSERT INTO Products (ProductNumber, Name, Description, Price)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(product_number)
        .bind(name)
        .bind(description)
        .bind(price)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(product_number, name = %name, price = %price, "Product added");

        Ok(Product {
            product_number,
            name: name.to_string(),
            description: description.map(str::to_string),
            price,
        })
    }

    /// Gets a product by number.
    pub async fn get_by_id(&self, product_number: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT ProductNumber, Name, Description, Price
            FROM Products
            WHERE ProductNumber = ?1
            "#,
        )
        .bind(product_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Unit price of a product, `None` if there is no such product.
    pub async fn unit_price(&self, product_number: i64) -> DbResult<Option<Money>> {
        let mut conn = self.pool.acquire().await?;
        Self::unit_price_on(&mut conn, product_number).await
    }

    /// Price lookup on a given connection (used inside transactions).
    pub async fn unit_price_on(
        conn: &mut SqliteConnection,
        product_number: i64,
    ) -> DbResult<Option<Money>> {
        let price: Option<Money> =
            sqlx::query_scalar("SELECT Price FROM Products WHERE ProductNumber = ?1")
                .bind(product_number)
                .fetch_optional(&mut *conn)
                .await?;

        Ok(price)
    }

    /// Counts products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Products")
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
    use crate::{Database, DbConfig, DbError};

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_product_numbers_are_one_to_n() {
        let db = setup().await;
        let repo = db.products();

        let tea = repo.add("Tea", None, Money::from_cents(300)).await.unwrap();
        let mug = repo
            .add("Mug", Some("Stoneware, 300 ml"), Money::from_cents(1299))
            .await
            .unwrap();
        let free = repo.add("Sticker", None, Money::zero()).await.unwrap();

        assert_eq!(tea.product_number, 1);
        assert_eq!(mug.product_number, 2);
        assert_eq!(free.product_number, 3);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_get_and_unit_price() {
        let db = setup().await;
        let repo = db.products();

        let mug = repo
            .add("Mug", Some("Stoneware, 300 ml"), Money::from_cents(1299))
            .await
            .unwrap();

        let loaded = repo.get_by_id(mug.product_number).await.unwrap().unwrap();
        assert_eq!(loaded, mug);
        assert_eq!(loaded.description.as_deref(), Some("Stoneware, 300 ml"));

        assert_eq!(
            repo.unit_price(mug.product_number).await.unwrap(),
            Some(Money::from_cents(1299))
        );
        assert_eq!(repo.unit_price(42).await.unwrap(), None);
        assert!(repo.get_by_id(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_negative_price_is_rejected() {
        let db = setup().await;
        let repo = db.products();

        let err = repo
            .add("Refund", None, Money::from_cents(-100))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
        assert_eq!(repo.count().await.unwrap(), 0);

        // The rejected product did not consume a number.
        let next = repo.add("Tea", None, Money::from_cents(300)).await.unwrap();
        assert_eq!(next.product_number, 1);
    }
}
