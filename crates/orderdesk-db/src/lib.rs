//! # orderdesk-db: Database Layer for Order Desk
//!
//! This crate provides the persistence layer of the order desk: customers,
//! products, and orders stored in a single SQLite file, accessed through
//! sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Order Desk Data Flow                             │
//! │                                                                         │
//! │  Caller (seed binary, embedding application)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  orderdesk-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │    Schema    │  │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │  │   │
//! │  │   │               │    │ CustomerRepo   │    │ 001_init.sql │  │   │
//! │  │   │ SqlitePool    │◄───│ ProductRepo    │    │ Order_<id>   │  │   │
//! │  │   │               │    │ OrderRepo      │    │ views        │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 SQLite Database (./database.db)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`schema`] - Base relations and per-order detail relations
//! - [`sequence`] - Gapless identifier allocation
//! - [`error`] - Database error types
//! - [`repository`] - Customer, product, and order repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use orderdesk_core::{CustomerFields, Money, OrderLine};
//! use orderdesk_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::from_env()).await?;
//!
//! let erika = db.customers().create(&CustomerFields::new().name("Erika Mustermann")).await?;
//! let tea = db.products().add("Tea", None, Money::from_cents(300)).await?;
//!
//! let order = db
//!     .orders()
//!     .create_order(erika.id, &[OrderLine::new(tea.product_number, 2)])
//!     .await?;
//! assert_eq!(order.cost, Money::from_cents(600));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod pool;
pub mod repository;
pub mod schema;
pub mod sequence;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
