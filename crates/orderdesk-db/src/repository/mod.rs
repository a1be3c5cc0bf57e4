//! # Repository Module
//!
//! Database repository implementations for Order Desk.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Caller                                                                 │
//! │       │  db.orders().create_order(customer_id, &lines)                  │
//! │       ▼                                                                 │
//! │  OrderRepository ──► CustomerRepository (does the customer exist?)     │
//! │       │          ──► ProductRepository  (unit price)                   │
//! │       │          ──► schema             (Order_<id> view)              │
//! │       │          ──► sequence           (next OrderNumber)             │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lookups that the order engine needs inside its transaction are exposed
//! as associated functions taking a `&mut SqliteConnection`; the methods on
//! `&self` run them against the pool.

pub mod customer;
pub mod order;
pub mod product;
