//! # orderdesk-core: Pure Domain Logic for Order Desk
//!
//! This crate holds everything about customers, products, and orders that
//! can be expressed without touching a database.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Order Desk Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               ★ orderdesk-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  encode   │  │ validation│  │   │
//! │  │   │ Customer  │  │   Money   │  │ SqlValue  │  │   rules   │  │   │
//! │  │   │  Order    │  │ line math │  │ literals  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  orderdesk-db (Database Layer)                  │   │
//! │  │        schema, registry, catalog, order engine (SQLite)         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, Product, Order, OrderLine, ...)
//! - [`money`] - Money type with integer arithmetic
//! - [`encode`] - Typed scalar values and their storage literals
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use orderdesk_core::money::Money;
//! use orderdesk_core::types::OrderLine;
//!
//! let unit_price = Money::from_cents(250);
//! let line = OrderLine::new(1, 4);
//!
//! let total = unit_price.multiply_quantity(line.quantity).unwrap();
//! assert_eq!(total.cents(), 1000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod encode;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use encode::SqlValue;
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix of the per-order detail relation name (`Order_<id>`).
pub const DETAIL_RELATION_PREFIX: &str = "Order_";
