//! # Money Module
//!
//! Provides the `Money` type for product prices, line totals, and order costs.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │                                                                         │
//! │  An order cost is a SUM over line totals. With floats, the sum the     │
//! │  database computes and the sum we compute in memory can disagree in   │
//! │  the last digit. With integer cents they agree exactly, which is what  │
//! │  lets the order engine compare them.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use orderdesk_core::money::Money;
//!
//! let price = Money::from_cents(1099); // 10.99
//! let line_total = price.multiply_quantity(3).unwrap();
//! assert_eq!(line_total.cents(), 3297);
//! assert_eq!(line_total.to_string(), "32.97");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Where Money is Used
/// ```text
/// Products.Price ──► × Quantity ──► OrderLines.TotalPrice ──► SUM ──► Orders.Cost
/// ```
///
/// Arithmetic that can overflow is exposed through `checked_*` style methods
/// returning `Option`, because a line total comes from caller-supplied
/// quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use orderdesk_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Computes a line total: `self × qty`.
    ///
    /// Returns `None` on overflow.
    ///
    /// ```rust
    /// use orderdesk_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3), Some(Money::from_cents(897)));
    /// assert_eq!(Money::from_cents(i64::MAX).multiply_quantity(2), None);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two values, returning `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Sums an iterator of values, returning `None` on overflow.
    ///
    /// ```rust
    /// use orderdesk_core::money::Money;
    ///
    /// let lines = [Money::from_cents(100), Money::from_cents(250)];
    /// assert_eq!(Money::checked_sum(lines), Some(Money::from_cents(350)));
    /// ```
    pub fn checked_sum<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = Money>,
    {
        values
            .into_iter()
            .try_fold(Money::zero(), |acc, value| acc.checked_add(value))
    }
}

/// Prices one order line: `unit_price × quantity`.
///
/// ## Errors
/// `CoreError::AmountOverflow` when the product does not fit in cents.
pub fn line_total(unit_price: Money, quantity: i64) -> CoreResult<Money> {
    unit_price
        .multiply_quantity(quantity)
        .ok_or_else(|| CoreError::AmountOverflow {
            context: format!("line total ({} × {})", unit_price, quantity),
        })
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders `major.minor` without a currency symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
