//! # Domain Types
//!
//! Core domain types used throughout Order Desk.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │     Product     │   │      Order      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  product_number │   │  order_number   │       │
//! │  │  name, road     │   │  name           │   │  customer_id FK │       │
//! │  │  house_number   │   │  description    │   │  cost (derived) │       │
//! │  │  post_code/town │   │  price          │   │  status         │       │
//! │  └─────────────────┘   └─────────────────┘   └────────┬────────┘       │
//! │                                                       │ 1:n            │
//! │  ┌─────────────────┐                         ┌────────▼────────┐       │
//! │  │   OrderLine     │  ── priced into ──►     │ OrderDetailLine │       │
//! │  │  (input only)   │                         │  (Order_<id>)   │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Column names follow the relational schema (`ID`, `HouseNumber`,
//! `OrderNumber`, ...); Rust field names are snake_case.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::encode::SqlValue;
use crate::error::ValidationError;
use crate::money::Money;
use crate::DETAIL_RELATION_PREFIX;

// =============================================================================
// Customer
// =============================================================================

/// A registered customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    #[cfg_attr(feature = "sqlx", sqlx(rename = "ID"))]
    pub id: i64,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Name"))]
    pub name: Option<String>,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Road"))]
    pub road: Option<String>,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "HouseNumber"))]
    pub house_number: Option<i64>,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "PostCode"))]
    pub post_code: Option<String>,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Town"))]
    pub town: Option<String>,
}

// =============================================================================
// Customer Fields
// =============================================================================

/// The attributes a customer record carries besides its identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomerField {
    Name,
    Road,
    HouseNumber,
    PostCode,
    Town,
}

impl CustomerField {
    /// All fields, in column order.
    pub const ALL: [CustomerField; 5] = [
        CustomerField::Name,
        CustomerField::Road,
        CustomerField::HouseNumber,
        CustomerField::PostCode,
        CustomerField::Town,
    ];

    /// Column name in the `Customers` relation.
    pub const fn column(&self) -> &'static str {
        match self {
            CustomerField::Name => "Name",
            CustomerField::Road => "Road",
            CustomerField::HouseNumber => "HouseNumber",
            CustomerField::PostCode => "PostCode",
            CustomerField::Town => "Town",
        }
    }

    fn allowed() -> Vec<String> {
        Self::ALL.iter().map(|f| f.column().to_string()).collect()
    }
}

impl fmt::Display for CustomerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for CustomerField {
    type Err = ValidationError;

    /// Parses an exact column name; anything else is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.column() == s)
            .ok_or_else(|| ValidationError::UnknownField {
                field: s.to_string(),
                allowed: Self::allowed(),
            })
    }
}

/// Customer attributes used both to register a customer and to search.
///
/// Every attribute is optional. Unknown attribute names are rejected when
/// deserializing, instead of being silently dropped.
///
/// ## Example
/// ```rust
/// use orderdesk_core::CustomerFields;
///
/// let fields = CustomerFields::new().name("Hans Wurst").town("Irgendwo");
/// assert_eq!(fields.predicates().len(), 2);
///
/// let err = CustomerFields::from_json(r#"{"Nmae": "Hans"}"#).unwrap_err();
/// assert!(err.to_string().contains("Nmae"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct CustomerFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub town: Option<String>,
}

impl CustomerFields {
    /// Creates an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn road(mut self, road: impl Into<String>) -> Self {
        self.road = Some(road.into());
        self
    }

    pub fn house_number(mut self, house_number: i64) -> Self {
        self.house_number = Some(house_number);
        self
    }

    pub fn post_code(mut self, post_code: impl Into<String>) -> Self {
        self.post_code = Some(post_code.into());
        self
    }

    pub fn town(mut self, town: impl Into<String>) -> Self {
        self.town = Some(town.into());
        self
    }

    /// Parses a JSON object keyed by column name.
    ///
    /// ## Errors
    /// - `UnknownField` for a key outside {Name, Road, HouseNumber, PostCode, Town}
    /// - `InvalidFormat` for anything else serde rejects (wrong value type,
    ///   not an object)
    pub fn from_json(input: &str) -> Result<Self, ValidationError> {
        let invalid = |e: serde_json::Error| ValidationError::InvalidFormat {
            field: "customer attributes".to_string(),
            reason: e.to_string(),
        };

        let map: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(input).map_err(invalid)?;

        for key in map.keys() {
            key.parse::<CustomerField>()?;
        }

        serde_json::from_value(serde_json::Value::Object(map)).map_err(invalid)
    }

    /// Value of one attribute, `Null` when unset.
    pub fn get(&self, field: CustomerField) -> SqlValue {
        match field {
            CustomerField::Name => self.name.clone().into(),
            CustomerField::Road => self.road.clone().into(),
            CustomerField::HouseNumber => self.house_number.into(),
            CustomerField::PostCode => self.post_code.clone().into(),
            CustomerField::Town => self.town.clone().into(),
        }
    }

    /// All attribute values in column order, `Null` for unset ones.
    pub fn values(&self) -> Vec<SqlValue> {
        CustomerField::ALL.iter().map(|f| self.get(*f)).collect()
    }

    /// Equality predicates for the attributes that are set.
    pub fn predicates(&self) -> Vec<(CustomerField, SqlValue)> {
        CustomerField::ALL
            .iter()
            .map(|f| (*f, self.get(*f)))
            .filter(|(_, value)| !value.is_null())
            .collect()
    }

    /// True when no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.predicates().is_empty()
    }
}

// =============================================================================
// Search Logic
// =============================================================================

/// How multiple search predicates combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchLogic {
    /// Every predicate must hold (intersection).
    #[default]
    And,
    /// Any predicate may hold (union).
    Or,
}

impl SearchLogic {
    /// SQL keyword joining predicates.
    pub const fn keyword(&self) -> &'static str {
        match self {
            SearchLogic::And => "AND",
            SearchLogic::Or => "OR",
        }
    }
}

impl FromStr for SearchLogic {
    type Err = ValidationError;

    /// Case-insensitive: `and`, `AND`, `Or` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "and" => Ok(SearchLogic::And),
            "or" => Ok(SearchLogic::Or),
            _ => Err(ValidationError::NotAllowed {
                field: "logic".to_string(),
                allowed: vec!["and".to_string(), "or".to_string()],
            }),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    #[cfg_attr(feature = "sqlx", sqlx(rename = "ProductNumber"))]
    pub product_number: i64,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Name"))]
    pub name: String,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Description"))]
    pub description: Option<String>,
    /// Unit price.
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Price"))]
    pub price: Money,
}

// =============================================================================
// Order Status
// =============================================================================

/// Status of an order. Orders are created `in_preparation`; later
/// transitions are not modelled yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum OrderStatus {
    #[default]
    InPreparation,
}

impl OrderStatus {
    /// Stored representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::InPreparation => "in_preparation",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Order
// =============================================================================

/// The summary row of a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    #[cfg_attr(feature = "sqlx", sqlx(rename = "OrderNumber"))]
    pub order_number: i64,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "CustomerID"))]
    pub customer_id: i64,
    /// Sum of the order's line totals.
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Cost"))]
    pub cost: Money,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Status"))]
    pub status: OrderStatus,
}

impl Order {
    /// Name of this order's detail relation.
    pub fn detail_relation(&self) -> String {
        detail_relation_name(self.order_number)
    }
}

// =============================================================================
// Order Lines
// =============================================================================

/// One requested line of an order: which product, how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_number: i64,
    pub quantity: i64,
}

impl OrderLine {
    pub const fn new(product_number: i64, quantity: i64) -> Self {
        OrderLine {
            product_number,
            quantity,
        }
    }
}

impl From<(i64, i64)> for OrderLine {
    fn from((product_number, quantity): (i64, i64)) -> Self {
        OrderLine::new(product_number, quantity)
    }
}

/// A priced line as persisted in an order's detail relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderDetailLine {
    #[cfg_attr(feature = "sqlx", sqlx(rename = "ProductNumber"))]
    pub product_number: i64,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Quantity"))]
    pub quantity: i64,
    /// `unit price × quantity` at order time.
    #[cfg_attr(feature = "sqlx", sqlx(rename = "TotalPrice"))]
    pub total_price: Money,
}

/// Deterministic detail relation name for an order: `Order_<id>`.
///
/// ```rust
/// assert_eq!(orderdesk_core::detail_relation_name(17), "Order_17");
/// ```
pub fn detail_relation_name(order_number: i64) -> String {
    format!("{}{}", DETAIL_RELATION_PREFIX, order_number)
}

// =============================================================================
// Unit Tests
// =============================================================================
