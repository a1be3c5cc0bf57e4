//! # Value Encoder
//!
//! Typed scalar values and their storage-literal rendering.
//!
//! ## Two Ways a Value Reaches SQLite
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SqlValue::Text("Bielefeld")                                           │
//! │       │                                                                 │
//! │       ├──► bound parameter   WHERE Town = ?1        (data path)        │
//! │       │                                                                 │
//! │       └──► literal           'Bielefeld'            (DDL, log output)  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Literal Rules
//! - Text is wrapped in single quotes. Embedded quotes are NOT escaped, so a
//!   literal built from untrusted text can break out of its string. Only
//!   render text you control; use bound parameters for everything else.
//! - Integers render in decimal.
//! - Floats render in decimal with a fractional part (`2.0`, `0.5`).
//!   NaN and infinities have no SQL literal and render as `NULL`.
//! - `Null` renders as `NULL`, so output positions match input positions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A dynamically typed scalar, as stored in an untyped column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl SqlValue {
    /// Renders this value as a storage literal.
    ///
    /// ```rust
    /// use orderdesk_core::SqlValue;
    ///
    /// assert_eq!(SqlValue::from("Irgendwo").to_literal(), "'Irgendwo'");
    /// assert_eq!(SqlValue::from(42).to_literal(), "42");
    /// assert_eq!(SqlValue::from(2.0).to_literal(), "2.0");
    /// assert_eq!(SqlValue::Null.to_literal(), "NULL");
    /// ```
    pub fn to_literal(&self) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Integer(i) => i.to_string(),
            SqlValue::Float(f) if f.is_finite() => format!("{:?}", f),
            SqlValue::Float(_) => "NULL".to_string(),
            SqlValue::Text(s) => format!("'{}'", s),
        }
    }

    /// Returns true for `Null`.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_literal())
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        SqlValue::Text(s.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        SqlValue::Text(s)
    }
}

impl From<i64> for SqlValue {
    fn from(i: i64) -> Self {
        SqlValue::Integer(i)
    }
}

impl From<i32> for SqlValue {
    fn from(i: i32) -> Self {
        SqlValue::Integer(i64::from(i))
    }
}

impl From<f64> for SqlValue {
    fn from(f: f64) -> Self {
        SqlValue::Float(f)
    }
}

impl<T> From<Option<T>> for SqlValue
where
    T: Into<SqlValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

/// Renders each value as a literal, one output per input.
pub fn encode_literals(values: &[SqlValue]) -> Vec<String> {
    values.iter().map(SqlValue::to_literal).collect()
}

/// Renders values as a comma-separated literal list.
///
/// ```rust
/// use orderdesk_core::encode::join_literals;
/// use orderdesk_core::SqlValue;
///
/// let values = [SqlValue::from(1), SqlValue::from("Hans Wurst"), SqlValue::Null];
/// assert_eq!(join_literals(&values), "1, 'Hans Wurst', NULL");
/// ```
pub fn join_literals(values: &[SqlValue]) -> String {
    encode_literals(values).join(", ")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_quoted_without_escaping() {
        assert_eq!(SqlValue::from("Zum Beispiel").to_literal(), "'Zum Beispiel'");
        // Embedded quotes pass through untouched.
        assert_eq!(SqlValue::from("O'Brien").to_literal(), "'O'Brien'");
    }

    #[test]
    fn test_numbers() {
        assert_eq!(SqlValue::from(42838).to_literal(), "42838");
        assert_eq!(SqlValue::from(-7_i64).to_literal(), "-7");
        assert_eq!(SqlValue::from(0.5).to_literal(), "0.5");
        assert_eq!(SqlValue::from(3.0).to_literal(), "3.0");
        assert_eq!(SqlValue::from(f64::NAN).to_literal(), "NULL");
        assert_eq!(SqlValue::from(f64::INFINITY).to_literal(), "NULL");
    }

    #[test]
    fn test_null_keeps_position() {
        let values = vec![
            SqlValue::from(1),
            SqlValue::from(None::<String>),
            SqlValue::from(Some("Bielefeld")),
        ];
        let literals = encode_literals(&values);
        assert_eq!(literals, vec!["1", "NULL", "'Bielefeld'"]);
    }

    #[test]
    fn test_untagged_deserialize() {
        let values: Vec<SqlValue> = serde_json::from_str(r#"[null, 1, 1.5, "x"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                SqlValue::Null,
                SqlValue::Integer(1),
                SqlValue::Float(1.5),
                SqlValue::Text("x".to_string()),
            ]
        );
    }

    #[test]
    fn test_display_matches_literal() {
        assert_eq!(format!("{}", SqlValue::from("a")), "'a'");
    }
}
