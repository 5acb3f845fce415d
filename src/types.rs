//! Core type definitions for query building
//!
//! Includes bound values, parameters, statements and ordering contracts.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::sql::sanitize::quote_literal;

// ============================================================================
// Values
// ============================================================================

/// A value bound to a placeholder or embedded as a literal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Text(String),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    Json(serde_json::Value),
}

impl SqlValue {
    /// Whether the value is single-quoted when embedded as a literal
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            SqlValue::Text(_) | SqlValue::Uuid(_) | SqlValue::Timestamp(_) | SqlValue::Json(_)
        )
    }

    /// Render the value as a SQL literal for the target dialect
    pub fn to_literal(&self) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Bool(true) => "1".to_string(),
            SqlValue::Bool(false) => "0".to_string(),
            SqlValue::Int(n) => n.to_string(),
            // NaN and infinities have no SQL literal
            SqlValue::Float(f) if !f.is_finite() => "NULL".to_string(),
            SqlValue::Float(f) => f.to_string(),
            SqlValue::Decimal(d) => d.to_string(),
            SqlValue::Text(s) => quote_literal(s),
            SqlValue::Uuid(u) => quote_literal(&u.to_string()),
            SqlValue::Timestamp(ts) => quote_literal(&ts.to_rfc3339()),
            SqlValue::Json(v) => quote_literal(&v.to_string()),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(value.into())
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<u32> for SqlValue {
    fn from(value: u32) -> Self {
        SqlValue::Int(value.into())
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<Decimal> for SqlValue {
    fn from(value: Decimal) -> Self {
        SqlValue::Decimal(value)
    }
}

impl From<Uuid> for SqlValue {
    fn from(value: Uuid) -> Self {
        SqlValue::Uuid(value)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(value: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(value)
    }
}

impl From<serde_json::Value> for SqlValue {
    fn from(value: serde_json::Value) -> Self {
        SqlValue::Json(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

// ============================================================================
// Parameters and Statements
// ============================================================================

/// A positional binding: the value for placeholder `@<index>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub index: usize,
    pub value: SqlValue,
}

impl Parameter {
    pub fn new(index: usize, value: impl Into<SqlValue>) -> Self {
        Self {
            index,
            value: value.into(),
        }
    }

    /// The placeholder token this parameter binds, e.g. `@3`
    pub fn placeholder(&self) -> String {
        format!("@{}", self.index)
    }

    /// Same value, placeholder index moved forward by `offset`
    pub fn shifted(&self, offset: usize) -> Self {
        Self {
            index: self.index + offset,
            value: self.value.clone(),
        }
    }
}

/// SQL text plus its ordered bindings, ready for a parameterized execute
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Parameter>,
}

impl Statement {
    /// Create a statement with no bindings
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Create a statement with bindings
    pub fn with_params(sql: impl Into<String>, params: Vec<Parameter>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Bound values in placeholder order
    pub fn values(&self) -> Vec<&SqlValue> {
        self.params.iter().map(|p| &p.value).collect()
    }

    /// Serialize for hand-off to an executor in another process
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

// ============================================================================
// Ordering
// ============================================================================

/// Sort direction for ORDER BY
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    #[default]
    Ascending,
    Descending,
}

impl OrderDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            OrderDirection::Ascending => "ASC",
            OrderDirection::Descending => "DESC",
        }
    }
}

/// A single ORDER BY term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderContract {
    #[serde(rename = "columnName")]
    pub column_name: String,
    pub direction: OrderDirection,
}

impl OrderContract {
    pub fn new(column_name: impl Into<String>, direction: OrderDirection) -> Self {
        Self {
            column_name: column_name.into(),
            direction,
        }
    }

    pub fn asc(column_name: impl Into<String>) -> Self {
        Self::new(column_name, OrderDirection::Ascending)
    }

    pub fn desc(column_name: impl Into<String>) -> Self {
        Self::new(column_name, OrderDirection::Descending)
    }
}
