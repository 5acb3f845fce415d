//! Predicate fragments and their operators
//!
//! A [`ColumnFilter`] is a piece of WHERE-clause text together with the
//! bindings for the `@n` placeholders it contains.

use serde::{Deserialize, Serialize};

use crate::types::{Parameter, SqlValue};

/// Comparison applied to a key and a value fragment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// The value fragment is already a complete predicate
    #[default]
    Non,
    Equals,
    NotEquals,
    In,
    NotIn,
    Like,
    NotLike,
    Less,
    More,
    LessOrEquals,
    MoreOrEquals,
}

impl Operator {
    /// Apply the operator template to `key` and `value`
    pub fn render(self, key: &str, value: &str) -> String {
        match self {
            Operator::Non => value.to_string(),
            Operator::Equals => format!("{} = {}", key, value),
            Operator::NotEquals => format!("{} != {}", key, value),
            Operator::In => format!("{} IN ({})", key, value),
            Operator::NotIn => format!("{} NOT IN ({})", key, value),
            Operator::Like => format!("{} LIKE '%' + {} + '%'", key, value),
            Operator::NotLike => format!("{} NOT LIKE '%' + {} + '%'", key, value),
            Operator::Less => format!("{} < {}", key, value),
            Operator::More => format!("{} > {}", key, value),
            Operator::LessOrEquals => format!("{} <= {}", key, value),
            Operator::MoreOrEquals => format!("{} >= {}", key, value),
        }
    }
}

/// Logical combinator joining predicate fragments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    pub fn keyword(self) -> &'static str {
        match self {
            Connective::And => " AND ",
            Connective::Or => " OR ",
        }
    }
}

/// A single or composite predicate fragment with its ordered bindings
///
/// `filter` holds the value side of the predicate. When `operator` is
/// [`Operator::Non`] it holds the whole predicate and `key_name` is only
/// informational.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilter {
    #[serde(rename = "keyName")]
    pub key_name: String,
    pub filter: String,
    pub operator: Operator,
    pub params: Vec<Parameter>,
}

impl ColumnFilter {
    pub fn new(
        key_name: impl Into<String>,
        operator: Operator,
        filter: impl Into<String>,
        params: Vec<Parameter>,
    ) -> Self {
        Self {
            key_name: key_name.into(),
            filter: filter.into(),
            operator,
            params,
        }
    }

    /// `key <operator> @0` with `value` bound to `@0`
    pub fn compare(key_name: impl Into<String>, operator: Operator, value: impl Into<SqlValue>) -> Self {
        Self::new(key_name, operator, "@0", vec![Parameter::new(0, value)])
    }

    /// A finished predicate fragment with its bindings
    pub fn raw(fragment: impl Into<String>, params: Vec<Parameter>) -> Self {
        Self::new(String::new(), Operator::Non, fragment, params)
    }

    /// The predicate text with the operator applied
    pub fn render(&self) -> String {
        self.operator.render(&self.key_name, &self.filter)
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }
}
