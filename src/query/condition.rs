//! Condition structures
//!
//! A condition is a `(field, operator, value)` triple. Lists of conditions
//! combine with AND.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::errors::{DbError, DbResult};

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Equal after numeric coercion
    Eq,
    /// Not equal after numeric coercion
    Neq,
    /// Greater than (numeric only)
    Gt,
    /// Greater than or equal (numeric only)
    Gte,
    /// Less than (numeric only)
    Lt,
    /// Less than or equal (numeric only)
    Lte,
    /// Substring containment on text forms
    Contains,
}

impl Operator {
    /// Canonical operator name
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Contains => "contains",
        }
    }

    /// Returns true for operators that only compare numbers
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Operator {
    type Err = DbError;

    /// Accepts canonical names, short aliases and symbols
    fn from_str(s: &str) -> DbResult<Self> {
        match s {
            "eq" | "=" | "==" => Ok(Operator::Eq),
            "neq" | "ne" | "!=" => Ok(Operator::Neq),
            "gt" | ">" => Ok(Operator::Gt),
            "gte" | "ge" | ">=" => Ok(Operator::Gte),
            "lt" | "<" => Ok(Operator::Lt),
            "lte" | "le" | "<=" => Ok(Operator::Lte),
            "contains" | "~" => Ok(Operator::Contains),
            other => Err(DbError::query_error(format!("Unknown operator '{}'", other))),
        }
    }
}

/// A single `(field, operator, value)` predicate
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub op: Operator,
    pub value: Value,
}

impl Condition {
    pub fn new(field: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Eq, value)
    }

    pub fn neq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Neq, value)
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Gt, value)
    }

    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Gte, value)
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Lt, value)
    }

    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Lte, value)
    }

    pub fn contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Contains, value)
    }

    /// Parses a condition list from JSON.
    ///
    /// Accepts a list of `[field, op, value]` triples or a single triple.
    pub fn parse_list(value: Value) -> DbResult<Vec<Condition>> {
        match value {
            Value::Array(items) if items.first().is_some_and(Value::is_string) => {
                Ok(vec![Condition::try_from(Value::Array(items))?])
            }
            Value::Array(items) => items.into_iter().map(Condition::try_from).collect(),
            other => Err(DbError::query_error(format!(
                "Conditions must be a list of [field, op, value] triples, got {}",
                other
            ))),
        }
    }
}

impl TryFrom<Value> for Condition {
    type Error = DbError;

    fn try_from(value: Value) -> DbResult<Self> {
        let items = match value {
            Value::Array(items) if items.len() == 3 => items,
            _ => {
                return Err(DbError::query_error(
                    "Where conditions must have three elements",
                ))
            }
        };

        let mut items = items.into_iter();
        let field = match items.next() {
            Some(Value::String(field)) => field,
            _ => return Err(DbError::query_error("Condition field must be a string")),
        };
        let op = match items.next() {
            Some(Value::String(op)) => op.parse::<Operator>()?,
            _ => return Err(DbError::query_error("Condition operator must be a string")),
        };
        let value = items.next().unwrap_or(Value::Null);

        Ok(Condition { field, op, value })
    }
}
