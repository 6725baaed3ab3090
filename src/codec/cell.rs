//! Cell text conversions
//!
//! The grid stores text. Values go in as their native text rendering and come
//! back typed only when the text is unambiguous:
//!
//! | cell text                         | decoded value |
//! |-----------------------------------|---------------|
//! | empty                             | `""`          |
//! | `TRUE` / `FALSE`                  | bool          |
//! | number that re-renders identically| number        |
//! | anything else                     | string        |
//!
//! "Re-renders identically" keeps `007`, `1.50`, `+3` and ` 3` as strings, so
//! decode followed by encode reproduces the original text exactly.

use serde_json::{Number, Value};

use crate::errors::{DbError, DbResult};

/// Text of an empty cell
pub const EMPTY_CELL: &str = "";

/// Decodes one cell's text
pub fn parse_cell(text: &str) -> Value {
    match text {
        EMPTY_CELL => Value::String(String::new()),
        "TRUE" => Value::Bool(true),
        "FALSE" => Value::Bool(false),
        _ => parse_number(text).unwrap_or_else(|| Value::String(text.to_string())),
    }
}

fn parse_number(text: &str) -> Option<Value> {
    if let Ok(i) = text.parse::<i64>() {
        if i.to_string() == text {
            return Some(Value::from(i));
        }
    }
    if let Ok(u) = text.parse::<u64>() {
        if u.to_string() == text {
            return Some(Value::from(u));
        }
    }
    let f: f64 = text.parse().ok()?;
    let n = Number::from_f64(f)?;
    if n.to_string() == text {
        Some(Value::Number(n))
    } else {
        None
    }
}

/// Encodes a value for storage in `field`'s column.
///
/// # Errors
///
/// `RecordError` for arrays and objects, which a cell cannot hold.
pub fn render_cell(field: &str, value: &Value) -> DbResult<String> {
    match value {
        Value::Array(_) | Value::Object(_) => Err(DbError::record_error(format!(
            "Field '{}' holds a nested value; only scalars can be stored",
            field
        ))),
        other => Ok(display_text(other)),
    }
}

/// Text form used for string comparison and `contains`
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Null => EMPTY_CELL.to_string(),
        nested => nested.to_string(),
    }
}

/// Numeric view of a value, if it has one.
///
/// Numbers convert directly; strings convert when they parse as a finite
/// float after trimming. Bools, null and nested values never do.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}
