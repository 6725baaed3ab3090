//! Query arguments for select, update and delete
//!
//! Rows can be selected in exactly one of three ways:
//! - a `field`/`value` shorthand, equivalent to a single `eq` condition
//! - a `where` list of conditions
//! - explicit grid row numbers
//!
//! Select additionally takes a projection, a limit and an output format.

use std::str::FromStr;

use serde_json::Value;

use crate::errors::{DbError, DbResult};

use super::condition::Condition;

/// Row selection resolved from a [`Query`]
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// No selection given: every data row
    All,
    /// Rows matching all conditions (an empty list matches every row)
    Conditions(Vec<Condition>),
    /// Rows at these grid positions
    Rows(Vec<usize>),
}

/// Shape of select results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Tabular frame indexed by grid row number
    #[default]
    Frame,
    /// List of records
    Records,
    /// Grid row numbers of the matches
    RowNumbers,
}

impl FromStr for OutputFormat {
    type Err = DbError;

    fn from_str(s: &str) -> DbResult<Self> {
        match s {
            "frame" => Ok(OutputFormat::Frame),
            "records" => Ok(OutputFormat::Records),
            "rows" => Ok(OutputFormat::RowNumbers),
            other => Err(DbError::query_error(format!(
                "Unknown output format '{}' (expected frame, records or rows)",
                other
            ))),
        }
    }
}

/// Query builder
#[derive(Debug, Clone, Default)]
pub struct Query {
    field: Option<String>,
    value: Option<Value>,
    conditions: Option<Vec<Condition>>,
    rows: Option<Vec<usize>>,
    fields: Option<Vec<String>>,
    limit: Option<usize>,
    format: OutputFormat,
}

impl Query {
    /// Query with no selection
    pub fn new() -> Self {
        Self::default()
    }

    /// `field == value` shorthand
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new().with_field(field).with_value(value)
    }

    /// Condition list query
    pub fn filter(conditions: Vec<Condition>) -> Self {
        Self::new().with_where(conditions)
    }

    /// Sets the shorthand field
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Sets the shorthand value
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the condition list
    pub fn with_where(mut self, conditions: Vec<Condition>) -> Self {
        self.conditions = Some(conditions);
        self
    }

    /// Appends one condition to the condition list
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.get_or_insert_with(Vec::new).push(condition);
        self
    }

    /// Selects explicit grid row numbers
    pub fn with_rows(mut self, rows: Vec<usize>) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Restricts select output to these fields
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Caps the number of select matches
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the select output format
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn fields(&self) -> Option<&[String]> {
        self.fields.as_deref()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Resolves the selection arguments.
    ///
    /// # Errors
    ///
    /// `QueryError` if only one of field/value is set, if more than one
    /// selection mechanism is used, or if a row number points at the header.
    pub fn selection(&self) -> DbResult<Selection> {
        if self.field.is_some() != self.value.is_some() {
            return Err(DbError::query_error(
                "Field and value must both be assigned or both be None",
            ));
        }

        let shorthand = self.field.is_some();
        let used = [shorthand, self.conditions.is_some(), self.rows.is_some()]
            .iter()
            .filter(|used| **used)
            .count();
        if used > 1 {
            return Err(DbError::query_error(
                "Only one way to select rows can be used at the same time",
            ));
        }

        if let (Some(field), Some(value)) = (&self.field, &self.value) {
            return Ok(Selection::Conditions(vec![Condition::eq(
                field.clone(),
                value.clone(),
            )]));
        }
        if let Some(conditions) = &self.conditions {
            return Ok(Selection::Conditions(conditions.clone()));
        }
        if let Some(rows) = &self.rows {
            if let Some(bad) = rows.iter().find(|r| **r < 2) {
                return Err(DbError::query_error(format!(
                    "Row {} is not a data row; data starts at row 2",
                    bad
                )));
            }
            return Ok(Selection::Rows(rows.clone()));
        }
        Ok(Selection::All)
    }
}
