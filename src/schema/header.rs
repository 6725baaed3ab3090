//! Header row model
//!
//! The first row of a worksheet names the table's fields. Position is the
//! only mapping between a field and its column.

use std::collections::HashMap;

use crate::errors::{DbError, DbResult};

/// Validated, ordered field names of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    fields: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Header {
    /// Builds a header from field names.
    ///
    /// # Errors
    ///
    /// `SchemaError` if the header is empty, contains an empty name, or
    /// repeats a name.
    pub fn new<I, S>(fields: I) -> DbResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        if fields.is_empty() {
            return Err(DbError::schema_error("Worksheet must have a valid header"));
        }

        let mut positions = HashMap::with_capacity(fields.len());
        for (idx, field) in fields.iter().enumerate() {
            if field.is_empty() {
                return Err(DbError::schema_error(format!(
                    "Header column {} has an empty field name",
                    idx + 1
                )));
            }
            if positions.insert(field.clone(), idx).is_some() {
                return Err(DbError::schema_error(format!(
                    "Field name '{}' appears more than once in the header",
                    field
                )));
            }
        }

        Ok(Self { fields, positions })
    }

    /// Builds a header from the raw cells of row 1.
    ///
    /// Trailing empty cells are padding, not fields, and are dropped first.
    pub fn from_cells(mut cells: Vec<String>) -> DbResult<Self> {
        while cells.last().is_some_and(|c| c.is_empty()) {
            cells.pop();
        }
        Self::new(cells)
    }

    /// Field names in column order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Zero-based column of `field`
    pub fn position(&self, field: &str) -> Option<usize> {
        self.positions.get(field).copied()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.positions.contains_key(field)
    }

    /// Names from `keys` that are not header fields, in input order
    pub fn unknown_fields<'k, I>(&self, keys: I) -> Vec<&'k str>
    where
        I: IntoIterator<Item = &'k str>,
    {
        keys.into_iter().filter(|k| !self.contains(k)).collect()
    }

    /// Rejects any key set that is not a subset of the header
    pub fn ensure_subset<'k, I>(&self, keys: I, what: &str) -> DbResult<()>
    where
        I: IntoIterator<Item = &'k str>,
    {
        let unknown = self.unknown_fields(keys);
        if unknown.is_empty() {
            return Ok(());
        }
        Err(DbError::record_error(format!(
            "{} must be a subset of the header; unknown: {}",
            what,
            unknown.join(", ")
        )))
    }
}
