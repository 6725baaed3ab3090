//! Per-table header cache
//!
//! The header is re-read from the grid at the start of every table
//! operation, because the worksheet can be edited by hand between calls.
//! The cached copy only serves [`HeaderCache::current`], which reports the
//! header seen by the most recent operation and may therefore be stale.

use crate::errors::{DbError, DbResult};
use crate::grid::{GridAccessor, GridError};
use crate::observability::{log_event_with_fields, Event};

use super::header::Header;

/// Last header read for one table
#[derive(Debug, Clone)]
pub struct HeaderCache {
    table: String,
    header: Option<Header>,
}

impl HeaderCache {
    /// Creates an empty cache; nothing is read until the first refresh
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            header: None,
        }
    }

    /// Table this cache belongs to
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Live read of row 1.
    ///
    /// Returns an owned copy so the caller works against one fixed header for
    /// the whole operation.
    ///
    /// # Errors
    ///
    /// - `SchemaError` if the worksheet has no rows or the header is invalid
    /// - `TableNotFoundError` if the worksheet is gone
    /// - grid failures unchanged
    pub fn refresh<G: GridAccessor + ?Sized>(&mut self, grid: &G) -> DbResult<Header> {
        let cells = grid.read_header(&self.table).map_err(|e| match e {
            GridError::NoHeader(_) => DbError::schema_error(format!(
                "Worksheet '{}' has no header row",
                self.table
            )),
            GridError::WorksheetNotFound(_) => DbError::table_not_found(&self.table),
            other => DbError::grid(other),
        })?;

        let header = Header::from_cells(cells)?;
        let field_count = header.len().to_string();
        log_event_with_fields(
            Event::HeaderRefreshed,
            &[("table", self.table.as_str()), ("fields", field_count.as_str())],
        );
        self.header = Some(header.clone());
        Ok(header)
    }

    /// Header from the most recent refresh, if any
    pub fn current(&self) -> Option<&Header> {
        self.header.as_ref()
    }
}
