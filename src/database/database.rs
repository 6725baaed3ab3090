//! Database: entry point bound to one workbook

use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{DbError, DbResult};
use crate::grid::{GridAccessor, GridError};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};
use crate::schema::Header;
use crate::table::Table;

/// Handle over a workbook identified by `key`.
///
/// Table views are created on first open and reused afterwards, so a view's
/// header cache survives between calls.
pub struct Database<G: GridAccessor> {
    key: String,
    grid: Arc<G>,
    tables: HashMap<String, Table<G>>,
    metrics: Arc<MetricsRegistry>,
}

impl<G: GridAccessor> Database<G> {
    /// Binds a database to a grid collaborator. No worksheet is read.
    pub fn new(key: impl Into<String>, grid: G) -> Self {
        Self::with_shared_grid(key, Arc::new(grid))
    }

    /// Binds a database to a grid shared with other handles
    pub fn with_shared_grid(key: impl Into<String>, grid: Arc<G>) -> Self {
        Self {
            key: key.into(),
            grid,
            tables: HashMap::new(),
            metrics: Arc::new(MetricsRegistry::new()),
        }
    }

    /// Workbook identifier
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn grid(&self) -> &G {
        &self.grid
    }

    /// Counters shared by every table opened through this handle
    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    /// Creates a worksheet whose first row is `header` and returns its view.
    ///
    /// # Errors
    ///
    /// - `SchemaError` if the header is empty or has blank or duplicate names
    /// - `TableExistsError` if the title is taken
    pub fn create_table<S: AsRef<str>>(
        &mut self,
        name: &str,
        header: &[S],
    ) -> DbResult<&mut Table<G>> {
        let header = Header::new(header.iter().map(|h| h.as_ref()))?;
        if self.grid.table_exists(name)? {
            return Err(DbError::table_exists(name));
        }

        self.grid
            .create_table(name, header.fields())
            .map_err(|e| lifecycle_error(e, name))?;
        self.metrics.increment_tables_created();
        let field_count = header.len().to_string();
        log_event_with_fields(
            Event::TableCreated,
            &[("table", name), ("fields", field_count.as_str())],
        );

        self.tables.remove(name);
        self.open_table(name)
    }

    /// View of an existing worksheet.
    ///
    /// Existence is checked on every call since the worksheet may have been
    /// removed outside this handle.
    ///
    /// # Errors
    ///
    /// `TableNotFoundError` if no worksheet has this title.
    pub fn open_table(&mut self, name: &str) -> DbResult<&mut Table<G>> {
        if !self.grid.table_exists(name)? {
            self.tables.remove(name);
            return Err(DbError::table_not_found(name));
        }

        if !self.tables.contains_key(name) {
            log_event_with_fields(Event::TableOpened, &[("table", name)]);
        }
        let grid = Arc::clone(&self.grid);
        let metrics = Arc::clone(&self.metrics);
        Ok(self
            .tables
            .entry(name.to_string())
            .or_insert_with(|| Table::with_metrics(name, grid, metrics)))
    }

    /// Removes a worksheet and any view of it
    pub fn delete_table(&mut self, name: &str) -> DbResult<()> {
        self.grid
            .delete_table(name)
            .map_err(|e| lifecycle_error(e, name))?;
        self.tables.remove(name);
        self.metrics.increment_tables_dropped();
        log_event_with_fields(Event::TableDropped, &[("table", name)]);
        Ok(())
    }

    pub fn table_exists(&self, name: &str) -> DbResult<bool> {
        Ok(self.grid.table_exists(name)?)
    }

    /// Worksheet titles in workbook order
    pub fn table_names(&self) -> DbResult<Vec<String>> {
        Ok(self.grid.list_tables()?)
    }

    /// Renames a worksheet. Views of the old title are dropped.
    ///
    /// # Errors
    ///
    /// - `TableNotFoundError` if `name` does not exist
    /// - `TableExistsError` if `new_name` is taken
    pub fn rename_table(&mut self, name: &str, new_name: &str) -> DbResult<()> {
        self.ensure_move(name, new_name)?;
        self.grid
            .rename_table(name, new_name)
            .map_err(|e| lifecycle_error(e, name))?;
        self.tables.remove(name);
        self.tables.remove(new_name);
        log_event_with_fields(
            Event::TableRenamed,
            &[("table", name), ("new_name", new_name)],
        );
        Ok(())
    }

    /// Copies a worksheet, rows included, under `new_name`
    pub fn duplicate_table(&mut self, name: &str, new_name: &str) -> DbResult<()> {
        self.ensure_move(name, new_name)?;
        self.grid
            .duplicate_table(name, new_name)
            .map_err(|e| lifecycle_error(e, name))?;
        self.tables.remove(new_name);
        log_event_with_fields(
            Event::TableDuplicated,
            &[("table", name), ("new_name", new_name)],
        );
        Ok(())
    }

    fn ensure_move(&self, name: &str, new_name: &str) -> DbResult<()> {
        if !self.grid.table_exists(name)? {
            return Err(DbError::table_not_found(name));
        }
        if self.grid.table_exists(new_name)? {
            return Err(DbError::table_exists(new_name));
        }
        Ok(())
    }
}

fn lifecycle_error(err: GridError, name: &str) -> DbError {
    match err {
        GridError::WorksheetNotFound(_) => DbError::table_not_found(name),
        GridError::WorksheetExists(title) => DbError::table_exists(&title),
        other => DbError::grid(other),
    }
}
