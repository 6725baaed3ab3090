//! In-memory grid

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::workbook::Workbook;
use super::{GridAccessor, GridError, GridResult, Row};

/// Worksheets held in process memory.
///
/// Nothing is persisted; dropping the grid drops the data.
#[derive(Debug, Default)]
pub struct MemoryGrid {
    workbook: RwLock<Workbook>,
}

impl MemoryGrid {
    /// Creates an empty grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a grid pre-populated with a workbook
    pub fn from_workbook(workbook: Workbook) -> Self {
        Self {
            workbook: RwLock::new(workbook),
        }
    }

    /// Copy of the current contents
    pub fn snapshot(&self) -> GridResult<Workbook> {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> GridResult<RwLockReadGuard<'_, Workbook>> {
        self.workbook
            .read()
            .map_err(|_| GridError::Io("memory grid lock poisoned".into()))
    }

    fn write(&self) -> GridResult<RwLockWriteGuard<'_, Workbook>> {
        self.workbook
            .write()
            .map_err(|_| GridError::Io("memory grid lock poisoned".into()))
    }
}

impl GridAccessor for MemoryGrid {
    fn list_tables(&self) -> GridResult<Vec<String>> {
        Ok(self.read()?.titles())
    }

    fn table_exists(&self, table: &str) -> GridResult<bool> {
        Ok(self.read()?.contains(table))
    }

    fn create_table(&self, table: &str, header: &[String]) -> GridResult<()> {
        self.write()?.create(table, header)
    }

    fn delete_table(&self, table: &str) -> GridResult<()> {
        self.write()?.remove(table)
    }

    fn rename_table(&self, table: &str, new_name: &str) -> GridResult<()> {
        self.write()?.rename(table, new_name)
    }

    fn duplicate_table(&self, table: &str, new_name: &str) -> GridResult<()> {
        self.write()?.duplicate(table, new_name)
    }

    fn read_header(&self, table: &str) -> GridResult<Row> {
        self.read()?.header(table)
    }

    fn list_rows(&self, table: &str) -> GridResult<Vec<Row>> {
        self.read()?.rows(table)
    }

    fn append_row(&self, table: &str, row: &[String]) -> GridResult<()> {
        self.write()?.append(table, row)
    }

    fn write_row(&self, table: &str, position: usize, row: &[String]) -> GridResult<()> {
        self.write()?.write(table, position, row)
    }

    fn delete_row(&self, table: &str, position: usize) -> GridResult<()> {
        self.write()?.delete(table, position)
    }
}
