//! Grid access subsystem for sheetdb
//!
//! The core never talks to a spreadsheet directly. Everything it needs from
//! the backing store goes through [`GridAccessor`], which is injected into a
//! [`Database`](crate::database::Database) at construction time.
//!
//! # Positions
//!
//! Row positions are 1-based grid row numbers. Row 1 holds the header, data
//! rows start at row 2. `list_rows` returns every row, header included.
//!
//! # Implementations
//!
//! - [`MemoryGrid`]: worksheets held in memory, for tests and embedding
//! - [`FileGrid`]: a checksummed JSON workbook file on local disk
//!
//! Remote transports implement the same trait outside this crate.

mod checksum;
mod file;
mod memory;
mod workbook;

use thiserror::Error;

pub use checksum::{compute_checksum, verify_checksum};
pub use file::FileGrid;
pub use memory::MemoryGrid;
pub use workbook::{Sheet, Workbook};

/// One grid row as raw cell text
pub type Row = Vec<String>;

/// Failures reported by a grid collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Worksheet has zero rows, so there is no header to read
    #[error("Worksheet '{0}' has no rows")]
    NoHeader(String),

    /// Worksheet does not exist
    #[error("Worksheet '{0}' not found")]
    WorksheetNotFound(String),

    /// Worksheet title already in use
    #[error("Worksheet '{0}' already exists")]
    WorksheetExists(String),

    /// Row position outside the worksheet
    #[error("Row {position} is out of range for worksheet '{table}'")]
    RowOutOfRange { table: String, position: usize },

    /// Stored workbook failed integrity checks
    #[error("Workbook corrupted: {0}")]
    Corrupted(String),

    /// Underlying I/O or transport failure
    #[error("Grid I/O failure: {0}")]
    Io(String),
}

/// Result type for grid operations
pub type GridResult<T> = Result<T, GridError>;

/// Operations the core consumes from the backing grid.
///
/// All methods are blocking. Implementors that mutate state behind `&self`
/// use interior mutability.
pub trait GridAccessor {
    /// Titles of all worksheets, in workbook order
    fn list_tables(&self) -> GridResult<Vec<String>>;

    /// Whether a worksheet with this title exists
    fn table_exists(&self, table: &str) -> GridResult<bool> {
        Ok(self.list_tables()?.iter().any(|t| t == table))
    }

    /// Creates a worksheet whose first row is `header`
    fn create_table(&self, table: &str, header: &[String]) -> GridResult<()>;

    /// Removes a worksheet
    fn delete_table(&self, table: &str) -> GridResult<()>;

    /// Renames a worksheet
    fn rename_table(&self, table: &str, new_name: &str) -> GridResult<()>;

    /// Copies a worksheet, rows included, under a new title
    fn duplicate_table(&self, table: &str, new_name: &str) -> GridResult<()>;

    /// Cells of row 1. Fails with [`GridError::NoHeader`] on an empty worksheet.
    fn read_header(&self, table: &str) -> GridResult<Row>;

    /// Every row of the worksheet, header included, top to bottom
    fn list_rows(&self, table: &str) -> GridResult<Vec<Row>>;

    /// Appends a row after the last one
    fn append_row(&self, table: &str, row: &[String]) -> GridResult<()>;

    /// Overwrites the row at `position`
    fn write_row(&self, table: &str, position: usize, row: &[String]) -> GridResult<()>;

    /// Deletes the row at `position`, shifting later rows up by one
    fn delete_row(&self, table: &str, position: usize) -> GridResult<()>;
}
