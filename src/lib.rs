//! sheetdb - Spreadsheet worksheets as database tables
//!
//! A workbook is a database, each worksheet a table, row 1 its header and
//! every later row one record. The grid itself is reached through
//! [`grid::GridAccessor`], so the same core runs against an in-memory
//! workbook, a local workbook file, or a remote transport.
//!
//! ```ignore
//! use sheetdb::{Database, MemoryGrid, Query, Record};
//!
//! let mut db = Database::new("books", MemoryGrid::new());
//! let users = db.create_table("users", &["Username", "Email"])?;
//! users.insert(&Record::new().with("Username", "Alan"))?;
//! let alans = users.select(&Query::eq("Username", "Alan"))?;
//! ```

pub mod cli;
pub mod codec;
pub mod database;
pub mod errors;
pub mod grid;
pub mod observability;
pub mod query;
pub mod schema;
pub mod table;

pub use codec::Record;
pub use database::Database;
pub use errors::{DbError, DbErrorCode, DbResult};
pub use grid::{FileGrid, GridAccessor, GridError, MemoryGrid};
pub use query::{Condition, Frame, Operator, OutputFormat, Query, SelectOutput};
pub use table::Table;
