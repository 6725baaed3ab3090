//! Header subsystem for sheetdb
//!
//! A table's schema is nothing more than its first row. It may change at any
//! time through manual edits, so it is read fresh before every operation.
//!
//! # Rules
//!
//! - At least one field
//! - No empty field names
//! - No duplicate field names
//! - Position is the only field to column mapping

mod cache;
mod header;

pub use cache::HeaderCache;
pub use header::Header;
