//! Table subsystem for sheetdb
//!
//! A table is a view over one worksheet. It owns no data: every call reads
//! the header and rows from the grid, and every change is written straight
//! back.
//!
//! # Guarantees
//!
//! - Validation errors are raised before any grid write
//! - Select preserves grid order
//! - Update and delete touch every matching row
//! - Delete removes rows bottom-up
//!
//! # Not guaranteed
//!
//! - Atomicity of multi-row update/delete
//! - Isolation from concurrent writers to the same worksheet

mod table;

pub use table::Table;
