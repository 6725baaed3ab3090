//! Record codec subsystem for sheetdb
//!
//! Translates between records (field → value) and grid rows (positional cell
//! text) using the table's current header.
//!
//! # Rules
//!
//! - Record keys must be a subset of the header; the full key set is checked
//!   before anything is written
//! - Absent fields are stored as empty cells
//! - Only scalars can be stored; arrays and objects are rejected
//! - Cell text decodes to a typed value only when unambiguous

mod cell;
mod codec;
mod record;

pub use cell::{as_number, display_text, parse_cell, render_cell, EMPTY_CELL};
pub use codec::RecordCodec;
pub use record::Record;
