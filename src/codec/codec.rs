//! Record ↔ row translation against a header

use crate::errors::{DbError, DbResult};
use crate::grid::Row;
use crate::schema::Header;

use super::cell::{parse_cell, render_cell, EMPTY_CELL};
use super::record::Record;

/// Converts between records and positional rows.
///
/// The header is the only field ↔ column mapping.
pub struct RecordCodec;

impl RecordCodec {
    /// Decodes a grid row into a record with one entry per header field.
    ///
    /// Missing trailing cells decode as empty. Extra cells past the header
    /// are tolerated only while empty, since grids pad rows to a common width.
    ///
    /// # Errors
    ///
    /// `SchemaError` if the row holds a non-empty cell past the last header
    /// column.
    pub fn decode(row: &[String], header: &Header) -> DbResult<Record> {
        if let Some(extra) = row
            .iter()
            .skip(header.len())
            .position(|cell| cell != EMPTY_CELL)
        {
            return Err(DbError::schema_error(format!(
                "Row has a value in column {} but the header has only {} fields",
                header.len() + extra + 1,
                header.len()
            )));
        }

        Ok(header
            .fields()
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                let text = row.get(idx).map(String::as_str).unwrap_or(EMPTY_CELL);
                (field.clone(), parse_cell(text))
            })
            .collect())
    }

    /// Checks that a record can be written under `header`.
    ///
    /// The whole key set is checked, and every value must fit in a cell.
    pub fn validate(record: &Record, header: &Header) -> DbResult<()> {
        header.ensure_subset(record.keys(), "Record keys")?;
        for (field, value) in record.iter() {
            render_cell(field, value)?;
        }
        Ok(())
    }

    /// Encodes a record in header order, emitting empty cells for absent fields.
    ///
    /// # Errors
    ///
    /// `RecordError` if any key is not a header field or a value is nested.
    /// Nothing is produced unless the whole record is valid.
    pub fn encode(record: &Record, header: &Header) -> DbResult<Row> {
        Self::validate(record, header)?;
        header
            .fields()
            .iter()
            .map(|field| match record.get(field) {
                Some(value) => render_cell(field, value),
                None => Ok(EMPTY_CELL.to_string()),
            })
            .collect()
    }
}
