//! Select result types

use serde::Serialize;
use serde_json::Value;

use crate::codec::Record;

/// Tabular select result: named columns, one row per match, indexed by the
/// grid row number each match came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    columns: Vec<String>,
    index: Vec<usize>,
    rows: Vec<Vec<Value>>,
}

impl Frame {
    /// Empty frame with the given columns
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            index: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Appends a record found at grid row `position`.
    ///
    /// Columns the record lacks are filled with empty strings.
    pub fn push(&mut self, position: usize, record: &Record) {
        let row = self
            .columns
            .iter()
            .map(|c| record.get(c).cloned().unwrap_or_else(|| Value::String(String::new())))
            .collect();
        self.index.push(position);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Grid row numbers, one per row
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Cell at grid row `position` in column `name`
    pub fn get(&self, position: usize, name: &str) -> Option<&Value> {
        let col = self.columns.iter().position(|c| c == name)?;
        let row = self.index.iter().position(|p| *p == position)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Rows as records
    pub fn records(&self) -> Vec<Record> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }
}

/// Result of a select, in the requested format
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SelectOutput {
    Frame(Frame),
    Records(Vec<Record>),
    RowNumbers(Vec<usize>),
}

impl SelectOutput {
    /// Number of matches
    pub fn len(&self) -> usize {
        match self {
            SelectOutput::Frame(frame) => frame.len(),
            SelectOutput::Records(records) => records.len(),
            SelectOutput::RowNumbers(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_frame(&self) -> Option<&Frame> {
        match self {
            SelectOutput::Frame(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn as_records(&self) -> Option<&[Record]> {
        match self {
            SelectOutput::Records(records) => Some(records),
            _ => None,
        }
    }

    pub fn as_row_numbers(&self) -> Option<&[usize]> {
        match self {
            SelectOutput::RowNumbers(rows) => Some(rows),
            _ => None,
        }
    }

    /// Matches as records; empty for row-number output
    pub fn into_records(self) -> Vec<Record> {
        match self {
            SelectOutput::Frame(frame) => frame.records(),
            SelectOutput::Records(records) => records,
            SelectOutput::RowNumbers(_) => Vec::new(),
        }
    }

    /// JSON rendering used by the CLI
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
