//! Error taxonomy for sheetdb
//!
//! Error codes:
//! - SHEETDB_RECORD_INVALID (validation, raised before any write)
//! - SHEETDB_SCHEMA_INVALID (validation, missing/invalid header or corrupt row)
//! - SHEETDB_QUERY_INVALID (validation, conflicting or malformed selection)
//! - SHEETDB_TABLE_NOT_FOUND (validation)
//! - SHEETDB_TABLE_EXISTS (validation)
//! - SHEETDB_GRID_FAILURE (transport failure, carried through unchanged)

use std::fmt;

use crate::grid::GridError;

/// Error categories for sheetdb operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbErrorCode {
    /// Record keys are not a subset of the header, or a value cannot be stored
    RecordInvalid,
    /// Header missing or invalid, or a row does not fit the header
    SchemaInvalid,
    /// Conflicting or malformed selection arguments
    QueryInvalid,
    /// Named table does not exist
    TableNotFound,
    /// Named table already exists
    TableExists,
    /// The grid collaborator failed
    GridFailure,
}

impl DbErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            DbErrorCode::RecordInvalid => "SHEETDB_RECORD_INVALID",
            DbErrorCode::SchemaInvalid => "SHEETDB_SCHEMA_INVALID",
            DbErrorCode::QueryInvalid => "SHEETDB_QUERY_INVALID",
            DbErrorCode::TableNotFound => "SHEETDB_TABLE_NOT_FOUND",
            DbErrorCode::TableExists => "SHEETDB_TABLE_EXISTS",
            DbErrorCode::GridFailure => "SHEETDB_GRID_FAILURE",
        }
    }

    /// Returns true if errors of this kind are raised before any mutating grid call
    pub fn is_validation(&self) -> bool {
        !matches!(self, DbErrorCode::GridFailure)
    }
}

impl fmt::Display for DbErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// sheetdb error with code, message and optional transport cause
#[derive(Debug)]
pub struct DbError {
    code: DbErrorCode,
    message: String,
    source: Option<GridError>,
}

impl DbError {
    fn new(code: DbErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Record does not fit the table
    pub fn record_error(reason: impl Into<String>) -> Self {
        Self::new(DbErrorCode::RecordInvalid, reason)
    }

    /// Header or row shape problem
    pub fn schema_error(reason: impl Into<String>) -> Self {
        Self::new(DbErrorCode::SchemaInvalid, reason)
    }

    /// Bad selection arguments
    pub fn query_error(reason: impl Into<String>) -> Self {
        Self::new(DbErrorCode::QueryInvalid, reason)
    }

    /// Table lookup failed
    pub fn table_not_found(table: &str) -> Self {
        Self::new(
            DbErrorCode::TableNotFound,
            format!("Table '{}' does not exist", table),
        )
    }

    /// Table name already taken
    pub fn table_exists(table: &str) -> Self {
        Self::new(
            DbErrorCode::TableExists,
            format!("A table named '{}' already exists", table),
        )
    }

    /// Wraps a grid failure without altering it
    pub fn grid(err: GridError) -> Self {
        Self {
            code: DbErrorCode::GridFailure,
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> DbErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the underlying grid failure, if any
    pub fn grid_error(&self) -> Option<&GridError> {
        self.source.as_ref()
    }

    /// Returns true if the error was raised before any write was issued
    pub fn is_validation(&self) -> bool {
        self.code.is_validation()
    }
}

impl fmt::Display for DbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for DbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<GridError> for DbError {
    fn from(err: GridError) -> Self {
        Self::grid(err)
    }
}

/// Result type for sheetdb operations
pub type DbResult<T> = Result<T, DbError>;
