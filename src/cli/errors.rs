//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero status after the error
//! object has been printed.

use std::fmt;
use std::io;

use crate::errors::DbError;
use crate::grid::GridError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout)
    IoError,
    /// Workbook file already exists
    AlreadyInitialized,
    /// Workbook file missing
    NotInitialized,
    /// Malformed command-line value
    InvalidArgument,
    /// Database operation failed
    DbError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "SHEETDB_CLI_CONFIG_ERROR",
            Self::IoError => "SHEETDB_CLI_IO_ERROR",
            Self::AlreadyInitialized => "SHEETDB_CLI_ALREADY_INITIALIZED",
            Self::NotInitialized => "SHEETDB_CLI_NOT_INITIALIZED",
            Self::InvalidArgument => "SHEETDB_CLI_INVALID_ARGUMENT",
            Self::DbError => "SHEETDB_CLI_DB_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
    db_code: Option<&'static str>,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            db_code: None,
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn already_initialized(path: &str) -> Self {
        Self::new(
            CliErrorCode::AlreadyInitialized,
            format!("Workbook '{}' already exists", path),
        )
    }

    pub fn not_initialized(path: &str) -> Self {
        Self::new(
            CliErrorCode::NotInitialized,
            format!(
                "Workbook '{}' not found. Run 'sheetdb init' first.",
                path
            ),
        )
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidArgument, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Code reported to the caller.
    ///
    /// Database failures report the database code so callers can tell a
    /// missing table from a rejected record.
    pub fn code_str(&self) -> &'static str {
        self.db_code.unwrap_or_else(|| self.code.code())
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<DbError> for CliError {
    fn from(e: DbError) -> Self {
        Self {
            code: CliErrorCode::DbError,
            message: e.message().to_string(),
            db_code: Some(e.code().code()),
        }
    }
}

impl From<GridError> for CliError {
    fn from(e: GridError) -> Self {
        DbError::grid(e).into()
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_codes() {
        let err = CliError::invalid_argument("bad --where");
        assert_eq!(err.code(), &CliErrorCode::InvalidArgument);
        assert_eq!(err.code_str(), "SHEETDB_CLI_INVALID_ARGUMENT");
        assert_eq!(err.to_string(), "SHEETDB_CLI_INVALID_ARGUMENT: bad --where");
    }

    #[test]
    fn test_db_error_keeps_db_code() {
        let err: CliError = DbError::table_not_found("users").into();
        assert_eq!(err.code(), &CliErrorCode::DbError);
        assert_eq!(err.code_str(), "SHEETDB_TABLE_NOT_FOUND");
        assert!(err.message().contains("users"));
    }

    #[test]
    fn test_grid_error_reports_grid_failure() {
        let err: CliError = GridError::Io("disk full".into()).into();
        assert_eq!(err.code_str(), "SHEETDB_GRID_FAILURE");
    }
}
