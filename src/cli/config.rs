//! CLI configuration file
//!
//! ```json
//! {
//!   "workbook": "./data/books.json",
//!   "database_key": "books",
//!   "log_level": "info",
//!   "create_workbook": false
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::observability::Severity;

use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path of the workbook file (required)
    pub workbook: String,

    /// Workbook identifier (optional, defaults to the file stem)
    #[serde(default)]
    pub database_key: Option<String>,

    /// Minimum log severity (optional, default "warn")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Create the workbook on first use instead of requiring `init`
    #[serde(default)]
    pub create_workbook: bool,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.workbook.trim().is_empty() {
            return Err(CliError::config_error("workbook must not be empty"));
        }

        if let Some(key) = &self.database_key {
            if key.trim().is_empty() {
                return Err(CliError::config_error("database_key must not be empty"));
            }
        }

        self.severity()?;

        Ok(())
    }

    /// Workbook path, relative paths resolved against the working directory
    pub fn workbook_path(&self) -> &Path {
        Path::new(&self.workbook)
    }

    /// Workbook identifier
    pub fn key(&self) -> String {
        match &self.database_key {
            Some(key) => key.clone(),
            None => self
                .workbook_path()
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.workbook.clone()),
        }
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level.parse().map_err(|e: String| {
            CliError::config_error(format!("Invalid log_level: {}", e))
        })
    }
}
