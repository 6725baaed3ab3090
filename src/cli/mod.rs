//! CLI module for sheetdb
//!
//! Provides command-line access to a local workbook file:
//! - init: Create the workbook file
//! - tables / create-table / drop-table / rename-table / duplicate-table
//! - header: Print a table's header row
//! - insert / select / update / delete: Record operations

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command, ConfigArg, SelectionArgs};
pub use commands::{run, run_command};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_error, write_response};
