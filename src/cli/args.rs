//! CLI argument definitions using clap
//!
//! Commands:
//! - sheetdb init --config <path>
//! - sheetdb tables --config <path>
//! - sheetdb create-table <name> --header a,b,c
//! - sheetdb select <table> [selection] [--fields a,b] [--limit N] [--format F]
//! - sheetdb insert | update | delete | drop-table | rename-table | duplicate-table | header

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// sheetdb - Spreadsheet worksheets as database tables
#[derive(Parser, Debug)]
#[command(name = "sheetdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Path to the configuration file
#[derive(Args, Debug, Clone)]
pub struct ConfigArg {
    #[arg(long, default_value = "./sheetdb.json")]
    pub config: PathBuf,
}

/// Row selection shared by select, update and delete
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Field for the equality shorthand (requires --value)
    #[arg(long)]
    pub field: Option<String>,

    /// Value for the equality shorthand (requires --field)
    #[arg(long)]
    pub value: Option<String>,

    /// Condition `field<op>value`, repeatable; ops: = == != > >= < <= ~
    #[arg(long = "where")]
    pub conditions: Vec<String>,

    /// Conditions as JSON: one `[field, op, value]` triple or a list of them
    #[arg(long)]
    pub where_json: Option<String>,

    /// Explicit grid row numbers (data starts at 2)
    #[arg(long, value_delimiter = ',')]
    pub rows: Option<Vec<usize>>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an empty workbook file
    Init {
        #[command(flatten)]
        config: ConfigArg,
    },

    /// List worksheet titles
    Tables {
        #[command(flatten)]
        config: ConfigArg,
    },

    /// Create a worksheet with a header row
    CreateTable {
        name: String,

        /// Comma-separated field names
        #[arg(long, value_delimiter = ',', required = true)]
        header: Vec<String>,

        #[command(flatten)]
        config: ConfigArg,
    },

    /// Remove a worksheet
    DropTable {
        name: String,

        #[command(flatten)]
        config: ConfigArg,
    },

    /// Rename a worksheet
    RenameTable {
        name: String,
        new_name: String,

        #[command(flatten)]
        config: ConfigArg,
    },

    /// Copy a worksheet under a new title
    DuplicateTable {
        name: String,
        new_name: String,

        #[command(flatten)]
        config: ConfigArg,
    },

    /// Print a table's header row
    Header {
        table: String,

        #[command(flatten)]
        config: ConfigArg,
    },

    /// Append one record
    Insert {
        table: String,

        /// Record as a JSON object; read from stdin when omitted
        #[arg(long)]
        record: Option<String>,

        #[command(flatten)]
        config: ConfigArg,
    },

    /// Query records
    Select {
        table: String,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Comma-separated fields to return
        #[arg(long, value_delimiter = ',')]
        fields: Option<Vec<String>>,

        /// Return at most N matches
        #[arg(long)]
        limit: Option<usize>,

        /// Output shape: frame, records or rows
        #[arg(long, default_value = "frame")]
        format: String,

        #[command(flatten)]
        config: ConfigArg,
    },

    /// Set fields on matching records
    Update {
        table: String,

        #[command(flatten)]
        selection: SelectionArgs,

        /// New values as a JSON object
        #[arg(long)]
        set: String,

        #[command(flatten)]
        config: ConfigArg,
    },

    /// Delete matching records
    Delete {
        table: String,

        #[command(flatten)]
        selection: SelectionArgs,

        #[command(flatten)]
        config: ConfigArg,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
