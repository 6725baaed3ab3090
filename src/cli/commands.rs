//! CLI command implementations
//!
//! Each command loads the configuration, opens the workbook file, performs one
//! database operation and returns the `data` payload of the response.

use std::path::Path;

use regex::Regex;
use serde_json::{json, Value};

use crate::codec::{parse_cell, Record};
use crate::database::Database;
use crate::grid::FileGrid;
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::query::{Condition, Operator, OutputFormat, Query};

use super::args::{Command, SelectionArgs};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_response};

/// `field<op>value`; the field may not contain operator characters
const WHERE_PATTERN: &str = r"^\s*([^=!<>~]+?)\s*(==|!=|>=|<=|=|>|<|~)\s*(.*?)\s*$";

/// Main CLI entry point
///
/// Parses arguments, runs the command and prints exactly one response object.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    match run_command(cli.command) {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<Value> {
    match cmd {
        Command::Init { config } => init(&config.config),
        Command::Tables { config } => tables(&config.config),
        Command::CreateTable { name, header, config } => {
            create_table(&config.config, &name, &header)
        }
        Command::DropTable { name, config } => drop_table(&config.config, &name),
        Command::RenameTable {
            name,
            new_name,
            config,
        } => rename_table(&config.config, &name, &new_name),
        Command::DuplicateTable {
            name,
            new_name,
            config,
        } => duplicate_table(&config.config, &name, &new_name),
        Command::Header { table, config } => header(&config.config, &table),
        Command::Insert {
            table,
            record,
            config,
        } => insert(&config.config, &table, record),
        Command::Select {
            table,
            selection,
            fields,
            limit,
            format,
            config,
        } => {
            let mut query = build_query(selection)?;
            if let Some(fields) = fields {
                query = query.with_fields(fields);
            }
            if let Some(limit) = limit {
                query = query.with_limit(limit);
            }
            let format: OutputFormat = format
                .parse()
                .map_err(|e: crate::errors::DbError| CliError::invalid_argument(e.message()))?;
            select(&config.config, &table, &query.with_format(format))
        }
        Command::Update {
            table,
            selection,
            set,
            config,
        } => {
            let query = build_query(selection)?;
            let new_values = parse_record(&set)?;
            update(&config.config, &table, &query, &new_values)
        }
        Command::Delete {
            table,
            selection,
            config,
        } => {
            let query = build_query(selection)?;
            delete(&config.config, &table, &query)
        }
    }
}

/// Create an empty workbook file
pub fn init(config_path: &Path) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let path = config.workbook_path();

    if path.exists() {
        return Err(CliError::already_initialized(&config.workbook));
    }

    let key = config.key();
    FileGrid::create(path, key.as_str())?;
    log_event_with_fields(
        Event::WorkbookInitialized,
        &[("workbook", config.workbook.as_str()), ("key", key.as_str())],
    );

    Ok(json!({"initialized": true, "workbook": config.workbook, "key": key}))
}

pub fn tables(config_path: &Path) -> CliResult<Value> {
    let db = open_database(config_path)?;
    Ok(json!(db.table_names()?))
}

pub fn create_table(config_path: &Path, name: &str, header: &[String]) -> CliResult<Value> {
    let mut db = open_database(config_path)?;
    let table = db.create_table(name, header)?;
    let header = table.refresh()?;
    Ok(json!({"table": name, "header": header.fields()}))
}

pub fn drop_table(config_path: &Path, name: &str) -> CliResult<Value> {
    let mut db = open_database(config_path)?;
    db.delete_table(name)?;
    Ok(json!({"dropped": name}))
}

pub fn rename_table(config_path: &Path, name: &str, new_name: &str) -> CliResult<Value> {
    let mut db = open_database(config_path)?;
    db.rename_table(name, new_name)?;
    Ok(json!({"renamed": name, "table": new_name}))
}

pub fn duplicate_table(config_path: &Path, name: &str, new_name: &str) -> CliResult<Value> {
    let mut db = open_database(config_path)?;
    db.duplicate_table(name, new_name)?;
    Ok(json!({"duplicated": name, "table": new_name}))
}

/// Current header row of a table
pub fn header(config_path: &Path, table: &str) -> CliResult<Value> {
    let mut db = open_database(config_path)?;
    let header = db.open_table(table)?.refresh()?;
    Ok(json!(header.fields()))
}

/// Append one record given inline or on stdin
pub fn insert(config_path: &Path, table: &str, record: Option<String>) -> CliResult<Value> {
    let record = match record {
        Some(text) => parse_record(&text)?,
        None => Record::try_from(read_request()?)?,
    };

    let mut db = open_database(config_path)?;
    db.open_table(table)?.insert(&record)?;
    Ok(json!({"inserted": 1}))
}

pub fn select(config_path: &Path, table: &str, query: &Query) -> CliResult<Value> {
    let mut db = open_database(config_path)?;
    let output = db.open_table(table)?.select(query)?;
    Ok(output.to_json())
}

pub fn update(
    config_path: &Path,
    table: &str,
    query: &Query,
    new_values: &Record,
) -> CliResult<Value> {
    let mut db = open_database(config_path)?;
    let updated = db.open_table(table)?.update(query, new_values)?;
    Ok(json!({"updated": updated}))
}

pub fn delete(config_path: &Path, table: &str, query: &Query) -> CliResult<Value> {
    let mut db = open_database(config_path)?;
    let deleted = db.open_table(table)?.delete(query)?;
    Ok(json!({"deleted": deleted}))
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.severity()?);

    let path = config_path.display().to_string();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("config", path.as_str()), ("workbook", config.workbook.as_str())],
    );
    Ok(config)
}

fn open_database(config_path: &Path) -> CliResult<Database<FileGrid>> {
    let config = load_config(config_path)?;
    let path = config.workbook_path();
    let key = config.key();

    let grid = if path.exists() {
        FileGrid::open(path)?
    } else if config.create_workbook {
        let grid = FileGrid::create(path, key.as_str())?;
        log_event_with_fields(
            Event::WorkbookInitialized,
            &[("workbook", config.workbook.as_str()), ("key", key.as_str())],
        );
        grid
    } else {
        return Err(CliError::not_initialized(&config.workbook));
    };

    if grid.key() != key {
        Logger::warn(
            "WORKBOOK_KEY_MISMATCH",
            &[("configured", key.as_str()), ("stored", grid.key())],
        );
    }

    Ok(Database::new(key, grid))
}

/// Translates selection flags into a query; conflicts are reported by the table
fn build_query(selection: SelectionArgs) -> CliResult<Query> {
    let mut query = Query::new();

    if let Some(field) = selection.field {
        query = query.with_field(field);
    }
    if let Some(value) = selection.value {
        query = query.with_value(parse_cell(&value));
    }

    if !selection.conditions.is_empty() || selection.where_json.is_some() {
        let mut conditions = selection
            .conditions
            .iter()
            .map(|expr| parse_where(expr))
            .collect::<CliResult<Vec<_>>>()?;
        if let Some(text) = selection.where_json {
            let value: Value = serde_json::from_str(&text).map_err(|e| {
                CliError::invalid_argument(format!("Invalid --where-json: {}", e))
            })?;
            conditions.extend(Condition::parse_list(value)?);
        }
        query = query.with_where(conditions);
    }

    if let Some(rows) = selection.rows {
        query = query.with_rows(rows);
    }

    Ok(query)
}

/// Parses one `--where` expression such as `Age>=30` or `Email~@example`
fn parse_where(expr: &str) -> CliResult<Condition> {
    let pattern = Regex::new(WHERE_PATTERN)
        .map_err(|e| CliError::invalid_argument(format!("Invalid where pattern: {}", e)))?;
    let caps = pattern.captures(expr).ok_or_else(|| {
        CliError::invalid_argument(format!(
            "Invalid --where '{}': expected field<op>value",
            expr
        ))
    })?;

    let op: Operator = caps[2].parse()?;
    Ok(Condition::new(&caps[1], op, parse_cell(&caps[3])))
}

fn parse_record(text: &str) -> CliResult<Record> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| CliError::invalid_argument(format!("Invalid record JSON: {}", e)))?;
    Ok(Record::try_from(value)?)
}
