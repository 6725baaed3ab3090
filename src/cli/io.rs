//! JSON I/O handling for CLI
//!
//! - Input: one JSON document via stdin (insert without --record)
//! - Output: one JSON object per command via stdout
//! - Logs go to stderr, so stdout stays machine-readable

use std::io::{self, Read, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};

/// Read a JSON document from stdin
pub fn read_request() -> CliResult<Value> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;
    parse_request(&input)
}

fn parse_request(input: &str) -> CliResult<Value> {
    if input.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }
    Ok(serde_json::from_str(input)?)
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_value(&json!({
        "status": "ok",
        "data": data
    }))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_value(&json!({
        "status": "error",
        "code": code,
        "message": message
    }))
}

fn write_value(response: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request() {
        let value = parse_request("{\"Username\": \"Alan\"}\n").unwrap();
        assert_eq!(value, json!({"Username": "Alan"}));
    }

    #[test]
    fn test_parse_request_rejects_empty_and_garbage() {
        assert!(parse_request("  \n").is_err());
        assert!(parse_request("{not json").is_err());
    }
}
