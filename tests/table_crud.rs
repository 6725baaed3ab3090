//! Table CRUD Behaviour Tests
//!
//! Covers:
//! - Insert/select round trip and duplicate records
//! - Key validation before any write
//! - Update touches every match and nothing else
//! - Delete removes rows bottom-up
//! - Filter, projection and limit semantics

use std::sync::{Arc, Mutex};

use serde_json::json;
use sheetdb::grid::{GridError, GridResult, Row};
use sheetdb::{
    Condition, Database, DbErrorCode, GridAccessor, MemoryGrid, OutputFormat, Query, Record,
};

// =============================================================================
// Test Utilities
// =============================================================================

/// Mutating grid call as observed by [`RecordingGrid`]
#[derive(Debug, Clone, PartialEq)]
enum Call {
    Append(String),
    Write(String, usize),
    Delete(String, usize),
}

/// Memory grid that records every mutating call and can fail one position
#[derive(Default)]
struct RecordingGrid {
    inner: MemoryGrid,
    calls: Mutex<Vec<Call>>,
    fail_at: Mutex<Option<usize>>,
}

impl RecordingGrid {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn fail_at(&self, position: usize) {
        *self.fail_at.lock().unwrap() = Some(position);
    }

    fn check(&self, position: usize) -> GridResult<()> {
        if *self.fail_at.lock().unwrap() == Some(position) {
            return Err(GridError::Io("quota exceeded".into()));
        }
        Ok(())
    }
}

impl GridAccessor for RecordingGrid {
    fn list_tables(&self) -> GridResult<Vec<String>> {
        self.inner.list_tables()
    }

    fn create_table(&self, table: &str, header: &[String]) -> GridResult<()> {
        self.inner.create_table(table, header)
    }

    fn delete_table(&self, table: &str) -> GridResult<()> {
        self.inner.delete_table(table)
    }

    fn rename_table(&self, table: &str, new_name: &str) -> GridResult<()> {
        self.inner.rename_table(table, new_name)
    }

    fn duplicate_table(&self, table: &str, new_name: &str) -> GridResult<()> {
        self.inner.duplicate_table(table, new_name)
    }

    fn read_header(&self, table: &str) -> GridResult<Row> {
        self.inner.read_header(table)
    }

    fn list_rows(&self, table: &str) -> GridResult<Vec<Row>> {
        self.inner.list_rows(table)
    }

    fn append_row(&self, table: &str, row: &[String]) -> GridResult<()> {
        self.record(Call::Append(table.to_string()));
        self.inner.append_row(table, row)
    }

    fn write_row(&self, table: &str, position: usize, row: &[String]) -> GridResult<()> {
        self.record(Call::Write(table.to_string(), position));
        self.check(position)?;
        self.inner.write_row(table, position, row)
    }

    fn delete_row(&self, table: &str, position: usize) -> GridResult<()> {
        self.record(Call::Delete(table.to_string(), position));
        self.check(position)?;
        self.inner.delete_row(table, position)
    }
}

fn user(name: &str, email: &str) -> Record {
    Record::new().with("Username", name).with("Email", email)
}

/// Database with a `users(Username, Email)` table holding
/// Alan(2), Grace(3), Alan(4), Linus(5)
fn seeded() -> (Arc<RecordingGrid>, Database<RecordingGrid>) {
    let grid = Arc::new(RecordingGrid::default());
    let mut db = Database::with_shared_grid("books", Arc::clone(&grid));
    let users = db.create_table("users", &["Username", "Email"]).unwrap();
    users.insert(&user("Alan", "alan@a")).unwrap();
    users.insert(&user("Grace", "grace@g")).unwrap();
    users.insert(&user("Alan", "alan@b")).unwrap();
    users.insert(&user("Linus", "linus@l")).unwrap();
    grid.calls.lock().unwrap().clear();
    (grid, db)
}

fn all_records(db: &mut Database<RecordingGrid>) -> Vec<Record> {
    db.open_table("users")
        .unwrap()
        .select(&Query::new())
        .unwrap()
        .into_records()
}

// =============================================================================
// Insert
// =============================================================================

#[test]
fn test_insert_then_select_fills_missing_fields() {
    let mut db = Database::new("books", MemoryGrid::new());
    let users = db.create_table("users", &["Username", "Email"]).unwrap();
    users.insert(&Record::new().with("Username", "Ada")).unwrap();

    let records = users.select(&Query::new()).unwrap().into_records();
    assert_eq!(records, vec![user("Ada", "")]);
}

#[test]
fn test_insert_unknown_key_writes_nothing() {
    let (grid, mut db) = seeded();
    let users = db.open_table("users").unwrap();

    let err = users
        .insert(&Record::new().with("Password", "123456"))
        .unwrap_err();
    assert_eq!(err.code(), DbErrorCode::RecordInvalid);
    assert!(err.message().contains("Password"));
    assert!(grid.calls().is_empty());
}

#[test]
fn test_insert_nested_value_writes_nothing() {
    let (grid, mut db) = seeded();
    let users = db.open_table("users").unwrap();

    let record = Record::new().with("Username", json!(["a", "b"]));
    let err = users.insert(&record).unwrap_err();
    assert_eq!(err.code(), DbErrorCode::RecordInvalid);
    assert!(grid.calls().is_empty());
}

#[test]
fn test_duplicates_are_permitted() {
    let mut db = Database::new("books", MemoryGrid::new());
    let users = db.create_table("users", &["Username", "Email"]).unwrap();
    users.insert(&user("Ada", "ada@x")).unwrap();
    users.insert(&user("Ada", "ada@x")).unwrap();

    let matches = users.select(&Query::eq("Username", "Ada")).unwrap();
    assert_eq!(matches.len(), 2);
}

#[test]
fn test_typed_values_survive_storage() {
    let mut db = Database::new("books", MemoryGrid::new());
    let items = db
        .create_table("items", &["Name", "Qty", "Price", "Active", "Code"])
        .unwrap();
    let record = Record::new()
        .with("Name", "Bolt")
        .with("Qty", 12)
        .with("Price", 0.25)
        .with("Active", true)
        .with("Code", "007");
    items.insert(&record).unwrap();

    let records = items.select(&Query::new()).unwrap().into_records();
    assert_eq!(records, vec![record]);
}

// =============================================================================
// Select
// =============================================================================

#[test]
fn test_select_without_filter_returns_rows_in_order() {
    let (_grid, mut db) = seeded();
    let users = db.open_table("users").unwrap();

    let empty_where = users.select(&Query::filter(vec![])).unwrap();
    let no_filter = users.select(&Query::new()).unwrap();
    assert_eq!(empty_where, no_filter);
    assert_eq!(
        no_filter.as_frame().unwrap().index(),
        &[2, 3, 4, 5]
    );
}

#[test]
fn test_select_numeric_coercion() {
    let mut db = Database::new("books", MemoryGrid::new());
    let items = db.create_table("items", &["Name", "Qty"]).unwrap();
    items.insert(&Record::new().with("Name", "Bolt").with("Qty", "3")).unwrap();
    items.insert(&Record::new().with("Name", "Nut").with("Qty", 10)).unwrap();
    items.insert(&Record::new().with("Name", "Gear").with("Qty", "n/a")).unwrap();

    let eq = items.select(&Query::eq("Qty", 3)).unwrap();
    assert_eq!(eq.len(), 1);

    let gt = items
        .select(&Query::filter(vec![Condition::gt("Qty", 5)]).with_format(OutputFormat::RowNumbers))
        .unwrap();
    assert_eq!(gt.as_row_numbers().unwrap(), &[3]);

    let contains = items
        .select(&Query::filter(vec![Condition::contains("Name", "t")]))
        .unwrap();
    assert_eq!(contains.len(), 2);
}

#[test]
fn test_select_where_conditions_are_conjunctive() {
    let (_grid, mut db) = seeded();
    let users = db.open_table("users").unwrap();

    let query = Query::filter(vec![
        Condition::eq("Username", "Alan"),
        Condition::contains("Email", "@b"),
    ])
    .with_format(OutputFormat::RowNumbers);
    let output = users.select(&query).unwrap();
    assert_eq!(output.as_row_numbers().unwrap(), &[4]);
}

#[test]
fn test_select_limit_keeps_first_matches() {
    let (_grid, mut db) = seeded();
    let users = db.open_table("users").unwrap();

    let output = users
        .select(&Query::new().with_limit(2).with_format(OutputFormat::Records))
        .unwrap();
    assert_eq!(
        output.into_records(),
        vec![user("Alan", "alan@a"), user("Grace", "grace@g")]
    );
}

#[test]
fn test_select_rejects_half_shorthand() {
    let (_grid, mut db) = seeded();
    let users = db.open_table("users").unwrap();

    let err = users.select(&Query::new().with_field("Username")).unwrap_err();
    assert_eq!(err.code(), DbErrorCode::QueryInvalid);
}

#[test]
fn test_select_reports_overlong_row() {
    let grid = Arc::new(MemoryGrid::new());
    let mut db = Database::with_shared_grid("books", Arc::clone(&grid));
    db.create_table("users", &["Username"]).unwrap();
    grid.append_row("users", &["Ada".to_string(), String::new()]).unwrap();
    grid.append_row("users", &["Alan".to_string(), "stray".to_string()]).unwrap();

    let err = db
        .open_table("users")
        .unwrap()
        .select(&Query::new())
        .unwrap_err();
    assert_eq!(err.code(), DbErrorCode::SchemaInvalid);
    assert!(err.message().contains("row 3"));
}

#[test]
fn test_header_follows_manual_edits() {
    let grid = Arc::new(MemoryGrid::new());
    let mut db = Database::with_shared_grid("books", Arc::clone(&grid));
    db.create_table("users", &["Username"]).unwrap();

    let users = db.open_table("users").unwrap();
    users.select(&Query::new()).unwrap();
    assert_eq!(users.header(), &["Username".to_string()][..]);

    grid.write_row("users", 1, &["Username".to_string(), "Email".to_string()])
        .unwrap();
    // Stale until the next operation
    assert_eq!(users.header().len(), 1);

    users.insert(&user("Ada", "ada@x")).unwrap();
    assert_eq!(users.header().len(), 2);
}

// =============================================================================
// Update
// =============================================================================

#[test]
fn test_update_changes_only_matching_rows_and_fields() {
    let (grid, mut db) = seeded();
    let updated = db
        .open_table("users")
        .unwrap()
        .update(&Query::eq("Username", "Alan"), &Record::new().with("Email", "x"))
        .unwrap();
    assert_eq!(updated, 2);
    assert_eq!(
        grid.calls(),
        vec![
            Call::Write("users".into(), 2),
            Call::Write("users".into(), 4)
        ]
    );

    assert_eq!(
        all_records(&mut db),
        vec![
            user("Alan", "x"),
            user("Grace", "grace@g"),
            user("Alan", "x"),
            user("Linus", "linus@l"),
        ]
    );
}

#[test]
fn test_update_without_matches_is_noop() {
    let (grid, mut db) = seeded();
    let updated = db
        .open_table("users")
        .unwrap()
        .update(&Query::eq("Username", "Nobody"), &Record::new().with("Email", "x"))
        .unwrap();
    assert_eq!(updated, 0);
    assert!(grid.calls().is_empty());
}

#[test]
fn test_update_unknown_key_writes_nothing() {
    let (grid, mut db) = seeded();
    let err = db
        .open_table("users")
        .unwrap()
        .update(&Query::eq("Username", "Alan"), &Record::new().with("Password", "x"))
        .unwrap_err();
    assert_eq!(err.code(), DbErrorCode::RecordInvalid);
    assert!(grid.calls().is_empty());
}

#[test]
fn test_update_explicit_empty_where_matches_all() {
    let (_grid, mut db) = seeded();
    let updated = db
        .open_table("users")
        .unwrap()
        .update(&Query::filter(vec![]), &Record::new().with("Email", ""))
        .unwrap();
    assert_eq!(updated, 4);
}

// =============================================================================
// Delete
// =============================================================================

#[test]
fn test_delete_removes_matches_bottom_up() {
    let (grid, mut db) = seeded();
    let deleted = db
        .open_table("users")
        .unwrap()
        .delete(&Query::eq("Username", "Alan"))
        .unwrap();
    assert_eq!(deleted, 2);
    assert_eq!(
        grid.calls(),
        vec![
            Call::Delete("users".into(), 4),
            Call::Delete("users".into(), 2)
        ]
    );

    assert_eq!(
        all_records(&mut db),
        vec![user("Grace", "grace@g"), user("Linus", "linus@l")]
    );
}

#[test]
fn test_delete_by_row_numbers() {
    let (grid, mut db) = seeded();
    let deleted = db
        .open_table("users")
        .unwrap()
        .delete(&Query::new().with_rows(vec![3, 5]))
        .unwrap();
    assert_eq!(deleted, 2);
    assert_eq!(
        grid.calls(),
        vec![
            Call::Delete("users".into(), 5),
            Call::Delete("users".into(), 3)
        ]
    );
}

#[test]
fn test_delete_requires_selection() {
    let (grid, mut db) = seeded();
    let err = db
        .open_table("users")
        .unwrap()
        .delete(&Query::new())
        .unwrap_err();
    assert_eq!(err.code(), DbErrorCode::QueryInvalid);
    assert!(grid.calls().is_empty());
}

#[test]
fn test_delete_header_row_rejected() {
    let (grid, mut db) = seeded();
    let err = db
        .open_table("users")
        .unwrap()
        .delete(&Query::new().with_rows(vec![1]))
        .unwrap_err();
    assert_eq!(err.code(), DbErrorCode::QueryInvalid);
    assert!(grid.calls().is_empty());
}

// =============================================================================
// Partial Batches
// =============================================================================

#[test]
fn test_update_failure_keeps_earlier_writes() {
    let (grid, mut db) = seeded();
    grid.fail_at(4);

    let err = db
        .open_table("users")
        .unwrap()
        .update(&Query::eq("Username", "Alan"), &Record::new().with("Email", "x"))
        .unwrap_err();
    assert_eq!(err.code(), DbErrorCode::GridFailure);
    assert_eq!(
        err.grid_error(),
        Some(&GridError::Io("quota exceeded".into()))
    );

    grid.fail_at(0);
    let records = all_records(&mut db);
    assert_eq!(records[0], user("Alan", "x"));
    assert_eq!(records[2], user("Alan", "alan@b"));
}

#[test]
fn test_delete_failure_keeps_lower_rows() {
    let (grid, mut db) = seeded();
    grid.fail_at(2);

    let err = db
        .open_table("users")
        .unwrap()
        .delete(&Query::eq("Username", "Alan"))
        .unwrap_err();
    assert_eq!(err.code(), DbErrorCode::GridFailure);

    grid.fail_at(0);
    assert_eq!(
        all_records(&mut db),
        vec![
            user("Alan", "alan@a"),
            user("Grace", "grace@g"),
            user("Linus", "linus@l"),
        ]
    );
}
