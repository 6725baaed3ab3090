//! Table: CRUD over one worksheet
//!
//! Every operation follows the same order:
//! 1. Resolve and validate the caller's arguments
//! 2. Re-read the header (fixed for the rest of the call)
//! 3. Validate records against it
//! 4. Read and decode all data rows
//! 5. Filter, then issue grid writes
//!
//! Nothing is written unless steps 1-4 succeed.

use std::sync::Arc;

use crate::codec::{Record, RecordCodec};
use crate::errors::{DbError, DbResult};
use crate::grid::{GridAccessor, Row};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry, ObservationScope};
use crate::query::{
    ConditionMatcher, Frame, OutputFormat, Query, SelectOutput, Selection,
};
use crate::schema::{Header, HeaderCache};

/// First grid row that holds data
const FIRST_DATA_ROW: usize = 2;

/// Stateless view over one worksheet plus its header cache
pub struct Table<G: GridAccessor> {
    name: String,
    grid: Arc<G>,
    cache: HeaderCache,
    metrics: Arc<MetricsRegistry>,
}

impl<G: GridAccessor> Table<G> {
    /// Binds a view to the named worksheet. Nothing is read yet.
    pub fn new(name: impl Into<String>, grid: Arc<G>) -> Self {
        Self::with_metrics(name, grid, Arc::new(MetricsRegistry::new()))
    }

    /// Binds a view that reports into a shared metrics registry
    pub fn with_metrics(
        name: impl Into<String>,
        grid: Arc<G>,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        let name = name.into();
        Self {
            cache: HeaderCache::new(name.clone()),
            name,
            grid,
            metrics,
        }
    }

    /// Worksheet title
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Header seen by the most recent operation on this view.
    ///
    /// Empty before the first operation. Not re-read here, so it can be
    /// stale if the worksheet was edited since.
    pub fn header(&self) -> &[String] {
        self.cache.current().map(Header::fields).unwrap_or(&[])
    }

    /// Re-reads the header from the grid
    pub fn refresh(&mut self) -> DbResult<Header> {
        let header = self.cache.refresh(self.grid.as_ref())?;
        self.metrics.increment_header_refreshes();
        Ok(header)
    }

    /// Appends a record.
    ///
    /// Duplicates are allowed. Fields the record omits are stored empty.
    ///
    /// # Errors
    ///
    /// `RecordError` if any key is not in the header or a value is nested;
    /// nothing is written in that case.
    pub fn insert(&mut self, record: &Record) -> DbResult<()> {
        let header = self.refresh()?;
        let row = RecordCodec::encode(record, &header).map_err(|e| self.reject(e))?;

        self.grid.append_row(&self.name, &row)?;
        self.metrics.increment_records_inserted();
        log_event_with_fields(Event::RecordInserted, &[("table", self.name.as_str())]);
        Ok(())
    }

    /// Returns matching records in grid order.
    ///
    /// With no selection every data row matches. A filter on a field the
    /// header lacks matches nothing. `fields` projects the output, `limit`
    /// keeps the first matches top to bottom.
    ///
    /// # Errors
    ///
    /// - `QueryError` for conflicting selection arguments
    /// - `RecordError` if a projected field is not in the header
    /// - `SchemaError` if a row does not fit the header
    pub fn select(&mut self, query: &Query) -> DbResult<SelectOutput> {
        let selection = query.selection().map_err(|e| self.reject(e))?;
        let header = self.refresh()?;

        let columns: Vec<String> = match query.fields() {
            Some(fields) => {
                header
                    .ensure_subset(fields.iter().map(String::as_str), "Selected fields")
                    .map_err(|e| self.reject(e))?;
                header
                    .fields()
                    .iter()
                    .filter(|f| fields.contains(f))
                    .cloned()
                    .collect()
            }
            None => header.fields().to_vec(),
        };

        let rows = self.scan(&header)?;
        let scanned = rows.len();

        let mut matches: Vec<(usize, Record)> = Vec::new();
        for (position, record) in rows {
            if query.limit().is_some_and(|limit| matches.len() >= limit) {
                break;
            }
            if is_selected(&selection, position, &record) {
                matches.push((position, record));
            }
        }

        let output = match query.format() {
            OutputFormat::Frame => {
                let mut frame = Frame::new(columns);
                for (position, record) in &matches {
                    frame.push(*position, record);
                }
                SelectOutput::Frame(frame)
            }
            OutputFormat::Records => SelectOutput::Records(
                matches
                    .iter()
                    .map(|(_, record)| record.project(&columns))
                    .collect(),
            ),
            OutputFormat::RowNumbers => {
                SelectOutput::RowNumbers(matches.iter().map(|(position, _)| *position).collect())
            }
        };

        self.metrics.add_records_returned(output.len() as u64);
        let matched = output.len().to_string();
        let scanned = scanned.to_string();
        log_event_with_fields(
            Event::RecordsSelected,
            &[
                ("table", self.name.as_str()),
                ("matched", matched.as_str()),
                ("scanned", scanned.as_str()),
            ],
        );
        Ok(output)
    }

    /// Sets `new_values` on every matching row and returns how many rows
    /// were written.
    ///
    /// Fields not in `new_values` keep their stored text. Each matching row is
    /// rewritten in place. A grid failure partway leaves earlier rows
    /// updated; there is no rollback.
    ///
    /// # Errors
    ///
    /// - `QueryError` for conflicting or missing selection arguments
    /// - `RecordError` if `new_values` has a key outside the header
    pub fn update(&mut self, query: &Query, new_values: &Record) -> DbResult<usize> {
        let selection = self.required_selection(query, "update")?;
        let header = self.refresh()?;
        RecordCodec::validate(new_values, &header).map_err(|e| self.reject(e))?;

        let mut targets: Vec<(usize, Row)> = Vec::new();
        for (position, mut record) in self.scan(&header)? {
            if is_selected(&selection, position, &record) {
                record.merge(new_values);
                targets.push((position, RecordCodec::encode(&record, &header)?));
            }
        }

        let scope = ObservationScope::with_fields("UPDATE", &[("table", self.name.as_str())]);
        let mut updated = 0;
        for (position, row) in &targets {
            if let Err(e) = self.grid.write_row(&self.name, *position, row) {
                let reason = format!("row {} after {} updated: {}", position, updated, e);
                scope.fail(&reason);
                return Err(e.into());
            }
            updated += 1;
            self.metrics.increment_records_updated();
        }

        let count = updated.to_string();
        scope.complete_with_fields(&[("updated", count.as_str())]);
        log_event_with_fields(
            Event::RecordsUpdated,
            &[("table", self.name.as_str()), ("updated", count.as_str())],
        );
        Ok(updated)
    }

    /// Deletes every matching row and returns how many were removed.
    ///
    /// Rows are removed bottom-up so each deletion leaves the positions of the
    /// rows still to delete unchanged. A grid failure partway leaves the
    /// lower rows already deleted.
    ///
    /// # Errors
    ///
    /// `QueryError` for conflicting or missing selection arguments.
    pub fn delete(&mut self, query: &Query) -> DbResult<usize> {
        let selection = self.required_selection(query, "delete")?;
        let header = self.refresh()?;

        let mut positions: Vec<usize> = self
            .scan(&header)?
            .into_iter()
            .filter(|(position, record)| is_selected(&selection, *position, record))
            .map(|(position, _)| position)
            .collect();
        positions.sort_unstable_by(|a, b| b.cmp(a));

        let scope = ObservationScope::with_fields("DELETE", &[("table", self.name.as_str())]);
        let mut deleted = 0;
        for position in &positions {
            if let Err(e) = self.grid.delete_row(&self.name, *position) {
                let reason = format!("row {} after {} deleted: {}", position, deleted, e);
                scope.fail(&reason);
                return Err(e.into());
            }
            deleted += 1;
            self.metrics.increment_records_deleted();
        }

        let count = deleted.to_string();
        scope.complete_with_fields(&[("deleted", count.as_str())]);
        log_event_with_fields(
            Event::RecordsDeleted,
            &[("table", self.name.as_str()), ("deleted", count.as_str())],
        );
        Ok(deleted)
    }

    /// Reads and decodes every data row with its grid position
    fn scan(&self, header: &Header) -> DbResult<Vec<(usize, Record)>> {
        self.grid
            .list_rows(&self.name)?
            .iter()
            .enumerate()
            .skip(1)
            .map(|(idx, row)| {
                let position = idx + 1;
                RecordCodec::decode(row, header)
                    .map(|record| (position, record))
                    .map_err(|e| {
                        DbError::schema_error(format!(
                            "Table '{}' row {}: {}",
                            self.name,
                            position,
                            e.message()
                        ))
                    })
            })
            .collect()
    }

    /// Update and delete refuse to run without an explicit selection
    fn required_selection(&self, query: &Query, operation: &str) -> DbResult<Selection> {
        match query.selection() {
            Ok(Selection::All) => Err(self.reject(DbError::query_error(format!(
                "Cannot {} records without a select mechanism",
                operation
            )))),
            Ok(selection) => Ok(selection),
            Err(e) => Err(self.reject(e)),
        }
    }

    fn reject(&self, err: DbError) -> DbError {
        self.metrics.increment_queries_rejected();
        log_event_with_fields(
            Event::QueryRejected,
            &[
                ("table", self.name.as_str()),
                ("code", err.code().code()),
                ("reason", err.message()),
            ],
        );
        err
    }
}

fn is_selected(selection: &Selection, position: usize, record: &Record) -> bool {
    match selection {
        Selection::All => true,
        Selection::Conditions(conditions) => ConditionMatcher::matches(record, conditions),
        Selection::Rows(rows) => position >= FIRST_DATA_ROW && rows.contains(&position),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DbErrorCode;
    use crate::grid::MemoryGrid;
    use crate::query::Condition;
    use serde_json::json;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn users() -> Table<MemoryGrid> {
        let grid = MemoryGrid::new();
        grid.create_table("users", &cells(&["Username", "Email", "Age"])).unwrap();
        grid.append_row("users", &cells(&["Alan", "alan@x", "41"])).unwrap();
        grid.append_row("users", &cells(&["Grace", "grace@x", "85"])).unwrap();
        grid.append_row("users", &cells(&["Alan", "alan@y", ""])).unwrap();
        Table::new("users", Arc::new(grid))
    }

    fn records(output: SelectOutput) -> Vec<Record> {
        output.into_records()
    }

    #[test]
    fn test_header_empty_before_first_operation() {
        let mut table = users();
        assert!(table.header().is_empty());

        table.select(&Query::new()).unwrap();
        assert_eq!(table.header(), &cells(&["Username", "Email", "Age"])[..]);
    }

    #[test]
    fn test_select_all_in_grid_order() {
        let mut table = users();
        let output = table.select(&Query::new()).unwrap();
        let frame = output.as_frame().unwrap();
        assert_eq!(frame.index(), &[2, 3, 4]);
        assert_eq!(
            frame.column("Username").unwrap(),
            vec![&json!("Alan"), &json!("Grace"), &json!("Alan")]
        );
    }

    #[test]
    fn test_select_shorthand_and_limit() {
        let mut table = users();
        let all = table.select(&Query::eq("Username", "Alan")).unwrap();
        assert_eq!(all.len(), 2);

        let first = table
            .select(&Query::eq("Username", "Alan").with_limit(1).with_format(OutputFormat::RowNumbers))
            .unwrap();
        assert_eq!(first.as_row_numbers().unwrap(), &[2]);

        let none = table.select(&Query::new().with_limit(0)).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_select_projection_in_header_order() {
        let mut table = users();
        let output = table
            .select(
                &Query::eq("Username", "Grace")
                    .with_fields(["Age", "Username"])
                    .with_format(OutputFormat::Records),
            )
            .unwrap();
        assert_eq!(
            records(output),
            vec![Record::new().with("Username", "Grace").with("Age", 85)]
        );

        let frame = table
            .select(&Query::new().with_fields(["Age", "Username"]))
            .unwrap();
        assert_eq!(
            frame.as_frame().unwrap().columns(),
            &cells(&["Username", "Age"])[..]
        );
    }

    #[test]
    fn test_select_unknown_projection_is_record_error() {
        let mut table = users();
        let err = table
            .select(&Query::new().with_fields(["Password"]))
            .unwrap_err();
        assert_eq!(err.code(), DbErrorCode::RecordInvalid);
    }

    #[test]
    fn test_select_unknown_filter_field_is_empty() {
        let mut table = users();
        let output = table.select(&Query::eq("Password", "x")).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_select_conflicting_arguments() {
        let mut table = users();
        let err = table
            .select(&Query::eq("Username", "Alan").with_where(vec![Condition::gt("Age", 1)]))
            .unwrap_err();
        assert_eq!(err.code(), DbErrorCode::QueryInvalid);
    }

    #[test]
    fn test_select_by_row_numbers() {
        let mut table = users();
        let output = table
            .select(&Query::new().with_rows(vec![4, 2, 9]).with_format(OutputFormat::RowNumbers))
            .unwrap();
        assert_eq!(output.as_row_numbers().unwrap(), &[2, 4]);
    }

    #[test]
    fn test_insert_validates_keys() {
        let mut table = users();
        let err = table
            .insert(&Record::new().with("Password", "123456"))
            .unwrap_err();
        assert_eq!(err.code(), DbErrorCode::RecordInvalid);
        assert_eq!(table.select(&Query::new()).unwrap().len(), 3);
    }

    #[test]
    fn test_update_requires_selection() {
        let mut table = users();
        let err = table
            .update(&Query::new(), &Record::new().with("Email", "x"))
            .unwrap_err();
        assert_eq!(err.code(), DbErrorCode::QueryInvalid);
    }

    #[test]
    fn test_update_and_delete_counts() {
        let mut table = users();
        let updated = table
            .update(&Query::eq("Username", "Alan"), &Record::new().with("Email", "x"))
            .unwrap();
        assert_eq!(updated, 2);

        let deleted = table.delete(&Query::eq("Username", "Alan")).unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(table.select(&Query::new()).unwrap().len(), 1);
    }

    #[test]
    fn test_metrics_track_operations() {
        let mut table = users();
        table.insert(&Record::new().with("Username", "Ada")).unwrap();
        table.select(&Query::new()).unwrap();
        let _ = table.insert(&Record::new().with("Password", "x"));

        let snapshot = table.metrics.snapshot();
        assert_eq!(snapshot.records_inserted, 1);
        assert_eq!(snapshot.records_returned, 4);
        assert_eq!(snapshot.queries_rejected, 1);
        assert_eq!(snapshot.header_refreshes, 3);
    }
}
