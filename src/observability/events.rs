//! Observable events in sheetdb

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration & workbook
    /// Configuration loaded
    ConfigLoaded,
    /// Empty workbook created on disk
    WorkbookInitialized,

    // Table lifecycle
    /// Worksheet created with its header row
    TableCreated,
    /// Table view bound to a worksheet
    TableOpened,
    /// Worksheet removed
    TableDropped,
    /// Worksheet renamed
    TableRenamed,
    /// Worksheet copied
    TableDuplicated,

    // Record operations
    /// Header row re-read from the grid
    HeaderRefreshed,
    /// Record appended
    RecordInserted,
    /// Select finished
    RecordsSelected,
    /// Update batch finished
    RecordsUpdated,
    /// Delete batch finished
    RecordsDeleted,
    /// Request failed validation before touching the grid
    QueryRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::WorkbookInitialized => "WORKBOOK_INITIALIZED",

            Event::TableCreated => "TABLE_CREATED",
            Event::TableOpened => "TABLE_OPENED",
            Event::TableDropped => "TABLE_DROPPED",
            Event::TableRenamed => "TABLE_RENAMED",
            Event::TableDuplicated => "TABLE_DUPLICATED",

            Event::HeaderRefreshed => "HEADER_REFRESHED",
            Event::RecordInserted => "RECORD_INSERTED",
            Event::RecordsSelected => "RECORDS_SELECTED",
            Event::RecordsUpdated => "RECORDS_UPDATED",
            Event::RecordsDeleted => "RECORDS_DELETED",
            Event::QueryRejected => "QUERY_REJECTED",
        }
    }

    /// Returns true for events that change data or structure in the grid
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Event::WorkbookInitialized
                | Event::TableCreated
                | Event::TableDropped
                | Event::TableRenamed
                | Event::TableDuplicated
                | Event::RecordInserted
                | Event::RecordsUpdated
                | Event::RecordsDeleted
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
