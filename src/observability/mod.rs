//! Observability subsystem for sheetdb
//!
//! - Structured logging (JSON lines on stderr)
//! - Monotonic operation counters
//! - Begin/complete tracing for batch operations
//!
//! # Usage
//!
//! ```ignore
//! use sheetdb::observability::{Logger, Event, Severity};
//!
//! Logger::set_min_severity(Severity::Info);
//! log_event_with_fields(Event::TableCreated, &[("table", "users")]);
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::ObservationScope;

/// Log a lifecycle event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields.
///
/// Mutations log at INFO, reads and rejections at TRACE.
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_mutation() || event == Event::ConfigLoaded {
        Severity::Info
    } else {
        Severity::Trace
    };
    Logger::log(severity, event.as_str(), fields);
}
