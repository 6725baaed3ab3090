//! Query subsystem for sheetdb
//!
//! Turns declarative selection arguments into row predicates.
//!
//! # Flow
//!
//! 1. [`Query`] collects shorthand, conditions or row numbers
//! 2. [`Query::selection`] rejects conflicting arguments
//! 3. [`ConditionMatcher`] evaluates conditions per decoded record
//! 4. Matches are shaped into a [`SelectOutput`]

mod condition;
mod matcher;
mod query;
mod result;

pub use condition::{Condition, Operator};
pub use matcher::ConditionMatcher;
pub use query::{OutputFormat, Query, Selection};
pub use result::{Frame, SelectOutput};
