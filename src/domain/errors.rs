//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// A range whose first element lies after its last one. Never swapped silently.
    #[error("Invalid range: {first} is after {last}")]
    InvalidRange { first: String, last: String },

    #[error("Invalid effort: {0}")]
    InvalidEffort(String),

    #[error("Unknown off day type '{0}', expected VACATION, SICK or TRIP")]
    UnknownOffDayType(String),

    /// Holiday data unavailable for a location. Soft: callers degrade to "no holiday".
    #[error("Calendar lookup failed: {0}")]
    CalendarLookup(String),

    #[error("Off day {first}..{last} overlaps an existing off day of {user}")]
    OffDayOverlap {
        user: String,
        first: NaiveDate,
        last: NaiveDate,
    },

    #[error("Cannot parse duration '{input}': {reason}")]
    DurationParse { input: String, reason: String },

    #[error("Repository error: {0}")]
    Repo(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A background computation panicked or was cancelled.
    #[error("Task failed: {0}")]
    Task(String),
}

impl DomainError {
    pub fn invalid_range(first: impl ToString, last: impl ToString) -> Self {
        Self::InvalidRange {
            first: first.to_string(),
            last: last.to_string(),
        }
    }
}
