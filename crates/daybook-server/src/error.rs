//! Scheduler and server error types.

use std::io;

use chrono::NaiveDate;
use daybook_core::{Event, ValidationError, format::conflict_line};
use daybook_store::StoreError;
use thiserror::Error;

/// Result type for scheduler operations.
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Why a create, update or remove was refused.
///
/// None of these leave partial state behind: validation and conflict errors
/// are raised before any store call, and a persistence error leaves the
/// cache at its last good snapshot.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("invalid event: {0}")]
    Validation(#[from] ValidationError),

    /// An occurrence overlaps existing events.
    #[error(
        "occurrence on {date} overlaps {} existing event(s): {}",
        .conflicts.len(),
        conflict_summary(.conflicts)
    )]
    Conflict { date: NaiveDate, conflicts: Vec<Event> },

    #[error("store error: {0}")]
    Persistence(#[from] StoreError),

    #[error("event {id} not found")]
    NotFound { id: String },
}

fn conflict_summary(conflicts: &[Event]) -> String {
    conflicts
        .iter()
        .map(conflict_line)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Coarse classification of [`SchedulerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Conflict,
    Persistence,
    NotFound,
}

impl SchedulerError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Persistence(_) => ErrorKind::Persistence,
            Self::NotFound { .. } => ErrorKind::NotFound,
        }
    }

    /// Returns the conflicting events, if this is a conflict.
    pub fn conflicts(&self) -> &[Event] {
        match self {
            Self::Conflict { conflicts, .. } => conflicts,
            _ => &[],
        }
    }
}

/// Result type for server plumbing (signals, alert delivery).
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors from the long-running parts of the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// An alert sink could not deliver.
    #[error("alert delivery via {sink} failed: {message}")]
    Delivery { sink: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl ServerError {
    pub fn delivery(sink: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Delivery {
            sink: sink.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use daybook_core::{EventDraft, RepeatRule};

    #[test]
    fn kinds_are_distinct() {
        let validation: SchedulerError = ValidationError::EmptyTitle.into();
        assert_eq!(validation.kind(), ErrorKind::Validation);

        let store: SchedulerError = StoreError::network("down").into();
        assert_eq!(store.kind(), ErrorKind::Persistence);

        assert_eq!(SchedulerError::not_found("x").kind(), ErrorKind::NotFound);
    }

    #[test]
    fn conflict_message_lists_events() {
        let date = NaiveDate::from_ymd_opt(2025, 10, 15).unwrap();
        let existing = EventDraft::new(
            "Existing meeting",
            date,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        )
        .to_event("1", date, RepeatRule::none());

        let err = SchedulerError::Conflict {
            date,
            conflicts: vec![existing],
        };
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.conflicts().len(), 1);
        assert_eq!(
            err.to_string(),
            "occurrence on 2025-10-15 overlaps 1 existing event(s): \
             Existing meeting (2025-10-15 09:00-10:00)"
        );
    }
}
