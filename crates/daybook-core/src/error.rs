//! Validation errors for drafts and repeat rules.

use chrono::NaiveTime;
use thiserror::Error;

/// Result type for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// A draft or repeat rule that cannot be accepted.
///
/// Validation always runs before any store call, so these errors never leave
/// partial state behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Repeating rule with an interval of zero or less.
    #[error("repeat interval must be positive, got {interval}")]
    NonPositiveInterval { interval: i32 },

    /// Count end condition of zero occurrences.
    #[error("repeat count must be at least 1")]
    ZeroCount,

    /// Both `endDate` and `count` were supplied.
    #[error("repeat rule may set an end date or a count, not both")]
    ConflictingEndConditions,

    /// The rule needs more candidates than the expander will examine.
    #[error("repeat rule needs more than {limit} steps to finish")]
    ScanLimitExceeded { limit: u32 },

    /// Start time is not strictly before end time.
    #[error("start time {start} must be before end time {end}")]
    InvalidTimeRange { start: NaiveTime, end: NaiveTime },

    /// Title is empty or whitespace.
    #[error("event title must not be empty")]
    EmptyTitle,
}

impl ValidationError {
    /// Returns a stable machine-readable name for this error.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NonPositiveInterval { .. } => "non_positive_interval",
            Self::ZeroCount => "zero_count",
            Self::ConflictingEndConditions => "conflicting_end_conditions",
            Self::ScanLimitExceeded { .. } => "scan_limit_exceeded",
            Self::InvalidTimeRange { .. } => "invalid_time_range",
            Self::EmptyTitle => "empty_title",
        }
    }
}
