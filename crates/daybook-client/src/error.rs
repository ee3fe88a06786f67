//! Client error types.

use std::fmt;

use daybook_core::{TracingError, conflict_message};
use daybook_server::{SchedulerError, ServerError};
use daybook_store::StoreError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// Bad command-line input.
    Input(String),
    /// IO error.
    Io(std::io::Error),
    /// Store could not be opened or read.
    Store(StoreError),
    /// A create, edit or delete was refused.
    Scheduler(SchedulerError),
    /// Watcher setup failed.
    Server(ServerError),
    /// Logging could not be initialised.
    Tracing(TracingError),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Input(msg) => write!(f, "invalid input: {}", msg),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Store(err) => write!(f, "store error: {}", err),
            Self::Scheduler(SchedulerError::Conflict { conflicts, .. }) => {
                write!(f, "{}", conflict_message(conflicts))
            }
            Self::Scheduler(err) => write!(f, "{}", err),
            Self::Server(err) => write!(f, "{}", err),
            Self::Tracing(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Scheduler(err) => Some(err),
            Self::Server(err) => Some(err),
            Self::Tracing(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<StoreError> for ClientError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<SchedulerError> for ClientError {
    fn from(err: SchedulerError) -> Self {
        Self::Scheduler(err)
    }
}

impl From<ServerError> for ClientError {
    fn from(err: ServerError) -> Self {
        Self::Server(err)
    }
}

impl From<TracingError> for ClientError {
    fn from(err: TracingError) -> Self {
        Self::Tracing(err)
    }
}
