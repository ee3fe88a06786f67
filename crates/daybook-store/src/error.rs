//! Error types for event store operations.

use std::fmt;
use thiserror::Error;

/// The category of a store error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorCode {
    /// Connection failed, timed out, or the request could not be sent.
    Network,
    /// The backend answered with a 5xx status.
    Server,
    /// The backend rejected the request (4xx other than 404/429).
    Rejected,
    /// The referenced event does not exist in the store.
    NotFound,
    /// Too many requests.
    RateLimited,
    /// The response or file could not be decoded.
    InvalidData,
    /// Local I/O failed.
    Io,
    /// Missing or invalid store configuration.
    Configuration,
    /// A bulk write was refused as a whole.
    BulkRejected,
    /// Fault injected by a test.
    Injected,
}

impl StoreErrorCode {
    /// Returns true if the failure is likely transient.
    ///
    /// Advisory only: the scheduler never retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network | Self::Server | Self::RateLimited)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network_error",
            Self::Server => "server_error",
            Self::Rejected => "rejected",
            Self::NotFound => "not_found",
            Self::RateLimited => "rate_limited",
            Self::InvalidData => "invalid_data",
            Self::Io => "io_error",
            Self::Configuration => "configuration_error",
            Self::BulkRejected => "bulk_rejected",
            Self::Injected => "injected",
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed store operation.
#[derive(Debug, Error)]
pub struct StoreError {
    code: StoreErrorCode,
    message: String,
    /// Which store produced the error ("memory", "file", "http").
    store: Option<&'static str>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            store: None,
            source: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::Network, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::Server, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::Rejected, message)
    }

    pub fn not_found(id: &str) -> Self {
        Self::new(StoreErrorCode::NotFound, format!("event {id} not found"))
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::RateLimited, message)
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::InvalidData, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::Io, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::Configuration, message)
    }

    pub fn bulk_rejected(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::BulkRejected, message)
    }

    pub fn injected(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::Injected, message)
    }

    pub fn with_store(mut self, store: &'static str) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> StoreErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn store(&self) -> Option<&'static str> {
        self.store
    }

    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(store) = self.store {
            write!(f, "[{store}] ")?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_data(err.to_string()).with_source(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_codes() {
        assert!(StoreErrorCode::Network.is_retryable());
        assert!(StoreErrorCode::Server.is_retryable());
        assert!(StoreErrorCode::RateLimited.is_retryable());
        assert!(!StoreErrorCode::NotFound.is_retryable());
        assert!(!StoreErrorCode::BulkRejected.is_retryable());
        assert!(!StoreErrorCode::Injected.is_retryable());
    }

    #[test]
    fn display_includes_store_and_code() {
        let err = StoreError::server("API error (500): boom").with_store("http");
        assert_eq!(err.to_string(), "[http] server_error: API error (500): boom");

        let bare = StoreError::not_found("abc");
        assert_eq!(bare.to_string(), "not_found: event abc not found");
        assert!(bare.store().is_none());
    }

    #[test]
    fn conversions_keep_source() {
        use std::error::Error;

        let err: StoreError = std::io::Error::other("disk full").into();
        assert_eq!(err.code(), StoreErrorCode::Io);
        assert!(err.source().is_some());

        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: StoreError = parse.into();
        assert_eq!(err.code(), StoreErrorCode::InvalidData);
    }
}
