//! Logging setup shared by the daybook binaries.
//!
//! The CLI uses compact, timestamp-free output; the watcher runs with JSON
//! lines so its output can be shipped to a log collector. `RUST_LOG`
//! overrides the default `daybook=<level>` directive in both cases.

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum TracingError {
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("failed to parse env filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),
}

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    /// One JSON object per line.
    Json,
}

/// Subscriber configuration.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level used for `daybook*` targets when `RUST_LOG` is unset.
    pub level: Level,
    pub format: LogFormat,
    /// Include file and line of the call site.
    pub location: bool,
    pub target: bool,
    pub timestamp: bool,
    /// Log span open/close events.
    pub span_events: bool,
    /// Explicit filter directive; takes precedence over `RUST_LOG`.
    pub filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Pretty,
            location: false,
            target: true,
            timestamp: true,
            span_events: false,
            filter: None,
        }
    }
}

impl TracingConfig {
    /// Quiet compact output for interactive commands.
    #[must_use]
    pub fn cli() -> Self {
        Self {
            level: Level::WARN,
            format: LogFormat::Compact,
            target: false,
            timestamp: false,
            ..Self::default()
        }
    }

    /// Compact output with call sites, for `--debug`.
    #[must_use]
    pub fn cli_debug() -> Self {
        Self {
            level: Level::DEBUG,
            format: LogFormat::Compact,
            location: true,
            timestamp: false,
            ..Self::default()
        }
    }

    /// Structured output for the long-running watcher.
    #[must_use]
    pub fn daemon() -> Self {
        Self {
            format: LogFormat::Json,
            location: true,
            span_events: true,
            ..Self::default()
        }
    }

    /// Maps a `-v` count onto a level: 0 keeps the current level, 1 is
    /// INFO, 2 is DEBUG, 3 or more is TRACE.
    #[must_use]
    pub fn with_verbosity(mut self, verbose: u8) -> Self {
        self.level = match verbose {
            0 => self.level,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// The directive used when neither `filter` nor `RUST_LOG` is set.
    pub fn default_directive(&self) -> String {
        format!("daybook={}", self.level).to_lowercase()
    }

    fn env_filter(&self) -> Result<EnvFilter, TracingError> {
        if let Some(filter) = &self.filter {
            return Ok(EnvFilter::try_new(filter)?);
        }
        Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_directive())))
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let span_events = if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };
        let base = fmt::layer()
            .with_file(self.location)
            .with_line_number(self.location)
            .with_target(self.target)
            .with_span_events(span_events);

        match (self.format, self.timestamp) {
            (LogFormat::Pretty, true) => base.pretty().boxed(),
            (LogFormat::Pretty, false) => base.pretty().without_time().boxed(),
            (LogFormat::Compact, true) => base.compact().boxed(),
            (LogFormat::Compact, false) => base.compact().without_time().boxed(),
            (LogFormat::Json, true) => base.json().boxed(),
            (LogFormat::Json, false) => base.json().without_time().boxed(),
        }
    }
}

/// Installs the global subscriber. Call once at startup.
///
/// # Errors
///
/// Fails if a subscriber is already installed or `filter` does not parse.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let filter = config.env_filter()?;
    let subscriber = tracing_subscriber::registry()
        .with(config.fmt_layer())
        .with(filter);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        let cli = TracingConfig::cli();
        assert_eq!(cli.level, Level::WARN);
        assert_eq!(cli.format, LogFormat::Compact);
        assert!(!cli.timestamp);

        let debug = TracingConfig::cli_debug();
        assert_eq!(debug.level, Level::DEBUG);
        assert!(debug.location);

        let daemon = TracingConfig::daemon();
        assert_eq!(daemon.format, LogFormat::Json);
        assert!(daemon.span_events);
        assert!(daemon.timestamp);
    }

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(TracingConfig::cli().with_verbosity(0).level, Level::WARN);
        assert_eq!(TracingConfig::cli().with_verbosity(1).level, Level::INFO);
        assert_eq!(TracingConfig::cli().with_verbosity(2).level, Level::DEBUG);
        assert_eq!(TracingConfig::cli().with_verbosity(9).level, Level::TRACE);
    }

    #[test]
    fn default_directive_targets_daybook() {
        assert_eq!(TracingConfig::default().default_directive(), "daybook=info");
        assert_eq!(
            TracingConfig::cli_debug().default_directive(),
            "daybook=debug"
        );
    }

    #[test]
    fn explicit_filter_wins() {
        let config = TracingConfig::default().with_filter("daybook_server=trace");
        assert!(config.env_filter().is_ok());

        let bad = TracingConfig::default().with_filter("daybook=loud");
        assert!(matches!(bad.env_filter(), Err(TracingError::EnvFilter(_))));
    }
}
