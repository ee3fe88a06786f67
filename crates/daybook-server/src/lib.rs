//! Scheduler, snapshot cache and notification watcher.
//!
//! This crate wires the pure logic of `daybook-core` to an
//! [`EventStore`](daybook_store::EventStore):
//! - [`EventScheduler`] validates, checks overlaps and writes through the store
//! - [`EventCache`] holds the last successfully loaded snapshot
//! - [`NotificationWatcher`] raises one alert per event inside its window
//! - [`SignalHandler`] turns SIGTERM/SIGINT/SIGHUP into shutdown and reload
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use daybook_core::{EventDraft, parse_date, parse_time};
//! use daybook_server::{EventScheduler, SchedulerConfig};
//! use daybook_store::FileStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(FileStore::new("events.json"));
//!     let scheduler = EventScheduler::new(store, SchedulerConfig::default());
//!     scheduler.reload().await?;
//!
//!     let date = parse_date("2025-10-15").ok_or("invalid date")?;
//!     let start = parse_time("09:00").ok_or("invalid time")?;
//!     let end = parse_time("09:15").ok_or("invalid time")?;
//!     scheduler.create(EventDraft::new("Standup", date, start, end)).await?;
//!     Ok(())
//! }
//! ```

mod cache;
mod config;
mod error;
mod notify;
mod scheduler;
mod signals;

pub use cache::{EventCache, SharedEventCache, new_shared_cache};
pub use config::SchedulerConfig;
pub use error::{ErrorKind, SchedulerError, SchedulerResult, ServerError, ServerResult};
pub use notify::{
    Alert, AlertSink, ChannelSink, DesktopSink, LogSink, NotificationWatcher, RewindPolicy,
    WatcherConfig,
};
pub use scheduler::EventScheduler;
pub use signals::{ReloadSignal, ShutdownSignal, SignalHandler};
