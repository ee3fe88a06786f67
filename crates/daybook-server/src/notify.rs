//! Upcoming-event alerts.
//!
//! The [`NotificationWatcher`] polls the wall clock on a fixed tick. An
//! event is due when `start - notificationTime <= now < start`; a due event
//! is alerted once and then remembered in the watcher's notified set for as
//! long as the watcher lives. The set is never persisted.
//!
//! Alerts go to an [`AlertSink`]. An event is only marked notified after its
//! sink reports success, so a failed delivery is retried on the next tick
//! while the event is still due.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use daybook_core::{Event, format::alert_message};
use notify_rust::Notification;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::cache::SharedEventCache;
use crate::error::{ServerError, ServerResult};
use crate::signals::ShutdownSignal;

/// What to do with the notified set when the clock moves backwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewindPolicy {
    /// Never forget; an event alerts at most once per watcher.
    #[default]
    Keep,
    /// Forget every notified event, so windows re-entered after the rewind
    /// alert again.
    Reset,
}

/// Configuration for the notification watcher.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Time between clock checks.
    pub tick: Duration,
    /// When false, ticks do nothing.
    pub enabled: bool,
    pub rewind: RewindPolicy,
    /// Application name shown by desktop notifications.
    pub app_name: String,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            enabled: true,
            rewind: RewindPolicy::Keep,
            app_name: "daybook".to_string(),
        }
    }
}

impl WatcherConfig {
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_rewind(mut self, rewind: RewindPolicy) -> Self {
        self.rewind = rewind;
        self
    }

    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }
}

/// One "event starting soon" alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub event_id: String,
    pub title: String,
    pub starts_at: NaiveDateTime,
    /// Lead time configured on the event.
    pub notification_time: u32,
    /// Display text, e.g. `10 minutes until Standup starts.`
    pub message: String,
}

impl Alert {
    fn for_event(event: &Event) -> Self {
        Self {
            event_id: event.id.clone(),
            title: event.title.clone(),
            starts_at: event.starts_at(),
            notification_time: event.notification_time,
            message: alert_message(event),
        }
    }
}

/// Destination for alerts.
pub trait AlertSink: Send + Sync {
    fn name(&self) -> &str;

    /// Delivers one alert.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Delivery`] if the alert did not reach its
    /// destination; the watcher will try again on its next tick.
    fn deliver(&self, alert: &Alert) -> ServerResult<()>;
}

/// Forwards alerts into a tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Alert>,
}

impl ChannelSink {
    /// Creates the sink and the receiving end.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Alert>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl AlertSink for ChannelSink {
    fn name(&self) -> &str {
        "channel"
    }

    fn deliver(&self, alert: &Alert) -> ServerResult<()> {
        self.tx
            .send(alert.clone())
            .map_err(|_| ServerError::delivery(self.name(), "receiver dropped"))
    }
}

/// Writes alerts to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl AlertSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    fn deliver(&self, alert: &Alert) -> ServerResult<()> {
        info!(
            id = %alert.event_id,
            starts_at = %alert.starts_at,
            "{}",
            alert.message
        );
        Ok(())
    }
}

/// Shows alerts as desktop notifications.
#[derive(Debug, Clone)]
pub struct DesktopSink {
    app_name: String,
    timeout: Duration,
}

impl DesktopSink {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl AlertSink for DesktopSink {
    fn name(&self) -> &str {
        "desktop"
    }

    fn deliver(&self, alert: &Alert) -> ServerResult<()> {
        let body = format!("Starts at {}", alert.starts_at.format("%H:%M"));
        let mut notification = Notification::new();
        notification
            .appname(&self.app_name)
            .summary(&alert.message)
            .body(&body)
            .timeout(self.timeout);

        match notification.show() {
            Ok(_) => Ok(()),
            Err(e) => Err(ServerError::delivery(self.name(), e.to_string())),
        }
    }
}

/// Fires each event's alert once when the clock enters its alert window.
pub struct NotificationWatcher {
    config: WatcherConfig,
    sink: Arc<dyn AlertSink>,
    notified: HashSet<String>,
    /// Malformed events already warned about.
    malformed: HashSet<String>,
    last_tick: Option<NaiveDateTime>,
}

impl NotificationWatcher {
    pub fn new(config: WatcherConfig, sink: Arc<dyn AlertSink>) -> Self {
        Self {
            config,
            sink,
            notified: HashSet::new(),
            malformed: HashSet::new(),
            last_tick: None,
        }
    }

    pub fn config(&self) -> &WatcherConfig {
        &self.config
    }

    /// Returns true if `id` has already been alerted.
    pub fn is_notified(&self, id: &str) -> bool {
        self.notified.contains(id)
    }

    pub fn notified_count(&self) -> usize {
        self.notified.len()
    }

    /// Runs one check at `now` and returns the alerts that were delivered.
    pub fn check_at(&mut self, now: NaiveDateTime, events: &[Event]) -> Vec<Alert> {
        if !self.config.enabled {
            return Vec::new();
        }

        if let Some(last) = self.last_tick
            && now < last
        {
            match self.config.rewind {
                RewindPolicy::Keep => {
                    debug!(%now, %last, "Clock moved backwards, keeping notified set");
                }
                RewindPolicy::Reset => {
                    info!(
                        %now,
                        %last,
                        cleared = self.notified.len(),
                        "Clock moved backwards, clearing notified set"
                    );
                    self.notified.clear();
                }
            }
        }
        self.last_tick = Some(now);

        let mut delivered = Vec::new();
        for event in events {
            if event.notification_time == 0 || self.notified.contains(&event.id) {
                continue;
            }
            if !event.slot().is_well_formed() {
                if self.malformed.insert(event.id.clone()) {
                    warn!(
                        id = %event.id,
                        start = %event.start_time,
                        end = %event.end_time,
                        "Skipping event with start not before end"
                    );
                }
                continue;
            }
            let Some(window) = event.alert_window() else {
                continue;
            };
            if !window.contains(now) {
                continue;
            }

            let alert = Alert::for_event(event);
            match self.sink.deliver(&alert) {
                Ok(()) => {
                    info!(
                        id = %event.id,
                        title = %event.title,
                        sink = self.sink.name(),
                        "Alert delivered"
                    );
                    self.notified.insert(event.id.clone());
                    delivered.push(alert);
                }
                Err(e) => {
                    error!(error = %e, id = %event.id, "Failed to deliver alert");
                }
            }
        }
        delivered
    }

    /// Checks the current cache snapshot against the local wall clock.
    pub async fn tick(&mut self, cache: &SharedEventCache) -> Vec<Alert> {
        let events = cache.read().await.snapshot();
        self.check_at(Local::now().naive_local(), &events)
    }

    /// Ticks until `shutdown` fires, reading the local wall clock.
    pub async fn run(self, cache: SharedEventCache, shutdown: ShutdownSignal) {
        self.run_with_clock(cache, shutdown, || Local::now().naive_local())
            .await;
    }

    /// Like [`run`](Self::run), reading time from `clock`.
    pub async fn run_with_clock<C>(mut self, cache: SharedEventCache, shutdown: ShutdownSignal, clock: C)
    where
        C: Fn() -> NaiveDateTime + Send,
    {
        let mut ticker = tokio::time::interval(self.config.tick);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let shutdown = shutdown.wait();
        tokio::pin!(shutdown);

        info!(
            tick_ms = self.config.tick.as_millis() as u64,
            sink = self.sink.name(),
            enabled = self.config.enabled,
            "Notification watcher started"
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    let events = cache.read().await.snapshot();
                    self.check_at(clock(), &events);
                }
            }
        }

        info!(notified = self.notified.len(), "Notification watcher stopped");
    }
}
