//! `daybook watch` - runs the notification watcher in the foreground.
//!
//! - SIGTERM/SIGINT stop the watcher
//! - SIGHUP reloads events from the store
//! - events are also reloaded every `reload_interval`

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use daybook_server::{
    AlertSink, DesktopSink, EventScheduler, LogSink, NotificationWatcher, SignalHandler,
    WatcherConfig,
};

use crate::cli::WatchArgs;
use crate::config::ClientConfig;
use crate::error::ClientResult;

use super::build_store;

/// Watches until a shutdown signal arrives.
pub async fn run(args: &WatchArgs, config: &ClientConfig) -> ClientResult<()> {
    let mut scheduler_config = config.scheduler_config();
    if let Some(secs) = args.reload {
        scheduler_config = scheduler_config.with_reload_interval(Duration::from_secs(secs.max(1)));
    }
    let watcher_config = watcher_config(args, config);

    let store = build_store(config)?;
    let scheduler = Arc::new(EventScheduler::new(store, scheduler_config));
    match scheduler.reload().await {
        Ok(count) => info!(count, store = scheduler.store_name(), "Loaded events"),
        Err(e) => warn!(error = %e, "Initial load failed, retrying on next reload"),
    }

    let signals = SignalHandler::new();
    signals.spawn_listener()?;

    let sink = build_sink(args.desktop || config.watcher.desktop, &watcher_config);
    let watcher = NotificationWatcher::new(watcher_config, sink);

    let reloader = {
        let scheduler = Arc::clone(&scheduler);
        let reload = signals.reload();
        let shutdown = signals.shutdown();
        tokio::spawn(async move { scheduler.run_reloader(reload, shutdown).await })
    };

    watcher.run(scheduler.cache(), signals.shutdown()).await;

    if tokio::time::timeout(Duration::from_secs(5), reloader)
        .await
        .is_err()
    {
        warn!("Reloader did not stop in time");
    }
    info!("Watcher stopped");
    Ok(())
}

fn watcher_config(args: &WatchArgs, config: &ClientConfig) -> WatcherConfig {
    let mut watcher = config.watcher_config();
    if let Some(secs) = args.tick {
        watcher = watcher.with_tick(Duration::from_secs(secs.max(1)));
    }
    watcher
}

fn build_sink(desktop: bool, config: &WatcherConfig) -> Arc<dyn AlertSink> {
    if desktop {
        Arc::new(DesktopSink::new(config.app_name.clone()))
    } else {
        Arc::new(LogSink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(tick: Option<u64>, desktop: bool) -> WatchArgs {
        WatchArgs {
            desktop,
            tick,
            reload: None,
            json_logs: false,
        }
    }

    #[test]
    fn tick_flag_overrides_config() {
        let config = ClientConfig::default();
        assert_eq!(
            watcher_config(&args(Some(0), false), &config).tick,
            Duration::from_secs(1)
        );
        assert_eq!(
            watcher_config(&args(Some(30), false), &config).tick,
            Duration::from_secs(30)
        );
        assert_eq!(
            watcher_config(&args(None, false), &config).tick,
            Duration::from_secs(1)
        );
    }

    #[test]
    fn sink_selection() {
        let config = WatcherConfig::default();
        assert_eq!(build_sink(false, &config).name(), "log");
        assert_eq!(build_sink(true, &config).name(), "desktop");
    }
}
