//! Scheduler configuration.

use std::time::Duration;

use chrono::NaiveDate;
use daybook_core::DEFAULT_HORIZON;

/// Scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Last date open-ended repeat rules may generate.
    pub horizon: NaiveDate,
    /// How often the background reloader refreshes the cache.
    pub reload_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            reload_interval: Duration::from_secs(60),
        }
    }
}

impl SchedulerConfig {
    /// Builder: set the repeat horizon.
    pub fn with_horizon(mut self, horizon: NaiveDate) -> Self {
        self.horizon = horizon;
        self
    }

    /// Builder: set the background reload interval.
    pub fn with_reload_interval(mut self, interval: Duration) -> Self {
        self.reload_interval = interval;
        self
    }
}
