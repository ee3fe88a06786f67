//! Time types for calendar events.
//!
//! This module provides [`Slot`] for the date and wall-clock range an event
//! occupies, and [`AlertWindow`] for the pre-start interval during which a
//! notification is due. All times are naive local wall-clock values; the
//! process's local timezone is the only one considered.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{ValidationError, ValidationResult};

/// Wire format for times of day.
const TIME_FORMAT: &str = "%H:%M";
const TIME_FORMAT_SECONDS: &str = "%H:%M:%S";

/// Parses an `HH:MM` or `HH:MM:SS` time of day.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(raw, TIME_FORMAT_SECONDS))
        .ok()
}

/// Formats a time of day as `HH:MM`, keeping seconds only when non-zero.
pub fn format_time(time: &NaiveTime) -> String {
    use chrono::Timelike;

    if time.second() == 0 {
        time.format(TIME_FORMAT).to_string()
    } else {
        time.format(TIME_FORMAT_SECONDS).to_string()
    }
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Serde adapter for `HH:MM` times of day.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_time(time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid time of day: {raw:?}")))
    }
}

/// The calendar date and wall-clock range an event occupies.
///
/// The range is half-open: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    /// Calendar date.
    pub date: NaiveDate,
    /// Start time (inclusive).
    pub start: NaiveTime,
    /// End time (exclusive).
    pub end: NaiveTime,
}

impl Slot {
    /// Creates a new slot.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimeRange`] unless `start < end`.
    pub fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> ValidationResult<Self> {
        if start >= end {
            return Err(ValidationError::InvalidTimeRange { start, end });
        }
        Ok(Self { date, start, end })
    }

    /// Returns `true` if `start < end`.
    pub fn is_well_formed(&self) -> bool {
        self.start < self.end
    }

    /// Checks if two slots intersect.
    ///
    /// Slots on different dates never intersect. Touching boundaries
    /// (one ends exactly when the other starts) do not intersect.
    pub fn overlaps(&self, other: &Slot) -> bool {
        self.date == other.date && self.start < other.end && other.start < self.end
    }

    /// Returns the moment the slot starts.
    pub fn start_datetime(&self) -> NaiveDateTime {
        self.date.and_time(self.start)
    }

    /// Returns the moment the slot ends.
    pub fn end_datetime(&self) -> NaiveDateTime {
        self.date.and_time(self.end)
    }

    /// Returns this slot moved to another date.
    pub fn on(self, date: NaiveDate) -> Self {
        Self { date, ..self }
    }

    /// Returns the alert window for a notification `minutes` before start.
    ///
    /// Returns `None` when `minutes` is zero (no alert).
    pub fn alert_window(&self, minutes: u32) -> Option<AlertWindow> {
        if minutes == 0 {
            return None;
        }
        let end = self.start_datetime();
        Some(AlertWindow {
            start: end - Duration::minutes(i64::from(minutes)),
            end,
        })
    }
}

/// The half-open interval `[start - notificationTime, start)` in which an
/// alert for an event is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertWindow {
    /// When the alert becomes due (inclusive).
    pub start: NaiveDateTime,
    /// When the event starts (exclusive).
    pub end: NaiveDateTime,
}

impl AlertWindow {
    /// Checks if `now` falls within this window.
    pub fn contains(&self, now: NaiveDateTime) -> bool {
        self.start <= now && now < self.end
    }

    /// Returns the whole minutes left until the event starts, rounded up.
    pub fn minutes_until_start(&self, now: NaiveDateTime) -> i64 {
        let seconds = (self.end - now).num_seconds();
        (seconds + 59).div_euclid(60)
    }
}
