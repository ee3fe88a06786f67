//! Text rendering for events, repeat rules, conflicts and alerts.

use std::borrow::Cow;

use crate::event::{Event, RepeatEnd, RepeatRule};
use crate::time::format_time;

/// Options for rendering event listings.
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    /// Maximum title length (truncated with ellipsis).
    pub max_title_length: Option<usize>,
    /// Include event ids in listings.
    pub show_ids: bool,
}

impl FormatOptions {
    /// Builder: set maximum title length.
    pub fn with_max_title_length(mut self, max: usize) -> Self {
        self.max_title_length = Some(max);
        self
    }

    /// Builder: show event ids.
    pub fn with_ids(mut self, show: bool) -> Self {
        self.show_ids = show;
        self
    }
}

/// Truncates a string with ellipsis if it exceeds the given length.
pub fn ellipsis(s: &str, max_len: usize) -> Cow<'_, str> {
    if max_len == 0 {
        return Cow::Borrowed("");
    }
    if s.chars().count() <= max_len {
        return Cow::Borrowed(s);
    }
    let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
    Cow::Owned(format!("{truncated}..."))
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// Renders a repeat rule, e.g. `Repeats every 2 weeks (until 2025-12-31)`.
///
/// Returns `None` for non-repeating rules.
pub fn repeat_label(rule: &RepeatRule) -> Option<String> {
    if !rule.is_repeating() {
        return None;
    }
    let mut label = format!(
        "Repeats every {}",
        plural(i64::from(rule.interval), rule.kind.unit())
    );
    match rule.end() {
        Ok(RepeatEnd::Until(date)) => label.push_str(&format!(" (until {date})")),
        Ok(RepeatEnd::Count(count)) => {
            label.push_str(&format!(" ({})", plural(i64::from(count), "time")));
        }
        Ok(RepeatEnd::Horizon) | Err(_) => {}
    }
    Some(label)
}

/// Renders a notification lead time, e.g. `10 minutes before`.
///
/// Returns `None` when notifications are off.
pub fn notification_label(minutes: u32) -> Option<String> {
    const HOUR: u32 = 60;
    const DAY: u32 = 24 * HOUR;

    let label = match minutes {
        0 => return None,
        m if m % DAY == 0 => plural(i64::from(m / DAY), "day"),
        m if m % HOUR == 0 => plural(i64::from(m / HOUR), "hour"),
        m => plural(i64::from(m), "minute"),
    };
    Some(format!("{label} before"))
}

/// Renders the date and time range, e.g. `2025-10-15 09:00-10:00`.
pub fn slot_label(event: &Event) -> String {
    format!(
        "{} {}-{}",
        event.date,
        format_time(&event.start_time),
        format_time(&event.end_time)
    )
}

/// Renders one conflicting event, e.g. `Standup (2025-10-15 09:00-10:00)`.
pub fn conflict_line(event: &Event) -> String {
    format!("{} ({})", event.title, slot_label(event))
}

/// Renders the warning shown when a submission overlaps existing events.
pub fn conflict_message(conflicts: &[Event]) -> String {
    let mut message = String::from("Overlaps with the following events:");
    for event in conflicts {
        message.push_str("\n  ");
        message.push_str(&conflict_line(event));
    }
    message
}

/// Renders the upcoming-event alert text.
pub fn alert_message(event: &Event) -> String {
    let minutes = event.notification_time;
    if minutes == 1 {
        format!("1 minute until {} starts.", event.title)
    } else {
        format!("{minutes} minutes until {} starts.", event.title)
    }
}

/// Renders an event as a multi-line listing entry.
pub fn event_block(event: &Event, options: &FormatOptions) -> String {
    let title = match options.max_title_length {
        Some(max) => ellipsis(&event.title, max),
        None => Cow::Borrowed(event.title.as_str()),
    };

    let mut lines = Vec::new();
    if options.show_ids {
        lines.push(format!("{title} [{}]", event.id));
    } else {
        lines.push(title.into_owned());
    }
    lines.push(format!(
        "  {} {} - {}",
        event.date,
        format_time(&event.start_time),
        format_time(&event.end_time)
    ));
    for field in [&event.description, &event.location] {
        if !field.is_empty() {
            lines.push(format!("  {field}"));
        }
    }
    if !event.category.is_empty() {
        lines.push(format!("  Category: {}", event.category));
    }
    if let Some(label) = repeat_label(&event.repeat) {
        lines.push(format!("  {label}"));
    }
    if let Some(label) = notification_label(event.notification_time) {
        lines.push(format!("  Notify: {label}"));
    }
    lines.join("\n")
}
