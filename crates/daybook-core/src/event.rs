//! Event types for the calendar.
//!
//! This module provides the persisted [`Event`], the user-authored
//! [`EventDraft`] it is built from, and the embedded [`RepeatRule`].
//!
//! The JSON shape follows the calendar's REST endpoints: camelCase field
//! names, `YYYY-MM-DD` dates, `HH:MM` times, and the repeat group id stored
//! as `repeat.id`.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::time::{AlertWindow, Slot, hhmm};

/// The unit a repeat rule advances by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatType {
    /// Not repeating.
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RepeatType {
    /// Returns `true` for every type except [`RepeatType::None`].
    pub fn is_repeating(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Returns the wire name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Returns the singular unit name ("day", "week", ...).
    pub fn unit(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Daily => "day",
            Self::Weekly => "week",
            Self::Monthly => "month",
            Self::Yearly => "year",
        }
    }
}

impl std::str::FromStr for RepeatType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(format!("unknown repeat type: {other}")),
        }
    }
}

impl std::fmt::Display for RepeatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When a repeat rule stops generating occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatEnd {
    /// No explicit end; bounded by the generation horizon.
    Horizon,
    /// Last allowed date (inclusive).
    Until(NaiveDate),
    /// Total occurrences, including the first.
    Count(u32),
}

/// A repeat rule embedded in every event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatRule {
    /// Unit of repetition.
    #[serde(rename = "type")]
    pub kind: RepeatType,
    /// Step size in units of `kind`. Meaningless for [`RepeatType::None`].
    #[serde(default)]
    pub interval: i32,
    /// Inclusive end date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Total occurrences including the first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    /// Shared by every sibling created from one repeating submission.
    #[serde(
        default,
        rename = "id",
        alias = "groupId",
        skip_serializing_if = "Option::is_none"
    )]
    pub group_id: Option<String>,
}

impl Default for RepeatRule {
    fn default() -> Self {
        Self::none()
    }
}

impl RepeatRule {
    /// A non-repeating rule: `{type: none, interval: 0}`.
    pub fn none() -> Self {
        Self {
            kind: RepeatType::None,
            interval: 0,
            end_date: None,
            count: None,
            group_id: None,
        }
    }

    /// Creates a rule repeating every `interval` units of `kind`.
    pub fn new(kind: RepeatType, interval: i32) -> Self {
        Self {
            kind,
            interval,
            ..Self::none()
        }
    }

    /// Shorthand for a daily rule.
    pub fn daily(interval: i32) -> Self {
        Self::new(RepeatType::Daily, interval)
    }

    /// Shorthand for a weekly rule.
    pub fn weekly(interval: i32) -> Self {
        Self::new(RepeatType::Weekly, interval)
    }

    /// Shorthand for a monthly rule.
    pub fn monthly(interval: i32) -> Self {
        Self::new(RepeatType::Monthly, interval)
    }

    /// Shorthand for a yearly rule.
    pub fn yearly(interval: i32) -> Self {
        Self::new(RepeatType::Yearly, interval)
    }

    /// Builder: set the inclusive end date.
    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Builder: set the occurrence count.
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    /// Builder: set the group id.
    pub fn with_group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    /// Returns `true` if this rule generates more than one occurrence.
    pub fn is_repeating(&self) -> bool {
        self.kind.is_repeating()
    }

    /// Returns the end condition.
    ///
    /// # Errors
    ///
    /// Returns an error if both an end date and a count are set, or if the
    /// count is zero.
    pub fn end(&self) -> ValidationResult<RepeatEnd> {
        match (self.end_date, self.count) {
            (Some(_), Some(_)) => Err(ValidationError::ConflictingEndConditions),
            (Some(date), None) => Ok(RepeatEnd::Until(date)),
            (None, Some(0)) => Err(ValidationError::ZeroCount),
            (None, Some(count)) => Ok(RepeatEnd::Count(count)),
            (None, None) => Ok(RepeatEnd::Horizon),
        }
    }

    /// Validates the rule.
    ///
    /// Non-repeating rules are always valid; their interval and end
    /// condition are ignored.
    pub fn validate(&self) -> ValidationResult<()> {
        if !self.is_repeating() {
            return Ok(());
        }
        if self.interval <= 0 {
            return Err(ValidationError::NonPositiveInterval {
                interval: self.interval,
            });
        }
        self.end().map(|_| ())
    }
}

/// A persisted calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique, stable identifier.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: String,
    /// Calendar date.
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    /// Minutes before start to alert; 0 disables the alert.
    #[serde(default)]
    pub notification_time: u32,
    #[serde(default)]
    pub repeat: RepeatRule,
}

impl Event {
    /// Returns the slot this event occupies.
    pub fn slot(&self) -> Slot {
        Slot {
            date: self.date,
            start: self.start_time,
            end: self.end_time,
        }
    }

    /// Returns the moment the event starts.
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    /// Returns the alert window, if this event has a notification.
    pub fn alert_window(&self) -> Option<AlertWindow> {
        self.slot().alert_window(self.notification_time)
    }

    /// Returns the repeat group this event belongs to.
    ///
    /// Standalone events have no group, even if a stale id is present. A
    /// repeating event whose group id equals its own id is still a member;
    /// stores commonly name a group after its first occurrence.
    pub fn group_id(&self) -> Option<&str> {
        if !self.repeat.is_repeating() {
            return None;
        }
        self.repeat.group_id.as_deref()
    }

    /// Returns `true` if this event belongs to a repeat group.
    pub fn is_grouped(&self) -> bool {
        self.group_id().is_some()
    }

    /// Returns `true` if `other` is a sibling in the same repeat group.
    pub fn is_sibling_of(&self, other: &Event) -> bool {
        match (self.group_id(), other.group_id()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Returns the user-editable fields of this event as a draft.
    pub fn to_draft(&self) -> EventDraft {
        EventDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            category: self.category.clone(),
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            notification_time: self.notification_time,
            repeat: RepeatRule {
                group_id: None,
                ..self.repeat.clone()
            },
        }
    }
}

/// A user-authored event before it has an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    #[serde(default)]
    pub notification_time: u32,
    #[serde(default)]
    pub repeat: RepeatRule,
}

impl EventDraft {
    /// Creates a non-repeating draft with no notification.
    pub fn new(
        title: impl Into<String>,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            location: String::new(),
            category: String::new(),
            date,
            start_time,
            end_time,
            notification_time: 0,
            repeat: RepeatRule::none(),
        }
    }

    /// Builder: set description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder: set location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Builder: set category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Builder: set minutes-before-start alert.
    pub fn with_notification(mut self, minutes: u32) -> Self {
        self.notification_time = minutes;
        self
    }

    /// Builder: set repeat rule.
    pub fn with_repeat(mut self, repeat: RepeatRule) -> Self {
        self.repeat = repeat;
        self
    }

    /// Returns the slot this draft occupies on its own date.
    pub fn slot(&self) -> Slot {
        Slot {
            date: self.date,
            start: self.start_time,
            end: self.end_time,
        }
    }

    /// Validates title, time range and repeat rule.
    pub fn validate(&self) -> ValidationResult<()> {
        self.validate_fields()?;
        self.repeat.validate()
    }

    /// Validates title and time range, ignoring the repeat rule.
    pub fn validate_fields(&self) -> ValidationResult<()> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Slot::new(self.date, self.start_time, self.end_time).map(|_| ())
    }

    /// Builds an event from this draft.
    pub fn to_event(&self, id: impl Into<String>, date: NaiveDate, repeat: RepeatRule) -> Event {
        Event {
            id: id.into(),
            title: self.title.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            category: self.category.clone(),
            date,
            start_time: self.start_time,
            end_time: self.end_time,
            notification_time: self.notification_time,
            repeat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn draft() -> EventDraft {
        EventDraft::new("Team sync", date(2025, 10, 15), time(9, 0), time(10, 0))
            .with_description("weekly sync")
            .with_location("Room A")
            .with_category("work")
            .with_notification(10)
    }

    mod repeat_rule {
        use super::*;

        #[test]
        fn none_is_always_valid() {
            let rule = RepeatRule {
                interval: -5,
                count: Some(0),
                ..RepeatRule::none()
            };
            assert!(rule.validate().is_ok());
        }

        #[test]
        fn rejects_non_positive_interval() {
            assert_eq!(
                RepeatRule::daily(0).validate(),
                Err(ValidationError::NonPositiveInterval { interval: 0 })
            );
            assert_eq!(
                RepeatRule::monthly(-1).validate(),
                Err(ValidationError::NonPositiveInterval { interval: -1 })
            );
        }

        #[test]
        fn end_conditions() {
            assert_eq!(RepeatRule::daily(1).end(), Ok(RepeatEnd::Horizon));
            assert_eq!(
                RepeatRule::daily(1).with_count(3).end(),
                Ok(RepeatEnd::Count(3))
            );
            assert_eq!(
                RepeatRule::daily(1).with_end_date(date(2025, 9, 18)).end(),
                Ok(RepeatEnd::Until(date(2025, 9, 18)))
            );
            assert_eq!(
                RepeatRule::daily(1).with_count(0).validate(),
                Err(ValidationError::ZeroCount)
            );
            assert_eq!(
                RepeatRule::daily(1)
                    .with_count(2)
                    .with_end_date(date(2025, 9, 18))
                    .validate(),
                Err(ValidationError::ConflictingEndConditions)
            );
        }

        #[test]
        fn repeat_type_parsing() {
            assert_eq!("Weekly".parse::<RepeatType>(), Ok(RepeatType::Weekly));
            assert!("fortnightly".parse::<RepeatType>().is_err());
            assert_eq!(RepeatType::Monthly.to_string(), "monthly");
            assert_eq!(RepeatType::Yearly.unit(), "year");
        }
    }

    mod event {
        use super::*;

        #[test]
        fn group_identity() {
            let rule = RepeatRule::daily(1).with_group_id("g-1");
            let a = draft().to_event("a", date(2025, 10, 15), rule.clone());
            let b = draft().to_event("b", date(2025, 10, 16), rule);
            let standalone = draft().to_event("c", date(2025, 10, 17), RepeatRule::none());

            assert_eq!(a.group_id(), Some("g-1"));
            assert!(a.is_sibling_of(&b));
            assert!(!a.is_sibling_of(&standalone));
            assert!(!standalone.is_grouped());
        }

        #[test]
        fn stale_group_id_is_ignored() {
            let stale = draft().to_event(
                "x",
                date(2025, 10, 15),
                RepeatRule::none().with_group_id("g-1"),
            );
            assert_eq!(stale.group_id(), None);
        }

        #[test]
        fn group_named_after_first_member() {
            let json = r#"[
                {"id": "1", "title": "Daily check", "date": "2025-10-15",
                 "startTime": "09:00", "endTime": "10:00",
                 "repeat": {"type": "daily", "interval": 1, "id": "1"}},
                {"id": "2", "title": "Daily check", "date": "2025-10-16",
                 "startTime": "09:00", "endTime": "10:00",
                 "repeat": {"type": "daily", "interval": 1, "id": "1"}}
            ]"#;
            let events: Vec<Event> = serde_json::from_str(json).unwrap();

            assert_eq!(events[0].group_id(), Some("1"));
            assert_eq!(events[1].group_id(), Some("1"));
            assert!(events[0].is_sibling_of(&events[1]));
            assert!(events[1].is_sibling_of(&events[0]));
        }

        #[test]
        fn to_draft_drops_group() {
            let event = draft().to_event(
                "a",
                date(2025, 10, 15),
                RepeatRule::weekly(2).with_group_id("g"),
            );
            let back = event.to_draft();
            assert_eq!(back.repeat, RepeatRule::weekly(2));
            assert_eq!(back.title, "Team sync");
        }

        #[test]
        fn wire_format() {
            let event = draft().to_event(
                "1",
                date(2025, 10, 15),
                RepeatRule::daily(1).with_count(2).with_group_id("g-7"),
            );
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["startTime"], "09:00");
            assert_eq!(json["endTime"], "10:00");
            assert_eq!(json["date"], "2025-10-15");
            assert_eq!(json["notificationTime"], 10);
            assert_eq!(json["repeat"]["type"], "daily");
            assert_eq!(json["repeat"]["id"], "g-7");
            assert!(json["repeat"].get("endDate").is_none());
        }

        #[test]
        fn parses_original_payload() {
            let json = r#"{
                "id": "2b7545a6-ebee-426c-b906-2329bc8d62bd",
                "title": "Team meeting",
                "date": "2025-10-20",
                "startTime": "10:00",
                "endTime": "11:00",
                "description": "Weekly team meeting",
                "location": "Room A",
                "category": "work",
                "repeat": { "type": "none", "interval": 0 },
                "notificationTime": 1
            }"#;
            let event: Event = serde_json::from_str(json).unwrap();
            assert_eq!(event.start_time, time(10, 0));
            assert_eq!(event.repeat, RepeatRule::none());
            assert_eq!(event.notification_time, 1);
        }

        #[test]
        fn accepts_group_id_alias() {
            let json = r#"{"type": "weekly", "interval": 1, "groupId": "g"}"#;
            let rule: RepeatRule = serde_json::from_str(json).unwrap();
            assert_eq!(rule.group_id.as_deref(), Some("g"));
        }
    }

    mod drafts {
        use super::*;

        #[test]
        fn validation() {
            assert!(draft().validate().is_ok());

            let untitled = EventDraft {
                title: "  ".into(),
                ..draft()
            };
            assert_eq!(untitled.validate(), Err(ValidationError::EmptyTitle));

            let inverted = EventDraft {
                start_time: time(11, 0),
                ..draft()
            };
            assert!(matches!(
                inverted.validate(),
                Err(ValidationError::InvalidTimeRange { .. })
            ));

            let bad_rule = draft().with_repeat(RepeatRule::weekly(0));
            assert!(matches!(
                bad_rule.validate(),
                Err(ValidationError::NonPositiveInterval { .. })
            ));
            assert!(bad_rule.validate_fields().is_ok());
        }
    }
}
