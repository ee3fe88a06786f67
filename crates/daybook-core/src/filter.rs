//! Search and calendar-view filtering.

use chrono::{Datelike, Days, NaiveDate};

use crate::event::Event;

/// The date range a listing is restricted to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    /// Every event.
    #[default]
    All,
    /// The Sunday-to-Saturday week containing the date.
    Week(NaiveDate),
    /// The calendar month containing the date.
    Month(NaiveDate),
}

impl View {
    /// Returns the inclusive date range of this view, if bounded.
    pub fn range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            Self::All => None,
            Self::Week(date) => Some(week_range(*date)),
            Self::Month(date) => Some(month_range(*date)),
        }
    }

    /// Checks if `date` is visible in this view.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.range()
            .is_none_or(|(first, last)| first <= date && date <= last)
    }
}

/// Returns the Sunday and Saturday of the week containing `date`.
pub fn week_range(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = u64::from(date.weekday().num_days_from_sunday());
    let sunday = date.checked_sub_days(Days::new(offset)).unwrap_or(date);
    let saturday = sunday.checked_add_days(Days::new(6)).unwrap_or(sunday);
    (sunday, saturday)
}

/// Returns the first and last day of the month containing `date`.
pub fn month_range(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let last = first
        .checked_add_months(chrono::Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date);
    (first, last)
}

/// Checks if `event` matches a case-insensitive search term.
///
/// The term is matched against title, description, location and category.
/// An empty or whitespace-only term matches everything.
pub fn matches_term(event: &Event, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    [
        &event.title,
        &event.description,
        &event.location,
        &event.category,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&term))
}

/// Returns the events matching `term` within `view`, ordered by date and
/// start time.
pub fn filter_events<'a>(events: &'a [Event], term: &str, view: View) -> Vec<&'a Event> {
    let mut matched: Vec<&Event> = events
        .iter()
        .filter(|event| view.contains(event.date))
        .filter(|event| matches_term(event, term))
        .collect();
    matched.sort_by_key(|event| (event.date, event.start_time));
    matched
}
