//! Repeat rule expansion.
//!
//! [`expand`] turns an anchor date and a [`RepeatRule`] into the ordered
//! list of dates an event occurs on.
//!
//! Monthly and yearly rules keep the anchor's day of month. A candidate that
//! does not exist in its target month (the 31st of a 30-day month, Feb 29 of
//! a common year) is skipped outright, never clamped to the month's last
//! day. The step counter still advances past a skipped candidate, so the
//! cadence of later occurrences is unchanged.

use chrono::{Datelike, Days, NaiveDate};
use tracing::trace;

use crate::error::{ValidationError, ValidationResult};
use crate::event::{RepeatEnd, RepeatRule, RepeatType};

/// Cutoff for open-ended rules (no end date, no count).
pub const DEFAULT_HORIZON: NaiveDate = match NaiveDate::from_ymd_opt(2025, 9, 30) {
    Some(date) => date,
    None => panic!("invalid default horizon"),
};

/// Maximum number of candidates examined for one rule.
///
/// A rule that has not reached its count, end date or horizon after this
/// many steps is rejected with
/// [`ValidationError::ScanLimitExceeded`](crate::ValidationError::ScanLimitExceeded)
/// rather than returned short.
pub const MAX_SCAN_STEPS: u32 = 10_000;

/// Outcome of advancing the anchor by `k` steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Candidate {
    /// The date exists.
    Valid(NaiveDate),
    /// The anchor day does not exist in this month; carries the first of the
    /// month for termination checks.
    Skipped(NaiveDate),
    /// Past the representable calendar range.
    OutOfRange,
}

/// Expands a rule with the [`DEFAULT_HORIZON`].
///
/// # Errors
///
/// Returns a [`ValidationError`] if the rule is repeating and invalid
/// (non-positive interval, zero count, or both end conditions set), or if it
/// would need more than [`MAX_SCAN_STEPS`] steps to finish.
pub fn expand(anchor: NaiveDate, rule: &RepeatRule) -> ValidationResult<Vec<NaiveDate>> {
    expand_with_horizon(anchor, rule, DEFAULT_HORIZON)
}

/// Expands a rule, using `horizon` as the cutoff when the rule has no end
/// condition.
///
/// The first element is always `anchor`. Non-repeating rules yield exactly
/// `[anchor]`.
pub fn expand_with_horizon(
    anchor: NaiveDate,
    rule: &RepeatRule,
    horizon: NaiveDate,
) -> ValidationResult<Vec<NaiveDate>> {
    if !rule.is_repeating() {
        return Ok(vec![anchor]);
    }
    rule.validate()?;

    let end = rule.end()?;
    let limit = match end {
        RepeatEnd::Until(date) => Some(date),
        RepeatEnd::Horizon => Some(horizon),
        RepeatEnd::Count(_) => None,
    };
    let past_limit = |date: NaiveDate| limit.is_some_and(|limit| date > limit);
    // Validated above.
    let step = i64::from(rule.interval);

    let mut dates = vec![anchor];
    let mut k: i64 = 0;
    loop {
        if let RepeatEnd::Count(count) = end
            && dates.len() >= count as usize
        {
            break;
        }
        if k == i64::from(MAX_SCAN_STEPS) {
            return Err(ValidationError::ScanLimitExceeded {
                limit: MAX_SCAN_STEPS,
            });
        }
        k += 1;

        match candidate(anchor, rule.kind, k * step) {
            Candidate::Valid(date) => {
                if past_limit(date) {
                    break;
                }
                dates.push(date);
            }
            Candidate::Skipped(month_start) => {
                if past_limit(month_start) {
                    break;
                }
                trace!(%anchor, %month_start, kind = %rule.kind, "Skipping month without anchor day");
            }
            Candidate::OutOfRange => break,
        }
    }

    Ok(dates)
}

/// Advances `anchor` by `units` units of `kind`.
fn candidate(anchor: NaiveDate, kind: RepeatType, units: i64) -> Candidate {
    let valid_or_out = |date: Option<NaiveDate>| date.map_or(Candidate::OutOfRange, Candidate::Valid);

    match kind {
        RepeatType::None => Candidate::OutOfRange,
        RepeatType::Daily => valid_or_out(add_days(anchor, units)),
        RepeatType::Weekly => valid_or_out(units.checked_mul(7).and_then(|d| add_days(anchor, d))),
        RepeatType::Monthly => {
            let total = i64::from(anchor.month0()) + units;
            let year = i64::from(anchor.year()) + total.div_euclid(12);
            let month = total.rem_euclid(12) + 1;
            on_day(year, month, anchor.day())
        }
        RepeatType::Yearly => {
            let year = i64::from(anchor.year()) + units;
            on_day(year, i64::from(anchor.month()), anchor.day())
        }
    }
}

fn add_days(anchor: NaiveDate, days: i64) -> Option<NaiveDate> {
    let days = u64::try_from(days).ok()?;
    anchor.checked_add_days(Days::new(days))
}

/// Builds `year-month-day`, or reports the month as skipped if it has no
/// such day.
fn on_day(year: i64, month: i64, day: u32) -> Candidate {
    let (Ok(year), Ok(month)) = (i32::try_from(year), u32::try_from(month)) else {
        return Candidate::OutOfRange;
    };
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => Candidate::Valid(date),
        None => NaiveDate::from_ymd_opt(year, month, 1)
            .map_or(Candidate::OutOfRange, Candidate::Skipped),
    }
}
