//! Repeat group policy.
//!
//! Decides what create, edit and delete mean for events that belong to a
//! repeat group. Siblings are linked only by the shared group id in
//! `repeat.id`; they are found by filtering the current event list, never by
//! following a pointer.
//!
//! Editing any member of a group dissolves the whole series: every sibling
//! is rewritten as a standalone event (`{type: none, interval: 0}`, no group
//! id), and only the edited member takes the new field values. The
//! transition is one-way.

use chrono::NaiveDate;

use crate::error::ValidationResult;
use crate::event::{Event, EventDraft, RepeatRule};
use crate::repeat::expand_with_horizon;
use crate::time::Slot;

/// Generates a fresh random identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Events to persist for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePlan {
    /// Group id shared by every event, for repeating submissions.
    pub group_id: Option<String>,
    /// One event per occurrence, in date order.
    pub events: Vec<Event>,
}

impl CreatePlan {
    /// Returns `true` if this plan creates a repeat group.
    pub fn is_group(&self) -> bool {
        self.group_id.is_some()
    }

    /// Returns the slot of every event in the plan.
    pub fn slots(&self) -> Vec<Slot> {
        self.events.iter().map(Event::slot).collect()
    }
}

/// How an edit is written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditPlan {
    /// In-place update of a standalone event.
    Single(Event),
    /// Rewrite of every member of a dissolved group, edited member first.
    Dissolve {
        /// The group being dissolved.
        group_id: String,
        /// The id of the member the user edited.
        edited_id: String,
        /// Every former member, each now standalone.
        events: Vec<Event>,
    },
}

impl EditPlan {
    /// Returns the event carrying the new field values.
    pub fn edited(&self) -> Option<&Event> {
        match self {
            Self::Single(event) => Some(event),
            Self::Dissolve {
                edited_id, events, ..
            } => events.iter().find(|e| &e.id == edited_id),
        }
    }

    /// Returns every event to be written.
    pub fn events(&self) -> &[Event] {
        match self {
            Self::Single(event) => std::slice::from_ref(event),
            Self::Dissolve { events, .. } => events,
        }
    }
}

/// What a delete removes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePlan {
    /// The single event to remove.
    pub id: String,
    /// Siblings left in place (deletes never cascade).
    pub remaining_siblings: usize,
}

/// Plans a submission with freshly generated ids.
///
/// A non-repeating draft produces exactly one standalone event. A repeating
/// draft produces a new group with one event per expanded date.
pub fn plan_create(draft: &EventDraft, horizon: NaiveDate) -> ValidationResult<CreatePlan> {
    plan_create_with(draft, horizon, new_id)
}

/// Plans a submission using `next_id` for event and group ids.
pub fn plan_create_with<F>(
    draft: &EventDraft,
    horizon: NaiveDate,
    mut next_id: F,
) -> ValidationResult<CreatePlan>
where
    F: FnMut() -> String,
{
    draft.validate()?;

    if !draft.repeat.is_repeating() {
        let event = draft.to_event(next_id(), draft.date, RepeatRule::none());
        return Ok(CreatePlan {
            group_id: None,
            events: vec![event],
        });
    }

    let dates = expand_with_horizon(draft.date, &draft.repeat, horizon)?;
    let group_id = next_id();
    let repeat = RepeatRule {
        group_id: Some(group_id.clone()),
        ..draft.repeat.clone()
    };
    let events = dates
        .into_iter()
        .map(|date| draft.to_event(next_id(), date, repeat.clone()))
        .collect();

    Ok(CreatePlan {
        group_id: Some(group_id),
        events,
    })
}

/// Plans an edit of `original` with the values in `draft`.
///
/// The draft's repeat rule is ignored: edited events always become
/// standalone. `pool` is the current event list, used to find siblings.
/// For a group, the edited event comes first, followed by its former
/// siblings in pool order.
pub fn plan_edit(original: &Event, draft: &EventDraft, pool: &[Event]) -> ValidationResult<EditPlan> {
    draft.validate_fields()?;

    let edited = draft.to_event(original.id.clone(), draft.date, RepeatRule::none());
    let Some(group_id) = original.group_id() else {
        return Ok(EditPlan::Single(edited));
    };

    let events: Vec<Event> = std::iter::once(edited)
        .chain(siblings(original, pool).map(dissolved))
        .collect();

    Ok(EditPlan::Dissolve {
        group_id: group_id.to_string(),
        edited_id: original.id.clone(),
        events,
    })
}

/// Plans the removal of `target`.
pub fn plan_delete(target: &Event, pool: &[Event]) -> DeletePlan {
    DeletePlan {
        id: target.id.clone(),
        remaining_siblings: siblings(target, pool).count(),
    }
}

/// Returns the other members of `event`'s group.
pub fn siblings<'a>(event: &'a Event, pool: &'a [Event]) -> impl Iterator<Item = &'a Event> + 'a {
    pool.iter()
        .filter(move |other| other.id != event.id && event.is_sibling_of(other))
}

/// Returns `event` with its repeat linkage removed.
fn dissolved(event: &Event) -> Event {
    Event {
        repeat: RepeatRule::none(),
        ..event.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::event::RepeatType;
    use crate::repeat::DEFAULT_HORIZON;
    use crate::time::parse_time;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft(title: &str) -> EventDraft {
        EventDraft::new(
            title,
            date(2025, 9, 15),
            parse_time("09:00").unwrap(),
            parse_time("10:00").unwrap(),
        )
        .with_notification(10)
    }

    fn counter() -> impl FnMut() -> String {
        let mut n = 0;
        move || {
            n += 1;
            format!("id-{n}")
        }
    }

    mod create {
        use super::*;

        #[test]
        fn standalone_is_a_single_event() {
            let plan = plan_create_with(&draft("Lunch"), DEFAULT_HORIZON, counter()).unwrap();
            assert!(!plan.is_group());
            assert_eq!(plan.events.len(), 1);
            assert_eq!(plan.events[0].id, "id-1");
            assert_eq!(plan.events[0].repeat, RepeatRule::none());
        }

        #[test]
        fn standalone_normalizes_interval() {
            let mut input = draft("Lunch");
            input.repeat.interval = 7;
            let plan = plan_create(&input, DEFAULT_HORIZON).unwrap();
            assert_eq!(plan.events[0].repeat.interval, 0);
        }

        #[test]
        fn repeating_creates_a_fresh_group() {
            let input = draft("Standup").with_repeat(RepeatRule::daily(1).with_count(3));
            let plan = plan_create_with(&input, DEFAULT_HORIZON, counter()).unwrap();

            assert_eq!(plan.group_id.as_deref(), Some("id-1"));
            let ids: Vec<_> = plan.events.iter().map(|e| e.id.as_str()).collect();
            assert_eq!(ids, vec!["id-2", "id-3", "id-4"]);

            for event in &plan.events {
                assert_eq!(event.group_id(), Some("id-1"));
                assert_eq!(event.repeat.kind, RepeatType::Daily);
                assert_eq!(event.repeat.interval, 1);
                assert_eq!(event.title, "Standup");
            }
            assert_eq!(plan.events[2].date, date(2025, 9, 17));
            assert_eq!(plan.slots().len(), 3);
        }

        #[test]
        fn separate_submissions_get_distinct_groups() {
            let input = draft("Standup").with_repeat(RepeatRule::weekly(1));
            let a = plan_create(&input, DEFAULT_HORIZON).unwrap();
            let b = plan_create(&input, DEFAULT_HORIZON).unwrap();
            assert_ne!(a.group_id, b.group_id);
        }

        #[test]
        fn invalid_drafts_are_rejected() {
            let input = draft("Standup").with_repeat(RepeatRule::daily(0));
            assert_eq!(
                plan_create(&input, DEFAULT_HORIZON),
                Err(ValidationError::NonPositiveInterval { interval: 0 })
            );
        }
    }

    mod edit {
        use super::*;

        fn group_of_three() -> Vec<Event> {
            let input = draft("Standup").with_repeat(RepeatRule::daily(1).with_count(3));
            plan_create_with(&input, DEFAULT_HORIZON, counter())
                .unwrap()
                .events
        }

        #[test]
        fn standalone_edit_is_in_place() {
            let original = plan_create(&draft("Lunch"), DEFAULT_HORIZON)
                .unwrap()
                .events
                .remove(0);
            let changed = EventDraft {
                title: "Late lunch".into(),
                ..original.to_draft()
            };

            let plan = plan_edit(&original, &changed, std::slice::from_ref(&original)).unwrap();
            let EditPlan::Single(updated) = &plan else {
                panic!("expected single update, got {plan:?}");
            };
            assert_eq!(updated.id, original.id);
            assert_eq!(updated.title, "Late lunch");
            assert_eq!(updated.repeat, RepeatRule::none());
        }

        #[test]
        fn editing_a_member_dissolves_the_group() {
            let pool = group_of_three();
            let target = &pool[1];
            let changed = EventDraft {
                title: "Moved standup".into(),
                start_time: parse_time("11:00").unwrap(),
                end_time: parse_time("11:30").unwrap(),
                ..target.to_draft()
            };

            let plan = plan_edit(target, &changed, &pool).unwrap();
            let events = plan.events();
            assert_eq!(events.len(), 3);
            assert!(events.iter().all(|e| e.repeat == RepeatRule::none()));
            assert!(events.iter().all(|e| e.group_id().is_none()));

            let edited: Vec<_> = events.iter().filter(|e| e.title == "Moved standup").collect();
            assert_eq!(edited.len(), 1);
            assert_eq!(edited[0].id, target.id);
            assert_eq!(plan.edited().map(|e| e.id.as_str()), Some(target.id.as_str()));

            assert_eq!(events[0].id, target.id);
            for before in pool.iter().filter(|e| e.id != target.id) {
                let after = events.iter().find(|e| e.id == before.id).unwrap();
                assert_eq!(after.title, before.title);
                assert_eq!(after.start_time, before.start_time);
                assert_eq!(after.date, before.date);
            }
        }

        #[test]
        fn edited_event_is_written_even_if_missing_from_pool() {
            let pool = group_of_three();
            let target = pool[0].clone();
            let rest = &pool[1..];

            let plan = plan_edit(&target, &target.to_draft(), rest).unwrap();
            let ids: Vec<_> = plan.events().iter().map(|e| e.id.as_str()).collect();
            assert_eq!(ids, vec!["id-2", "id-3", "id-4"]);
        }

        #[test]
        fn group_named_after_its_first_member_dissolves() {
            let json = r#"[
                {"id": "1", "title": "Daily check", "date": "2025-10-15",
                 "startTime": "09:00", "endTime": "10:00",
                 "repeat": {"type": "daily", "interval": 1, "id": "1"}},
                {"id": "2", "title": "Daily check", "date": "2025-10-16",
                 "startTime": "09:00", "endTime": "10:00",
                 "repeat": {"type": "daily", "interval": 1, "id": "1"}}
            ]"#;
            let pool: Vec<Event> = serde_json::from_str(json).unwrap();

            for target in &pool {
                let changed = EventDraft {
                    title: "Renamed".into(),
                    ..target.to_draft()
                };
                let plan = plan_edit(target, &changed, &pool).unwrap();
                assert!(
                    matches!(&plan, EditPlan::Dissolve { group_id, .. } if group_id == "1"),
                    "editing {} gave {plan:?}",
                    target.id
                );
                let mut ids: Vec<_> = plan.events().iter().map(|e| e.id.as_str()).collect();
                ids.sort();
                assert_eq!(ids, vec!["1", "2"]);
                assert!(plan.events().iter().all(|e| e.repeat == RepeatRule::none()));
                assert_eq!(plan.edited().map(|e| e.title.as_str()), Some("Renamed"));
            }

            assert_eq!(siblings(&pool[1], &pool).count(), 1);
            assert_eq!(plan_delete(&pool[0], &pool).remaining_siblings, 1);
        }

        #[test]
        fn edit_ignores_draft_repeat_rule() {
            let pool = group_of_three();
            let changed = pool[0].to_draft().with_repeat(RepeatRule::weekly(0));
            let plan = plan_edit(&pool[0], &changed, &pool).unwrap();
            assert!(plan.events().iter().all(|e| !e.repeat.is_repeating()));
        }

        #[test]
        fn unrelated_events_are_untouched() {
            let mut pool = group_of_three();
            let other = plan_create(
                &draft("Other").with_repeat(RepeatRule::daily(1).with_count(2)),
                DEFAULT_HORIZON,
            )
            .unwrap();
            pool.extend(other.events);

            let plan = plan_edit(&pool[0], &pool[0].to_draft(), &pool).unwrap();
            assert_eq!(plan.events().len(), 3);
            assert!(plan.events().iter().all(|e| e.title == "Standup"));
        }

        #[test]
        fn rejects_invalid_fields() {
            let pool = group_of_three();
            let changed = EventDraft {
                end_time: parse_time("08:00").unwrap(),
                ..pool[0].to_draft()
            };
            assert!(matches!(
                plan_edit(&pool[0], &changed, &pool),
                Err(ValidationError::InvalidTimeRange { .. })
            ));
        }
    }

    mod delete {
        use super::*;

        #[test]
        fn never_cascades() {
            let input = draft("Standup").with_repeat(RepeatRule::daily(1).with_count(3));
            let pool = plan_create(&input, DEFAULT_HORIZON).unwrap().events;

            let plan = plan_delete(&pool[0], &pool);
            assert_eq!(plan.id, pool[0].id);
            assert_eq!(plan.remaining_siblings, 2);
            assert_eq!(siblings(&pool[0], &pool).count(), 2);
        }
    }
}
