//! Scheduling conflict detection.

use chrono::NaiveDate;

use crate::event::Event;
use crate::time::Slot;

/// The first occurrence of a submission that collides with existing events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    /// The occurrence that could not be placed.
    pub slot: Slot,
    /// Every event it overlaps, in pool order.
    pub conflicts: Vec<Event>,
}

impl Collision {
    /// Returns the date of the colliding occurrence.
    pub fn date(&self) -> NaiveDate {
        self.slot.date
    }
}

/// Returns every event in `pool` whose slot overlaps `candidate`.
///
/// Events whose id is listed in `exclude` are ignored, so an event being
/// edited does not collide with itself. An empty result means no conflict.
pub fn find_conflicts(candidate: &Slot, pool: &[Event], exclude: &[&str]) -> Vec<Event> {
    pool.iter()
        .filter(|event| !exclude.contains(&event.id.as_str()))
        .filter(|event| candidate.overlaps(&event.slot()))
        .cloned()
        .collect()
}

/// Checks each slot in order and returns the first one that conflicts.
///
/// Used for repeating submissions: one conflicting occurrence is enough to
/// reject the whole group.
pub fn first_conflict<'a, I>(slots: I, pool: &[Event], exclude: &[&str]) -> Option<Collision>
where
    I: IntoIterator<Item = &'a Slot>,
{
    slots.into_iter().find_map(|slot| {
        let conflicts = find_conflicts(slot, pool, exclude);
        (!conflicts.is_empty()).then(|| Collision {
            slot: *slot,
            conflicts,
        })
    })
}
