//! Row operations shared by the in-process stores.
//!
//! Every function validates the whole batch before touching `rows`, so a
//! rejected batch leaves the table unchanged.

use std::collections::HashSet;

use daybook_core::Event;

use crate::error::{StoreError, StoreResult};

pub(crate) fn insert(rows: &mut Vec<Event>, events: Vec<Event>) -> StoreResult<()> {
    let mut seen: HashSet<&str> = rows.iter().map(|event| event.id.as_str()).collect();
    for event in &events {
        if !seen.insert(event.id.as_str()) {
            return Err(StoreError::bulk_rejected(format!(
                "duplicate event id {}",
                event.id
            )));
        }
    }
    rows.extend(events);
    Ok(())
}

pub(crate) fn replace(rows: &mut [Event], events: Vec<Event>) -> StoreResult<()> {
    let mut positions = Vec::with_capacity(events.len());
    for event in &events {
        let index = rows
            .iter()
            .position(|row| row.id == event.id)
            .ok_or_else(|| StoreError::not_found(&event.id))?;
        positions.push(index);
    }
    for (index, event) in positions.into_iter().zip(events) {
        rows[index] = event;
    }
    Ok(())
}

pub(crate) fn remove(rows: &mut Vec<Event>, id: &str) -> StoreResult<()> {
    let index = rows
        .iter()
        .position(|row| row.id == id)
        .ok_or_else(|| StoreError::not_found(id))?;
    rows.remove(index);
    Ok(())
}

/// Forces the row id to match the id the caller addressed.
pub(crate) fn addressed(id: &str, mut event: Event) -> Event {
    if event.id != id {
        event.id = id.to_string();
    }
    event
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreErrorCode;
    use chrono::{NaiveDate, NaiveTime};
    use daybook_core::{EventDraft, RepeatRule};

    fn event(id: &str, title: &str) -> Event {
        let date = NaiveDate::from_ymd_opt(2025, 10, 15).unwrap();
        EventDraft::new(
            title,
            date,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        )
        .to_event(id, date, RepeatRule::none())
    }

    #[test]
    fn insert_rejects_duplicates_without_partial_write() {
        let mut rows = vec![event("a", "A")];
        let err = insert(&mut rows, vec![event("b", "B"), event("a", "A2")]).unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::BulkRejected);
        assert_eq!(rows.len(), 1);

        let err = insert(&mut rows, vec![event("c", "C"), event("c", "C")]).unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::BulkRejected);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn replace_is_all_or_nothing() {
        let mut rows = vec![event("a", "A"), event("b", "B")];
        let err = replace(&mut rows, vec![event("a", "A2"), event("zz", "Z")]).unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::NotFound);
        assert_eq!(rows[0].title, "A");

        replace(&mut rows, vec![event("b", "B2"), event("a", "A2")]).unwrap();
        assert_eq!(rows[0].title, "A2");
        assert_eq!(rows[1].title, "B2");
    }

    #[test]
    fn remove_single_row() {
        let mut rows = vec![event("a", "A"), event("b", "B")];
        remove(&mut rows, "a").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(remove(&mut rows, "a").unwrap_err().code(), StoreErrorCode::NotFound);
    }

    #[test]
    fn addressed_overrides_id() {
        assert_eq!(addressed("x", event("y", "Y")).id, "x");
    }
}
