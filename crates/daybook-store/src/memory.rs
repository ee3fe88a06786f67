//! In-memory event store.
//!
//! Nothing is persisted. Faults can be injected per operation to exercise
//! the scheduler's failure paths.

use std::collections::HashSet;
use std::sync::Mutex;

use daybook_core::Event;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::rows;
use crate::store::{BoxFuture, EventStore, StoreOperation};

/// A `Vec<Event>` behind a lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<Event>>,
    faults: Mutex<HashSet<StoreOperation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `events`.
    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            rows: RwLock::new(events),
            faults: Mutex::default(),
        }
    }

    /// Makes every subsequent call of `operation` fail until cleared.
    pub fn fail_on(&self, operation: StoreOperation) {
        if let Ok(mut faults) = self.faults.lock() {
            faults.insert(operation);
        }
    }

    /// Removes every injected fault.
    pub fn clear_faults(&self) {
        if let Ok(mut faults) = self.faults.lock() {
            faults.clear();
        }
    }

    /// Returns a copy of the stored rows.
    pub async fn snapshot(&self) -> Vec<Event> {
        self.rows.read().await.clone()
    }

    fn check(&self, operation: StoreOperation) -> StoreResult<()> {
        let failing = self
            .faults
            .lock()
            .map(|faults| faults.contains(&operation))
            .unwrap_or(false);
        if failing {
            debug!(%operation, "Injected store failure");
            return Err(StoreError::injected(format!("{operation} failed")).with_store("memory"));
        }
        Ok(())
    }
}

impl EventStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn list_events(&self) -> BoxFuture<'_, StoreResult<Vec<Event>>> {
        Box::pin(async move {
            self.check(StoreOperation::List)?;
            Ok(self.rows.read().await.clone())
        })
    }

    fn create_event(&self, event: Event) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            self.check(StoreOperation::Create)?;
            let mut table = self.rows.write().await;
            rows::insert(&mut table, vec![event]).map_err(|e| e.with_store("memory"))
        })
    }

    fn create_events(&self, events: Vec<Event>) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            self.check(StoreOperation::CreateMany)?;
            let mut table = self.rows.write().await;
            rows::insert(&mut table, events).map_err(|e| e.with_store("memory"))
        })
    }

    fn update_event<'a>(&'a self, id: &'a str, event: Event) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            self.check(StoreOperation::Update)?;
            let mut table = self.rows.write().await;
            rows::replace(&mut table, vec![rows::addressed(id, event)])
                .map_err(|e| e.with_store("memory"))
        })
    }

    fn update_events(&self, events: Vec<Event>) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            self.check(StoreOperation::UpdateMany)?;
            let mut table = self.rows.write().await;
            rows::replace(&mut table, events).map_err(|e| e.with_store("memory"))
        })
    }

    fn delete_event<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            self.check(StoreOperation::Delete)?;
            let mut table = self.rows.write().await;
            rows::remove(&mut table, id).map_err(|e| e.with_store("memory"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreErrorCode;
    use chrono::{NaiveDate, NaiveTime};
    use daybook_core::{EventDraft, RepeatRule};

    fn event(id: &str) -> Event {
        let date = NaiveDate::from_ymd_opt(2025, 10, 15).unwrap();
        EventDraft::new(
            format!("event {id}"),
            date,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        )
        .to_event(id, date, RepeatRule::none())
    }

    #[tokio::test]
    async fn crud_roundtrip() {
        let store = MemoryStore::new();
        store.create_event(event("a")).await.unwrap();
        store
            .create_events(vec![event("b"), event("c")])
            .await
            .unwrap();
        assert_eq!(store.list_events().await.unwrap().len(), 3);

        let mut changed = event("b");
        changed.title = "renamed".into();
        store.update_event("b", changed).await.unwrap();
        let rows = store.snapshot().await;
        assert_eq!(rows[1].title, "renamed");

        store.delete_event("a").await.unwrap();
        let ids: Vec<_> = store
            .list_events()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn bulk_update_missing_row_changes_nothing() {
        let store = MemoryStore::with_events(vec![event("a"), event("b")]);
        let mut a = event("a");
        a.title = "changed".into();

        let err = store
            .update_events(vec![a, event("missing")])
            .await
            .unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::NotFound);
        assert_eq!(err.store(), Some("memory"));
        assert_eq!(store.snapshot().await[0].title, "event a");
    }

    #[tokio::test]
    async fn injected_faults() {
        let store = MemoryStore::with_events(vec![event("a")]);
        store.fail_on(StoreOperation::CreateMany);

        let err = store.create_events(vec![event("b")]).await.unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::Injected);
        assert_eq!(store.snapshot().await.len(), 1);

        // Other operations are unaffected.
        store.create_event(event("c")).await.unwrap();

        store.clear_faults();
        store.create_events(vec![event("b")]).await.unwrap();
        assert_eq!(store.snapshot().await.len(), 3);
    }
}
