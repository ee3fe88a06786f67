//! The event scheduler.
//!
//! Every mutation follows the same path: validate, plan, check overlaps
//! against the cached snapshot, write through the store, then reload the
//! snapshot from the store. Mutations are serialised by a gate so a second
//! create cannot plan against a snapshot the first is about to change.
//!
//! The cache only changes on a successful `list_events`. If a write fails,
//! the error is returned and the snapshot stays as it was. If the write
//! succeeds but the follow-up reload fails, the mutation still reports
//! success and the stale snapshot is kept until the next reload.

use std::sync::Arc;

use daybook_core::{
    DeletePlan, EditPlan, Event, EventDraft, find_conflicts, first_conflict, plan_create,
    plan_delete, plan_edit,
};
use daybook_store::EventStore;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::{SharedEventCache, new_shared_cache};
use crate::config::SchedulerConfig;
use crate::error::{SchedulerError, SchedulerResult};
use crate::signals::{ReloadSignal, ShutdownSignal};

/// Orchestrates create, update and remove over a store and a snapshot cache.
pub struct EventScheduler {
    store: Arc<dyn EventStore>,
    cache: SharedEventCache,
    gate: Mutex<()>,
    config: SchedulerConfig,
}

impl EventScheduler {
    /// Creates a scheduler with an empty cache. Call [`reload`](Self::reload)
    /// before the first mutation.
    pub fn new(store: Arc<dyn EventStore>, config: SchedulerConfig) -> Self {
        Self {
            store,
            cache: new_shared_cache(),
            gate: Mutex::new(()),
            config,
        }
    }

    /// Returns the shared cache, for the watcher.
    pub fn cache(&self) -> SharedEventCache {
        Arc::clone(&self.cache)
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    /// Returns the current snapshot.
    pub async fn snapshot(&self) -> Arc<[Event]> {
        self.cache.read().await.snapshot()
    }

    /// Replaces the snapshot with the store's current contents.
    ///
    /// On failure the previous snapshot is kept.
    pub async fn reload(&self) -> SchedulerResult<usize> {
        let events = self.store.list_events().await?;
        let count = events.len();
        self.cache.write().await.replace(events);
        debug!(count, store = self.store.name(), "Reloaded events");
        Ok(count)
    }

    async fn reload_after_write(&self) {
        if let Err(e) = self.reload().await {
            warn!(error = %e, "Write succeeded but reload failed; cache is stale");
        }
    }

    /// Creates a standalone event or a whole repeat group.
    ///
    /// Returns the events written, in date order.
    pub async fn create(&self, draft: EventDraft) -> SchedulerResult<Vec<Event>> {
        let _gate = self.gate.lock().await;

        let plan = plan_create(&draft, self.config.horizon)?;
        let snapshot = self.snapshot().await;
        let slots = plan.slots();
        if let Some(collision) = first_conflict(&slots, &snapshot, &[]) {
            info!(
                date = %collision.date(),
                conflicts = collision.conflicts.len(),
                "Create rejected by overlap"
            );
            return Err(SchedulerError::Conflict {
                date: collision.date(),
                conflicts: collision.conflicts,
            });
        }

        let events = plan.events;
        if let Some(group_id) = &plan.group_id {
            self.store.create_events(events.clone()).await?;
            info!(group = %group_id, count = events.len(), "Created repeat group");
        } else if let Some(event) = events.first() {
            self.store.create_event(event.clone()).await?;
            info!(id = %event.id, title = %event.title, "Created event");
        }

        self.reload_after_write().await;
        Ok(events)
    }

    /// Applies `draft` to the event `id`.
    ///
    /// The result is always standalone. When `id` belongs to a repeat group
    /// the whole group is rewritten as standalone events and only `id` takes
    /// the new values. Only the edited slot is checked for overlaps; the
    /// other former members keep their slots.
    pub async fn update(&self, id: &str, draft: EventDraft) -> SchedulerResult<EditPlan> {
        let _gate = self.gate.lock().await;

        draft.validate_fields()?;
        let snapshot = self.snapshot().await;
        let original = snapshot
            .iter()
            .find(|event| event.id == id)
            .ok_or_else(|| SchedulerError::not_found(id))?;

        let plan = plan_edit(original, &draft, &snapshot)?;
        if let Some(edited) = plan.edited() {
            let conflicts = find_conflicts(&edited.slot(), &snapshot, &[id]);
            if !conflicts.is_empty() {
                info!(id = %id, conflicts = conflicts.len(), "Update rejected by overlap");
                return Err(SchedulerError::Conflict {
                    date: edited.date,
                    conflicts,
                });
            }
        }

        match &plan {
            EditPlan::Single(event) => {
                self.store.update_event(id, event.clone()).await?;
                info!(id = %id, "Updated event");
            }
            EditPlan::Dissolve {
                group_id, events, ..
            } => {
                self.store.update_events(events.clone()).await?;
                info!(
                    id = %id,
                    group = %group_id,
                    count = events.len(),
                    "Updated event and dissolved its repeat group"
                );
            }
        }

        self.reload_after_write().await;
        Ok(plan)
    }

    /// Removes exactly the event `id`. Repeat siblings are left in place.
    pub async fn remove(&self, id: &str) -> SchedulerResult<DeletePlan> {
        let _gate = self.gate.lock().await;

        let snapshot = self.snapshot().await;
        let target = snapshot
            .iter()
            .find(|event| event.id == id)
            .ok_or_else(|| SchedulerError::not_found(id))?;
        let plan = plan_delete(target, &snapshot);

        self.store.delete_event(id).await?;
        info!(
            id = %id,
            remaining_siblings = plan.remaining_siblings,
            "Deleted event"
        );

        self.reload_after_write().await;
        Ok(plan)
    }

    /// Reloads on every `reload` request and every `reload_interval` until
    /// `shutdown` fires. Failed reloads are logged and retried on the next
    /// trigger.
    pub async fn run_reloader(&self, mut reload: ReloadSignal, shutdown: ShutdownSignal) {
        let mut ticker = tokio::time::interval(self.config.reload_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately; the caller has just loaded.
        ticker.tick().await;
        let shutdown = shutdown.wait();
        tokio::pin!(shutdown);
        let mut listening = true;

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {}
                more = reload.recv(), if listening => {
                    if !more {
                        listening = false;
                        continue;
                    }
                    info!("Reload requested");
                }
            }
            if let Err(e) = self.reload().await {
                warn!(error = %e, "Reload failed, keeping previous snapshot");
            }
        }
        debug!("Reloader stopped");
    }
}
