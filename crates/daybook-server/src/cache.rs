//! Snapshot cache of the store's events.
//!
//! The cache holds an immutable `Arc<[Event]>`. Readers clone the `Arc` and
//! work on a consistent list; a reload swaps in a new slice under the write
//! lock, so nobody ever observes a half-applied change.

use std::sync::Arc;

use chrono::{DateTime, Local};
use daybook_core::Event;
use tokio::sync::RwLock;
use tracing::debug;

/// The last successfully loaded event list.
#[derive(Debug, Clone)]
pub struct EventCache {
    events: Arc<[Event]>,
    updated_at: Option<DateTime<Local>>,
    generation: u64,
}

impl Default for EventCache {
    fn default() -> Self {
        Self::new()
    }
}

impl EventCache {
    /// Creates an empty cache that has never been loaded.
    pub fn new() -> Self {
        Self {
            events: Arc::from(Vec::new()),
            updated_at: None,
            generation: 0,
        }
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> Arc<[Event]> {
        Arc::clone(&self.events)
    }

    /// Replaces the snapshot and bumps the generation.
    pub fn replace(&mut self, events: Vec<Event>) {
        self.events = Arc::from(events);
        self.updated_at = Some(Local::now());
        self.generation += 1;
        debug!(
            count = self.events.len(),
            generation = self.generation,
            "Replaced event snapshot"
        );
    }

    /// Looks up an event by id.
    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.id == id)
    }

    /// When the snapshot was last replaced, if ever.
    pub fn updated_at(&self) -> Option<DateTime<Local>> {
        self.updated_at
    }

    /// Number of successful reloads so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Cache shared between the scheduler and the watcher.
pub type SharedEventCache = Arc<RwLock<EventCache>>;

/// Creates an empty shared cache.
pub fn new_shared_cache() -> SharedEventCache {
    Arc::new(RwLock::new(EventCache::new()))
}
