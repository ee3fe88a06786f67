//! The `EventStore` trait.
//!
//! A store is the persistence backend behind the scheduler. The scheduler
//! keeps its own snapshot and reloads it with [`EventStore::list_events`]
//! after every mutation, so stores never need to push changes.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use daybook_core::Event;

use crate::error::StoreResult;

/// A boxed future for object-safe async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Names each store call, for logging and fault injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    List,
    Create,
    CreateMany,
    Update,
    UpdateMany,
    Delete,
}

impl StoreOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::CreateMany => "create_many",
            Self::Update => "update",
            Self::UpdateMany => "update_many",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persistence backend for events.
///
/// # Contract
///
/// - `create_events` and `update_events` are all-or-nothing: on error, none
///   of the events may have been written.
/// - `update_event` and `update_events` replace whole rows matched by id.
/// - `delete_event` removes exactly one row.
/// - Implementations must be `Send + Sync`; they may be shared across tasks.
pub trait EventStore: Send + Sync {
    /// Short backend name ("memory", "file", "http").
    fn name(&self) -> &str;

    /// Returns every stored event.
    fn list_events(&self) -> BoxFuture<'_, StoreResult<Vec<Event>>>;

    /// Stores a single new event.
    fn create_event(&self, event: Event) -> BoxFuture<'_, StoreResult<()>>;

    /// Stores a batch of new events atomically.
    fn create_events(&self, events: Vec<Event>) -> BoxFuture<'_, StoreResult<()>>;

    /// Replaces the event with id `id`.
    fn update_event<'a>(&'a self, id: &'a str, event: Event) -> BoxFuture<'a, StoreResult<()>>;

    /// Replaces a batch of events atomically, matching each by its id.
    fn update_events(&self, events: Vec<Event>) -> BoxFuture<'_, StoreResult<()>>;

    /// Removes the event with id `id`.
    fn delete_event<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StoreResult<()>>;
}
