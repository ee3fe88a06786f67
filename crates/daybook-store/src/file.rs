//! JSON file event store.
//!
//! The file holds a single document, `{"events": [...]}`. Every mutation
//! reads the document, applies the change in memory and writes a sibling
//! temp file that is renamed over the original. A rejected or failed write
//! leaves the previous document in place.

use std::path::{Path, PathBuf};

use daybook_core::Event;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::rows;
use crate::store::{BoxFuture, EventStore};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    events: Vec<Event>,
}

/// Event store backed by a JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Opens the store at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> StoreResult<Vec<Event>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Store file missing, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::from(e).with_store("file")),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        let document: Document = serde_json::from_str(&raw).map_err(|e| {
            StoreError::invalid_data(format!(
                "failed to parse {}: {e}",
                self.path.display()
            ))
            .with_store("file")
            .with_source(e)
        })?;
        Ok(document.events)
    }

    async fn save(&self, events: Vec<Event>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::from(e).with_store("file"))?;
        }

        let count = events.len();
        let body = serde_json::to_string_pretty(&Document { events })
            .map_err(|e| StoreError::from(e).with_store("file"))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, body)
            .await
            .map_err(|e| StoreError::from(e).with_store("file"))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::from(e).with_store("file"))?;

        debug!(path = %self.path.display(), count, "Wrote store file");
        Ok(())
    }

    /// Loads, applies `change`, and saves, all under the write lock.
    async fn modify<F>(&self, change: F) -> StoreResult<()>
    where
        F: FnOnce(&mut Vec<Event>) -> StoreResult<()>,
    {
        let _guard = self.write_lock.lock().await;
        let mut events = self.load().await?;
        change(&mut events).map_err(|e| e.with_store("file"))?;
        self.save(events).await
    }
}

impl EventStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    fn list_events(&self) -> BoxFuture<'_, StoreResult<Vec<Event>>> {
        Box::pin(async move {
            let _guard = self.write_lock.lock().await;
            self.load().await
        })
    }

    fn create_event(&self, event: Event) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            let id = event.id.clone();
            self.modify(|table| rows::insert(table, vec![event])).await?;
            info!(id = %id, "Created event");
            Ok(())
        })
    }

    fn create_events(&self, events: Vec<Event>) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            let count = events.len();
            self.modify(|table| rows::insert(table, events)).await?;
            info!(count, "Created events");
            Ok(())
        })
    }

    fn update_event<'a>(&'a self, id: &'a str, event: Event) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            self.modify(|table| rows::replace(table, vec![rows::addressed(id, event)]))
                .await?;
            info!(id = %id, "Updated event");
            Ok(())
        })
    }

    fn update_events(&self, events: Vec<Event>) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            let count = events.len();
            self.modify(|table| rows::replace(table, events)).await?;
            info!(count, "Updated events");
            Ok(())
        })
    }

    fn delete_event<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            self.modify(|table| rows::remove(table, id)).await?;
            info!(id = %id, "Deleted event");
            Ok(())
        })
    }
}
