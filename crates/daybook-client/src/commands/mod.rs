//! Command implementations.

pub mod add;
pub mod config;
pub mod delete;
pub mod edit;
pub mod expand;
pub mod list;
pub mod watch;

use std::sync::Arc;

use tracing::debug;

use daybook_server::EventScheduler;
use daybook_store::{EventStore, FileStore};

use crate::config::{ClientConfig, StoreKind};
use crate::error::{ClientError, ClientResult};

/// Builds the event store selected by `config`.
pub fn build_store(config: &ClientConfig) -> ClientResult<Arc<dyn EventStore>> {
    match config.store.kind {
        StoreKind::File => {
            let path = config.data_file();
            debug!(path = %path.display(), "Using file store");
            Ok(Arc::new(FileStore::new(path)))
        }
        StoreKind::Http => build_http_store(config),
    }
}

#[cfg(feature = "http")]
fn build_http_store(config: &ClientConfig) -> ClientResult<Arc<dyn EventStore>> {
    use std::time::Duration;

    use daybook_store::{HttpStore, HttpStoreConfig};

    let url = config.store.url.as_deref().ok_or_else(|| {
        ClientError::Config(
            "store kind is http but no URL is set; add `url` under [store] \
             or pass --server-url"
                .into(),
        )
    })?;
    let http_config =
        HttpStoreConfig::parse(url)?.with_timeout(Duration::from_secs(config.store.timeout));
    tracing::info!(url = %http_config.base_url, "Using HTTP store");
    Ok(Arc::new(HttpStore::new(http_config)?))
}

#[cfg(not(feature = "http"))]
fn build_http_store(_config: &ClientConfig) -> ClientResult<Arc<dyn EventStore>> {
    Err(ClientError::Config(
        "this build of daybook has no HTTP store support".into(),
    ))
}

/// Builds a scheduler over the configured store and loads its snapshot.
pub async fn open_scheduler(config: &ClientConfig) -> ClientResult<EventScheduler> {
    let store = build_store(config)?;
    let scheduler = EventScheduler::new(store, config.scheduler_config());
    let count = scheduler.reload().await?;
    debug!(count, store = scheduler.store_name(), "Loaded events");
    Ok(scheduler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn opens_file_store_from_config() {
        let dir = tempdir().unwrap();
        let mut config = ClientConfig::default();
        config.store.path = Some(dir.path().join("events.json"));

        let scheduler = open_scheduler(&config).await.unwrap();
        assert_eq!(scheduler.store_name(), "file");
        assert!(scheduler.snapshot().await.is_empty());
    }

    #[test]
    fn http_without_url_is_config_error() {
        let mut config = ClientConfig::default();
        config.store.kind = StoreKind::Http;
        let err = build_store(&config).err().unwrap();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
