//! HTTP event store.
//!
//! Talks to a JSON REST backend with this layout:
//!
//! | Operation       | Request                                  |
//! |-----------------|------------------------------------------|
//! | list            | `GET    /api/events`                     |
//! | create          | `POST   /api/events`                     |
//! | create (bulk)   | `POST   /api/events-list {"events": [...]}` |
//! | update          | `PUT    /api/events/{id}`                |
//! | update (bulk)   | `PUT    /api/events-list {"events": [...]}` |
//! | delete          | `DELETE /api/events/{id}`                |
//!
//! The backend is expected to apply bulk requests atomically.

use std::time::Duration;

use daybook_core::Event;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::error::{StoreError, StoreErrorCode, StoreResult};
use crate::store::{BoxFuture, EventStore};

/// Connection settings for [`HttpStore`].
#[derive(Debug, Clone)]
pub struct HttpStoreConfig {
    /// Server root, e.g. `http://localhost:3000/`.
    pub base_url: Url,
    pub timeout: Duration,
}

impl HttpStoreConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(10),
        }
    }

    /// Parses `base_url`.
    pub fn parse(base_url: &str) -> StoreResult<Self> {
        let url = Url::parse(base_url).map_err(|e| {
            StoreError::configuration(format!("invalid base URL {base_url:?}: {e}"))
                .with_store("http")
        })?;
        Ok(Self::new(url))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self, path: &str) -> StoreResult<Url> {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path).map_err(|e| {
            StoreError::configuration(format!("cannot build URL for {path}: {e}"))
                .with_store("http")
        })
    }

    /// `.../api/events`
    pub fn events_url(&self) -> StoreResult<Url> {
        self.endpoint("api/events")
    }

    /// `.../api/events/{id}`, with `id` percent-encoded.
    pub fn event_url(&self, id: &str) -> StoreResult<Url> {
        self.endpoint(&format!("api/events/{}", urlencoding::encode(id)))
    }

    /// `.../api/events-list`
    pub fn events_list_url(&self) -> StoreResult<Url> {
        self.endpoint("api/events-list")
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct EventsBody {
    events: Vec<Event>,
}

/// Event store backed by a remote REST API.
#[derive(Debug)]
pub struct HttpStore {
    config: HttpStoreConfig,
    client: reqwest::Client,
}

impl HttpStore {
    /// Creates the store and its HTTP client.
    pub fn new(config: HttpStoreConfig) -> StoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                StoreError::configuration(format!("failed to create HTTP client: {e}"))
                    .with_store("http")
                    .with_source(e)
            })?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &HttpStoreConfig {
        &self.config
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "Store request");
        self.client.request(method, url)
    }

    async fn send(&self, request: RequestBuilder) -> StoreResult<Response> {
        let response = request.send().await.map_err(|e| {
            let message = if e.is_timeout() {
                "request timeout".to_string()
            } else if e.is_connect() {
                format!("connection failed: {e}")
            } else {
                format!("request failed: {e}")
            };
            StoreError::network(message).with_store("http").with_source(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(%status, body = %body, "Store request failed");
        Err(status_error(status, &body).with_store("http"))
    }
}

/// Maps a non-success status onto a store error.
fn status_error(status: StatusCode, body: &str) -> StoreError {
    let detail = if body.is_empty() {
        format!("API error ({status})")
    } else {
        format!("API error ({status}): {body}")
    };
    match status {
        StatusCode::NOT_FOUND => StoreError::new(StoreErrorCode::NotFound, detail),
        StatusCode::TOO_MANY_REQUESTS => StoreError::rate_limited(detail),
        s if s.is_server_error() => StoreError::server(detail),
        _ => StoreError::rejected(detail),
    }
}

impl EventStore for HttpStore {
    fn name(&self) -> &str {
        "http"
    }

    fn list_events(&self) -> BoxFuture<'_, StoreResult<Vec<Event>>> {
        Box::pin(async move {
            let url = self.config.events_url()?;
            let response = self.send(self.request(Method::GET, url)).await?;
            let body = response.text().await.map_err(|e| {
                StoreError::network(format!("failed to read response: {e}")).with_store("http")
            })?;
            let parsed: EventsBody = serde_json::from_str(&body).map_err(|e| {
                StoreError::invalid_data(format!("failed to parse response: {e}"))
                    .with_store("http")
                    .with_source(e)
            })?;
            debug!(count = parsed.events.len(), "Fetched events");
            Ok(parsed.events)
        })
    }

    fn create_event(&self, event: Event) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            let url = self.config.events_url()?;
            self.send(self.request(Method::POST, url).json(&event))
                .await?;
            Ok(())
        })
    }

    fn create_events(&self, events: Vec<Event>) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            let url = self.config.events_list_url()?;
            self.send(self.request(Method::POST, url).json(&EventsBody { events }))
                .await?;
            Ok(())
        })
    }

    fn update_event<'a>(&'a self, id: &'a str, event: Event) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            let url = self.config.event_url(id)?;
            self.send(self.request(Method::PUT, url).json(&event))
                .await?;
            Ok(())
        })
    }

    fn update_events(&self, events: Vec<Event>) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            let url = self.config.events_list_url()?;
            self.send(self.request(Method::PUT, url).json(&EventsBody { events }))
                .await?;
            Ok(())
        })
    }

    fn delete_event<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            let url = self.config.event_url(id)?;
            self.send(self.request(Method::DELETE, url)).await?;
            Ok(())
        })
    }
}
