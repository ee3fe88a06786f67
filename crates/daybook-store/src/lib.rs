//! Persistence backends for daybook.
//!
//! - [`EventStore`] is the object-safe trait the scheduler writes through
//! - [`MemoryStore`] keeps rows in process, with fault injection for tests
//! - [`FileStore`] keeps a JSON document on disk
//! - [`HttpStore`] talks to a REST backend (feature `http`, on by default)
//!
//! Bulk writes (`create_events`, `update_events`) are all-or-nothing in
//! every bundled store.

pub mod error;
pub mod file;
#[cfg(feature = "http")]
pub mod http;
pub mod memory;
mod rows;
pub mod store;

pub use error::{StoreError, StoreErrorCode, StoreResult};
pub use file::FileStore;
#[cfg(feature = "http")]
pub use http::{HttpStore, HttpStoreConfig};
pub use memory::MemoryStore;
pub use store::{BoxFuture, EventStore, StoreOperation};
