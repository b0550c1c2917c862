//! Remote store abstraction.
//!
//! The [`Store`] trait defines the four remote operations the
//! synchronization engine drives (plus delete), enabling pluggable
//! backends: the HTTP client used in production and an in-memory
//! implementation for tests and headless embedding.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.
//!
//! # Operations
//!
//! | Method | REST mapping |
//! |--------|--------------|
//! | [`search`](Store::search) | `GET /api/keys?tags=t1,t2` |
//! | [`create`](Store::create) | `POST /api/keys` |
//! | [`add_tag`](Store::add_tag) | `POST /api/tags` |
//! | [`remove_tag`](Store::remove_tag) | `DELETE /api/tags/{tag}/{key}` |
//! | [`delete`](Store::delete) | `DELETE /api/keys/{key}` |

pub mod http;
pub mod memory;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::SyncError;
use crate::models::Item;

pub use http::HttpStore;
pub use memory::InMemoryStore;

/// `POST /api/keys` request body.
#[derive(Debug, Serialize)]
pub struct CreateRequest<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

/// `POST /api/tags` request body.
#[derive(Debug, Serialize)]
pub struct TagRequest<'a> {
    pub key: &'a str,
    pub tag: &'a str,
}

/// Abstract tagged key-value store.
///
/// All operations are async (via `async-trait`). Transport concerns such
/// as timeouts live entirely inside the implementation; callers see a
/// uniform [`SyncError`].
#[async_trait]
pub trait Store: Send + Sync {
    /// Return items matching all `tags`; an empty slice returns every item.
    async fn search(&self, tags: &[String]) -> Result<Vec<Item>, SyncError>;

    /// Create a new item. Duplicate keys are a store-level error.
    async fn create(&self, key: &str, value: &str) -> Result<Item, SyncError>;

    /// Attach `tag` to the item with `key`.
    async fn add_tag(&self, key: &str, tag: &str) -> Result<(), SyncError>;

    /// Detach `tag` from the item with `key`.
    async fn remove_tag(&self, key: &str, tag: &str) -> Result<(), SyncError>;

    /// Delete the item with `key`.
    async fn delete(&self, key: &str) -> Result<(), SyncError>;
}
