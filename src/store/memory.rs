//! In-memory [`Store`] implementation for tests and headless embedding.
//!
//! Uses a `Vec` behind `std::sync::RwLock` for thread safety. Filtering is
//! a linear scan matching items that carry all requested tags, the same
//! contract the HTTP store exposes. A one-shot failure can be injected to
//! exercise rollback paths.

use std::sync::{Mutex, RwLock};

use async_trait::async_trait;

use crate::error::SyncError;
use crate::models::Item;

use super::Store;

/// In-memory tagged key-value store.
pub struct InMemoryStore {
    items: RwLock<Vec<Item>>,
    fail_next: Mutex<Option<String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
            fail_next: Mutex::new(None),
        }
    }

    /// Seed the store with existing items.
    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items: RwLock::new(items),
            fail_next: Mutex::new(None),
        }
    }

    /// Make the next operation fail with a transport error carrying
    /// `message`. Consumed by exactly one call.
    pub fn fail_next(&self, message: impl Into<String>) {
        *self.fail_next.lock().unwrap() = Some(message.into());
    }

    fn take_injected_failure(&self) -> Result<(), SyncError> {
        match self.fail_next.lock().unwrap().take() {
            Some(message) => Err(SyncError::transport(Some(500), message)),
            None => Ok(()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn search(&self, tags: &[String]) -> Result<Vec<Item>, SyncError> {
        self.take_injected_failure()?;
        let items = self.items.read().unwrap();
        Ok(items
            .iter()
            .filter(|item| tags.iter().all(|t| item.tags.contains(t)))
            .cloned()
            .collect())
    }

    async fn create(&self, key: &str, value: &str) -> Result<Item, SyncError> {
        self.take_injected_failure()?;
        let mut items = self.items.write().unwrap();
        if items.iter().any(|item| item.key == key) {
            return Err(SyncError::transport(
                Some(500),
                format!("key `{key}` already exists"),
            ));
        }
        let item = Item::new(key, value);
        items.push(item.clone());
        Ok(item)
    }

    async fn add_tag(&self, key: &str, tag: &str) -> Result<(), SyncError> {
        self.take_injected_failure()?;
        let mut items = self.items.write().unwrap();
        let item = items
            .iter_mut()
            .find(|item| item.key == key)
            .ok_or_else(|| SyncError::transport(Some(404), format!("key `{key}` not found")))?;
        if !item.tags.iter().any(|t| t == tag) {
            item.tags.push(tag.to_string());
        }
        Ok(())
    }

    async fn remove_tag(&self, key: &str, tag: &str) -> Result<(), SyncError> {
        self.take_injected_failure()?;
        let mut items = self.items.write().unwrap();
        let item = items
            .iter_mut()
            .find(|item| item.key == key)
            .ok_or_else(|| SyncError::transport(Some(404), format!("key `{key}` not found")))?;
        item.tags.retain(|t| t != tag);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), SyncError> {
        self.take_injected_failure()?;
        let mut items = self.items.write().unwrap();
        let before = items.len();
        items.retain(|item| item.key != key);
        if items.len() == before {
            return Err(SyncError::transport(
                Some(404),
                format!("key `{key}` not found"),
            ));
        }
        Ok(())
    }
}
