//! Item controller: optimistic per-item mutation with rollback.
//!
//! Every operation applies its local state change first, renders it, then
//! issues the remote call. When the call fails, create and tag-add always
//! restore the previous state; tag-remove and delete restore it only when
//! the corresponding `[rollback]` switch is set (off by default, matching
//! the historical behavior).
//!
//! Validation failures are rejected before any local or remote effect.

use std::sync::Arc;

use crate::config::RollbackConfig;
use crate::error::SyncError;
use crate::list::ListModel;
use crate::models::{validate_key, validate_tag, Item};
use crate::store::Store;
use crate::view::ListView;

/// Confirmation seam for destructive operations.
///
/// Deletes must pass through an explicit confirmation step before any
/// local or remote mutation happens. The CLI wires this to an interactive
/// prompt; automation and tests use [`AutoConfirm`].
pub trait ConfirmAction: Send + Sync {
    fn confirm(&self, key: &str) -> bool;
}

/// Confirms everything. For non-interactive use.
pub struct AutoConfirm;

impl ConfirmAction for AutoConfirm {
    fn confirm(&self, _key: &str) -> bool {
        true
    }
}

pub struct ItemController {
    store: Arc<dyn Store>,
    model: Arc<ListModel>,
    view: Arc<dyn ListView>,
    confirm: Arc<dyn ConfirmAction>,
    rollback: RollbackConfig,
}

impl ItemController {
    pub fn new(
        store: Arc<dyn Store>,
        model: Arc<ListModel>,
        view: Arc<dyn ListView>,
        confirm: Arc<dyn ConfirmAction>,
        rollback: RollbackConfig,
    ) -> Self {
        Self {
            store,
            model,
            view,
            confirm,
            rollback,
        }
    }

    /// Create a new item and prepend its projection to the visible list.
    ///
    /// Key and value are trimmed and validated before any network call.
    /// On remote failure the prepended projection is removed again, so the
    /// list ends up exactly as it was.
    pub async fn create(&self, key: &str, value: &str) -> Result<Item, SyncError> {
        let key = key.trim();
        let value = value.trim();
        validate_key(key)?;
        if value.is_empty() {
            return Err(SyncError::validation("value must not be empty"));
        }

        let item = Item::new(key, value);
        self.model.prepend(item.clone());
        self.view.prepend(&item);

        match self.store.create(key, value).await {
            Ok(created) => {
                tracing::debug!(key, "item created");
                Ok(created)
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "create failed, removing projection");
                self.model.remove(key);
                self.view.remove_item(key);
                self.view.notify_error(&err.to_string());
                Err(err)
            }
        }
    }

    /// Attach a tag to an item, optimistically.
    ///
    /// Empty, malformed, and duplicate tags are rejected locally with no
    /// network call. On remote failure the tag is removed again so the
    /// badge disappears.
    pub async fn add_tag(&self, key: &str, tag: &str) -> Result<(), SyncError> {
        let tag = tag.trim();
        validate_tag(tag)?;

        let item = self
            .model
            .get(key)
            .ok_or_else(|| SyncError::validation(format!("no visible item with key `{key}`")))?;
        if item.tags.iter().any(|t| t == tag) {
            return Err(SyncError::validation(format!(
                "item `{key}` already has tag `{tag}`"
            )));
        }

        if let Some(updated) = self.model.push_tag(key, tag) {
            self.view.update_item(&updated);
        }

        match self.store.add_tag(key, tag).await {
            Ok(()) => {
                tracing::debug!(key, tag, "tag added");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(key, tag, error = %err, "tag add failed, rolling back");
                if let Some((_, updated)) = self.model.remove_tag(key, tag) {
                    self.view.update_item(&updated);
                }
                self.view.notify_error(&err.to_string());
                Err(err)
            }
        }
    }

    /// Detach a tag from an item, optimistically.
    ///
    /// On remote failure the tag is restored to its former position only
    /// when `rollback.remove_tag` is set; the failure is surfaced either
    /// way.
    pub async fn remove_tag(&self, key: &str, tag: &str) -> Result<(), SyncError> {
        let (index, updated) = self.model.remove_tag(key, tag).ok_or_else(|| {
            SyncError::validation(format!("item `{key}` has no tag `{tag}`"))
        })?;
        self.view.update_item(&updated);

        match self.store.remove_tag(key, tag).await {
            Ok(()) => {
                tracing::debug!(key, tag, "tag removed");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    key,
                    tag,
                    rollback = self.rollback.remove_tag,
                    error = %err,
                    "tag remove failed"
                );
                if self.rollback.remove_tag {
                    if let Some(updated) = self.model.insert_tag(key, index, tag) {
                        self.view.update_item(&updated);
                    }
                }
                self.view.notify_error(&err.to_string());
                Err(err)
            }
        }
    }

    /// Delete an item after explicit confirmation.
    ///
    /// Returns `Ok(false)` when the confirmation step declines; nothing
    /// has been touched in that case. On remote failure the projection is
    /// restored only when `rollback.delete` is set.
    pub async fn delete(&self, key: &str) -> Result<bool, SyncError> {
        if !self.confirm.confirm(key) {
            tracing::debug!(key, "delete not confirmed");
            return Ok(false);
        }

        let (index, item) = self
            .model
            .remove(key)
            .ok_or_else(|| SyncError::validation(format!("no visible item with key `{key}`")))?;
        self.view.remove_item(key);

        match self.store.delete(key).await {
            Ok(()) => {
                tracing::debug!(key, "item deleted");
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(
                    key,
                    rollback = self.rollback.delete,
                    error = %err,
                    "delete failed"
                );
                if self.rollback.delete {
                    self.model.insert(index, item);
                    self.view.replace_all(&self.model.snapshot());
                }
                self.view.notify_error(&err.to_string());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use crate::view::{RecordingView, ViewEvent};

    struct DenyConfirm;

    impl ConfirmAction for DenyConfirm {
        fn confirm(&self, _key: &str) -> bool {
            false
        }
    }

    fn tagged(key: &str, tags: &[&str]) -> Item {
        Item {
            key: key.to_string(),
            value: format!("value-{key}"),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    struct Fixture {
        store: Arc<InMemoryStore>,
        model: Arc<ListModel>,
        view: Arc<RecordingView>,
        controller: ItemController,
    }

    fn fixture(items: Vec<Item>, rollback: RollbackConfig) -> Fixture {
        fixture_with_confirm(items, rollback, Arc::new(AutoConfirm))
    }

    fn fixture_with_confirm(
        items: Vec<Item>,
        rollback: RollbackConfig,
        confirm: Arc<dyn ConfirmAction>,
    ) -> Fixture {
        let store = Arc::new(InMemoryStore::with_items(items.clone()));
        let model = Arc::new(ListModel::new());
        model.replace(items);
        let view = Arc::new(RecordingView::new());
        let controller = ItemController::new(
            store.clone(),
            model.clone(),
            view.clone(),
            confirm,
            rollback,
        );
        Fixture {
            store,
            model,
            view,
            controller,
        }
    }

    #[tokio::test]
    async fn create_rejects_blank_input_without_network_call() {
        let f = fixture(Vec::new(), RollbackConfig::default());

        assert!(f.controller.create("  ", "v").await.unwrap_err().is_validation());
        assert!(f.controller.create("k", "  ").await.unwrap_err().is_validation());

        assert!(f.model.is_empty());
        assert!(f.view.events().is_empty());
        assert!(f.store.search(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_prepends_projection_with_no_tags() {
        let f = fixture(vec![tagged("k1", &[])], RollbackConfig::default());

        f.controller.create("k2", "v2").await.unwrap();

        let snapshot = f.model.snapshot();
        assert_eq!(snapshot[0].key, "k2");
        assert!(snapshot[0].tags.is_empty());
        assert_eq!(f.store.search(&[]).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failed_create_leaves_list_untouched() {
        let f = fixture(vec![tagged("k1", &["a"])], RollbackConfig::default());
        let before = f.model.snapshot();

        // Duplicate key: the store rejects it, the projection rolls back.
        let err = f.controller.create("k1", "other").await.unwrap_err();
        assert!(!err.is_validation());

        assert_eq!(f.model.snapshot(), before);
        assert_eq!(f.view.rendered().unwrap_or_default(), Vec::<Item>::new());
        assert!(!f.view.errors().is_empty());
    }

    #[tokio::test]
    async fn duplicate_tag_add_is_rejected_locally() {
        let f = fixture(vec![tagged("k1", &["urgent"])], RollbackConfig::default());

        let err = f.controller.add_tag("k1", "urgent").await.unwrap_err();
        assert!(err.is_validation());

        assert_eq!(f.model.get("k1").unwrap().tags, vec!["urgent"]);
        assert!(f.view.events().is_empty());
    }

    #[tokio::test]
    async fn malformed_tag_is_rejected_locally() {
        let f = fixture(vec![tagged("k1", &[])], RollbackConfig::default());

        assert!(f.controller.add_tag("k1", "").await.unwrap_err().is_validation());
        assert!(f
            .controller
            .add_tag("k1", "Not Valid")
            .await
            .unwrap_err()
            .is_validation());
        assert!(f.view.events().is_empty());
    }

    #[tokio::test]
    async fn add_tag_updates_model_store_and_view() {
        let f = fixture(vec![tagged("k1", &["a"])], RollbackConfig::default());

        f.controller.add_tag("k1", "b").await.unwrap();

        assert_eq!(f.model.get("k1").unwrap().tags, vec!["a", "b"]);
        let remote = f.store.search(&[]).await.unwrap();
        assert_eq!(remote[0].tags, vec!["a", "b"]);
        assert!(matches!(f.view.events()[0], ViewEvent::Updated(_)));
    }

    #[tokio::test]
    async fn failed_add_tag_restores_previous_tag_set() {
        let f = fixture(vec![tagged("k1", &["a"])], RollbackConfig::default());
        f.store.fail_next("store exploded");

        let err = f.controller.add_tag("k1", "b").await.unwrap_err();
        assert!(!err.is_validation());

        assert_eq!(f.model.get("k1").unwrap().tags, vec!["a"]);

        // The badge appeared, then disappeared again.
        let updates: Vec<_> = f
            .view
            .events()
            .into_iter()
            .filter_map(|event| match event {
                ViewEvent::Updated(item) => Some(item.tags),
                _ => None,
            })
            .collect();
        assert_eq!(updates, vec![vec!["a".to_string(), "b".to_string()], vec!["a".to_string()]]);
        assert!(!f.view.errors().is_empty());
    }

    #[tokio::test]
    async fn remove_tag_is_not_rolled_back_by_default() {
        let f = fixture(vec![tagged("k1", &["a", "b"])], RollbackConfig::default());
        f.store.fail_next("store exploded");

        let err = f.controller.remove_tag("k1", "a").await.unwrap_err();
        assert!(!err.is_validation());

        // Local removal sticks; only the failure is surfaced.
        assert_eq!(f.model.get("k1").unwrap().tags, vec!["b"]);
        assert!(!f.view.errors().is_empty());
    }

    #[tokio::test]
    async fn remove_tag_rollback_restores_position_when_enabled() {
        let rollback = RollbackConfig {
            remove_tag: true,
            delete: false,
        };
        let f = fixture(vec![tagged("k1", &["a", "b", "c"])], rollback);
        f.store.fail_next("store exploded");

        f.controller.remove_tag("k1", "b").await.unwrap_err();

        assert_eq!(f.model.get("k1").unwrap().tags, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn removing_absent_tag_is_a_validation_error() {
        let f = fixture(vec![tagged("k1", &["a"])], RollbackConfig::default());

        let err = f.controller.remove_tag("k1", "ghost").await.unwrap_err();
        assert!(err.is_validation());
        assert!(f.view.events().is_empty());
    }

    #[tokio::test]
    async fn unconfirmed_delete_touches_nothing() {
        let f = fixture_with_confirm(
            vec![tagged("k1", &[])],
            RollbackConfig::default(),
            Arc::new(DenyConfirm),
        );

        let deleted = f.controller.delete("k1").await.unwrap();
        assert!(!deleted);

        assert_eq!(f.model.len(), 1);
        assert_eq!(f.store.search(&[]).await.unwrap().len(), 1);
        assert!(f.view.events().is_empty());
    }

    #[tokio::test]
    async fn confirmed_delete_removes_item() {
        let f = fixture(vec![tagged("k1", &[]), tagged("k2", &[])], RollbackConfig::default());

        let deleted = f.controller.delete("k1").await.unwrap();
        assert!(deleted);

        assert_eq!(f.model.len(), 1);
        assert_eq!(f.store.search(&[]).await.unwrap().len(), 1);
        assert_eq!(f.view.events(), vec![ViewEvent::Removed("k1".to_string())]);
    }

    #[tokio::test]
    async fn failed_delete_is_not_restored_by_default() {
        let f = fixture(vec![tagged("k1", &[])], RollbackConfig::default());
        f.store.fail_next("store exploded");

        f.controller.delete("k1").await.unwrap_err();

        assert!(f.model.is_empty());
        assert!(!f.view.errors().is_empty());
    }

    #[tokio::test]
    async fn failed_delete_restores_item_when_enabled() {
        let rollback = RollbackConfig {
            remove_tag: false,
            delete: true,
        };
        let f = fixture(
            vec![tagged("k1", &[]), tagged("k2", &[])],
            rollback,
        );
        f.store.fail_next("store exploded");

        f.controller.delete("k2").await.unwrap_err();

        let keys: Vec<String> = f.model.snapshot().into_iter().map(|i| i.key).collect();
        assert_eq!(keys, vec!["k1", "k2"]);
    }
}
