//! Shared projection of the visible item list.
//!
//! Holds the client-side copy of whatever the last authoritative search
//! returned, patched in place by optimistic item mutations. The search
//! controller replaces it wholesale; the item controller patches single
//! entries. The mutex guards memory, not ordering: ordering correctness
//! comes from the search controller's sequence-number discard rule.

use std::sync::Mutex;

use crate::models::Item;

#[derive(Default)]
pub struct ListModel {
    items: Mutex<Vec<Item>>,
}

impl ListModel {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    pub fn replace(&self, items: Vec<Item>) {
        *self.items.lock().unwrap() = items;
    }

    pub fn clear(&self) {
        self.items.lock().unwrap().clear();
    }

    pub fn prepend(&self, item: Item) {
        self.items.lock().unwrap().insert(0, item);
    }

    /// Remove the first entry with `key`, returning its index and the
    /// removed item so a failed delete can restore it in place.
    pub fn remove(&self, key: &str) -> Option<(usize, Item)> {
        let mut items = self.items.lock().unwrap();
        let index = items.iter().position(|item| item.key == key)?;
        Some((index, items.remove(index)))
    }

    pub fn insert(&self, index: usize, item: Item) {
        let mut items = self.items.lock().unwrap();
        let index = index.min(items.len());
        items.insert(index, item);
    }

    pub fn get(&self, key: &str) -> Option<Item> {
        self.items
            .lock()
            .unwrap()
            .iter()
            .find(|item| item.key == key)
            .cloned()
    }

    /// Append `tag` to the item's tag set. Returns the updated item, or
    /// `None` when the key is absent.
    pub fn push_tag(&self, key: &str, tag: &str) -> Option<Item> {
        let mut items = self.items.lock().unwrap();
        let item = items.iter_mut().find(|item| item.key == key)?;
        item.tags.push(tag.to_string());
        Some(item.clone())
    }

    /// Remove `tag` from the item, returning its former position and the
    /// updated item so a rollback can reinsert it where it was.
    pub fn remove_tag(&self, key: &str, tag: &str) -> Option<(usize, Item)> {
        let mut items = self.items.lock().unwrap();
        let item = items.iter_mut().find(|item| item.key == key)?;
        let index = item.tags.iter().position(|t| t == tag)?;
        item.tags.remove(index);
        Some((index, item.clone()))
    }

    /// Reinsert `tag` at `index` in the item's tag set.
    pub fn insert_tag(&self, key: &str, index: usize, tag: &str) -> Option<Item> {
        let mut items = self.items.lock().unwrap();
        let item = items.iter_mut().find(|item| item.key == key)?;
        let index = index.min(item.tags.len());
        item.tags.insert(index, tag.to_string());
        Some(item.clone())
    }

    pub fn snapshot(&self) -> Vec<Item> {
        self.items.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepend_puts_item_at_head() {
        let model = ListModel::new();
        model.replace(vec![Item::new("k1", "v1")]);
        model.prepend(Item::new("k0", "v0"));
        assert_eq!(model.snapshot()[0].key, "k0");
    }

    #[test]
    fn remove_reports_position() {
        let model = ListModel::new();
        model.replace(vec![Item::new("k1", "v1"), Item::new("k2", "v2")]);
        let (index, item) = model.remove("k2").unwrap();
        assert_eq!(index, 1);
        assert_eq!(item.key, "k2");
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn tag_rollback_restores_order() {
        let model = ListModel::new();
        let mut item = Item::new("k1", "v1");
        item.tags = vec!["a".into(), "b".into(), "c".into()];
        model.replace(vec![item]);

        let (index, _) = model.remove_tag("k1", "b").unwrap();
        assert_eq!(model.get("k1").unwrap().tags, vec!["a", "c"]);

        model.insert_tag("k1", index, "b");
        assert_eq!(model.get("k1").unwrap().tags, vec!["a", "b", "c"]);
    }

    #[test]
    fn remove_tag_missing_is_none() {
        let model = ListModel::new();
        model.replace(vec![Item::new("k1", "v1")]);
        assert!(model.remove_tag("k1", "ghost").is_none());
        assert!(model.remove_tag("ghost", "a").is_none());
    }
}
