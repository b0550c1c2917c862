//! Render sink abstraction.
//!
//! The engine never touches a concrete UI toolkit. Everything it needs
//! from the presentation layer is expressed by [`ListView`]: full list
//! replacement by the search controller, single-item patches by the item
//! controller, and recoverable-error notifications. Implementations
//! decide what "render" means (console lines, DOM nodes, nothing).

use std::sync::Mutex;

use crate::models::Item;

/// Sink for list updates and user-visible notifications.
///
/// Calls arrive from whichever task completed a store round-trip, so
/// implementations must be `Send + Sync`.
pub trait ListView: Send + Sync {
    /// Replace the entire visible list.
    fn replace_all(&self, items: &[Item]);

    /// Insert a new item at the head of the list.
    fn prepend(&self, item: &Item);

    /// Re-render a single item in place (tag set changed).
    fn update_item(&self, item: &Item);

    /// Remove a single item from the list.
    fn remove_item(&self, key: &str);

    /// Clear the list without new content (eager clear before a search,
    /// or a failed search).
    fn clear(&self);

    /// Surface a recoverable error to the user.
    fn notify_error(&self, message: &str);
}

/// What a [`RecordingView`] saw, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    ReplacedAll(Vec<Item>),
    Prepended(Item),
    Updated(Item),
    Removed(String),
    Cleared,
    Error(String),
}

/// [`ListView`] that records every call, for tests and headless use.
#[derive(Default)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }

    /// The list content as of the last full replacement or clear, with
    /// subsequent single-item patches applied. `None` before any render.
    pub fn rendered(&self) -> Option<Vec<Item>> {
        let events = self.events.lock().unwrap();
        let mut current: Option<Vec<Item>> = None;
        for event in events.iter() {
            match event {
                ViewEvent::ReplacedAll(items) => current = Some(items.clone()),
                ViewEvent::Cleared => current = Some(Vec::new()),
                ViewEvent::Prepended(item) => {
                    current.get_or_insert_with(Vec::new).insert(0, item.clone());
                }
                ViewEvent::Updated(item) => {
                    if let Some(list) = current.as_mut() {
                        if let Some(slot) = list.iter_mut().find(|i| i.key == item.key) {
                            *slot = item.clone();
                        }
                    }
                }
                ViewEvent::Removed(key) => {
                    if let Some(list) = current.as_mut() {
                        if let Some(index) = list.iter().position(|i| &i.key == key) {
                            list.remove(index);
                        }
                    }
                }
                ViewEvent::Error(_) => {}
            }
        }
        current
    }

    pub fn errors(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                ViewEvent::Error(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: ViewEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl ListView for RecordingView {
    fn replace_all(&self, items: &[Item]) {
        self.record(ViewEvent::ReplacedAll(items.to_vec()));
    }

    fn prepend(&self, item: &Item) {
        self.record(ViewEvent::Prepended(item.clone()));
    }

    fn update_item(&self, item: &Item) {
        self.record(ViewEvent::Updated(item.clone()));
    }

    fn remove_item(&self, key: &str) {
        self.record(ViewEvent::Removed(key.to_string()));
    }

    fn clear(&self) {
        self.record(ViewEvent::Cleared);
    }

    fn notify_error(&self, message: &str) {
        self.record(ViewEvent::Error(message.to_string()));
    }
}
