//! Search controller: query parsing, debounce, and supersession.
//!
//! The controller owns the current-query state. Every accepted submission
//! gets a monotonically increasing sequence number at issuance time; a
//! store response (success or failure) is applied to the view only while
//! its number is still the current one. A slow early search can therefore
//! never overwrite a fast later one, regardless of arrival order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::debounce::Debouncer;
use crate::list::ListModel;
use crate::models::Query;
use crate::store::Store;
use crate::view::ListView;

#[derive(Clone)]
pub struct SearchController {
    inner: Arc<SearchInner>,
}

struct SearchInner {
    store: Arc<dyn Store>,
    model: Arc<ListModel>,
    view: Arc<dyn ListView>,
    debouncer: Debouncer,
    delay: Duration,
    seq: AtomicU64,
    last_issued: Mutex<Option<Query>>,
}

impl SearchController {
    pub fn new(
        store: Arc<dyn Store>,
        model: Arc<ListModel>,
        view: Arc<dyn ListView>,
        delay: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(SearchInner {
                store,
                model,
                view,
                debouncer: Debouncer::new(),
                delay,
                seq: AtomicU64::new(0),
                last_issued: Mutex::new(None),
            }),
        }
    }

    /// Submit raw search input.
    ///
    /// A query whose parsed tag sequence equals the last issued one is a
    /// no-op. Otherwise the visible list is cleared eagerly and the search
    /// is issued: through the debouncer when `immediate` is false, inline
    /// (cancelling any pending debounced issuance) when true.
    ///
    /// Transport failures are surfaced through the view, not returned;
    /// the last-issued query is retained either way, so repeating a
    /// failed search verbatim stays suppressed.
    pub async fn submit(&self, raw_text: &str, immediate: bool) {
        let query = Query::parse(raw_text);

        {
            let mut last = self.inner.last_issued.lock().unwrap();
            if let Some(previous) = last.as_ref() {
                if previous.tags == query.tags {
                    tracing::debug!(tags = ?query.tags, "identical query suppressed");
                    return;
                }
            }
            *last = Some(query.clone());
        }

        let seq = self.inner.seq.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(seq, tags = ?query.tags, "search accepted");

        // Eager clear: stale rows must not linger under the new query.
        self.inner.model.clear();
        self.inner.view.clear();

        if immediate {
            self.inner.debouncer.cancel_pending();
            self.issue(seq, query.tags).await;
        } else {
            let controller = self.clone();
            self.inner.debouncer.schedule(self.inner.delay, async move {
                controller.issue(seq, query.tags).await;
            });
        }
    }

    /// The query whose results currently own the view, if any.
    pub fn last_issued(&self) -> Option<Query> {
        self.inner.last_issued.lock().unwrap().clone()
    }

    async fn issue(&self, seq: u64, tags: Vec<String>) {
        let result = self.inner.store.search(&tags).await;

        if !self.is_current(seq) {
            tracing::debug!(seq, "superseded result discarded");
            return;
        }

        match result {
            Ok(items) => {
                tracing::debug!(seq, count = items.len(), "search applied");
                self.inner.model.replace(items.clone());
                self.inner.view.replace_all(&items);
            }
            Err(err) => {
                tracing::warn!(seq, error = %err, "search failed");
                self.inner.model.clear();
                self.inner.view.clear();
                self.inner.view.notify_error(&err.to_string());
            }
        }
    }

    fn is_current(&self, seq: u64) -> bool {
        self.inner.seq.load(Ordering::SeqCst) == seq
    }
}
