//! Path-scoped cache of rendered views
//!
//! Read handlers cache their rendered output under the view's path and a
//! per-request key (the query string). Mutations call
//! [`ViewCache::revalidate_path`], which drops every entry under the path so
//! the next read recomputes it, and broadcasts a [`Revalidated`] event.
//!
//! ```text
//! create/update/delete ──▶ revalidate_path("/dashboard/invoices")
//!                              ├──▶ entries under the path dropped, generation bumped
//!                              └──▶ broadcast channel ──▶ subscribers (live clients)
//! ```
//!
//! Each path holds at most `view_capacity` views; once full, the oldest view
//! is evicted to make room.
//!
//! Each path carries a generation counter. A reader captures the generation
//! before it hits the store and hands it back to [`ViewCache::put`]; if a
//! revalidation happened in between, the stale value is discarded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

/// Notification that a cached view became stale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revalidated {
    pub path: String,
    pub at: DateTime<Utc>,
}

/// Views kept per path unless configured otherwise
pub const DEFAULT_VIEW_CAPACITY: usize = 256;

#[derive(Debug, Default)]
struct PathEntries {
    generation: u64,
    views: HashMap<String, serde_json::Value>,
    // Insertion order, oldest first
    order: VecDeque<String>,
}

/// Cache of rendered views keyed by path, cheap to clone
#[derive(Debug, Clone)]
pub struct ViewCache {
    paths: Arc<RwLock<HashMap<String, PathEntries>>>,
    sender: broadcast::Sender<Revalidated>,
    view_capacity: usize,
}

impl ViewCache {
    /// Create a cache whose revalidation channel buffers `capacity` events
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            paths: Arc::new(RwLock::new(HashMap::new())),
            sender,
            view_capacity: DEFAULT_VIEW_CAPACITY,
        }
    }

    /// Keep at most `capacity` views per path; zero disables caching
    pub fn with_view_capacity(mut self, capacity: usize) -> Self {
        self.view_capacity = capacity;
        self
    }

    pub fn view_capacity(&self) -> usize {
        self.view_capacity
    }

    /// Number of views cached under `path`
    pub fn len(&self, path: &str) -> usize {
        let paths = self.paths.read().unwrap_or_else(|e| e.into_inner());
        paths.get(path).map(|entries| entries.views.len()).unwrap_or(0)
    }

    /// Look up a cached view
    pub fn get(&self, path: &str, key: &str) -> Option<serde_json::Value> {
        let paths = self.paths.read().unwrap_or_else(|e| e.into_inner());
        paths.get(path).and_then(|entries| entries.views.get(key).cloned())
    }

    /// Current generation of `path`
    pub fn generation(&self, path: &str) -> u64 {
        let paths = self.paths.read().unwrap_or_else(|e| e.into_inner());
        paths.get(path).map(|entries| entries.generation).unwrap_or(0)
    }

    /// Store a rendered view computed at `generation`
    ///
    /// Returns `false` (and stores nothing) when the path was revalidated
    /// after `generation` was read, or when caching is disabled.
    pub fn put(&self, path: &str, key: &str, value: serde_json::Value, generation: u64) -> bool {
        if self.view_capacity == 0 {
            return false;
        }

        let mut paths = self.paths.write().unwrap_or_else(|e| e.into_inner());
        let entries = paths.entry(path.to_string()).or_default();
        if entries.generation != generation {
            tracing::debug!(path, key, "discarding view rendered before revalidation");
            return false;
        }

        if entries.views.insert(key.to_string(), value).is_none() {
            entries.order.push_back(key.to_string());
            while entries.order.len() > self.view_capacity {
                if let Some(oldest) = entries.order.pop_front() {
                    entries.views.remove(&oldest);
                    tracing::trace!(path, key = %oldest, "evicted cached view");
                }
            }
        }
        true
    }

    /// Mark every cached view under `path` as stale
    pub fn revalidate_path(&self, path: &str) {
        let dropped = {
            let mut paths = self.paths.write().unwrap_or_else(|e| e.into_inner());
            let entries = paths.entry(path.to_string()).or_default();
            entries.generation += 1;
            let dropped = entries.views.len();
            entries.views.clear();
            entries.order.clear();
            dropped
        };

        tracing::debug!(path, dropped, "revalidated view path");

        // No subscribers is fine: the event is simply dropped.
        let _ = self.sender.send(Revalidated {
            path: path.to_string(),
            at: Utc::now(),
        });
    }

    /// Subscribe to revalidation events
    pub fn subscribe(&self) -> broadcast::Receiver<Revalidated> {
        self.sender.subscribe()
    }

    /// Number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ViewCache {
    fn default() -> Self {
        Self::new(64)
    }
}
