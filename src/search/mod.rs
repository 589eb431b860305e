//! Live search box
//!
//! Keystrokes are debounced; once the user pauses, the query string is
//! rewritten (`page=1`, `query` set or removed) and the new location is
//! handed to a [`Navigator`] as a replace navigation.

pub mod debounce;
pub mod params;

pub use debounce::{DebounceState, Debouncer};
pub use params::{query_param, rewrite_query};

use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Performs client-side navigation
pub trait Navigator: Send + Sync + 'static {
    /// Replace the current history entry with `href`
    fn replace(&self, href: &str);
}

impl<N: Navigator + ?Sized> Navigator for Arc<N> {
    fn replace(&self, href: &str) {
        (**self).replace(href)
    }
}

/// Forwards every navigation over a channel
impl Navigator for tokio::sync::mpsc::UnboundedSender<String> {
    fn replace(&self, href: &str) {
        if self.send(href.to_string()).is_err() {
            tracing::debug!(href, "navigation receiver dropped");
        }
    }
}

/// Navigator that records every href it is asked to replace
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    history: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// All hrefs replaced so far, oldest first
    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn last(&self) -> Option<String> {
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn replace(&self, href: &str) {
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(href.to_string());
    }
}

/// Search input bound to the current location
pub struct SearchBox<N: Navigator> {
    pathname: String,
    params: Arc<Mutex<String>>,
    navigator: Arc<N>,
    debouncer: Debouncer<String>,
}

impl<N: Navigator> SearchBox<N> {
    /// Bind to `pathname?query_string`, navigating through `navigator`
    pub fn new(
        pathname: impl Into<String>,
        query_string: &str,
        navigator: N,
        delay: Duration,
    ) -> Self {
        let pathname = pathname.into();
        let params = Arc::new(Mutex::new(
            query_string.trim_start_matches('?').to_string(),
        ));
        let navigator = Arc::new(navigator);

        let debouncer = {
            let pathname = pathname.clone();
            let params = Arc::clone(&params);
            let navigator = Arc::clone(&navigator);
            Debouncer::new(delay, move |value: String| {
                let href = {
                    let mut current = params.lock().unwrap_or_else(|e| e.into_inner());
                    let next = rewrite_query(&current, &value);
                    let href = format!("{}?{}", pathname, next);
                    *current = next;
                    href
                };
                tracing::debug!(%href, "search navigation");
                navigator.replace(&href);
            })
        };

        Self {
            pathname,
            params,
            navigator,
            debouncer,
        }
    }

    /// Initial text of the input: the current `query` parameter
    pub fn default_value(&self) -> Option<String> {
        query_param(&self.query_string(), "query")
    }

    /// Handle one keystroke's worth of input
    pub fn on_input(&self, value: &str) {
        self.debouncer.schedule(value.to_string());
    }

    /// Sync with a navigation that did not come from this box
    ///
    /// A pending keystroke is dropped so it cannot overwrite the new location.
    pub fn set_location(&self, query_string: &str) {
        self.debouncer.cancel();
        *self.params.lock().unwrap_or_else(|e| e.into_inner()) =
            query_string.trim_start_matches('?').to_string();
    }

    pub fn pathname(&self) -> &str {
        &self.pathname
    }

    /// Current query string, without the leading `?`
    pub fn query_string(&self) -> String {
        self.params
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn debouncer(&self) -> &Debouncer<String> {
        &self.debouncer
    }
}
