//! Trailing-edge debouncer
//!
//! ```text
//!          schedule(v)              delay elapsed, token current
//!   Idle ───────────────▶ Pending ─────────────────────────────▶ fire(v) ─▶ Idle
//!                          │  ▲
//!                          │  └── schedule(v') aborts the timer, re-arms with v'
//!                          └───── cancel() aborts the timer ──▶ Idle
//! ```
//!
//! Every schedule gets a fresh token. A timer only fires when its token is
//! still the pending one, so an aborted timer that already woke up cannot
//! run the callback.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Observable timer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Pending,
}

struct Timer {
    token: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct Slot {
    last_token: u64,
    pending: Option<Timer>,
}

/// Debounces values of type `T` into a callback
///
/// Must be used from within a Tokio runtime. Dropping the debouncer
/// cancels any pending timer.
pub struct Debouncer<T> {
    delay: Duration,
    callback: Arc<dyn Fn(T) + Send + Sync>,
    slot: Arc<Mutex<Slot>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration, callback: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            delay,
            callback: Arc::new(callback),
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `value` after the default delay, superseding any pending value
    pub fn schedule(&self, value: T) -> u64 {
        self.schedule_with(value, self.delay)
    }

    /// Schedule `value` after `delay`, superseding any pending value
    ///
    /// Returns the token of the new timer.
    pub fn schedule_with(&self, value: T, delay: Duration) -> u64 {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = slot.pending.take() {
            previous.handle.abort();
        }

        slot.last_token += 1;
        let token = slot.last_token;
        let shared = Arc::clone(&self.slot);
        let callback = Arc::clone(&self.callback);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut slot = shared.lock().unwrap_or_else(|e| e.into_inner());
                match &slot.pending {
                    Some(timer) if timer.token == token => slot.pending = None,
                    _ => return,
                }
            }
            callback(value);
        });

        slot.pending = Some(Timer { token, handle });
        token
    }

    /// Abort the pending timer, if any
    ///
    /// Returns `true` when a timer was pending.
    pub fn cancel(&self) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        match slot.pending.take() {
            Some(timer) => {
                timer.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Token handed out by the most recent `schedule`, 0 before the first
    pub fn last_scheduled_token(&self) -> u64 {
        self.slot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last_token
    }

    pub fn state(&self) -> DebounceState {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if slot.pending.is_some() {
            DebounceState::Pending
        } else {
            DebounceState::Idle
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(timer) = slot.pending.take() {
            timer.handle.abort();
        }
    }
}
