//! Trailing-edge debounce of query input
//!
//! The debouncer holds at most one pending commit. Time is passed in by the
//! caller, so the owner decides how to wait for [`QueryDebouncer::deadline`].

use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct PendingCommit {
    text: String,
    due: Instant,
}

/// Coalesces rapid input into a single commit after a quiet period
#[derive(Debug, Clone)]
pub struct QueryDebouncer {
    delay: Duration,
    pending: Option<PendingCommit>,
}

impl QueryDebouncer {
    /// Create a debouncer with the given quiet period
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Quiet period
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a keystroke.
    ///
    /// Replaces any pending commit. Empty text has nothing to wait for and is
    /// returned as an immediate commit.
    pub fn on_input(&mut self, text: &str, now: Instant) -> Option<String> {
        if text.is_empty() {
            self.pending = None;
            return Some(String::new());
        }

        self.pending = Some(PendingCommit {
            text: text.to_string(),
            due: now + self.delay,
        });
        None
    }

    /// Instant at which the pending commit fires
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.due)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending commit if its quiet period has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some(pending) if now >= pending.due => self.pending.take().map(|p| p.text),
            _ => None,
        }
    }

    /// Drop the pending commit
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
