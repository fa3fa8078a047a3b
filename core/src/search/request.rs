//! Sequenced dispatch of fund lookups
//!
//! Every dispatch gets a sequence number one higher than the last. Lookups run
//! as tokio tasks and report back as [`Completion`]s on the manager's channel;
//! [`SearchRequestManager::accept`] only lets the completion of the most recent
//! dispatch through, whatever order they arrive in.

use crate::error::SearchError;
use crate::fund::FundSummary;
use crate::lookup::FundLookup;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

/// One dispatched lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Sequence number of this dispatch
    pub seq: u64,
    /// Query the lookup was issued for
    pub query: String,
}

/// Result of a lookup as reported by its task
#[derive(Debug, Clone)]
pub struct Completion {
    pub seq: u64,
    pub query: String,
    pub outcome: Result<Vec<FundSummary>, SearchError>,
}

/// What a dispatch did
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Answered without a lookup (empty query)
    Immediate(Vec<FundSummary>),
    /// A lookup task was started
    Issued(SearchRequest),
}

/// Owns in-flight lookups and decides which completion is live
pub struct SearchRequestManager {
    lookup: Arc<dyn FundLookup>,
    last_seq: u64,
    latest: Option<u64>,
    in_flight: HashMap<u64, AbortHandle>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
}

impl SearchRequestManager {
    /// Create a manager issuing lookups against `lookup`
    pub fn new(lookup: Arc<dyn FundLookup>) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            lookup,
            last_seq: 0,
            latest: None,
            in_flight: HashMap::new(),
            completions_tx,
            completions_rx,
        }
    }

    /// Sequence number of the latest dispatch still allowed to land
    pub fn latest_seq(&self) -> Option<u64> {
        self.latest
    }

    /// Number of lookups started and not yet accepted or discarded
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Dispatch a lookup for `query`.
    ///
    /// Supersedes every earlier dispatch, including for an empty query, and
    /// aborts their tasks. A superseded completion that was already queued is
    /// still rejected by [`SearchRequestManager::accept`].
    /// Must be called from within a tokio runtime when `query` is not empty.
    pub fn dispatch(&mut self, query: &str) -> Dispatch {
        self.abort_in_flight();
        self.last_seq += 1;
        let seq = self.last_seq;
        self.latest = Some(seq);

        if query.is_empty() {
            debug!(seq, "Empty query, skipping lookup");
            return Dispatch::Immediate(Vec::new());
        }

        let lookup = Arc::clone(&self.lookup);
        let tx = self.completions_tx.clone();
        let owned_query = query.to_string();

        let handle = tokio::spawn(async move {
            let outcome = lookup.search(&owned_query).await;
            // The receiver lives as long as the manager
            let _ = tx.send(Completion {
                seq,
                query: owned_query,
                outcome,
            });
        });
        self.in_flight.insert(seq, handle.abort_handle());

        debug!(seq, query, backend = self.lookup.name(), "Dispatched fund lookup");

        Dispatch::Issued(SearchRequest {
            seq,
            query: query.to_string(),
        })
    }

    /// Next completion reported by a lookup task
    pub async fn next_completion(&mut self) -> Option<Completion> {
        self.completions_rx.recv().await
    }

    /// Completion already queued, without waiting
    pub fn try_next_completion(&mut self) -> Option<Completion> {
        self.completions_rx.try_recv().ok()
    }

    /// Staleness guard: the outcome of `completion` if it belongs to the latest
    /// dispatch, `None` otherwise.
    pub fn accept(
        &mut self,
        completion: Completion,
    ) -> Option<Result<Vec<FundSummary>, SearchError>> {
        self.in_flight.remove(&completion.seq);

        if self.latest != Some(completion.seq) {
            debug!(
                seq = completion.seq,
                latest = ?self.latest,
                query = %completion.query,
                "Discarding stale lookup result"
            );
            return None;
        }

        if let Err(err) = &completion.outcome {
            warn!(
                seq = completion.seq,
                query = %completion.query,
                kind = err.kind(),
                "Fund lookup failed: {}",
                err
            );
        }

        Some(completion.outcome)
    }

    /// Make every outstanding dispatch stale and abort its task
    pub fn invalidate(&mut self) {
        self.latest = None;
        self.abort_in_flight();
    }

    fn abort_in_flight(&mut self) {
        for (seq, handle) in self.in_flight.drain() {
            debug!(seq, "Aborting lookup");
            handle.abort();
        }
    }
}

impl Drop for SearchRequestManager {
    fn drop(&mut self) {
        for handle in self.in_flight.values() {
            handle.abort();
        }
    }
}
