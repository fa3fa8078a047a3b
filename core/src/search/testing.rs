//! Test doubles for the search collaborators

use crate::error::SearchError;
use crate::fund::FundSummary;
use crate::lookup::FundLookup;
use crate::search::FundNavigator;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

type Answer = Result<Vec<FundSummary>, SearchError>;

/// Lookup whose answers are released by the test.
///
/// A query with a gate waits until the gate's sender is used (and never
/// resolves if it is dropped); a query without a gate answers with no funds.
#[derive(Default)]
pub struct ScriptedLookup {
    gates: Mutex<HashMap<String, oneshot::Receiver<Answer>>>,
    queries: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold the next lookup of `query` until the returned sender is used
    pub fn gate(&self, query: &str) -> oneshot::Sender<Answer> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(query.to_string(), rx);
        tx
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl FundLookup for ScriptedLookup {
    async fn search(&self, query: &str) -> Result<Vec<FundSummary>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());

        let gate = self.gates.lock().unwrap().remove(query);
        match gate {
            Some(rx) => match rx.await {
                Ok(answer) => answer,
                Err(_) => std::future::pending().await,
            },
            None => Ok(Vec::new()),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Navigator that records every fund it was asked to open
#[derive(Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

impl FundNavigator for RecordingNavigator {
    fn navigate_to_fund(&self, fund_id: &str) {
        self.visited.lock().unwrap().push(fund_id.to_string());
    }
}
