//! Search session: query text, view state, selection and lifecycle

use super::debounce::QueryDebouncer;
use super::filter::ResultFilter;
use super::request::{Completion, Dispatch, SearchRequestManager};
use super::selection::SelectionState;
use crate::config::SearchConfig;
use crate::fund::FundSummary;
use crate::lookup::FundLookup;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info};

/// What the result area shows
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SearchViewState {
    /// Nothing searched yet
    #[default]
    Idle,
    /// Waiting for the lookup of `query`
    Searching { query: String },
    /// The lookup of `query` failed
    Error { query: String, message: String },
    /// Eligible funds for `query`
    Results {
        query: String,
        items: Vec<FundSummary>,
    },
}

impl SearchViewState {
    /// Committed query this state belongs to
    pub fn query(&self) -> Option<&str> {
        match self {
            SearchViewState::Idle => None,
            SearchViewState::Searching { query }
            | SearchViewState::Error { query, .. }
            | SearchViewState::Results { query, .. } => Some(query.as_str()),
        }
    }

    /// Funds shown, empty unless results are displayed
    pub fn items(&self) -> &[FundSummary] {
        match self {
            SearchViewState::Results { items, .. } => items,
            _ => &[],
        }
    }

    pub fn is_searching(&self) -> bool {
        matches!(self, SearchViewState::Searching { .. })
    }

    /// Results arrived but none are eligible
    pub fn is_empty_results(&self) -> bool {
        matches!(self, SearchViewState::Results { items, .. } if items.is_empty())
    }
}

/// Keys the session reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
}

/// Input delivered to an open session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The search field now contains this text
    Input(String),
    Key(SearchKey),
    /// Pointer click on a result row
    ClickItem(usize),
    /// Pointer click anywhere outside the search UI
    ClickOutside,
}

/// How a session ended
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// A fund was chosen and handed to the navigator
    Selected(FundSummary),
    /// Closed without a selection
    Closed,
}

/// Receives the fund the user chose
pub trait FundNavigator: Send + Sync {
    fn navigate_to_fund(&self, fund_id: &str);
}

/// Read-only state for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSnapshot {
    pub query: String,
    pub view: SearchViewState,
    pub selection: SelectionState,
    pub open: bool,
}

/// One incremental search session.
///
/// Owns every piece of mutable search state. All methods are synchronous except
/// [`SearchSession::next_completion`], which waits for a lookup task.
pub struct SearchSession {
    query: String,
    view: SearchViewState,
    selection: SelectionState,
    debouncer: QueryDebouncer,
    requests: SearchRequestManager,
    filter: ResultFilter,
    navigator: Arc<dyn FundNavigator>,
    open: bool,
}

impl SearchSession {
    /// Create a closed session
    pub fn new(
        config: &SearchConfig,
        lookup: Arc<dyn FundLookup>,
        navigator: Arc<dyn FundNavigator>,
    ) -> Self {
        Self {
            query: String::new(),
            view: SearchViewState::Idle,
            selection: SelectionState::default(),
            debouncer: QueryDebouncer::new(config.debounce()),
            requests: SearchRequestManager::new(lookup),
            filter: ResultFilter::new(config.max_results),
            navigator,
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Text currently in the search field
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn current_view(&self) -> &SearchViewState {
        &self.view
    }

    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            query: self.query.clone(),
            view: self.view.clone(),
            selection: self.selection,
            open: self.open,
        }
    }

    /// Start a fresh session
    pub fn open(&mut self) {
        self.reset();
        self.open = true;
        debug!("Search session opened");
    }

    /// End the session without a selection
    pub fn close(&mut self) -> SessionOutcome {
        self.reset();
        self.open = false;
        debug!("Search session closed");
        SessionOutcome::Closed
    }

    fn reset(&mut self) {
        self.debouncer.cancel();
        self.requests.invalidate();
        self.query.clear();
        self.view = SearchViewState::Idle;
        self.selection.list_replaced(0);
    }

    /// The search field changed
    pub fn input_changed(&mut self, text: &str, now: Instant) {
        if !self.open {
            return;
        }

        self.query = text.to_string();
        if let Some(committed) = self.debouncer.on_input(text, now) {
            self.commit_query(committed);
        }
    }

    /// When the pending debounced commit is due
    pub fn debounce_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Apply the debounced commit if it is due. Returns whether state changed.
    pub fn poll_debounce(&mut self, now: Instant) -> bool {
        if !self.open {
            return false;
        }

        match self.debouncer.poll(now) {
            Some(committed) => {
                self.commit_query(committed);
                true
            }
            None => false,
        }
    }

    fn commit_query(&mut self, query: String) {
        debug!(query = %query, "Committing query");

        self.selection.list_replaced(0);
        match self.requests.dispatch(&query) {
            Dispatch::Immediate(items) => {
                let items = self.filter.filter(items);
                self.show_results(query, items);
            }
            Dispatch::Issued(_) => {
                self.view = SearchViewState::Searching { query };
            }
        }
    }

    fn show_results(&mut self, query: String, items: Vec<FundSummary>) {
        self.selection.list_replaced(items.len());
        self.view = SearchViewState::Results { query, items };
    }

    /// Wait for the next lookup task to report
    pub async fn next_completion(&mut self) -> Option<Completion> {
        self.requests.next_completion().await
    }

    /// Apply a lookup completion unless it is stale. Returns whether state changed.
    pub fn on_completion(&mut self, completion: Completion) -> bool {
        let query = completion.query.clone();

        match self.requests.accept(completion) {
            None => false,
            Some(Ok(items)) => {
                let items = self.filter.filter(items);
                debug!(query = %query, shown = items.len(), "Showing results");
                self.show_results(query, items);
                true
            }
            Some(Err(err)) => {
                self.selection.list_replaced(0);
                self.view = SearchViewState::Error {
                    query,
                    message: err.user_message(),
                };
                true
            }
        }
    }

    /// Keyboard input while the list has focus
    pub fn handle_key(&mut self, key: SearchKey) -> Option<SessionOutcome> {
        if !self.open {
            return None;
        }

        match key {
            SearchKey::ArrowDown => {
                self.selection.move_down();
                None
            }
            SearchKey::ArrowUp => {
                self.selection.move_up();
                None
            }
            SearchKey::Enter => self.commit_selection(),
            SearchKey::Escape => Some(self.close()),
        }
    }

    /// Pointer click on row `index`
    pub fn click_item(&mut self, index: usize) -> Option<SessionOutcome> {
        if !self.open || !self.selection.highlight(index) {
            return None;
        }
        self.commit_selection()
    }

    /// Pointer click outside the search UI
    pub fn click_outside(&mut self) -> Option<SessionOutcome> {
        if !self.open {
            return None;
        }
        Some(self.close())
    }

    /// Dispatch a UI event
    pub fn handle_event(&mut self, event: UiEvent, now: Instant) -> Option<SessionOutcome> {
        match event {
            UiEvent::Input(text) => {
                self.input_changed(&text, now);
                None
            }
            UiEvent::Key(key) => self.handle_key(key),
            UiEvent::ClickItem(index) => self.click_item(index),
            UiEvent::ClickOutside => self.click_outside(),
        }
    }

    fn commit_selection(&mut self) -> Option<SessionOutcome> {
        let index = self.selection.commit()?;
        let fund = self.view.items().get(index)?.clone();

        info!(fund_id = %fund.id, name = %fund.display_name, "Fund selected");
        self.navigator.navigate_to_fund(&fund.id);
        self.close();

        Some(SessionOutcome::Selected(fund))
    }
}
