//! Incremental fund search
//!
//! Keystrokes flow one way through this module:
//! - [`debounce`] coalesces input into a committed query
//! - [`request`] dispatches the lookup and drops stale completions
//! - [`filter`] keeps investable funds
//! - [`selection`] tracks the highlighted row
//! - [`session`] owns all of the above for one open search
//! - [`driver`] feeds UI events, timers and completions into a session

pub mod debounce;
pub mod driver;
pub mod filter;
pub mod request;
pub mod selection;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use debounce::QueryDebouncer;
pub use driver::{run_session, EventFeed, FeedSubscription};
pub use filter::ResultFilter;
pub use request::{Completion, Dispatch, SearchRequest, SearchRequestManager};
pub use selection::SelectionState;
pub use session::{
    FundNavigator, SearchKey, SearchSession, SearchSnapshot, SearchViewState, SessionOutcome,
    UiEvent,
};
