//! # fundsearch Core
//!
//! Core library for fundsearch - an incremental fund-search controller.
//!
//! This library turns a stream of keystrokes into a single debounced, race-safe
//! remote lookup, filters the results down to investable funds, and drives a
//! keyboard-navigable selection list whose committed choice is handed to a
//! navigation collaborator.

// Core modules
pub mod config;
pub mod error;
pub mod fund;
pub mod lookup;
pub mod search;

// Re-export commonly used types
pub use config::{EndpointConfig, SearchConfig};
pub use error::{Error, Result, SearchError};
pub use fund::FundSummary;
pub use lookup::{CatalogFundLookup, FundLookup, HttpFundLookup};
pub use search::{
    run_session, EventFeed, FundNavigator, SearchKey, SearchSession, SearchSnapshot,
    SearchViewState, SelectionState, SessionOutcome, UiEvent,
};

/// Current version of the fundsearch-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing for the library
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize tracing with a specific debug mode
pub fn init_tracing_with_debug(debug: bool) {
    let filter = if debug { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();
}
