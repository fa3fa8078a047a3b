//! Minimal configuration module for fundsearch core
//!
//! Only exports pure data types. All loading logic is in CLI layer.

pub mod types;

pub use types::{EndpointConfig, SearchConfig, DEFAULT_DEBOUNCE_MS};
