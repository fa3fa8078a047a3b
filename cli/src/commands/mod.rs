//! CLI command implementations

pub mod interactive;
pub mod query;

pub use interactive::interactive_command;
pub use query::query_command;
