//! CLI configuration

pub mod loader;

pub use loader::{CatalogSource, CliConfigLoader, ResolvedCliConfig};
