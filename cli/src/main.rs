//! # fundsearch CLI
//!
//! Command-line interface for fundsearch - incremental fund search.
//!
//! ## Usage
//!
//! - `fundsearch` - Start an interactive search session
//! - `fundsearch query "hdfc"` - Print the eligible funds for one query
//!
//! Funds come from the configured search endpoint, or from a local JSON
//! catalog when `--catalog` is given.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Mutex;

mod backend;
mod commands;
mod config;
mod interactive;

use commands::{interactive_command, query_command};
use config::CliConfigLoader;

/// fundsearch - Incremental fund search
#[derive(Parser)]
#[command(name = "fundsearch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Debounced, race-safe incremental fund search")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file or directory path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fund search endpoint base URL override
    #[arg(long)]
    base_url: Option<String>,

    /// Search a local JSON catalog instead of the endpoint
    #[arg(long)]
    catalog: Option<String>,

    /// Artificial catalog latency in milliseconds
    #[arg(long)]
    latency_ms: Option<u64>,

    /// Debounce quiet period in milliseconds
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Maximum number of funds shown
    #[arg(long)]
    max_results: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search interactively (default)
    Interactive,

    /// Look up funds once and print the eligible ones
    Query {
        /// Search text
        text: String,
    },
}

/// Build a configuration loader from CLI arguments
fn build_config_loader(cli: &Cli) -> CliConfigLoader {
    let mut loader = CliConfigLoader::new();

    if let Some(config_path) = &cli.config {
        loader = loader.with_config_override(config_path.clone());
    }

    if let Some(base_url) = &cli.base_url {
        loader = loader.with_base_url_override(base_url.clone());
    }

    if let Some(catalog) = &cli.catalog {
        loader = loader.with_catalog_override(catalog.clone());
    }

    if let Some(latency_ms) = cli.latency_ms {
        loader = loader.with_latency_override(latency_ms);
    }

    if let Some(debounce_ms) = cli.debounce_ms {
        loader = loader.with_debounce_override(debounce_ms);
    }

    if let Some(max_results) = cli.max_results {
        loader = loader.with_max_results_override(max_results);
    }

    loader
}

/// Where log output goes for one invocation
#[derive(Debug, PartialEq, Eq)]
enum LogTarget {
    Stderr,
    File(PathBuf),
    Off,
}

impl Cli {
    fn is_interactive(&self) -> bool {
        matches!(self.command, Some(Commands::Interactive) | None)
    }
}

/// Interactive sessions own the terminal, so their logs never go to stderr
fn log_target(cli: &Cli) -> LogTarget {
    if let Some(path) = &cli.log_file {
        return LogTarget::File(path.clone());
    }
    if !cli.is_interactive() {
        return LogTarget::Stderr;
    }
    match dirs::cache_dir() {
        Some(cache_dir) => LogTarget::File(cache_dir.join("fundsearch").join("fundsearch.log")),
        None => LogTarget::Off,
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    match log_target(cli) {
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create log directory: {}", parent.display())
                })?;
            }
            let file = std::fs::File::create(&path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            let filter = if cli.verbose { "debug" } else { "info" };

            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        LogTarget::Stderr => fundsearch_core::init_tracing_with_debug(cli.verbose),
        LogTarget::Off => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    let config_loader = build_config_loader(&cli);

    match cli.command {
        Some(Commands::Query { text }) => query_command(config_loader, text).await,
        Some(Commands::Interactive) | None => interactive_command(config_loader).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_query_logs_to_stderr() {
        let cli = parse(&["fundsearch", "query", "hdfc"]);
        assert_eq!(log_target(&cli), LogTarget::Stderr);
    }

    #[test]
    fn test_interactive_never_logs_to_stderr() {
        for args in [&["fundsearch"][..], &["fundsearch", "interactive"][..]] {
            let cli = parse(args);
            assert!(cli.is_interactive());
            match log_target(&cli) {
                LogTarget::File(path) => {
                    assert!(path.ends_with("fundsearch/fundsearch.log"));
                    assert_eq!(dirs::cache_dir().map(|dir| path.starts_with(dir)), Some(true));
                }
                LogTarget::Off => assert!(dirs::cache_dir().is_none()),
                LogTarget::Stderr => panic!("interactive session logged to stderr"),
            }
        }
    }

    #[test]
    fn test_log_file_flag_wins() {
        let cli = parse(&["fundsearch", "--log-file", "/tmp/fs.log", "query", "axis"]);
        assert_eq!(log_target(&cli), LogTarget::File(PathBuf::from("/tmp/fs.log")));

        let cli = parse(&["fundsearch", "--log-file", "/tmp/fs.log"]);
        assert_eq!(log_target(&cli), LogTarget::File(PathBuf::from("/tmp/fs.log")));
    }
}
