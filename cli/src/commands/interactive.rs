//! Interactive mode command

use crate::backend::build_lookup;
use crate::config::CliConfigLoader;
use crate::interactive::app::run_interactive;
use anyhow::Result;
use tracing::debug;

/// Start interactive mode
pub async fn interactive_command(config_loader: CliConfigLoader) -> Result<()> {
    let config = config_loader.load().await?;
    debug!(
        debounce_ms = config.search.debounce_ms,
        max_results = ?config.search.max_results,
        "Starting interactive search"
    );

    let lookup = build_lookup(&config).await?;
    run_interactive(&config.search, lookup).await
}
