//! One-shot query command

use crate::backend::build_lookup;
use crate::config::CliConfigLoader;
use crate::interactive::render::format_amounts;
use anyhow::{anyhow, Result};
use fundsearch_core::search::ResultFilter;
use tracing::{info, warn};

/// Look up `text` once and print the eligible funds
pub async fn query_command(config_loader: CliConfigLoader, text: String) -> Result<()> {
    let config = config_loader.load().await?;
    let lookup = build_lookup(&config).await?;
    let query = text.trim();

    if query.is_empty() {
        println!("No funds found.");
        return Ok(());
    }

    info!(backend = lookup.name(), query, "Running one-shot query");
    let funds = match lookup.search(query).await {
        Ok(funds) => funds,
        Err(e) => {
            warn!(kind = e.kind(), error = %e, "Query failed");
            return Err(anyhow!("Search failed: {}", e.user_message()));
        }
    };

    let total = funds.len();
    let eligible = ResultFilter::new(config.search.max_results).filter(funds);
    info!(total, eligible = eligible.len(), "Query finished");

    if eligible.is_empty() {
        println!("No funds found.");
        return Ok(());
    }

    for fund in &eligible {
        let mut line = format!("{}  {}", fund.id, fund.display_name);
        if !fund.category.is_empty() {
            line.push_str(&format!("  [{}]", fund.category));
        }
        let amounts = format_amounts(fund);
        if !amounts.is_empty() {
            line.push_str(&format!("  {}", amounts));
        }
        println!("{}", line);
    }

    Ok(())
}
