//! Fund lookup backend selection

use crate::config::ResolvedCliConfig;
use anyhow::{anyhow, Context, Result};
use fundsearch_core::{CatalogFundLookup, FundLookup, HttpFundLookup};
use std::sync::Arc;
use tracing::debug;

/// Build the lookup backend: the catalog when one is configured, else the endpoint
pub async fn build_lookup(config: &ResolvedCliConfig) -> Result<Arc<dyn FundLookup>> {
    if let Some(catalog) = &config.catalog {
        let mut lookup = CatalogFundLookup::from_file(&catalog.path)
            .await
            .with_context(|| format!("Failed to load catalog: {}", catalog.path.display()))?;
        if let Some(latency) = catalog.latency {
            lookup = lookup.with_latency(latency);
        }
        debug!(path = %catalog.path.display(), funds = lookup.len(), "Using catalog backend");
        return Ok(Arc::new(lookup));
    }

    let endpoint = config
        .search
        .endpoint
        .as_ref()
        .ok_or_else(|| anyhow!("No search endpoint configured"))?;
    let lookup = HttpFundLookup::new(endpoint).context("Failed to create HTTP fund lookup")?;
    debug!(base_url = %endpoint.base_url, "Using HTTP backend");
    Ok(Arc::new(lookup))
}
