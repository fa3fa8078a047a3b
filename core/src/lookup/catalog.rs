//! In-memory fund catalog lookup
//!
//! Answers queries from a fixed list of funds, either built in code or loaded
//! from a JSON file. Handy for offline use and for exercising a session without
//! a live service.

use crate::error::{Result, SearchError};
use crate::fund::FundSummary;
use crate::lookup::FundLookup;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tokio::fs;

/// Fund lookup over a fixed in-memory catalog
#[derive(Debug, Clone, Default)]
pub struct CatalogFundLookup {
    funds: Vec<FundSummary>,
    latency: Option<Duration>,
}

impl CatalogFundLookup {
    /// Create a lookup over the given funds
    pub fn new(funds: Vec<FundSummary>) -> Self {
        Self {
            funds,
            latency: None,
        }
    }

    /// Load a catalog from a JSON file containing an array of funds
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).await?;
        let funds: Vec<FundSummary> = serde_json::from_str(&content)?;
        Ok(Self::new(funds))
    }

    /// Delay every answer, simulating a slow service
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of funds in the catalog
    pub fn len(&self) -> usize {
        self.funds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funds.is_empty()
    }

    /// Case-insensitive substring match on name and category, catalog order kept
    pub fn matching(&self, query: &str) -> Vec<FundSummary> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.funds
            .iter()
            .filter(|fund| {
                fund.display_name.to_lowercase().contains(&needle)
                    || fund.category.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }
}

#[async_trait]
impl FundLookup for CatalogFundLookup {
    async fn search(&self, query: &str) -> std::result::Result<Vec<FundSummary>, SearchError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        Ok(self.matching(query))
    }

    fn name(&self) -> &str {
        "catalog"
    }
}
