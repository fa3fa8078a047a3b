//! Eligibility filter applied to lookup results

use crate::fund::FundSummary;

/// Keeps investable funds, in the order the service ranked them
#[derive(Debug, Clone, Default)]
pub struct ResultFilter {
    max_results: Option<usize>,
}

impl ResultFilter {
    pub fn new(max_results: Option<usize>) -> Self {
        Self { max_results }
    }

    /// Drop funds with neither a positive SIP nor a positive lumpsum minimum,
    /// then apply the result cap.
    pub fn filter(&self, items: Vec<FundSummary>) -> Vec<FundSummary> {
        let eligible = items.into_iter().filter(FundSummary::is_investable);
        match self.max_results {
            Some(limit) => eligible.take(limit).collect(),
            None => eligible.collect(),
        }
    }
}
