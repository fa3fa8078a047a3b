//! Fund lookup trait

use crate::error::SearchError;
use crate::fund::FundSummary;
use async_trait::async_trait;

/// Remote collaborator that answers a fund-search query.
///
/// Implementations return funds in the service's ranking order. Any transport
/// failure or service-reported failure is an `Err`.
#[async_trait]
pub trait FundLookup: Send + Sync {
    /// Look up funds matching `query`
    async fn search(&self, query: &str) -> Result<Vec<FundSummary>, SearchError>;

    /// Get the backend name
    fn name(&self) -> &str;
}
