//! Fund summary as returned by the fund-search service

use serde::{Deserialize, Serialize};

/// One fund in a search response. Read-only for the search controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundSummary {
    /// Unique fund identifier
    pub id: String,

    /// Name shown in the result list
    pub display_name: String,

    /// Fund category (e.g. "Equity", "Debt")
    #[serde(default)]
    pub category: String,

    /// Minimum SIP instalment, absent when SIP is not offered
    #[serde(default)]
    pub min_sip_amount: Option<f64>,

    /// Minimum one-time investment, absent when lumpsum is not offered
    #[serde(default)]
    pub min_lumpsum_amount: Option<f64>,

    /// Fund type (e.g. "Growth", "IDCW")
    #[serde(default)]
    pub fund_type: String,
}

impl FundSummary {
    /// Create a fund with no investment minimums set
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            category: String::new(),
            min_sip_amount: None,
            min_lumpsum_amount: None,
            fund_type: String::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_fund_type(mut self, fund_type: impl Into<String>) -> Self {
        self.fund_type = fund_type.into();
        self
    }

    pub fn with_min_sip(mut self, amount: f64) -> Self {
        self.min_sip_amount = Some(amount);
        self
    }

    pub fn with_min_lumpsum(mut self, amount: f64) -> Self {
        self.min_lumpsum_amount = Some(amount);
        self
    }

    /// Whether the fund can be invested in through SIP or lumpsum.
    pub fn is_investable(&self) -> bool {
        let positive = |amount: Option<f64>| amount.is_some_and(|value| value > 0.0);
        positive(self.min_sip_amount) || positive(self.min_lumpsum_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case_with_missing_fields() {
        let json = r#"{
            "id": "INF179K01YV8",
            "displayName": "HDFC Flexi Cap Fund",
            "minSipAmount": 500,
            "minLumpsumAmount": null
        }"#;

        let fund: FundSummary = serde_json::from_str(json).unwrap();
        assert_eq!(fund.id, "INF179K01YV8");
        assert_eq!(fund.display_name, "HDFC Flexi Cap Fund");
        assert_eq!(fund.category, "");
        assert_eq!(fund.min_sip_amount, Some(500.0));
        assert_eq!(fund.min_lumpsum_amount, None);
        assert!(fund.is_investable());
    }

    #[test]
    fn test_investable_requires_a_positive_minimum() {
        assert!(!FundSummary::new("a", "A").is_investable());
        assert!(!FundSummary::new("b", "B")
            .with_min_sip(0.0)
            .with_min_lumpsum(0.0)
            .is_investable());
        assert!(FundSummary::new("c", "C").with_min_lumpsum(1000.0).is_investable());
        assert!(FundSummary::new("d", "D").with_min_sip(100.0).is_investable());
    }
}
