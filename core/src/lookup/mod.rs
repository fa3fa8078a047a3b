//! Fund lookup abstractions and implementations

pub mod catalog;
pub mod client;
pub mod http;

pub use catalog::CatalogFundLookup;
pub use client::FundLookup;
pub use http::{HttpFundLookup, SearchResponse};
