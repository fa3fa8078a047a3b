//! Error types and handling for fundsearch core

use thiserror::Error;

/// Result type alias for fundsearch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for fundsearch core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Fund lookup errors
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for field '{field}': {value}")]
    InvalidValue { field: String, value: String },
}

/// Failure of a single fund lookup.
///
/// Both variants render identically to the user; the split only matters for logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The request never produced a usable response (connect, timeout, decode).
    #[error("Network error: {message}")]
    Network { message: String },

    /// The service answered but reported failure.
    #[error("Search rejected: {message}")]
    Rejected {
        status: Option<u16>,
        message: String,
    },
}

impl SearchError {
    /// Create a transport-level failure
    pub fn network(message: impl Into<String>) -> Self {
        SearchError::Network {
            message: message.into(),
        }
    }

    /// Create a service-reported failure
    pub fn rejected(status: Option<u16>, message: impl Into<String>) -> Self {
        SearchError::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Short label used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            SearchError::Network { .. } => "network",
            SearchError::Rejected { .. } => "rejected",
        }
    }

    /// Message shown in the `Error` view state
    pub fn user_message(&self) -> String {
        match self {
            SearchError::Network { message } | SearchError::Rejected { message, .. } => {
                message.clone()
            }
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => SearchError::rejected(Some(status.as_u16()), err.to_string()),
            None => SearchError::network(err.to_string()),
        }
    }
}
