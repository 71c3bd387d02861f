//! Error types for SiteSearch

use thiserror::Error;

/// SiteSearch error type
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Page could not be fetched
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Malformed base or page URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Unknown category filter
    #[error("Unknown filter: {0} (expected all, title, meta or content)")]
    InvalidFilter(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for SiteSearch operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Config(format!("Invalid config file: {}", err))
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Fetch(err.to_string())
    }
}
