//! Error types for the redian crawler
//!
//! This module defines the domain error types used by the fetcher, the
//! response decoder and the crawl loops.

use thiserror::Error;

/// Errors that can occur during HTTP fetching operations
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP client error (connection refused, body read failure, ...)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status code
    #[error("Transport error: HTTP status {0}")]
    Status(u16),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,
}

/// Errors raised while decoding an API response
#[derive(Error, Debug)]
pub enum ParseError {
    /// Body is not the JSON we expected
    #[error("Malformed JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// A field the crawl depends on is absent
    #[error("Missing field in response: {0}")]
    MissingField(&'static str),

    /// An embedded URL could not be parsed
    #[error("Invalid URL in response: {0}")]
    InvalidUrl(String),
}

/// General crawler errors
#[derive(Error, Debug)]
pub enum CrawlerError {
    /// Fetch error
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// The simplified board did not link to the full ranking
    #[error("Hot-search entrance '{0}' not found in simplified listing")]
    EntranceNotFound(String),
}

impl CrawlerError {
    /// Whether this error is an HTTP transport failure
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }
}
