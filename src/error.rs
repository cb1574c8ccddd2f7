//! Unified error handling for the redian crate
//!
//! This module provides a unified error type for library construction
//! boundaries and command-level reporting, while keeping the domain errors
//! available for callers that want to match on them.
//!
//! # Architecture
//!
//! - [`RedianErrorTrait`] - Common interface implemented by the unified error
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping the crawl errors

use thiserror::Error;

// Re-export domain-specific errors for convenience
pub use crate::utils::error::{CrawlerError, FetchError, ParseError};

/// Common trait for redian error types
pub trait RedianErrorTrait: std::error::Error {
    /// Check if this error is recoverable (a later run may succeed)
    fn is_recoverable(&self) -> bool;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (HTTP status, timeout)
    Network,
    /// Response decoding errors
    Parsing,
    /// Configuration and validation errors
    Config,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Short human readable label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Parsing => "parsing",
            Self::Config => "config",
            Self::Other => "other",
        }
    }
}

/// Unified error type for the redian crate
#[derive(Error, Debug)]
pub enum Error {
    /// Crawl errors (board, listing, comments)
    #[error("Crawler error: {0}")]
    Crawler(#[from] CrawlerError),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}")]
    Other {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl RedianErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            // cookies may be refreshed and the run repeated
            Self::Crawler(e) => e.is_transport(),
            Self::Http(_) => false,
            Self::Config(_) => false,
            Self::Other { .. } => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Crawler(CrawlerError::Fetch(_)) => ErrorCategory::Network,
            Self::Crawler(_) => ErrorCategory::Parsing,
            Self::Http(_) => ErrorCategory::Network,
            Self::Config(_) => ErrorCategory::Config,
            Self::Other { .. } => ErrorCategory::Other,
        }
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a generic error with context and source
    pub fn with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Other {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
