//! redian - Weibo hot-search comment crawler
//!
//! Crawls the hot-search board of the Weibo mobile site, the posts listed
//! under each topic (or under a keyword search) and the hot comment threads
//! of those posts.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and session material
//! - [`crawler`] - Board, listing and comment crawling with rate limiting
//! - [`parser`] - Comment markup sanitizing
//! - [`models`] - Core data structures and types
//! - [`storage`] - Output files for crawl reports
//! - [`utils`] - Common utilities and domain errors
//!
//! # Example
//!
//! ```no_run
//! use redian::config::Config;
//! use redian::crawler::{CrawlRequest, Crawler};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let crawler = Crawler::new(config)?;
//!     let report = crawler.run(&CrawlRequest::ranked(1, 3, 2)).await?;
//!     println!("{} comments", report.total_comments());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod crawler;
pub mod error;
pub mod models;
pub mod parser;
pub mod storage;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, OutputFormat, PageBound};
    pub use crate::crawler::{CrawlMode, CrawlRequest, Crawler};
    pub use crate::error::{Error, ErrorCategory, RedianErrorTrait, Result};
    pub use crate::models::{Comment, CrawlReport, CrawlStats, TopicComments, TrendingEntry};
    pub use crate::storage::CommentWriter;
}

// Direct re-exports for convenience
pub use models::{Comment, CrawlReport, CrawlStats, TopicComments, TrendingEntry};
