//! Output sinks for crawl results
//!
//! Crawled comments are only kept in memory; this module writes a finished
//! [`crate::models::CrawlReport`] to disk.

pub mod writer;

pub use writer::CommentWriter;
