pub mod crawl;

// Re-export command functions for convenience
pub use crawl::{crawl, load_config, trending, CrawlOverrides};
