use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use redian::config::{Config, OutputFormat, PageBound};
use redian::crawler::{CrawlRequest, Crawler};
use redian::error::Error;
use redian::storage::CommentWriter;
use redian::utils::truncate_text;

/// Load configuration from `path` when given, otherwise from the environment
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path),
        None => Config::from_env(),
    }
}

pub async fn trending(config: Config) -> Result<()> {
    let crawler = Crawler::new(config).context("Failed to create crawler")?;
    let entries = crawler
        .fetch_trending()
        .await
        .map_err(Error::from)
        .context("Failed to fetch hot-search board")?;

    println!("Weibo Hot Search ({} entries)", entries.len());
    println!("==============================");
    for entry in &entries {
        println!("{}: {}", entry.rank, entry.title);
    }

    Ok(())
}

/// Command-line settings that take precedence over the configuration
#[derive(Debug, Default)]
pub struct CrawlOverrides {
    pub output: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub page_bound: Option<PageBound>,
}

impl CrawlOverrides {
    fn apply(self, config: &mut Config) {
        if let Some(dir) = self.output {
            config.output.dir = dir;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(page_bound) = self.page_bound {
            config.crawler.page_bound = page_bound;
        }
    }
}

pub async fn crawl(
    mut config: Config,
    request: CrawlRequest,
    overrides: CrawlOverrides,
) -> Result<()> {
    overrides.apply(&mut config);

    let writer = CommentWriter::new(&config.output.dir, config.output.format)?;
    let crawler = Crawler::new(config).context("Failed to create crawler")?;

    let report = crawler
        .run(&request)
        .await
        .map_err(Error::from)
        .context("Crawl failed")?;
    let paths = writer.save_report(&report)?;

    println!("\n========================");
    println!("Crawl Complete");
    println!("========================");
    for topic in &report.topics {
        println!(
            "  {:<32} {} comments",
            truncate_text(&topic.topic, 30),
            topic.comments.len()
        );
    }
    println!("Topics: {}", report.len());
    println!("Posts: {}", report.stats.posts);
    println!("Comments: {}", report.stats.comments);
    println!("Replies: {}", report.stats.replies);
    if report.stats.failed_batches > 0 {
        println!("Failed comment batches: {}", report.stats.failed_batches);
    }
    println!("Files written: {}", paths.len());
    println!("Output: {}", writer.output_dir().display());

    Ok(())
}
