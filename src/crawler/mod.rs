//! Hot-search and comment crawling
//!
//! This module implements the crawl entry point: a single [`Crawler`] that
//! resolves topics (a rank range of the hot-search board, its top K entries,
//! or a keyword search), collects post ids from their listings and walks each
//! post's comment thread.

pub mod api;
pub mod comment;
pub mod fetcher;
pub mod listing;

use crate::config::Config;
use crate::crawler::comment::CommentClient;
use crate::crawler::fetcher::WeiboFetcher;
use crate::crawler::listing::{ListingCrawler, ListingQuery};
use crate::models::{CrawlReport, CrawlStats, PageOutcome, TrendingEntry};
use crate::utils::error::CrawlerError;

/// Which topics a crawl covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlMode {
    /// Board ranks `start..=end`, 1-based
    RankedRange { start: usize, end: usize },
    /// Keyword search results
    Keyword(String),
    /// The first `k` board entries
    TopK(usize),
}

/// Parameters of one crawl call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    pub mode: CrawlMode,

    /// Number of listing pages per topic; values below 1 yield an empty report
    pub scale: i64,

    /// Keep per-comment like counts
    pub capture_like_count: bool,
}

impl CrawlRequest {
    pub fn ranked(start: usize, end: usize, scale: i64) -> Self {
        Self {
            mode: CrawlMode::RankedRange { start, end },
            scale,
            capture_like_count: true,
        }
    }

    pub fn keyword(keyword: impl Into<String>, scale: i64) -> Self {
        Self {
            mode: CrawlMode::Keyword(keyword.into()),
            scale,
            capture_like_count: true,
        }
    }

    pub fn top(k: usize, scale: i64) -> Self {
        Self {
            mode: CrawlMode::TopK(k),
            scale,
            capture_like_count: false,
        }
    }

    #[must_use]
    pub fn with_like_count(mut self, capture: bool) -> Self {
        self.capture_like_count = capture;
        self
    }
}

/// Select board ranks `start..=end` (1-based)
///
/// Returns `None` unless `1 <= start <= end <= entries.len()`.
pub fn select_range(entries: &[TrendingEntry], start: usize, end: usize) -> Option<&[TrendingEntry]> {
    if start == 0 || start > end || end > entries.len() {
        return None;
    }
    Some(&entries[start - 1..end])
}

/// Main crawler structure
pub struct Crawler {
    /// HTTP fetcher shared by listing and comment requests
    fetcher: WeiboFetcher,

    /// Configuration
    config: Config,
}

impl Crawler {
    /// Create a new crawler instance
    pub fn new(config: Config) -> crate::error::Result<Self> {
        config.validate()?;
        let fetcher = WeiboFetcher::new(&config)?;

        Ok(Self { fetcher, config })
    }

    /// Configuration this crawler was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn listing(&self) -> ListingCrawler<'_> {
        ListingCrawler::new(&self.fetcher, self.config.crawler.page_bound)
    }

    fn comments(&self, capture_like_count: bool) -> CommentClient<'_> {
        CommentClient::new(&self.fetcher, self.config.page_delay(), capture_like_count)
    }

    /// Fetch the current hot-search board
    pub async fn fetch_trending(&self) -> Result<Vec<TrendingEntry>, CrawlerError> {
        self.listing().fetch_trending().await
    }

    /// Run one crawl
    ///
    /// Invalid inputs (scale below 1, a rank range outside the board, `k == 0`)
    /// are logged and produce an empty report. A failed board or listing request
    /// aborts the crawl and discards what was gathered so far. For board topics
    /// a failed comment request only drops the post batch of its listing page,
    /// counted in [`CrawlStats::failed_batches`]; keyword crawls abort on it.
    pub async fn run(&self, request: &CrawlRequest) -> Result<CrawlReport, CrawlerError> {
        let mut report = CrawlReport::new();

        if request.scale < 1 {
            tracing::warn!(scale = request.scale, "scale must be at least 1");
            return Ok(report);
        }
        let scale = u32::try_from(request.scale).unwrap_or(u32::MAX);

        match &request.mode {
            CrawlMode::Keyword(keyword) => {
                let query = ListingQuery::for_keyword(keyword);
                let listing = self
                    .listing()
                    .collect_post_ids(&query, scale, &mut report.stats)
                    .await?;

                let comments = self
                    .comments(request.capture_like_count)
                    .fetch_comments(&listing.post_ids, &mut report.stats)
                    .await?;

                tracing::info!(keyword = %keyword, count = comments.len(), "Crawled keyword");
                report.extend_topic(keyword, comments);
            }
            CrawlMode::RankedRange { start, end } => {
                if *start == 0 || start > end {
                    tracing::warn!(start, end, "rank range must satisfy 1 <= start <= end");
                    return Ok(report);
                }
                let entries = self.fetch_trending().await?;
                let Some(selected) = select_range(&entries, *start, *end) else {
                    tracing::warn!(
                        start,
                        end,
                        board_len = entries.len(),
                        "rank range must satisfy 1 <= start <= end <= board length"
                    );
                    return Ok(report);
                };
                self.crawl_topics(selected, scale, request.capture_like_count, &mut report)
                    .await?;
            }
            CrawlMode::TopK(k) => {
                if *k == 0 {
                    tracing::warn!("top-k crawl requested with k = 0");
                    return Ok(report);
                }
                let entries = self.fetch_trending().await?;
                let selected = &entries[..(*k).min(entries.len())];
                self.crawl_topics(selected, scale, request.capture_like_count, &mut report)
                    .await?;
            }
        }

        tracing::info!(
            topics = report.len(),
            posts = report.stats.posts,
            comments = report.stats.comments,
            replies = report.stats.replies,
            failed_batches = report.stats.failed_batches,
            "Crawl finished"
        );

        Ok(report)
    }

    /// Crawl board topics one listing page at a time
    ///
    /// Each data page's posts form one comment batch. A batch whose comment
    /// requests fail in transport is dropped and the crawl moves on; topics
    /// without any data page are left out of the report.
    async fn crawl_topics(
        &self,
        entries: &[TrendingEntry],
        scale: u32,
        capture_like_count: bool,
        report: &mut CrawlReport,
    ) -> Result<(), CrawlerError> {
        let listing_crawler = self.listing();
        let comment_client = self.comments(capture_like_count);
        let last_page = listing_crawler.last_page(scale);

        for entry in entries {
            let query = ListingQuery::for_topic(entry)?;
            let mut pages = 0;
            let mut comments = Vec::new();

            for page in 1..=last_page {
                let post_ids = match listing_crawler.fetch_post_page(&query, page).await? {
                    PageOutcome::Data(post_ids) => post_ids,
                    PageOutcome::Exhausted => break,
                };
                pages += 1;
                report.stats.record_listing_page(post_ids.len());

                let mut batch_stats = CrawlStats::default();
                match comment_client.fetch_comments(&post_ids, &mut batch_stats).await {
                    Ok(batch) => {
                        report.stats.merge(&batch_stats);
                        comments.extend(batch);
                    }
                    Err(e) if e.is_transport() => {
                        tracing::warn!(
                            rank = entry.rank,
                            title = %entry.title,
                            page,
                            error = %e,
                            "Dropping comment batch"
                        );
                        report.stats.failed_batches += 1;
                    }
                    Err(e) => return Err(e),
                }
            }

            if pages == 0 {
                tracing::debug!(rank = entry.rank, title = %entry.title, "Topic listing empty");
                continue;
            }

            tracing::info!(
                rank = entry.rank,
                title = %entry.title,
                pages,
                count = comments.len(),
                "Crawled topic"
            );
            report.extend_topic(&entry.title, comments);
        }

        Ok(())
    }
}
