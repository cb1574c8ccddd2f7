// Core data structures for redian crawler

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One ranked topic on the hot-search board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingEntry {
    pub rank: usize, // 1-based position in the full board
    pub title: String,
    pub source_url: String, // sinaweibo:// or https:// scheme carrying the topic container
}

impl TrendingEntry {
    pub fn new(rank: usize, title: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            rank,
            title: title.into(),
            source_url: source_url.into(),
        }
    }
}

/// A sanitized top-level comment with its flattened replies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u64>,
    #[serde(default)]
    pub replies: Vec<String>,
}

/// Opaque comment-thread cursor (`max_id`); zero means no further pages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(pub u64);

impl Cursor {
    pub const END: Cursor = Cursor(0);

    pub fn is_end(&self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of a single page fetch that reached the server successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome<T> {
    /// The page carried data
    Data(T),
    /// The server signalled exhaustion through its `ok` flag
    Exhausted,
}

/// One page of a comment thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentPage {
    pub comments: Vec<Comment>,
    pub next: Cursor,
}

/// Counters accumulated during one crawl call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlStats {
    pub listing_pages: usize,
    pub posts: usize,
    pub comment_pages: usize,
    pub comments: usize,
    pub replies: usize,
    /// Comment batches dropped after a transport failure
    #[serde(default)]
    pub failed_batches: usize,
}

impl CrawlStats {
    pub fn record_listing_page(&mut self, posts: usize) {
        self.listing_pages += 1;
        self.posts += posts;
    }

    pub fn record_comment_page(&mut self, comments: &[Comment]) {
        self.comment_pages += 1;
        self.comments += comments.len();
        self.replies += comments.iter().map(|c| c.replies.len()).sum::<usize>();
    }

    pub fn merge(&mut self, other: &CrawlStats) {
        self.listing_pages += other.listing_pages;
        self.posts += other.posts;
        self.comment_pages += other.comment_pages;
        self.comments += other.comments;
        self.replies += other.replies;
        self.failed_batches += other.failed_batches;
    }
}

/// Comments gathered for one topic (hot-search title or keyword)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicComments {
    pub topic: String,
    pub comments: Vec<Comment>,
}

/// Ordered topic → comments mapping produced by a crawl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlReport {
    pub topics: Vec<TopicComments>,
    pub stats: CrawlStats,
    pub crawled_at: DateTime<Utc>,
}

impl Default for CrawlReport {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlReport {
    pub fn new() -> Self {
        Self {
            topics: Vec::new(),
            stats: CrawlStats::default(),
            crawled_at: Utc::now(),
        }
    }

    /// Append comments under `topic`, extending an existing entry with the same title
    pub fn extend_topic(&mut self, topic: &str, comments: Vec<Comment>) {
        match self.topics.iter_mut().find(|t| t.topic == topic) {
            Some(existing) => existing.comments.extend(comments),
            None => self.topics.push(TopicComments {
                topic: topic.to_string(),
                comments,
            }),
        }
    }

    pub fn get(&self, topic: &str) -> Option<&[Comment]> {
        self.topics
            .iter()
            .find(|t| t.topic == topic)
            .map(|t| t.comments.as_slice())
    }

    pub fn topic_names(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().map(|t| t.topic.as_str())
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn total_comments(&self) -> usize {
        self.topics.iter().map(|t| t.comments.len()).sum()
    }
}
