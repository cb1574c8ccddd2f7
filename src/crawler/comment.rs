//! Hot comment thread paginator
//!
//! This module walks the `hotflow` comment endpoint of a post by following
//! the `max_id` cursor until the server returns a zero cursor or a status
//! flag other than `ok == 1`.

use std::time::Duration;

use crate::crawler::api::{self, CommentPageData, Envelope};
use crate::crawler::fetcher::WeiboFetcher;
use crate::models::{Comment, CommentPage, CrawlStats, Cursor, PageOutcome};
use crate::utils::error::CrawlerError;

/// Build query parameters for one comment page
///
/// `max_id` is only sent once the cursor is nonzero.
///
/// # Examples
///
/// ```
/// use redian::crawler::comment::build_params;
/// use redian::models::Cursor;
///
/// let first = build_params("5001", Cursor::END);
/// assert_eq!(first.len(), 3);
///
/// let next = build_params("5001", Cursor(77));
/// assert_eq!(next[3], ("max_id".to_string(), "77".to_string()));
/// ```
pub fn build_params(post_id: &str, cursor: Cursor) -> Vec<(String, String)> {
    let mut params = vec![
        (String::from("id"), post_id.to_string()),
        (String::from("mid"), post_id.to_string()),
        (String::from("max_id_type"), String::from("0")),
    ];

    if !cursor.is_end() {
        params.push((String::from("max_id"), cursor.to_string()));
    }

    params
}

/// Comment API client borrowing the shared fetcher
pub struct CommentClient<'a> {
    fetcher: &'a WeiboFetcher,

    /// Pause between two pages of one thread
    page_delay: Duration,

    /// Keep `like_count` on produced comments
    capture_like_count: bool,
}

impl<'a> CommentClient<'a> {
    pub fn new(fetcher: &'a WeiboFetcher, page_delay: Duration, capture_like_count: bool) -> Self {
        Self {
            fetcher,
            page_delay,
            capture_like_count,
        }
    }

    /// Fetch a single comment page
    ///
    /// # Returns
    /// `Exhausted` when `ok != 1`, otherwise the sanitized comments and the
    /// cursor of the next page
    pub async fn fetch_page(
        &self,
        post_id: &str,
        cursor: Cursor,
    ) -> Result<PageOutcome<CommentPage>, CrawlerError> {
        let params = build_params(post_id, cursor);
        let body = self.fetcher.get_text(api::COMMENTS_PATH, &params).await?;
        let envelope: Envelope<CommentPageData> = api::decode(&body)?;

        if envelope.ok != api::OK_DATA {
            tracing::debug!(post_id, ok = envelope.ok, "Comment thread exhausted");
            return Ok(PageOutcome::Exhausted);
        }

        let data = envelope.into_data()?;
        let comments = data
            .data
            .into_iter()
            .map(|raw| raw.into_comment(self.capture_like_count))
            .collect();

        Ok(PageOutcome::Data(CommentPage {
            comments,
            next: data.max_id,
        }))
    }

    /// Fetch every comment page of one post
    ///
    /// The first page is always requested; further pages follow while the
    /// returned cursor is nonzero.
    pub async fn fetch_post_comments(
        &self,
        post_id: &str,
        stats: &mut CrawlStats,
    ) -> Result<Vec<Comment>, CrawlerError> {
        let mut comments = Vec::new();
        let mut cursor = Cursor::END;
        let mut first = true;

        while first || !cursor.is_end() {
            first = false;

            let page = match self.fetch_page(post_id, cursor).await? {
                PageOutcome::Data(page) => page,
                PageOutcome::Exhausted => break,
            };

            stats.record_comment_page(&page.comments);
            comments.extend(page.comments);
            cursor = page.next;

            tracing::debug!(post_id, cursor = %cursor, total = comments.len(), "Fetched comment page");

            if !cursor.is_end() && !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }
        }

        Ok(comments)
    }

    /// Fetch comments of several posts in order
    ///
    /// A transport failure on any page fails the whole call; comments already
    /// gathered for earlier posts are dropped with it.
    pub async fn fetch_comments(
        &self,
        post_ids: &[String],
        stats: &mut CrawlStats,
    ) -> Result<Vec<Comment>, CrawlerError> {
        let mut all_comments = Vec::new();

        for post_id in post_ids {
            let comments = self.fetch_post_comments(post_id, stats).await.inspect_err(|e| {
                tracing::warn!(post_id = %post_id, error = %e, "Comment batch failed");
            })?;

            tracing::info!(post_id = %post_id, count = comments.len(), "Fetched post comments");
            all_comments.extend(comments);
        }

        Ok(all_comments)
    }
}
