//! Hot-search board and post listing crawler
//!
//! This module fetches the hot-search board (two-step: the simplified board
//! links to the full one) and walks the paged card listings of a topic or a
//! keyword search to collect post ids.

use crate::config::PageBound;
use crate::crawler::api::{self, BoardResponse, CardPage, Envelope, FullBoardCard, SimpleBoardCard};
use crate::crawler::fetcher::WeiboFetcher;
use crate::models::{CrawlStats, PageOutcome, TrendingEntry};
use crate::utils::error::{CrawlerError, ParseError};

/// Request parameters identifying a paged card listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    params: Vec<(String, String)>,
}

impl ListingQuery {
    /// Listing of a hot-search topic, switched to its "hot" tab
    ///
    /// The topic's scheme URL carries the container id; its query pairs are
    /// replayed with `page_type=searchall` and `type=60` on top.
    ///
    /// # Examples
    ///
    /// ```
    /// use redian::crawler::listing::ListingQuery;
    /// use redian::models::TrendingEntry;
    ///
    /// let entry = TrendingEntry::new(
    ///     1,
    ///     "topic",
    ///     "https://m.weibo.cn/search?containerid=100103type%3D1%26q%3Dtopic&isnewpage=1",
    /// );
    /// let query = ListingQuery::for_topic(&entry).unwrap();
    /// assert_eq!(query.get("containerid"), Some("100103type=1&q=topic"));
    /// assert_eq!(query.get("type"), Some("60"));
    /// ```
    pub fn for_topic(entry: &TrendingEntry) -> Result<Self, ParseError> {
        let mut query = Self {
            params: api::query_pairs(&entry.source_url)?,
        };
        query.set("page_type", api::PAGE_TYPE_SEARCHALL);
        query.set("type", api::HOT_TAB_TYPE);
        Ok(query)
    }

    /// Listing of keyword search results
    pub fn for_keyword(keyword: &str) -> Self {
        let mut query = Self { params: Vec::new() };
        query.set("containerid", &api::search_container_id(keyword));
        query.set("page_type", api::PAGE_TYPE_SEARCHALL);
        query
    }

    /// Replace every value of `key` with `value`, appending if absent
    pub fn set(&mut self, key: &str, value: &str) {
        self.params.retain(|(k, _)| k != key);
        self.params.push((key.to_string(), value.to_string()));
    }

    /// First value of `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Parameters for a given page number
    pub fn page_params(&self, page: u32) -> Vec<(String, String)> {
        let mut paged = self.clone();
        paged.set("page", &page.to_string());
        paged.params
    }
}

/// Post ids gathered from a listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostListing {
    /// Post ids in fetch order, duplicates kept
    pub post_ids: Vec<String>,

    /// Number of pages that carried data
    pub pages: usize,
}

/// Listing crawler borrowing the shared fetcher
pub struct ListingCrawler<'a> {
    fetcher: &'a WeiboFetcher,
    page_bound: PageBound,
}

impl<'a> ListingCrawler<'a> {
    #[must_use]
    pub fn new(fetcher: &'a WeiboFetcher, page_bound: PageBound) -> Self {
        Self {
            fetcher,
            page_bound,
        }
    }

    /// Last listing page requested for `scale`
    pub fn last_page(&self, scale: u32) -> u32 {
        self.page_bound.last_page(scale)
    }

    /// Fetch the current hot-search board
    ///
    /// # Errors
    ///
    /// `CrawlerError::Fetch` on a non-200 answer from either board request,
    /// `CrawlerError::EntranceNotFound` when the simplified board does not
    /// link to the full one, `CrawlerError::Parse` on unexpected JSON.
    pub async fn fetch_trending(&self) -> Result<Vec<TrendingEntry>, CrawlerError> {
        let simple_params = vec![(
            String::from("containerid"),
            String::from(api::HOT_BOARD_CONTAINER),
        )];
        let body = self.fetcher.get_text(api::INDEX_PATH, &simple_params).await?;
        let simple: BoardResponse<SimpleBoardCard> = api::decode(&body)?;

        let first = simple
            .data
            .cards
            .first()
            .ok_or(ParseError::MissingField("data.cards[0]"))?;
        let entrance = api::find_entrance(&first.group, api::HOT_BOARD_TITLE)
            .ok_or_else(|| CrawlerError::EntranceNotFound(api::HOT_BOARD_TITLE.to_string()))?;

        tracing::debug!(entrance = %entrance, "Found full board entrance");

        let full_params = api::query_pairs(entrance)?;
        let body = self.fetcher.get_text(api::INDEX_PATH, &full_params).await?;
        let full: BoardResponse<FullBoardCard> = api::decode(&body)?;

        let topics = full
            .data
            .cards
            .into_iter()
            .next()
            .ok_or(ParseError::MissingField("data.cards[0]"))?
            .card_group;

        let entries = api::board_entries(topics);
        tracing::info!(count = entries.len(), "Fetched hot-search board");

        Ok(entries)
    }

    /// Fetch one listing page and extract its post ids
    pub async fn fetch_post_page(
        &self,
        query: &ListingQuery,
        page: u32,
    ) -> Result<PageOutcome<Vec<String>>, CrawlerError> {
        let body = self
            .fetcher
            .get_text(api::INDEX_PATH, &query.page_params(page))
            .await?;
        let envelope: Envelope<CardPage> = api::decode(&body)?;

        if envelope.ok == api::OK_EXHAUSTED {
            return Ok(PageOutcome::Exhausted);
        }

        let cards = envelope.into_data()?.cards;
        Ok(PageOutcome::Data(api::extract_post_ids(&cards)?))
    }

    /// Collect post ids across up to `scale` pages
    ///
    /// Stops early once the server reports the listing exhausted. Post ids are
    /// not deduplicated across pages.
    pub async fn collect_post_ids(
        &self,
        query: &ListingQuery,
        scale: u32,
        stats: &mut CrawlStats,
    ) -> Result<PostListing, CrawlerError> {
        let mut listing = PostListing::default();
        let last_page = self.last_page(scale);

        for page in 1..=last_page {
            tracing::debug!(page, last_page, "Fetching listing page");

            match self.fetch_post_page(query, page).await? {
                PageOutcome::Data(ids) => {
                    tracing::debug!(page, posts = ids.len(), "Processed listing page");
                    stats.record_listing_page(ids.len());
                    listing.pages += 1;
                    listing.post_ids.extend(ids);
                }
                PageOutcome::Exhausted => {
                    tracing::debug!(page, "Listing exhausted");
                    break;
                }
            }
        }

        Ok(listing)
    }
}
