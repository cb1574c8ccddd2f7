//! m.weibo.cn mobile API wire format
//!
//! Typed structures for the three endpoints the crawler talks to, plus the
//! small amount of interpretation the crawl needs (entrance lookup, post card
//! filtering, comment conversion). Anything that does not match these shapes
//! is a [`ParseError`]; the crawl fails fast instead of guessing.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;

use crate::models::{Comment, Cursor, TrendingEntry};
use crate::parser::sanitize::{strip_markup, strip_markup_all};
use crate::utils::error::ParseError;

// ============================================================================
// Endpoint constants
// ============================================================================

/// Container index endpoint (boards, topic feeds, search results)
pub const INDEX_PATH: &str = "/api/container/getIndex";

/// Hot comment thread endpoint
pub const COMMENTS_PATH: &str = "/comments/hotflow";

/// Container id of the simplified hot-search board
pub const HOT_BOARD_CONTAINER: &str = "231583";

/// `title_sub` of the simplified entry linking to the full board
pub const HOT_BOARD_TITLE: &str = "微博热搜榜";

/// Container id prefix for keyword search; the keyword is appended
pub const SEARCH_CONTAINER_PREFIX: &str = "100103type=60&q=";

/// `page_type` used for topic feeds and keyword search
pub const PAGE_TYPE_SEARCHALL: &str = "searchall";

/// `type` selecting the "hot" tab of a topic feed
pub const HOT_TAB_TYPE: &str = "60";

/// `card_type` of a card wrapping a single post
pub const POST_CARD_TYPE: i64 = 9;

/// `ok` value of a page that carries data
pub const OK_DATA: i64 = 1;

/// `ok` value signalling that a listing has no further pages
pub const OK_EXHAUSTED: i64 = 0;

/// Build the container id for a keyword search
pub fn search_container_id(keyword: &str) -> String {
    format!("{SEARCH_CONTAINER_PREFIX}{keyword}")
}

// ============================================================================
// Response structures
// ============================================================================

/// Response envelope carrying the `ok` status flag
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// 1 = data, 0 = exhausted, negative values for login/limit failures
    pub ok: i64,

    /// Payload, absent when `ok != 1` on most endpoints
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Take the payload, failing when the server omitted it
    pub fn into_data(self) -> Result<T, ParseError> {
        self.data.ok_or(ParseError::MissingField("data"))
    }
}

/// Hot-search board response (no status flag is consulted)
#[derive(Debug, Clone, Deserialize)]
pub struct BoardResponse<C> {
    pub data: BoardData<C>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoardData<C> {
    pub cards: Vec<C>,
}

/// First card of the simplified board
#[derive(Debug, Clone, Deserialize)]
pub struct SimpleBoardCard {
    #[serde(default)]
    pub group: Vec<BoardShortcut>,
}

/// Shortcut entry on the simplified board
#[derive(Debug, Clone, Deserialize)]
pub struct BoardShortcut {
    #[serde(default)]
    pub title_sub: String,

    #[serde(default)]
    pub scheme: String,
}

/// First card of the full board
#[derive(Debug, Clone, Deserialize)]
pub struct FullBoardCard {
    #[serde(default)]
    pub card_group: Vec<BoardTopic>,
}

/// One topic of the full board
#[derive(Debug, Clone, Deserialize)]
pub struct BoardTopic {
    pub desc: String,
    pub scheme: String,
}

/// Page of a topic feed or keyword search
#[derive(Debug, Clone, Deserialize)]
pub struct CardPage {
    #[serde(default)]
    pub cards: Vec<Card>,
}

/// Listing card; only post cards carry `mblog`
#[derive(Debug, Clone, Deserialize)]
pub struct Card {
    pub card_type: i64,

    #[serde(default)]
    pub mblog: Option<Mblog>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Mblog {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
}

/// Page of the hot comment thread
#[derive(Debug, Clone, Deserialize)]
pub struct CommentPageData {
    #[serde(default)]
    pub data: Vec<RawComment>,

    #[serde(deserialize_with = "cursor_from_any")]
    pub max_id: Cursor,
}

/// Comment object as returned by `hotflow`
#[derive(Debug, Clone, Deserialize)]
pub struct RawComment {
    pub text: String,

    #[serde(default)]
    pub like_count: Option<u64>,

    /// Inline replies; the API sends `false` or `null` when there are none
    #[serde(default, deserialize_with = "replies_or_flag")]
    pub comments: Vec<RawReply>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawReply {
    pub text: String,
}

impl RawComment {
    /// Sanitize body and replies into a [`Comment`]
    pub fn into_comment(self, capture_like_count: bool) -> Comment {
        Comment {
            body: strip_markup(&self.text),
            like_count: if capture_like_count {
                self.like_count
            } else {
                None
            },
            replies: strip_markup_all(self.comments.iter().map(|r| r.text.as_str())),
        }
    }
}

// ============================================================================
// Decoding and interpretation
// ============================================================================

/// Decode a response body
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ParseError> {
    Ok(serde_json::from_str(body)?)
}

/// Find the scheme URL of the shortcut whose `title_sub` equals `title`
pub fn find_entrance<'a>(shortcuts: &'a [BoardShortcut], title: &str) -> Option<&'a str> {
    shortcuts
        .iter()
        .rev()
        .find(|s| s.title_sub == title)
        .map(|s| s.scheme.as_str())
}

/// Convert full-board topics into ranked entries (rank starts at 1)
pub fn board_entries(topics: Vec<BoardTopic>) -> Vec<TrendingEntry> {
    topics
        .into_iter()
        .enumerate()
        .map(|(i, t)| TrendingEntry::new(i + 1, t.desc, t.scheme))
        .collect()
}

/// Decode the query string of an embedded URL into request parameters
///
/// Blank values are dropped, keys keep their order and may repeat.
pub fn query_pairs(raw_url: &str) -> Result<Vec<(String, String)>, ParseError> {
    let parsed = url::Url::parse(raw_url)
        .map_err(|e| ParseError::InvalidUrl(format!("{raw_url}: {e}")))?;

    Ok(parsed
        .query_pairs()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect())
}

/// Extract post ids from the post cards of a listing page, in page order
pub fn extract_post_ids(cards: &[Card]) -> Result<Vec<String>, ParseError> {
    cards
        .iter()
        .filter(|card| card.card_type == POST_CARD_TYPE)
        .map(|card| {
            card.mblog
                .as_ref()
                .map(|m| m.id.clone())
                .ok_or(ParseError::MissingField("mblog"))
        })
        .collect()
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

fn cursor_from_any<'de, D>(deserializer: D) -> Result<Cursor, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = string_or_number(deserializer)?;
    raw.trim()
        .parse::<u64>()
        .map(Cursor)
        .map_err(|_| de::Error::custom(format!("invalid max_id: {raw}")))
}

fn replies_or_flag<'de, D>(deserializer: D) -> Result<Vec<RawReply>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Replies {
        List(Vec<RawReply>),
        Flag(bool),
    }

    Ok(match Option::<Replies>::deserialize(deserializer)? {
        Some(Replies::List(list)) => list,
        Some(Replies::Flag(_)) | None => Vec::new(),
    })
}
