//! Configuration management for the redian crawler
//!
//! This module handles loading and validating configuration from environment
//! variables and files. Session material (request headers and the cookie
//! string) is carried through untouched; the crawler never inspects or
//! refreshes it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Error;

/// Default mobile API host
pub const DEFAULT_BASE_URL: &str = "https://m.weibo.cn";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Crawler configuration
    pub crawler: CrawlerConfig,

    /// Session headers and cookies
    pub session: SessionConfig,

    /// Output configuration
    pub output: OutputConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Crawler-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// API host, overridable for mock servers
    pub base_url: String,

    /// Rate limit (requests per second)
    pub requests_per_second: u32,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Pause between two comment pages of the same post, in milliseconds
    pub page_delay_ms: u64,

    /// Whether the listing page loop includes `scale` itself
    pub page_bound: PageBound,
}

/// Upper boundary of the listing page loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageBound {
    /// Fetch pages `1..=scale`
    #[default]
    Inclusive,
    /// Fetch pages `1..scale`
    Exclusive,
}

impl PageBound {
    /// Last page number to request for the given scale
    pub fn last_page(&self, scale: u32) -> u32 {
        match self {
            Self::Inclusive => scale,
            Self::Exclusive => scale.saturating_sub(1),
        }
    }
}

/// Session material injected into every request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Extra request headers (User-Agent, Referer, ...)
    pub headers: BTreeMap<String, String>,

    /// Raw cookie string as copied from a logged-in browser
    pub cookies: String,
}

impl SessionConfig {
    /// Split the cookie string into `(name, value)` pairs
    ///
    /// Pairs are separated by `;` and split on the first `=`; surrounding
    /// whitespace is trimmed. Empty segments are skipped.
    pub fn cookie_pairs(&self) -> crate::error::Result<Vec<(String, String)>> {
        self.cookies
            .split(';')
            .filter(|segment| !segment.trim().is_empty())
            .map(|segment| {
                let (name, value) = segment.split_once('=').ok_or_else(|| {
                    Error::config(format!("cookie segment without '=': {}", segment.trim()))
                })?;
                Ok((name.trim().to_string(), value.trim().to_string()))
            })
            .collect()
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving one file per topic
    pub dir: PathBuf,

    /// File format
    pub format: OutputFormat,
}

/// Output file format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text, replies indented by a tab
    #[default]
    Text,
    /// Pretty-printed JSON array
    Json,
}

impl std::str::FromStr for PageBound {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inclusive" => Ok(Self::Inclusive),
            "exclusive" => Ok(Self::Exclusive),
            _ => Err(Error::config(format!(
                "Unknown page bound: {s}. Valid: inclusive, exclusive"
            ))),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(Error::config(format!(
                "Unknown output format: {s}. Valid: text, json"
            ))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

/// Layout of the legacy `config.json`: headers and cookies at the top level
#[derive(Debug, Deserialize)]
struct LegacySessionFile {
    headers: BTreeMap<String, String>,
    cookies: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let base_url =
            std::env::var("REDIAN_BASE_URL").unwrap_or_else(|_| defaults.crawler.base_url.clone());

        let requests_per_second = std::env::var("REDIAN_RATE_LIMIT")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(defaults.crawler.requests_per_second);

        let request_timeout_secs = std::env::var("REDIAN_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.crawler.request_timeout_secs);

        let page_delay_ms = std::env::var("REDIAN_PAGE_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.crawler.page_delay_ms);

        let mut headers = BTreeMap::new();
        if let Ok(user_agent) = std::env::var("REDIAN_USER_AGENT") {
            headers.insert(String::from("User-Agent"), user_agent);
        }
        let cookies = std::env::var("REDIAN_COOKIES").unwrap_or_default();

        let output_dir = std::env::var("REDIAN_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| defaults.output.dir.clone());

        let log_level = std::env::var("REDIAN_LOG_LEVEL").unwrap_or_else(|_| String::from("info"));
        let log_format = std::env::var("REDIAN_LOG_FORMAT").unwrap_or_else(|_| String::from("text"));

        Ok(Self {
            crawler: CrawlerConfig {
                base_url,
                requests_per_second,
                request_timeout_secs,
                page_delay_ms,
                page_bound: PageBound::default(),
            },
            session: SessionConfig { headers, cookies },
            output: OutputConfig {
                dir: output_dir,
                format: OutputFormat::default(),
            },
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        })
    }

    /// Load configuration from a file
    ///
    /// `.json` files may use the legacy layout with top-level `headers` and
    /// `cookies`; everything else is parsed as TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&content)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))
        }
    }

    fn from_json_str(content: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(content)?;

        if value.get("session").is_some() || value.get("crawler").is_some() {
            return Ok(serde_json::from_value(value)?);
        }

        let legacy: LegacySessionFile = serde_json::from_value(value)?;
        Ok(Self {
            session: SessionConfig {
                headers: legacy.headers,
                cookies: legacy.cookies,
            },
            ..Self::default()
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.crawler.base_url.trim().is_empty() {
            return Err(Error::config("base_url must not be empty"));
        }

        url::Url::parse(&self.crawler.base_url)
            .map_err(|e| Error::config(format!("invalid base_url: {e}")))?;

        if self.crawler.requests_per_second == 0 {
            return Err(Error::config("requests_per_second must be greater than 0"));
        }

        if self.crawler.request_timeout_secs == 0 {
            return Err(Error::config("request_timeout_secs must be greater than 0"));
        }

        self.session.cookie_pairs()?;

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.crawler.request_timeout_secs)
    }

    /// Get the pause between comment pages as Duration
    #[must_use]
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.crawler.page_delay_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            requests_per_second: 2,
            request_timeout_secs: 30,
            page_delay_ms: 1000,
            page_bound: PageBound::Inclusive,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            format: OutputFormat::Text,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}
