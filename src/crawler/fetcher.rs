//! HTTP fetcher for the m.weibo.cn mobile API
//!
//! This module provides the single HTTP entry point used by the crawl loops:
//! - Session headers and cookies injected from configuration
//! - Rate limiting with governor
//! - Base URL override for mock servers
//!
//! No retry is attempted: any status other than 200 surfaces as
//! [`FetchError::Status`].

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::{
    cookie::Jar,
    header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, USER_AGENT},
    Client, StatusCode, Url,
};

use crate::config::{Config, SessionConfig};
use crate::error::Error;
use crate::utils::error::FetchError;

/// Weibo mobile API fetcher
pub struct WeiboFetcher {
    /// HTTP client with session headers and cookie jar
    client: Client,

    /// Rate limiter to control request frequency
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,

    /// API host, e.g. `https://m.weibo.cn`
    base_url: String,
}

impl WeiboFetcher {
    /// Create a fetcher from configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for an invalid base URL or cookie string and
    /// `Error::Other` when a configured header cannot be used.
    pub fn new(config: &Config) -> crate::error::Result<Self> {
        Self::build(
            &config.crawler.base_url,
            &config.session,
            config.crawler.requests_per_second,
            config.request_timeout(),
        )
    }

    /// Create a fetcher against a custom host without session material
    ///
    /// # Arguments
    ///
    /// * `base_url` - Host to prepend to every endpoint path
    /// * `requests_per_second` - Maximum number of requests per second
    pub fn with_base_url(base_url: &str, requests_per_second: u32) -> crate::error::Result<Self> {
        Self::build(
            base_url,
            &SessionConfig::default(),
            requests_per_second,
            Duration::from_secs(30),
        )
    }

    fn build(
        base_url: &str,
        session: &SessionConfig,
        requests_per_second: u32,
        timeout: Duration,
    ) -> crate::error::Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| Error::config(format!("invalid base_url {base_url}: {e}")))?;

        let jar = Arc::new(Jar::default());
        for (name, value) in session.cookie_pairs()? {
            jar.add_cookie_str(&format!("{name}={value}"), &base);
        }

        let client = Client::builder()
            .default_headers(build_session_headers(session)?)
            .cookie_provider(jar)
            .timeout(timeout)
            .gzip(true)
            .build()?;

        let rate = NonZeroU32::new(requests_per_second)
            .ok_or_else(|| Error::config("requests_per_second must be greater than 0"))?;
        let rate_limiter = RateLimiter::direct(Quota::per_second(rate));

        Ok(Self {
            client,
            rate_limiter,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// API host every path is resolved against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` with query parameters and return the body as text
    ///
    /// # Arguments
    ///
    /// * `path` - Endpoint path starting with `/`
    /// * `params` - Query parameters, sent in order
    ///
    /// # Errors
    ///
    /// `FetchError::Status` for any status other than 200,
    /// `FetchError::Timeout` when the request times out,
    /// `FetchError::Http` for other client failures.
    pub async fn get_text(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<String, FetchError> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{path}", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        tracing::debug!(url = %response.url(), status = status.as_u16(), "Fetched");

        if status != StatusCode::OK {
            tracing::warn!(
                url = %response.url(),
                status = status.as_u16(),
                "Request failed"
            );
            return Err(FetchError::Status(status.as_u16()));
        }

        response.text().await.map_err(classify)
    }
}

fn classify(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Http(err)
    }
}

/// Build the default header map from the session configuration
///
/// A JSON `Accept` header and a crate User-Agent are added unless the session
/// already provides them.
pub fn build_session_headers(session: &SessionConfig) -> crate::error::Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/json, text/plain, */*"),
    );
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(concat!("redian/", env!("CARGO_PKG_VERSION"))),
    );

    for (name, value) in &session.headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::with_source(format!("invalid header name: {name}"), e))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| Error::with_source(format!("invalid value for header {name}"), e))?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}
