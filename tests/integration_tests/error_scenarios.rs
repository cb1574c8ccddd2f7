//! Error scenario integration tests
//!
//! Tests various failure modes and error handling:
//! 1. Network timeouts
//! 2. Connection failures
//! 3. HTTP error responses mid-crawl
//! 4. Malformed responses

use std::time::Duration;

use redian::crawler::{CrawlRequest, Crawler};
use redian::utils::error::{CrawlerError, FetchError, ParseError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::fixtures::{comment_page, post_page};
use crate::common::mock_config;

// ============================================================================
// Network Error Tests
// ============================================================================

#[tokio::test]
async fn test_timeout_handling() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(post_page(&["1"]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let mut config = mock_config(&mock_server.uri());
    config.crawler.request_timeout_secs = 1;

    let crawler = Crawler::new(config).unwrap();
    let result = crawler.run(&CrawlRequest::keyword("slow", 1)).await;

    match result {
        Err(CrawlerError::Fetch(FetchError::Timeout)) => {}
        other => panic!("Expected timeout error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused() {
    let crawler = Crawler::new(mock_config("http://localhost:1")).unwrap();

    let result = crawler.fetch_trending().await;

    assert!(result.is_err(), "Should fail on connection refused");
    assert!(result.unwrap_err().is_transport());
}

// ============================================================================
// HTTP Error Response Tests
// ============================================================================

#[tokio::test]
async fn test_listing_error_discards_crawl() {
    let mock_server = MockServer::start().await;
    let container = "100103type=60&q=flaky";

    Mock::given(method("GET"))
        .and(path("/api/container/getIndex"))
        .and(query_param("containerid", container))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(post_page(&["p1"])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/container/getIndex"))
        .and(query_param("containerid", container))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Comments are only fetched after the listing completes
    Mock::given(method("GET"))
        .and(path("/comments/hotflow"))
        .respond_with(ResponseTemplate::new(200).set_body_json(comment_page(&[], 0)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let crawler = Crawler::new(mock_config(&mock_server.uri())).unwrap();
    let result = crawler.run(&CrawlRequest::keyword("flaky", 3)).await;

    assert!(matches!(
        result,
        Err(CrawlerError::Fetch(FetchError::Status(502)))
    ));
}

#[tokio::test]
async fn test_comment_error_on_second_post_aborts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/container/getIndex"))
        .respond_with(ResponseTemplate::new(200).set_body_json(post_page(&["ok", "bad"])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/comments/hotflow"))
        .and(query_param("id", "ok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(comment_page(&[("fine", 1, &[])], 0)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/comments/hotflow"))
        .and(query_param("id", "bad"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let crawler = Crawler::new(mock_config(&mock_server.uri())).unwrap();
    let result = crawler.run(&CrawlRequest::keyword("x", 1)).await;

    let err = result.unwrap_err();
    assert!(err.is_transport());
    assert!(err.to_string().contains("500"));
}

// ============================================================================
// Malformed Response Tests
// ============================================================================

#[tokio::test]
async fn test_malformed_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login required</html>"))
        .mount(&mock_server)
        .await;

    let crawler = Crawler::new(mock_config(&mock_server.uri())).unwrap();
    let result = crawler.fetch_trending().await;

    assert!(matches!(
        result,
        Err(CrawlerError::Parse(ParseError::Json(_)))
    ));
}

#[tokio::test]
async fn test_post_card_without_mblog() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/container/getIndex"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": 1,
            "data": {"cards": [{"card_type": 9}]}
        })))
        .mount(&mock_server)
        .await;

    let crawler = Crawler::new(mock_config(&mock_server.uri())).unwrap();
    let result = crawler.run(&CrawlRequest::keyword("broken", 1)).await;

    assert!(matches!(
        result,
        Err(CrawlerError::Parse(ParseError::MissingField("mblog")))
    ));
}

#[tokio::test]
async fn test_comment_page_without_cursor() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/container/getIndex"))
        .respond_with(ResponseTemplate::new(200).set_body_json(post_page(&["p"])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/comments/hotflow"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": 1,
            "data": {"data": []}
        })))
        .mount(&mock_server)
        .await;

    let crawler = Crawler::new(mock_config(&mock_server.uri())).unwrap();
    let result = crawler.run(&CrawlRequest::keyword("nocursor", 1)).await;

    assert!(matches!(result, Err(CrawlerError::Parse(_))));
}
