//! Hot-search board integration tests
//!
//! The board is fetched in two steps: the simplified board (container
//! 231583) links to the full board, whose topics carry rank order.

use redian::crawler::Crawler;
use redian::utils::error::{CrawlerError, FetchError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::fixtures::{full_board, simple_board, simple_board_without_entrance, topic_scheme, FULL_BOARD_CONTAINER};
use crate::common::mock_config;

async fn mount_board(server: &MockServer, topics: &[(&str, &str)]) {
    Mock::given(method("GET"))
        .and(path("/api/container/getIndex"))
        .and(query_param("containerid", "231583"))
        .respond_with(ResponseTemplate::new(200).set_body_json(simple_board()))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/container/getIndex"))
        .and(query_param("containerid", FULL_BOARD_CONTAINER))
        .respond_with(ResponseTemplate::new(200).set_body_json(full_board(topics)))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_trending_two_step() {
    let server = MockServer::start().await;
    mount_board(&server, &[("第一", "alpha"), ("第二", "beta"), ("第三", "gamma")]).await;

    let crawler = Crawler::new(mock_config(&server.uri())).unwrap();
    let entries = crawler.fetch_trending().await.unwrap();

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].rank, 1);
    assert_eq!(entries[0].title, "第一");
    assert_eq!(entries[0].source_url, topic_scheme("alpha"));
    assert_eq!(entries[2].rank, 3);
    assert_eq!(entries[2].title, "第三");
}

#[tokio::test]
async fn test_fetch_trending_empty_board() {
    let server = MockServer::start().await;
    mount_board(&server, &[]).await;

    let crawler = Crawler::new(mock_config(&server.uri())).unwrap();
    let entries = crawler.fetch_trending().await.unwrap();

    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_fetch_trending_missing_entrance() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/container/getIndex"))
        .and(query_param("containerid", "231583"))
        .respond_with(ResponseTemplate::new(200).set_body_json(simple_board_without_entrance()))
        .expect(1)
        .mount(&server)
        .await;

    let crawler = Crawler::new(mock_config(&server.uri())).unwrap();
    let result = crawler.fetch_trending().await;

    match result {
        Err(CrawlerError::EntranceNotFound(title)) => assert_eq!(title, "微博热搜榜"),
        other => panic!("Expected EntranceNotFound, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_trending_transport_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/container/getIndex"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let crawler = Crawler::new(mock_config(&server.uri())).unwrap();
    let result = crawler.fetch_trending().await;

    assert!(matches!(
        result,
        Err(CrawlerError::Fetch(FetchError::Status(403)))
    ));
}

#[tokio::test]
async fn test_session_headers_sent() {
    let server = MockServer::start().await;

    let mut config = mock_config(&server.uri());
    config
        .session
        .headers
        .insert("User-Agent".to_string(), "Mozilla/5.0 (iPhone)".to_string());
    config
        .session
        .headers
        .insert("MWeibo-Pwa".to_string(), "1".to_string());

    Mock::given(method("GET"))
        .and(path("/api/container/getIndex"))
        .and(wiremock::matchers::header("user-agent", "Mozilla/5.0 (iPhone)"))
        .and(wiremock::matchers::header("mweibo-pwa", "1"))
        .and(query_param("containerid", "231583"))
        .respond_with(ResponseTemplate::new(200).set_body_json(simple_board()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/container/getIndex"))
        .and(query_param("containerid", FULL_BOARD_CONTAINER))
        .respond_with(ResponseTemplate::new(200).set_body_json(full_board(&[("t", "alpha")])))
        .mount(&server)
        .await;

    let crawler = Crawler::new(config).unwrap();
    let entries = crawler.fetch_trending().await.unwrap();
    assert_eq!(entries.len(), 1);
}
