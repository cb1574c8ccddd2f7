//! Integration tests module
//!
//! End-to-end tests of the crawler against a wiremock server standing in for
//! m.weibo.cn.

pub mod board_test;
pub mod error_scenarios;
pub mod fixtures;
