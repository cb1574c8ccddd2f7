//! Common utilities and helper functions
//!
//! This module provides shared utilities used across the application.

pub mod error;

use regex::Regex;
use std::sync::OnceLock;

/// Sanitize filename by removing invalid characters
///
/// Hot-search titles routinely contain `/`, `?` or quotes, so every topic
/// title goes through here before becoming an output file name.
pub fn sanitize_filename(filename: &str) -> String {
    static INVALID_CHARS: OnceLock<Regex> = OnceLock::new();

    let re = INVALID_CHARS
        .get_or_init(|| Regex::new(r#"[<>:"/\\|?*\x00-\x1f]"#).expect("Invalid regex pattern"));

    let cleaned = re.replace_all(filename.trim(), "_").to_string();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        String::from("_")
    } else {
        cleaned
    }
}

/// Truncate text to a maximum number of characters
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}
