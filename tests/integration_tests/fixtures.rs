//! Test fixtures for integration tests
//!
//! JSON bodies shaped like the m.weibo.cn mobile API responses.

use serde_json::{json, Value};

/// Scheme of the simplified board shortcut pointing at the full board
pub const FULL_BOARD_SCHEME: &str = "https://m.weibo.cn/p/index?containerid=106003type%3D25%26t%3D3%26disable_hot%3D1%26filter_type%3Drealtimehot&title=%E5%BE%AE%E5%8D%9A%E7%83%AD%E6%90%9C";

/// Decoded container id of the full board
pub const FULL_BOARD_CONTAINER: &str = "106003type=25&t=3&disable_hot=1&filter_type=realtimehot";

/// Scheme URL of a board topic
pub fn topic_scheme(tag: &str) -> String {
    format!("https://m.weibo.cn/search?containerid=100103type%3D1%26q%3D{tag}&isnewpage=1")
}

/// Decoded container id of a board topic
pub fn topic_container(tag: &str) -> String {
    format!("100103type=1&q={tag}")
}

/// Simplified board with the full-board shortcut among other entries
pub fn simple_board() -> Value {
    json!({
        "ok": 1,
        "data": {
            "cards": [{
                "card_type": 11,
                "group": [
                    {"title_sub": "同城", "scheme": "https://m.weibo.cn/p/index?containerid=1"},
                    {"title_sub": "微博热搜榜", "scheme": FULL_BOARD_SCHEME},
                    {"title_sub": "要闻榜", "scheme": "https://m.weibo.cn/p/index?containerid=2"}
                ]
            }]
        }
    })
}

/// Simplified board without the full-board shortcut
pub fn simple_board_without_entrance() -> Value {
    json!({
        "ok": 1,
        "data": {
            "cards": [{
                "group": [{"title_sub": "同城", "scheme": "https://m.weibo.cn/p/index?containerid=1"}]
            }]
        }
    })
}

/// Full board listing the given `(title, tag)` topics in rank order
pub fn full_board(topics: &[(&str, &str)]) -> Value {
    let group: Vec<Value> = topics
        .iter()
        .map(|(title, tag)| json!({"desc": title, "scheme": topic_scheme(tag), "card_type": 4}))
        .collect();

    json!({
        "ok": 1,
        "data": {"cards": [{"card_group": group}]}
    })
}

/// Listing page with one post card per id plus a non-post card
pub fn post_page(ids: &[&str]) -> Value {
    let mut cards: Vec<Value> = vec![json!({"card_type": 11, "card_group": []})];
    cards.extend(
        ids.iter()
            .map(|id| json!({"card_type": 9, "mblog": {"id": id, "text": "post"}})),
    );

    json!({"ok": 1, "data": {"cards": cards}})
}

/// Listing page signalling exhaustion
pub fn exhausted_page() -> Value {
    json!({"ok": 0, "msg": "这里还没有内容", "data": {"cards": []}})
}

/// Comment page with `(text, like_count, replies)` entries and the next cursor
pub fn comment_page(comments: &[(&str, u64, &[&str])], max_id: u64) -> Value {
    let data: Vec<Value> = comments
        .iter()
        .map(|(text, likes, replies)| {
            let replies_value = if replies.is_empty() {
                Value::Bool(false)
            } else {
                Value::Array(replies.iter().map(|r| json!({"text": r})).collect())
            };
            json!({"text": text, "like_count": likes, "comments": replies_value})
        })
        .collect();

    json!({
        "ok": 1,
        "data": {"data": data, "total_number": 100, "max_id": max_id, "max_id_type": 0}
    })
}

/// Comment endpoint answer for a post without further comments
pub fn no_comments() -> Value {
    json!({"ok": 0, "msg": "快来发表你的评论吧"})
}
