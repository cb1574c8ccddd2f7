//! Comment text sanitization
//!
//! Weibo comment bodies embed emoji as `<span class="url-icon"><img ...></span>`
//! and mentions or topic links as `<a href=...>...</a>`. Both are dropped; the
//! rest of the text is returned exactly as received.

use regex::Regex;
use std::sync::LazyLock;

// Non-greedy, single pass, case-sensitive
static MARKUP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(span.+?</span|a.+?</a)>").expect("Invalid regex pattern"));

/// Remove embedded `<span ...>...</span>` and `<a ...>...</a>` markup
///
/// No HTML-entity decoding and no whitespace normalization is applied.
///
/// # Examples
///
/// ```
/// use redian::parser::sanitize::strip_markup;
///
/// let raw = r##"hello <span class="x">😀</span> world <a href="#">@user</a>!"##;
/// assert_eq!(strip_markup(raw), "hello  world !");
/// ```
pub fn strip_markup(text: &str) -> String {
    MARKUP_REGEX.replace_all(text, "").into_owned()
}

/// Sanitize every reply text of a comment, keeping order
pub fn strip_markup_all<'a, I>(texts: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    texts.into_iter().map(strip_markup).collect()
}
