//! Read helpers over serialized block markup.
//!
//! Block content is stored as HTML-like markup. The engine never renders it;
//! it only needs plain text for completion context, the first emphasized run
//! for promotion labels, and char/byte offset conversion for cursor math.

use once_cell::sync::Lazy;
use regex::Regex;

static EMPHASIS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<strong>(.*?)</strong>|<b>(.*?)</b>").expect("valid emphasis regex")
});
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<h([12])[\s>]").expect("valid heading regex"));

/// Returns the inner markup of the first `<strong>`/`<b>` run, or `""`.
pub fn extract_emphasis(content: &str) -> String {
    EMPHASIS_RE
        .captures(content)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Strips tags and decodes the handful of entities an editor emits.
pub fn plain_text(content: &str) -> String {
    let stripped = TAG_RE.replace_all(content, "");
    stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Heading level (1 or 2) when the content starts with an `h1`/`h2` element.
pub fn heading_level(content: &str) -> Option<u8> {
    HEADING_RE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Number of chars in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Converts a char offset to a byte index, clamped to `s.len()`.
pub fn char_to_byte(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(byte_idx, _)| byte_idx)
        .unwrap_or(s.len())
}

/// Inserts `text` at char offset `at`.
pub fn insert_at(s: &str, at: usize, text: &str) -> String {
    let idx = char_to_byte(s, at);
    let mut out = String::with_capacity(s.len() + text.len());
    out.push_str(&s[..idx]);
    out.push_str(text);
    out.push_str(&s[idx..]);
    out
}

/// Replaces the char range `[from, from + len)` with `text`.
pub fn replace_range(s: &str, from: usize, len: usize, text: &str) -> String {
    let start = char_to_byte(s, from);
    let end = char_to_byte(s, from + len);
    let mut out = String::with_capacity(s.len() + text.len());
    out.push_str(&s[..start]);
    out.push_str(text);
    out.push_str(&s[end..]);
    out
}
