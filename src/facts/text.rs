//! Small measurements over issue body text.

use regex::Regex;
use std::sync::LazyLock;

static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://[^\s)>\]]+").expect("link pattern is valid"));

const FENCE: &str = "```";

/// Number of complete fenced code blocks.
#[must_use]
pub fn code_block_count(body: &str) -> usize {
    body.matches(FENCE).count() / 2
}

/// Number of absolute http(s) links.
#[must_use]
pub fn link_count(body: &str) -> usize {
    LINK.find_iter(body).count()
}

/// Body length in characters, not bytes.
#[must_use]
pub fn char_len(body: &str) -> usize {
    body.chars().count()
}
