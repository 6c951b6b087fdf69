use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

const WORDS_PER_MINUTE: usize = 200;

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// An extracted, not yet scored, listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleCandidate {
    pub title: String,
    /// Absolute http(s) URL.
    pub url: String,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub source: String,
    pub category: String,
    pub read_time: u32,
    pub captured_at: DateTime<Utc>,
}

/// Collapse runs of whitespace (including newlines) into single spaces.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text.trim(), " ").into_owned()
}

/// Minutes to read `text` at 200 words per minute, never less than one.
pub fn estimate_read_time(text: Option<&str>) -> u32 {
    let words = text.map_or(0, |t| t.split_whitespace().count());
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_time_rounds_up_and_never_hits_zero() {
        let four_hundred = vec!["word"; 400].join(" ");
        let four_oh_one = vec!["word"; 401].join(" ");
        assert_eq!(estimate_read_time(Some(&four_hundred)), 2);
        assert_eq!(estimate_read_time(Some(&four_oh_one)), 3);
        assert_eq!(estimate_read_time(Some("word")), 1);
        assert_eq!(estimate_read_time(Some("   ")), 1);
        assert_eq!(estimate_read_time(None), 1);
    }

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(
            normalize_whitespace("  Floods\n\t hit   the coast "),
            "Floods hit the coast"
        );
    }
}
