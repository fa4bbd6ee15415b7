//! Whitespace tokenizer for queries and knowledge records.
//!
//! Both sides are lower-cased and split on runs of Unicode whitespace.
//! Punctuation is left attached to words, so `"blocks."` is a distinct
//! token from `"blocks"`; the substring signal in [`crate::score`] is what
//! catches those cases.
//!
//! Only the query side is length-filtered. Short query words such as
//! `"is"` or `"to"` would otherwise match almost every record through the
//! substring signal.

use std::collections::HashSet;

/// Query tokens shorter than this many characters are dropped.
pub const DEFAULT_MIN_QUERY_TOKEN_LEN: usize = 3;

/// Lower-case `text` and split it on whitespace, discarding empty fragments.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Filtered, ordered query tokens. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryTokens {
    tokens: Vec<String>,
}

impl QueryTokens {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }
}

/// Tokenize a query, keeping only tokens of at least `min_len` characters.
///
/// Length is counted in `char`s, so `"über"` has length 4.
pub fn tokenize_query(text: &str, min_len: usize) -> QueryTokens {
    let tokens = tokenize(text)
        .into_iter()
        .filter(|t| t.chars().count() >= min_len)
        .collect();
    QueryTokens { tokens }
}

/// Normalized view of one record: its lower-cased text and token set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTokens {
    lowered: String,
    tokens: HashSet<String>,
}

impl RecordTokens {
    pub fn new(text: &str) -> Self {
        let lowered = text.to_lowercase();
        let tokens = lowered.split_whitespace().map(str::to_string).collect();
        Self { lowered, tokens }
    }

    /// Lower-cased record text, used for substring tests.
    pub fn text(&self) -> &str {
        &self.lowered
    }

    /// Whole-word membership test.
    pub fn contains_token(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// Substring test against the lower-cased record text.
    pub fn contains_substring(&self, needle: &str) -> bool {
        self.lowered.contains(needle)
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }
}
