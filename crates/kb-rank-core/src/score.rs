//! Lexical relevance scoring for one (query, record) pair.
//!
//! # Signals
//!
//! For every query token (duplicates included):
//!
//! 1. **Exact**: `+exact_weight` if the token is one of the record's tokens.
//! 2. **Substring**: `+substring_weight` if the lower-cased record text
//!    contains the token anywhere, word boundary or not. Counted once per
//!    token regardless of how often it occurs.
//! 3. **Bridge**: the sum of every [`BridgeTable`] rule that fires.
//!
//! The signals are independent, so a whole-word hit earns both 1 and 2.
//! The total is not normalized by record or query length.

use serde::Serialize;

use crate::bridge::BridgeTable;
use crate::tokenize::{tokenize_query, QueryTokens, RecordTokens, DEFAULT_MIN_QUERY_TOKEN_LEN};

pub const DEFAULT_EXACT_WEIGHT: u32 = 3;
pub const DEFAULT_SUBSTRING_WEIGHT: u32 = 2;

/// Weights and filters used by a [`Scorer`].
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub exact_weight: u32,
    pub substring_weight: u32,
    /// Query tokens shorter than this (in characters) are ignored.
    pub min_query_token_len: usize,
    pub bridges: BridgeTable,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            exact_weight: DEFAULT_EXACT_WEIGHT,
            substring_weight: DEFAULT_SUBSTRING_WEIGHT,
            min_query_token_len: DEFAULT_MIN_QUERY_TOKEN_LEN,
            bridges: BridgeTable::default(),
        }
    }
}

/// Per-signal contributions to a record's score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub exact: u64,
    pub substring: u64,
    pub bridge: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Scorer {
    config: ScoringConfig,
}

impl Scorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Tokenize a query with this scorer's length filter.
    pub fn query_tokens(&self, query: &str) -> QueryTokens {
        tokenize_query(query, self.config.min_query_token_len)
    }

    pub fn score(&self, query: &QueryTokens, record: &RecordTokens) -> u64 {
        self.explain(query, record).total
    }

    pub fn explain(&self, query: &QueryTokens, record: &RecordTokens) -> ScoreBreakdown {
        let exact_weight = u64::from(self.config.exact_weight);
        let substring_weight = u64::from(self.config.substring_weight);

        let mut out = ScoreBreakdown::default();
        for token in query.iter() {
            if record.contains_token(token) {
                out.exact += exact_weight;
            }
            if record.contains_substring(token) {
                out.substring += substring_weight;
            }
            out.bridge += self.config.bridges.score_token(token, record.text());
        }
        out.total = out.exact + out.substring + out.bridge;
        out
    }

    /// Convenience: score raw query text against raw record text.
    pub fn score_text(&self, query: &str, record: &str) -> u64 {
        self.score(&self.query_tokens(query), &RecordTokens::new(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> Scorer {
        Scorer::new(ScoringConfig {
            bridges: BridgeTable::empty(),
            ..ScoringConfig::default()
        })
    }

    #[test]
    fn test_exact_and_substring_both_count() {
        let s = plain();
        let q = s.query_tokens("block");
        let b = s.explain(&q, &RecordTokens::new("one block here"));
        assert_eq!(b.exact, 3);
        assert_eq!(b.substring, 2);
        assert_eq!(b.bridge, 0);
        assert_eq!(b.total, 5);
    }

    #[test]
    fn test_substring_only_inside_longer_word() {
        let s = plain();
        assert_eq!(s.score_text("block", "conductor blocks"), 2);
    }

    #[test]
    fn test_substring_counted_once_per_token() {
        let s = plain();
        assert_eq!(
            s.score_text("rope", "ropes ropes ropes"),
            s.score_text("rope", "ropes")
        );
    }

    #[test]
    fn test_duplicate_query_tokens_each_count() {
        let s = plain();
        assert_eq!(s.score_text("block block", "block"), 10);
    }

    #[test]
    fn test_case_insensitive() {
        let s = plain();
        assert_eq!(s.score_text("BLOCK", "Block"), 5);
    }

    #[test]
    fn test_empty_query_scores_zero() {
        let s = Scorer::default();
        assert_eq!(s.score_text("", "anything at all"), 0);
        assert_eq!(s.score_text("is it on", "it is on"), 0);
    }

    #[test]
    fn test_no_overlap_scores_zero() {
        assert_eq!(Scorer::default().score_text("pulley", "office hours"), 0);
    }

    #[test]
    fn test_bridge_signal_default_table() {
        let s = Scorer::default();
        let q = s.query_tokens("stringer");
        let b = s.explain(&q, &RecordTokens::new("Stringing Blocks for rent"));
        assert_eq!(b.exact, 0);
        assert_eq!(b.substring, 0);
        assert_eq!(b.bridge, 3);
    }

    #[test]
    fn test_stringer_block_scenario() {
        let s = Scorer::default();
        let q = s.query_tokens("stringer block");
        let r1 = RecordTokens::new(
            "Stringing Blocks ... stringing sheaves or conductor blocks.",
        );
        let r2 = RecordTokens::new("Rentals: T&D specialty — ... stringing blocks.");
        // stringer: bridge 2 + root 1; block: substring 2
        assert_eq!(s.score(&q, &r1), 5);
        assert_eq!(s.score(&q, &r2), 5);
    }

    #[test]
    fn test_custom_weights() {
        let s = Scorer::new(ScoringConfig {
            exact_weight: 10,
            substring_weight: 0,
            min_query_token_len: 1,
            bridges: BridgeTable::empty(),
        });
        assert_eq!(s.score_text("a", "a b"), 10);
    }
}
