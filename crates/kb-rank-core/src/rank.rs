//! Top-K selection over a scored corpus.
//!
//! # Algorithm
//!
//! 1. Tokenize the query once with the scorer's length filter.
//! 2. Score every record; remember its corpus position.
//! 3. Drop records scoring 0.
//! 4. Sort by score (desc), then corpus position (asc).
//! 5. Truncate to `limit`.
//!
//! Ties always resolve to corpus order, so fixtures built from the same
//! corpus produce the same output on every run.

use serde::Serialize;

use crate::index::CorpusIndex;
use crate::score::{ScoreBreakdown, Scorer};
use crate::tokenize::{QueryTokens, RecordTokens};

/// Result count used when the caller does not supply one.
pub const DEFAULT_LIMIT: usize = 5;

/// A record that survived ranking, with its score and corpus position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoredRecord<'a> {
    pub text: &'a str,
    pub score: u64,
    pub position: usize,
}

/// A ranked record with its per-signal breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExplainedRecord<'a> {
    pub text: &'a str,
    pub position: usize,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone, Default)]
pub struct Ranker {
    scorer: Scorer,
}

impl Ranker {
    pub fn new(scorer: Scorer) -> Self {
        Self { scorer }
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// Ranked record texts, best first.
    pub fn rank<'a, S: AsRef<str>>(
        &self,
        query: &str,
        corpus: &'a [S],
        limit: usize,
    ) -> Vec<&'a str> {
        self.rank_scored(query, corpus, limit)
            .into_iter()
            .map(|r| r.text)
            .collect()
    }

    /// Ranked records with scores and corpus positions.
    pub fn rank_scored<'a, S: AsRef<str>>(
        &self,
        query: &str,
        corpus: &'a [S],
        limit: usize,
    ) -> Vec<ScoredRecord<'a>> {
        let query = self.scorer.query_tokens(query);
        self.rank_scored_with(&query, corpus, limit)
    }

    /// Ranked records with the per-signal breakdown of each score.
    pub fn explain<'a, S: AsRef<str>>(
        &self,
        query: &str,
        corpus: &'a [S],
        limit: usize,
    ) -> Vec<ExplainedRecord<'a>> {
        let query = self.scorer.query_tokens(query);
        self.rank_scored_with(&query, corpus, limit)
            .into_iter()
            .map(|r| ExplainedRecord {
                text: r.text,
                position: r.position,
                breakdown: self.scorer.explain(&query, &RecordTokens::new(r.text)),
            })
            .collect()
    }

    /// Rank against cached record tokens.
    ///
    /// Produces the same output as [`rank_scored`](Ranker::rank_scored) on
    /// the corpus the index was built from.
    pub fn rank_indexed<'a>(
        &self,
        query: &str,
        index: &'a CorpusIndex,
        limit: usize,
    ) -> Vec<ScoredRecord<'a>> {
        let query = self.scorer.query_tokens(query);
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }
        let scored = index
            .entries()
            .enumerate()
            .map(|(position, (text, tokens))| ScoredRecord {
                text,
                score: self.scorer.score(&query, tokens),
                position,
            });
        select_top(scored, limit)
    }

    fn rank_scored_with<'a, S: AsRef<str>>(
        &self,
        query: &QueryTokens,
        corpus: &'a [S],
        limit: usize,
    ) -> Vec<ScoredRecord<'a>> {
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }
        let scored = corpus.iter().enumerate().map(|(position, text)| {
            let text = text.as_ref();
            ScoredRecord {
                text,
                score: self.scorer.score(query, &RecordTokens::new(text)),
                position,
            }
        });
        select_top(scored, limit)
    }
}

/// Rank `corpus` against `query` with the default scorer.
pub fn rank<'a, S: AsRef<str>>(query: &str, corpus: &'a [S], limit: usize) -> Vec<&'a str> {
    Ranker::default().rank(query, corpus, limit)
}

fn select_top<'a>(
    scored: impl Iterator<Item = ScoredRecord<'a>>,
    limit: usize,
) -> Vec<ScoredRecord<'a>> {
    let mut results: Vec<ScoredRecord<'a>> = scored.filter(|r| r.score > 0).collect();
    results.sort_by(|a, b| b.score.cmp(&a.score).then(a.position.cmp(&b.position)));
    results.truncate(limit);
    results
}
