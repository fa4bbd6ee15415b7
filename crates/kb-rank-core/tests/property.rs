//! Property-based tests using proptest.
//!
//! These check the ranking invariants over randomly generated queries and
//! corpora: determinism, the score > 0 threshold, truncation length,
//! corpus-order tie-breaks, and exact-match dominance.

use kb_rank_core::index::CorpusIndex;
use kb_rank_core::rank::{rank, Ranker};
use kb_rank_core::score::Scorer;
use kb_rank_core::tokenize::{tokenize_query, RecordTokens};
use proptest::prelude::*;

// ============================================================================
// STRATEGIES
// ============================================================================

/// Lower-case words drawn from a small alphabet so overlaps are common.
fn word_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[abcrst]{1,7}").unwrap()
}

/// Mixed-case record text, occasionally with punctuation.
fn record_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        (word_strategy(), any::<bool>(), prop::sample::select(vec!["", ".", ",", ":"])),
        0..8,
    )
    .prop_map(|words| {
        words
            .into_iter()
            .map(|(w, upper, punct)| {
                let w = if upper { w.to_uppercase() } else { w };
                format!("{}{}", w, punct)
            })
            .collect::<Vec<_>>()
            .join(" ")
    })
}

fn corpus_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(record_strategy(), 0..12)
}

fn query_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(word_strategy(), 0..4).prop_map(|w| w.join(" "))
}

// ============================================================================
// RANKING PROPERTIES
// ============================================================================

proptest! {
    /// Property: identical inputs give identical ordered output.
    #[test]
    fn prop_rank_deterministic(query in query_strategy(), corpus in corpus_strategy(), limit in 0usize..8) {
        let first = rank(&query, &corpus, limit);
        let second = rank(&query, &corpus, limit);
        prop_assert_eq!(first, second);
    }

    /// Property: every returned record scores above zero and the reported
    /// score matches the scorer.
    #[test]
    fn prop_results_have_positive_scores(query in query_strategy(), corpus in corpus_strategy()) {
        let ranker = Ranker::default();
        let scorer = Scorer::default();
        for r in ranker.rank_scored(&query, &corpus, corpus.len()) {
            prop_assert!(r.score > 0);
            prop_assert_eq!(r.score, scorer.score_text(&query, r.text));
            prop_assert_eq!(r.text, corpus[r.position].as_str());
        }
    }

    /// Property: output length is min(limit, number of records scoring > 0).
    #[test]
    fn prop_truncation_length(query in query_strategy(), corpus in corpus_strategy(), limit in 0usize..15) {
        let scorer = Scorer::default();
        let positive = corpus.iter().filter(|r| scorer.score_text(&query, r) > 0).count();
        let out = Ranker::default().rank_scored(&query, &corpus, limit);
        prop_assert_eq!(out.len(), limit.min(positive));
    }

    /// Property: scores never increase down the list, and equal scores keep
    /// corpus order.
    #[test]
    fn prop_sorted_with_stable_ties(query in query_strategy(), corpus in corpus_strategy()) {
        let out = Ranker::default().rank_scored(&query, &corpus, corpus.len());
        for w in out.windows(2) {
            prop_assert!(w[0].score >= w[1].score);
            if w[0].score == w[1].score {
                prop_assert!(w[0].position < w[1].position);
            }
        }
    }

    /// Property: a limited result is a prefix of the unlimited result.
    #[test]
    fn prop_limit_is_prefix(query in query_strategy(), corpus in corpus_strategy(), limit in 0usize..6) {
        let ranker = Ranker::default();
        let full = ranker.rank_scored(&query, &corpus, usize::MAX);
        let cut = ranker.rank_scored(&query, &corpus, limit);
        prop_assert_eq!(&full[..cut.len()], &cut[..]);
    }

    /// Property: a whole-word hit outscores the same word buried in a
    /// longer one, all else equal.
    #[test]
    fn prop_exact_match_dominance(
        word in "[a-z]{3,8}",
        filler in prop::collection::vec("[0-9]{1,5}", 0..5),
    ) {
        let base = filler.join(" ");
        let whole = format!("{} {}", base, word);
        let buried = format!("{} {}zz", base, word);
        let scorer = Scorer::default();
        prop_assert!(scorer.score_text(&word, &whole) > scorer.score_text(&word, &buried));
    }

    /// Property: queries made only of one- and two-letter words never match.
    #[test]
    fn prop_short_queries_return_nothing(
        words in prop::collection::vec("[a-z]{1,2}", 0..6),
        corpus in corpus_strategy(),
    ) {
        let query = words.join(" ");
        prop_assert!(rank(&query, &corpus, 5).is_empty());
    }

    /// Property: query tokens always meet the length threshold.
    #[test]
    fn prop_query_tokens_meet_min_len(query in query_strategy(), min_len in 0usize..6) {
        for t in tokenize_query(&query, min_len).iter() {
            prop_assert!(t.chars().count() >= min_len);
        }
    }

    /// Property: ranking through a corpus index matches ranking raw text.
    #[test]
    fn prop_index_matches_direct(query in query_strategy(), corpus in corpus_strategy(), limit in 0usize..8) {
        let ranker = Ranker::default();
        let index = CorpusIndex::build(&corpus);
        prop_assert_eq!(
            ranker.rank_indexed(&query, &index, limit),
            ranker.rank_scored(&query, &corpus, limit)
        );
    }

    /// Property: refreshing with a changed corpus behaves like a rebuild.
    #[test]
    fn prop_refresh_equals_rebuild(
        query in query_strategy(),
        before in corpus_strategy(),
        after in corpus_strategy(),
    ) {
        let ranker = Ranker::default();
        let mut index = CorpusIndex::build(&before);
        index.refresh(&after);
        let rebuilt = CorpusIndex::build(&after);
        prop_assert_eq!(
            ranker.rank_indexed(&query, &index, 10),
            ranker.rank_indexed(&query, &rebuilt, 10)
        );
    }

    /// Property: record tokenization is pure.
    #[test]
    fn prop_record_tokens_pure(record in record_strategy()) {
        prop_assert_eq!(RecordTokens::new(&record), RecordTokens::new(&record));
    }
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn scenario_stringer_block() {
    let corpus = [
        "Stringing Blocks ... stringing sheaves or conductor blocks.",
        "Rentals: T&D specialty — ... stringing blocks.",
    ];
    let out = Ranker::default().rank_scored("stringer block", &corpus, 5);
    assert_eq!(out.len(), 2);
    assert!(out.iter().all(|r| r.score > 0));
}

#[test]
fn scenario_empty_query() {
    let corpus = ["alpha", "beta", "gamma"];
    assert!(rank("", &corpus, 5).is_empty());
}

#[test]
fn scenario_short_tokens() {
    let corpus = ["is it on", "it is on the block"];
    assert!(rank("is it on", &corpus, 5).is_empty());
}

#[test]
fn scenario_limit_five_of_ten() {
    let corpus: Vec<String> = (0..10)
        .map(|i| format!("sheave {}", "rope ".repeat(i % 3)))
        .collect();
    let out = Ranker::default().rank_scored("sheave rope", &corpus, 5);
    assert_eq!(out.len(), 5);
    // scores: i%3 != 0 -> 10, i%3 == 0 -> 5
    let positions: Vec<usize> = out.iter().map(|r| r.position).collect();
    assert_eq!(positions, vec![1, 2, 4, 5, 7]);
}
