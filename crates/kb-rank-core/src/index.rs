//! Cached record tokens for repeated queries over the same corpus.
//!
//! Tokenizing every record on every query is fine for a few hundred
//! snippets. For larger corpora a [`CorpusIndex`] keeps each record's
//! [`RecordTokens`] keyed by the SHA-256 of its text, and
//! [`refresh`](CorpusIndex::refresh) re-tokenizes only records whose text
//! changed. Ranking through the index gives the same results as ranking the
//! raw corpus.

use std::collections::HashMap;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::tokenize::RecordTokens;

struct IndexedRecord {
    text: String,
    digest: String,
    tokens: Arc<RecordTokens>,
}

/// Record tokens in corpus order, reusable across queries.
#[derive(Default)]
pub struct CorpusIndex {
    records: Vec<IndexedRecord>,
}

impl CorpusIndex {
    pub fn build<S: AsRef<str>>(corpus: &[S]) -> Self {
        let mut index = Self::default();
        index.refresh(corpus);
        index
    }

    /// Bring the index in line with `corpus`.
    ///
    /// Order follows the new corpus. Tokens are reused for any record whose
    /// digest was already indexed; entries missing from `corpus` are
    /// dropped. Returns the number of records that had to be tokenized.
    pub fn refresh<S: AsRef<str>>(&mut self, corpus: &[S]) -> usize {
        let mut cached: HashMap<String, Arc<RecordTokens>> = self
            .records
            .drain(..)
            .map(|r| (r.digest, r.tokens))
            .collect();

        let mut tokenized = 0;
        for text in corpus {
            let text = text.as_ref();
            let digest = text_digest(text);
            let tokens = match cached.get(&digest) {
                Some(tokens) => Arc::clone(tokens),
                None => {
                    tokenized += 1;
                    let tokens = Arc::new(RecordTokens::new(text));
                    cached.insert(digest.clone(), Arc::clone(&tokens));
                    tokens
                }
            };
            self.records.push(IndexedRecord {
                text: text.to_string(),
                digest,
                tokens,
            });
        }
        tokenized
    }

    /// Append one record, tokenizing only that record.
    pub fn push(&mut self, text: &str) {
        self.records.push(IndexedRecord {
            text: text.to_string(),
            digest: text_digest(text),
            tokens: Arc::new(RecordTokens::new(text)),
        });
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `(text, tokens)` pairs in corpus order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &RecordTokens)> {
        self.records
            .iter()
            .map(|r| (r.text.as_str(), r.tokens.as_ref()))
    }
}

/// SHA-256 hex digest of a record's text.
pub fn text_digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
