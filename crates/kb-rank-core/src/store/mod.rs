//! Knowledge store abstraction.
//!
//! The relevance engine never fetches or persists records itself; callers
//! load the corpus from a [`KnowledgeStore`] and pass it in. The trait also
//! carries the two retrieval paths the chat front-end uses:
//!
//! | Method | Retrieval |
//! |--------|-----------|
//! | [`retrieve_context_naive`](KnowledgeStore::retrieve_context_naive) | records containing the whole query as a substring |
//! | [`retrieve_context`](KnowledgeStore::retrieve_context) | top-K from the lexical [`Ranker`] |
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::KnowledgeRecord;
use crate::rank::Ranker;

#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Append a record. Blank text is rejected.
    async fn add_knowledge(&self, text: &str) -> Result<KnowledgeRecord>;

    /// All records in insertion order.
    async fn all_knowledge(&self) -> Result<Vec<KnowledgeRecord>>;

    /// Remove every record, returning how many were removed.
    async fn clear_all_knowledge(&self) -> Result<usize>;

    /// Records whose lower-cased text contains the whole lower-cased query.
    async fn retrieve_context_naive(&self, query: &str) -> Result<Vec<KnowledgeRecord>> {
        let records = self.all_knowledge().await?;
        let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
        Ok(naive_filter(query, &texts)
            .into_iter()
            .map(|i| records[i].clone())
            .collect())
    }

    /// Top `limit` records by lexical relevance.
    async fn retrieve_context(
        &self,
        query: &str,
        ranker: &Ranker,
        limit: usize,
    ) -> Result<Vec<KnowledgeRecord>> {
        let records = self.all_knowledge().await?;
        let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
        let ranked = ranker.rank_scored(query, &texts, limit);
        Ok(ranked
            .into_iter()
            .map(|r| records[r.position].clone())
            .collect())
    }
}

/// Positions of records whose lower-cased text contains the whole
/// lower-cased, trimmed query. A blank query matches nothing.
pub fn naive_filter<S: AsRef<str>>(query: &str, corpus: &[S]) -> Vec<usize> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    corpus
        .iter()
        .enumerate()
        .filter(|(_, text)| text.as_ref().to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect()
}

/// Validate record text before it is stored.
pub fn validate_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        anyhow::bail!("knowledge text must not be empty");
    }
    Ok(())
}
