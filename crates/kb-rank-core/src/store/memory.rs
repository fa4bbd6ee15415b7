//! In-memory [`KnowledgeStore`] for tests and embedding in other programs.
//!
//! Records live in a `Vec` behind `std::sync::RwLock`, next to a
//! [`CorpusIndex`] that gains one entry per add and is emptied on clear, so
//! each record is tokenized exactly once.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::index::CorpusIndex;
use crate::models::KnowledgeRecord;
use crate::rank::Ranker;

use super::{validate_text, KnowledgeStore};

#[derive(Default)]
struct Inner {
    records: Vec<KnowledgeRecord>,
    index: CorpusIndex,
}

#[derive(Default)]
pub struct InMemoryKnowledgeStore {
    inner: RwLock<Inner>,
}

impl InMemoryKnowledgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store from existing records, keeping their ids.
    pub fn from_records(records: Vec<KnowledgeRecord>) -> Self {
        let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
        let index = CorpusIndex::build(&texts);
        Self {
            inner: RwLock::new(Inner { records, index }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| anyhow!("knowledge store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| anyhow!("knowledge store lock poisoned"))
    }
}

#[async_trait]
impl KnowledgeStore for InMemoryKnowledgeStore {
    async fn add_knowledge(&self, text: &str) -> Result<KnowledgeRecord> {
        validate_text(text)?;
        let record = KnowledgeRecord::new(text);
        let mut inner = self.write()?;
        inner.index.push(&record.text);
        inner.records.push(record.clone());
        Ok(record)
    }

    async fn all_knowledge(&self) -> Result<Vec<KnowledgeRecord>> {
        Ok(self.read()?.records.clone())
    }

    async fn clear_all_knowledge(&self) -> Result<usize> {
        let mut inner = self.write()?;
        let removed = inner.records.len();
        inner.records.clear();
        inner.index.clear();
        Ok(removed)
    }

    async fn retrieve_context(
        &self,
        query: &str,
        ranker: &Ranker,
        limit: usize,
    ) -> Result<Vec<KnowledgeRecord>> {
        let inner = self.read()?;
        let ranked = ranker.rank_indexed(query, &inner.index, limit);
        Ok(ranked
            .into_iter()
            .map(|r| inner.records[r.position].clone())
            .collect())
    }
}
