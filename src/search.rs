//! `kbr search`: rank knowledge records against a query.
//!
//! Records come from the configured knowledge file, or from a plain-text
//! corpus file (one record per non-blank line) when `--corpus` is given.
//! The relevance engine is the default; `--naive` switches to the
//! whole-query substring filter it replaces.

use anyhow::{bail, Context, Result};
use kb_rank_core::models::KnowledgeRecord;
use kb_rank_core::score::ScoreBreakdown;
use kb_rank_core::store::{naive_filter, KnowledgeStore};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::knowledge::FileKnowledgeStore;

#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Overrides `retrieval.final_limit`.
    pub limit: Option<usize>,
    pub naive: bool,
    pub explain: bool,
    /// Plain-text corpus file to search instead of the knowledge file.
    pub corpus: Option<PathBuf>,
}

/// One ranked result, shaped for both human and `--json` output.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub rank: usize,
    /// Relevance score; absent for naive matches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u64>,
    /// Position in the searched corpus.
    pub position: usize,
    /// Knowledge record id; absent for `--corpus` files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explain: Option<ScoreBreakdown>,
}

/// Candidate records for a search, in corpus order.
struct Candidate {
    id: Option<String>,
    text: String,
}

pub async fn search_hits(
    config: &Config,
    query: &str,
    opts: &SearchOptions,
) -> Result<Vec<SearchHit>> {
    if opts.naive && opts.explain {
        bail!("--explain has no score breakdown to show with --naive");
    }
    let candidates = match &opts.corpus {
        Some(path) => load_corpus_file(path).await?,
        None => FileKnowledgeStore::from_config(config)
            .all_knowledge()
            .await?
            .into_iter()
            .map(|r: KnowledgeRecord| Candidate {
                id: Some(r.id),
                text: r.text,
            })
            .collect(),
    };
    let limit = opts.limit.unwrap_or(config.retrieval.final_limit);
    let texts: Vec<&str> = candidates.iter().map(|c| c.text.as_str()).collect();

    if opts.naive {
        return Ok(naive_filter(query, &texts)
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(i, position)| SearchHit {
                rank: i + 1,
                score: None,
                position,
                id: candidates[position].id.clone(),
                text: candidates[position].text.clone(),
                explain: None,
            })
            .collect());
    }

    let ranker = config.ranker()?;
    Ok(ranker
        .explain(query, &texts, limit)
        .into_iter()
        .enumerate()
        .map(|(i, r)| SearchHit {
            rank: i + 1,
            score: Some(r.breakdown.total),
            position: r.position,
            id: candidates[r.position].id.clone(),
            text: r.text.to_string(),
            explain: opts.explain.then_some(r.breakdown),
        })
        .collect())
}

pub async fn run_search(
    config: &Config,
    query: &str,
    opts: &SearchOptions,
    json: bool,
) -> Result<()> {
    let hits = search_hits(config, query, opts).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    if hits.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for hit in &hits {
        let score = hit
            .score
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{}. [{}] {}", hit.rank, score, hit.text.replace('\n', " ").trim());
        if let Some(ref b) = hit.explain {
            println!(
                "    signals: exact={} substring={} bridge={}",
                b.exact, b.substring, b.bridge
            );
        }
        match hit.id {
            Some(ref id) => println!("    id: {}", id),
            None => println!("    record: {}", hit.position + 1),
        }
        println!();
    }

    Ok(())
}

async fn load_corpus_file(path: &Path) -> Result<Vec<Candidate>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read corpus file: {}", path.display()))?;
    Ok(content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| Candidate {
            id: None,
            text: l.trim().to_string(),
        })
        .collect())
}
