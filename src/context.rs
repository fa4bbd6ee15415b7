//! `kbr context`: show the prompt a chat turn would send.
//!
//! Selects the top-K knowledge records for the query and assembles them
//! with the configured system instruction. Nothing is sent anywhere; the
//! streaming chat client consumes this output.

use anyhow::Result;
use kb_rank_core::prompt::{assemble_prompt, ChatMessage, Role};
use kb_rank_core::store::KnowledgeStore;

use crate::config::Config;
use crate::knowledge::FileKnowledgeStore;

/// Build the chat messages for `query` from the configured knowledge file.
pub async fn build_context(
    config: &Config,
    query: &str,
    limit: Option<usize>,
) -> Result<Vec<ChatMessage>> {
    let store = FileKnowledgeStore::from_config(config);
    let ranker = config.ranker()?;
    let limit = limit.unwrap_or(config.retrieval.final_limit);
    let records = store.retrieve_context(query, &ranker, limit).await?;
    if records.is_empty() {
        eprintln!("context: no knowledge matched; proceeding without context");
    }
    let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
    Ok(assemble_prompt(
        &config.prompt.system_instruction,
        &texts,
        query,
    ))
}

pub async fn run_context(
    config: &Config,
    query: &str,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let messages = build_context(config, query, limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    for (i, msg) in messages.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let label = match msg.role {
            Role::System => "system",
            Role::User => "user",
        };
        println!("[{}]", label);
        println!("{}", msg.content);
    }
    Ok(())
}
