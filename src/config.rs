//! TOML configuration.
//!
//! ```toml
//! [knowledge]
//! path = "./data/knowledge.json"
//!
//! [retrieval]
//! final_limit = 5
//! min_query_token_len = 3
//! exact_weight = 3
//! substring_weight = 2
//!
//! [[retrieval.bridges]]
//! from = "stringer"
//! to = "stringing"
//! weight = 2
//! match = "exact"
//! symmetric = true
//!
//! [prompt]
//! system_instruction = "Answer from the knowledge below."
//! ```
//!
//! Omitting `retrieval.bridges` keeps the built-in vocabulary table; an
//! empty list (`bridges = []`) disables bridging.

use anyhow::{Context, Result};
use kb_rank_core::bridge::{BridgeCondition, BridgeRule, BridgeTable};
use kb_rank_core::prompt::DEFAULT_SYSTEM_INSTRUCTION;
use kb_rank_core::rank::{Ranker, DEFAULT_LIMIT};
use kb_rank_core::score::{Scorer, ScoringConfig, DEFAULT_EXACT_WEIGHT, DEFAULT_SUBSTRING_WEIGHT};
use kb_rank_core::tokenize::DEFAULT_MIN_QUERY_TOKEN_LEN;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KnowledgeConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_final_limit")]
    pub final_limit: usize,
    #[serde(default = "default_min_query_token_len")]
    pub min_query_token_len: usize,
    #[serde(default = "default_exact_weight")]
    pub exact_weight: u32,
    #[serde(default = "default_substring_weight")]
    pub substring_weight: u32,
    #[serde(default)]
    pub bridges: Option<Vec<BridgeRuleConfig>>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            final_limit: DEFAULT_LIMIT,
            min_query_token_len: DEFAULT_MIN_QUERY_TOKEN_LEN,
            exact_weight: DEFAULT_EXACT_WEIGHT,
            substring_weight: DEFAULT_SUBSTRING_WEIGHT,
            bridges: None,
        }
    }
}

fn default_final_limit() -> usize {
    DEFAULT_LIMIT
}
fn default_min_query_token_len() -> usize {
    DEFAULT_MIN_QUERY_TOKEN_LEN
}
fn default_exact_weight() -> u32 {
    DEFAULT_EXACT_WEIGHT
}
fn default_substring_weight() -> u32 {
    DEFAULT_SUBSTRING_WEIGHT
}

/// One `[[retrieval.bridges]]` entry.
#[derive(Debug, Deserialize, Clone)]
pub struct BridgeRuleConfig {
    pub from: String,
    pub to: String,
    pub weight: u32,
    #[serde(rename = "match", default = "default_match")]
    pub condition: BridgeCondition,
    /// Also add the reverse `to → from` rule.
    #[serde(default)]
    pub symmetric: bool,
}

fn default_match() -> BridgeCondition {
    BridgeCondition::Exact
}

#[derive(Debug, Deserialize, Clone)]
pub struct PromptConfig {
    #[serde(default = "default_system_instruction")]
    pub system_instruction: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            system_instruction: default_system_instruction(),
        }
    }
}

fn default_system_instruction() -> String {
    DEFAULT_SYSTEM_INSTRUCTION.to_string()
}

impl Config {
    /// Defaults for commands that can run without a config file.
    pub fn minimal() -> Self {
        Self {
            knowledge: KnowledgeConfig {
                path: PathBuf::from("./data/knowledge.json"),
            },
            retrieval: RetrievalConfig::default(),
            prompt: PromptConfig::default(),
        }
    }

    /// Validated bridge table: configured rules, or the built-in table.
    pub fn bridge_table(&self) -> Result<BridgeTable> {
        let Some(entries) = &self.retrieval.bridges else {
            return Ok(BridgeTable::default());
        };
        let mut rules = Vec::with_capacity(entries.len() * 2);
        for entry in entries {
            rules.push(BridgeRule {
                from: entry.from.clone(),
                to: entry.to.clone(),
                weight: entry.weight,
                condition: entry.condition,
            });
            if entry.symmetric {
                rules.push(BridgeRule {
                    from: entry.to.clone(),
                    to: entry.from.clone(),
                    weight: entry.weight,
                    condition: entry.condition,
                });
            }
        }
        BridgeTable::new(rules).context("invalid retrieval.bridges")
    }

    pub fn scoring(&self) -> Result<ScoringConfig> {
        Ok(ScoringConfig {
            exact_weight: self.retrieval.exact_weight,
            substring_weight: self.retrieval.substring_weight,
            min_query_token_len: self.retrieval.min_query_token_len,
            bridges: self.bridge_table()?,
        })
    }

    pub fn ranker(&self) -> Result<Ranker> {
        Ok(Ranker::new(Scorer::new(self.scoring()?)))
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.retrieval.final_limit < 1 {
        anyhow::bail!("retrieval.final_limit must be >= 1");
    }

    if config.retrieval.min_query_token_len < 1 {
        anyhow::bail!("retrieval.min_query_token_len must be >= 1");
    }

    if config.retrieval.exact_weight == 0 && config.retrieval.substring_weight == 0 {
        anyhow::bail!("retrieval.exact_weight and retrieval.substring_weight cannot both be 0");
    }

    // Surfaces bad bridge rules at load time rather than on first search.
    config.bridge_table()?;

    if config.knowledge.path.as_os_str().is_empty() {
        anyhow::bail!("knowledge.path must not be empty");
    }

    Ok(())
}
