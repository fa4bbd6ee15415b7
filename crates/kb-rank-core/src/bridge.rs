//! Controlled vocabulary bridge rules.
//!
//! A bridge rule lets a query term match a known variant of itself in a
//! record, for example the agent noun `stringer` and the gerund
//! `stringing`. Rules are an explicit, enumerable table supplied as
//! configuration. This is not stemming: only the listed forms bridge.
//!
//! # Conditions
//!
//! | Condition | Fires when |
//! |-----------|------------|
//! | [`BridgeCondition::Exact`] | query token == `from` and record text contains `to` |
//! | [`BridgeCondition::Contains`] | query token contains `from` and record text contains `to` |
//!
//! Every rule that fires adds its weight once per query token.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// How a rule's `from` form is matched against a query token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BridgeCondition {
    Exact,
    Contains,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeRule {
    pub from: String,
    pub to: String,
    pub weight: u32,
    pub condition: BridgeCondition,
}

impl BridgeRule {
    pub fn exact(from: &str, to: &str, weight: u32) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            weight,
            condition: BridgeCondition::Exact,
        }
    }

    pub fn contains(root: &str, to: &str, weight: u32) -> Self {
        Self {
            from: root.to_string(),
            to: to.to_string(),
            weight,
            condition: BridgeCondition::Contains,
        }
    }

    /// Both directions of an exact variant pair: `a → b` and `b → a`.
    pub fn exact_pair(a: &str, b: &str, weight: u32) -> [Self; 2] {
        [Self::exact(a, b, weight), Self::exact(b, a, weight)]
    }

    fn fires(&self, token: &str, record_text: &str) -> bool {
        let token_matches = match self.condition {
            BridgeCondition::Exact => token == self.from,
            BridgeCondition::Contains => token.contains(self.from.as_str()),
        };
        token_matches && record_text.contains(self.to.as_str())
    }
}

/// Validated, ordered set of bridge rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeTable {
    rules: Vec<BridgeRule>,
}

impl BridgeTable {
    /// Validate and normalize a rule list.
    ///
    /// Forms are lower-cased so they compare against normalized tokens.
    /// A form must be non-empty and contain no whitespace (it has to be
    /// reachable as a single token), and the weight must be positive.
    pub fn new(rules: Vec<BridgeRule>) -> Result<Self> {
        let mut normalized = Vec::with_capacity(rules.len());
        for (i, rule) in rules.into_iter().enumerate() {
            let from = rule.from.trim().to_lowercase();
            let to = rule.to.trim().to_lowercase();
            if from.is_empty() || to.is_empty() {
                bail!("bridge rule #{}: 'from' and 'to' must be non-empty", i);
            }
            if from.chars().any(char::is_whitespace) || to.chars().any(char::is_whitespace) {
                bail!(
                    "bridge rule #{} ({} -> {}): forms must be single words",
                    i,
                    from,
                    to
                );
            }
            if rule.weight == 0 {
                bail!("bridge rule #{} ({} -> {}): weight must be > 0", i, from, to);
            }
            normalized.push(BridgeRule {
                from,
                to,
                weight: rule.weight,
                condition: rule.condition,
            });
        }
        Ok(Self { rules: normalized })
    }

    /// A table with no rules; bridging contributes nothing.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn rules(&self) -> &[BridgeRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Sum of the weights of every rule that fires for `token`.
    ///
    /// `record_text` must already be lower-cased.
    pub fn score_token(&self, token: &str, record_text: &str) -> u64 {
        self.rules
            .iter()
            .filter(|r| r.fires(token, record_text))
            .map(|r| u64::from(r.weight))
            .sum()
    }
}

impl Default for BridgeTable {
    /// The `stringer` / `stringing` vocabulary used by the T&D rental
    /// knowledge base.
    fn default() -> Self {
        let [a, b] = BridgeRule::exact_pair("stringer", "stringing", 2);
        Self {
            rules: vec![a, b, BridgeRule::contains("string", "stringing", 1)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_exact_pair_both_directions() {
        let table = BridgeTable::default();
        // stringer -> stringing (2) + root "string" -> stringing (1)
        assert_eq!(table.score_token("stringer", "stringing blocks"), 3);
        // stringing -> stringer (2); root rule needs "stringing" in the record
        assert_eq!(table.score_token("stringing", "a stringer crew"), 2);
    }

    #[test]
    fn test_default_root_rule_alone() {
        let table = BridgeTable::default();
        assert_eq!(table.score_token("strings", "stringing sheaves"), 1);
        assert_eq!(table.score_token("strings", "pulling rope"), 0);
    }

    #[test]
    fn test_no_match_without_target_in_record() {
        let table = BridgeTable::default();
        assert_eq!(table.score_token("stringer", "conductor blocks"), 0);
    }

    #[test]
    fn test_empty_table_scores_zero() {
        assert_eq!(BridgeTable::empty().score_token("stringer", "stringing"), 0);
        assert!(BridgeTable::empty().is_empty());
    }

    #[test]
    fn test_new_normalizes_case() {
        let table = BridgeTable::new(vec![BridgeRule::exact(" Puller ", "PULLING", 4)]).unwrap();
        assert_eq!(table.rules()[0].from, "puller");
        assert_eq!(table.rules()[0].to, "pulling");
        assert_eq!(table.score_token("puller", "pulling rope"), 4);
    }

    #[test]
    fn test_new_rejects_empty_form() {
        let err = BridgeTable::new(vec![BridgeRule::exact("", "x", 1)]).unwrap_err();
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn test_new_rejects_multiword_form() {
        assert!(BridgeTable::new(vec![BridgeRule::exact("wire rope", "rope", 1)]).is_err());
    }

    #[test]
    fn test_new_rejects_zero_weight() {
        let err = BridgeTable::new(vec![BridgeRule::contains("a", "b", 0)]).unwrap_err();
        assert!(err.to_string().contains("weight"));
    }

    #[test]
    fn test_condition_serde_lowercase() {
        let c: BridgeCondition = serde_json::from_str("\"contains\"").unwrap();
        assert_eq!(c, BridgeCondition::Contains);
        assert_eq!(
            serde_json::to_string(&BridgeCondition::Exact).unwrap(),
            "\"exact\""
        );
    }
}
