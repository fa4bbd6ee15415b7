//! Data types shared by the store backends and the CLI.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One knowledge-base entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeRecord {
    /// UUID v4.
    pub id: String,
    pub text: String,
    /// Unix timestamp (seconds).
    pub created_at: i64,
}

impl KnowledgeRecord {
    /// New record with a fresh id, stamped now. Surrounding whitespace is
    /// trimmed so every store keeps the same text.
    pub fn new(text: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.trim().to_string(),
            created_at: Utc::now().timestamp(),
        }
    }
}

/// Format a Unix timestamp as ISO 8601.
pub fn format_ts_iso(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .unwrap_or_else(|| ts.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_has_uuid() {
        let r = KnowledgeRecord::new("text");
        assert!(Uuid::parse_str(&r.id).is_ok());
        assert_ne!(r.id, KnowledgeRecord::new("text").id);
    }

    #[test]
    fn test_new_record_trims_text() {
        assert_eq!(KnowledgeRecord::new("  rope puller \n").text, "rope puller");
    }

    #[test]
    fn test_format_ts_iso() {
        assert_eq!(format_ts_iso(0), "1970-01-01T00:00:00Z");
    }
}
