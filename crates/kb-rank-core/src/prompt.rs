//! Chat prompt assembly.
//!
//! Turns a system instruction, the ranked context records, and the user's
//! query into the message list a chat-completion client sends upstream.
//! The streaming client itself lives outside this crate.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are a helpful assistant. \
Answer using the relevant knowledge below when it applies. \
If it does not cover the question, say so and answer from general knowledge.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Build `[system, user]` messages for one chat turn.
///
/// When `context` is non-empty the system message ends with a numbered
/// "Relevant knowledge" block in rank order. An empty `context` is a normal
/// outcome and yields the bare instruction.
pub fn assemble_prompt<S: AsRef<str>>(
    system_instruction: &str,
    context: &[S],
    query: &str,
) -> Vec<ChatMessage> {
    let mut system = system_instruction.trim().to_string();
    if !context.is_empty() {
        system.push_str("\n\nRelevant knowledge:\n");
        for (i, record) in context.iter().enumerate() {
            let line = record.as_ref().replace('\n', " ");
            system.push_str(&format!("{}. {}\n", i + 1, line.trim()));
        }
    }

    vec![
        ChatMessage {
            role: Role::System,
            content: system.trim_end().to_string(),
        },
        ChatMessage {
            role: Role::User,
            content: query.to_string(),
        },
    ]
}
