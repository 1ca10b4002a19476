//! Stored turns to completion-backend messages

use crate::db::{Role, Turn};
use crate::llm::{LlmMessage, MessageRole};

/// Convert turns to backend messages, one per turn, order preserved.
pub fn format_turns(turns: &[Turn]) -> Vec<LlmMessage> {
    turns
        .iter()
        .map(|turn| LlmMessage {
            role: match turn.role {
                Role::User => MessageRole::User,
                Role::Model => MessageRole::Model,
            },
            content: vec![turn.text.clone()],
        })
        .collect()
}
