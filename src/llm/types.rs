//! Common types for LLM interactions

/// LLM request
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub system: Vec<SystemContent>,
    pub messages: Vec<LlmMessage>,
    pub max_tokens: Option<u32>,
}

/// System prompt content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemContent {
    pub text: String,
}

impl SystemContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Message in conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmMessage {
    pub role: MessageRole,
    pub content: Vec<String>,
}

impl LlmMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: vec![text.into()],
        }
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Model,
}

impl MessageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Model => "model",
        }
    }
}

/// A started chat: prior turns plus the system directive.
///
/// Holds everything needed to send the next message; the backend itself is
/// stateless between calls.
#[derive(Debug, Clone)]
pub struct ChatContext {
    pub system: SystemContent,
    pub history: Vec<LlmMessage>,
}

impl ChatContext {
    pub fn new(history: Vec<LlmMessage>, system: SystemContent) -> Self {
        Self { system, history }
    }

    /// Build the request that sends `message` as the next user turn
    pub fn request_for(&self, message: &str) -> LlmRequest {
        let mut messages = self.history.clone();
        messages.push(LlmMessage::user(message));
        LlmRequest {
            system: vec![self.system.clone()],
            messages,
            max_tokens: None,
        }
    }
}
