//! Mock implementations for testing
//!
//! These mocks enable engine and API tests without real I/O.

use super::traits::{CompletionClient, SessionStore};
use crate::db::Session;
use crate::llm::{ChatContext, ChunkStream, LlmError, StreamChunk};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

// ============================================================================
// Mock Session Store
// ============================================================================

/// In-memory session store with injectable failures
#[derive(Default)]
pub struct MockSessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    load_error: Mutex<Option<String>>,
    upsert_error: Mutex<Option<String>>,
    upserts: Mutex<usize>,
}

impl MockSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one session
    pub fn with_session(session: Session) -> Self {
        let store = Self::new();
        store
            .sessions
            .lock()
            .unwrap()
            .insert(session.session_id.clone(), session);
        store
    }

    /// Make every load fail with `message`
    pub fn fail_loads(&self, message: impl Into<String>) {
        *self.load_error.lock().unwrap() = Some(message.into());
    }

    /// Make every upsert fail with `message`
    pub fn fail_upserts(&self, message: impl Into<String>) {
        *self.upsert_error.lock().unwrap() = Some(message.into());
    }

    /// Current stored copy of a session
    pub fn get(&self, session_id: &str) -> Option<Session> {
        self.sessions.lock().unwrap().get(session_id).cloned()
    }

    /// Number of upserts that reached the store
    pub fn upsert_count(&self) -> usize {
        *self.upserts.lock().unwrap()
    }
}

#[async_trait]
impl SessionStore for MockSessionStore {
    async fn find_by_key(&self, session_id: &str) -> Result<Option<Session>, String> {
        if let Some(message) = self.load_error.lock().unwrap().clone() {
            return Err(message);
        }
        Ok(self.get(session_id))
    }

    async fn upsert(&self, session: &Session) -> Result<Session, String> {
        *self.upserts.lock().unwrap() += 1;
        if let Some(message) = self.upsert_error.lock().unwrap().clone() {
            return Err(message);
        }

        let mut stored = session.clone();
        stored.updated_at = Utc::now();
        if let Some(existing) = self.get(&session.session_id) {
            stored.created_at = existing.created_at;
        }
        self.sessions
            .lock()
            .unwrap()
            .insert(stored.session_id.clone(), stored.clone());
        Ok(stored)
    }
}

// ============================================================================
// Mock Completion Client
// ============================================================================

type QueuedStream = Result<Vec<Result<StreamChunk, LlmError>>, LlmError>;

/// One call made to the mock client
#[derive(Debug, Clone)]
pub struct RecordedSend {
    pub context: ChatContext,
    pub message: String,
}

/// Mock completion client that streams queued replies
#[derive(Default)]
pub struct MockCompletionClient {
    responses: Mutex<VecDeque<QueuedStream>>,
    sends: Mutex<Vec<RecordedSend>>,
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply delivered as a single text chunk
    pub fn queue_reply(&self, text: impl Into<String>) {
        self.queue_chunks(vec![Ok(StreamChunk::TextField(text.into()))]);
    }

    /// Queue a reply delivered as the given chunks
    pub fn queue_chunks(&self, chunks: Vec<Result<StreamChunk, LlmError>>) {
        self.responses.lock().unwrap().push_back(Ok(chunks));
    }

    /// Queue a failure before the first chunk
    pub fn queue_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded calls
    pub fn recorded_sends(&self) -> Vec<RecordedSend> {
        self.sends.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn send_and_stream(
        &self,
        context: &ChatContext,
        message: &str,
    ) -> Result<ChunkStream, LlmError> {
        self.sends.lock().unwrap().push(RecordedSend {
            context: context.clone(),
            message: message.to_string(),
        });

        let chunks = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock response queued")))?;
        Ok(Box::pin(futures::stream::iter(chunks)))
    }
}
