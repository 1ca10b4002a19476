//! Trait abstractions for interview I/O
//!
//! These traits enable testing the engine with mock implementations.

use super::engine::{TurnError, TurnOutcome};
use crate::db::{Database, Session};
use crate::llm::{ChatContext, ChunkStream, LlmError, LlmMessage, LlmService, SystemContent};
use async_trait::async_trait;
use std::sync::Arc;

/// Durable storage for session records
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch a session by exact id
    async fn find_by_key(&self, session_id: &str) -> Result<Option<Session>, String>;

    /// Insert or replace the whole session record, returning it as stored
    async fn upsert(&self, session: &Session) -> Result<Session, String>;

    /// Load a session, or build an unsaved one with no history.
    ///
    /// An existing session gets its job title refreshed in memory; it is only
    /// written back by a later `upsert`.
    async fn load_or_create(&self, session_id: &str, job_title: &str) -> Result<Session, String> {
        match self.find_by_key(session_id).await? {
            Some(mut session) => {
                job_title.clone_into(&mut session.job_title);
                Ok(session)
            }
            None => Ok(Session::new(session_id, job_title)),
        }
    }
}

/// Client for a streaming completion backend
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Seed a chat with prior turns and the system directive
    fn start_context(&self, prior_turns: Vec<LlmMessage>, system: SystemContent) -> ChatContext {
        ChatContext::new(prior_turns, system)
    }

    /// Send `message` as the next user turn and stream the reply
    async fn send_and_stream(
        &self,
        context: &ChatContext,
        message: &str,
    ) -> Result<ChunkStream, LlmError>;
}

/// Interview operations exposed to the HTTP layer
#[async_trait]
pub trait InterviewService: Send + Sync {
    /// Run one turn of the interview
    async fn handle_turn(
        &self,
        session_id: &str,
        job_title: &str,
        user_response: &str,
    ) -> Result<TurnOutcome, TurnError>;

    /// Read a persisted session without creating it
    async fn find_session(&self, session_id: &str) -> Result<Option<Session>, TurnError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn find_by_key(&self, session_id: &str) -> Result<Option<Session>, String> {
        (**self).find_by_key(session_id).await
    }

    async fn upsert(&self, session: &Session) -> Result<Session, String> {
        (**self).upsert(session).await
    }

    async fn load_or_create(&self, session_id: &str, job_title: &str) -> Result<Session, String> {
        (**self).load_or_create(session_id, job_title).await
    }
}

#[async_trait]
impl<T: CompletionClient + ?Sized> CompletionClient for Arc<T> {
    fn start_context(&self, prior_turns: Vec<LlmMessage>, system: SystemContent) -> ChatContext {
        (**self).start_context(prior_turns, system)
    }

    async fn send_and_stream(
        &self,
        context: &ChatContext,
        message: &str,
    ) -> Result<ChunkStream, LlmError> {
        (**self).send_and_stream(context, message).await
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

/// Adapter to use Database as a `SessionStore`
#[derive(Clone)]
pub struct DatabaseStore {
    db: Database,
}

impl DatabaseStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionStore for DatabaseStore {
    async fn find_by_key(&self, session_id: &str) -> Result<Option<Session>, String> {
        self.db.get_session(session_id).map_err(|e| e.to_string())
    }

    async fn upsert(&self, session: &Session) -> Result<Session, String> {
        self.db.upsert_session(session).map_err(|e| e.to_string())
    }
}

/// Adapter to use an `LlmService` as a `CompletionClient`
pub struct ServiceCompletionClient {
    service: Arc<dyn LlmService>,
}

impl ServiceCompletionClient {
    pub fn new(service: Arc<dyn LlmService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CompletionClient for ServiceCompletionClient {
    async fn send_and_stream(
        &self,
        context: &ChatContext,
        message: &str,
    ) -> Result<ChunkStream, LlmError> {
        self.service.stream(&context.request_for(message)).await
    }
}
