//! Session turn engine

use super::format::format_turns;
use super::locks::SessionLocks;
use super::traits::{CompletionClient, InterviewService, SessionStore};
use crate::db::{Session, Turn};
use crate::llm::{collect_reply, LlmError, SystemContent};
use crate::system_prompt::build_interviewer_directive;
use async_trait::async_trait;
use thiserror::Error;

/// Recorded as the first user turn when the candidate opens with an empty message
pub const OPENING_SENTINEL: &str = "start a mock interview";

#[derive(Debug, Error)]
pub enum TurnError {
    #[error("Session storage failed: {0}")]
    Storage(String),
    #[error("Completion backend failed: {0}")]
    Backend(#[from] LlmError),
}

/// Result of one successful turn
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The model's reply to this turn
    pub reply: String,
    /// The session as persisted, history included
    pub session: Session,
}

/// Drives one interview exchange per call: load, complete, persist.
pub struct InterviewEngine<S, C>
where
    S: SessionStore,
    C: CompletionClient,
{
    store: S,
    client: C,
    locks: Option<SessionLocks>,
}

impl<S, C> InterviewEngine<S, C>
where
    S: SessionStore,
    C: CompletionClient,
{
    pub fn new(store: S, client: C) -> Self {
        Self {
            store,
            client,
            locks: None,
        }
    }

    /// Serialize turns that share a session id within this process
    pub fn with_session_locks(mut self) -> Self {
        self.locks = Some(SessionLocks::new());
        self
    }

    /// Read a persisted session without creating it
    pub async fn find_session(&self, session_id: &str) -> Result<Option<Session>, TurnError> {
        self.store
            .find_by_key(session_id)
            .await
            .map_err(TurnError::Storage)
    }

    /// Run one turn of the interview.
    ///
    /// Exactly one completion call and one upsert happen on success. A storage
    /// failure on load stops before the backend is called; a backend failure
    /// stops before anything is persisted.
    pub async fn handle_turn(
        &self,
        session_id: &str,
        job_title: &str,
        user_response: &str,
    ) -> Result<TurnOutcome, TurnError> {
        let _guard = match &self.locks {
            Some(locks) => Some(locks.acquire(session_id).await),
            None => None,
        };

        let mut session = self
            .store
            .load_or_create(session_id, job_title)
            .await
            .map_err(TurnError::Storage)?;

        let is_first_turn = session.history.is_empty();
        let outbound = effective_message(is_first_turn, user_response);

        let context = self.client.start_context(
            format_turns(&session.history),
            SystemContent::new(build_interviewer_directive(&session.job_title)),
        );

        session.history.push(Turn::user(outbound));

        let chunks = self.client.send_and_stream(&context, outbound).await?;
        let reply = collect_reply(chunks).await?;

        if reply.is_empty() {
            tracing::warn!(session_id, "Completion produced no text; recording empty reply");
        }

        session.history.push(Turn::model(reply.clone()));
        if !session.is_alternating() {
            tracing::warn!(session_id, "Session history does not alternate user and model turns");
        }

        let session = self
            .store
            .upsert(&session)
            .await
            .map_err(TurnError::Storage)?;

        tracing::info!(
            session_id,
            new_session = is_first_turn,
            turns = session.history.len(),
            reply_len = reply.len(),
            "Interview turn completed"
        );

        Ok(TurnOutcome { reply, session })
    }
}

#[async_trait]
impl<S, C> InterviewService for InterviewEngine<S, C>
where
    S: SessionStore,
    C: CompletionClient,
{
    async fn handle_turn(
        &self,
        session_id: &str,
        job_title: &str,
        user_response: &str,
    ) -> Result<TurnOutcome, TurnError> {
        InterviewEngine::handle_turn(self, session_id, job_title, user_response).await
    }

    async fn find_session(&self, session_id: &str) -> Result<Option<Session>, TurnError> {
        InterviewEngine::find_session(self, session_id).await
    }
}

/// The message actually sent to the backend for this turn
fn effective_message(is_first_turn: bool, user_response: &str) -> &str {
    if is_first_turn && user_response.is_empty() {
        OPENING_SENTINEL
    } else {
        user_response
    }
}
