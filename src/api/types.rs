//! API request and response types

use crate::db::Turn;
use serde::{Deserialize, Serialize};

/// Request to run one interview turn.
///
/// Fields are optional so a missing key can be reported as a validation error
/// instead of a deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRequest {
    pub session_id: Option<String>,
    pub job_title: Option<String>,
    pub user_response: Option<String>,
}

/// Request fields after presence checks
#[derive(Debug, PartialEq, Eq)]
pub struct ValidatedTurn {
    pub session_id: String,
    pub job_title: String,
    pub user_response: String,
}

impl InterviewRequest {
    /// Check that every field is present.
    ///
    /// `user_response` may be empty; `session_id` and `job_title` may not.
    pub fn validate(self) -> Option<ValidatedTurn> {
        let session_id = self.session_id.filter(|s| !s.is_empty())?;
        let job_title = self.job_title.filter(|s| !s.is_empty())?;
        let user_response = self.user_response?;
        Some(ValidatedTurn {
            session_id,
            job_title,
            user_response,
        })
    }
}

/// Response for a completed turn
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewResponse {
    pub session_id: String,
    pub response: String,
    pub history: Vec<Turn>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
