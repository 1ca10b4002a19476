//! HTTP request handlers

use super::types::{ErrorResponse, InterviewRequest, InterviewResponse};
use super::AppState;
use crate::db::Session;
use crate::interview::TurnError;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

pub const MISSING_FIELDS_MESSAGE: &str =
    "Missing sessionId, jobTitle, or userResponse in request body.";
const STORAGE_FAILURE_MESSAGE: &str = "Failed to load or save the interview session.";
const BACKEND_FAILURE_MESSAGE: &str = "Failed to get a response from the interviewer.";

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // One interview turn
        .route("/api/interview", post(interview_turn))
        // Read-only session view
        .route("/api/interview/:session_id", get(get_session))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Interview Turns
// ============================================================

async fn interview_turn(
    State(state): State<AppState>,
    payload: Result<Json<InterviewRequest>, JsonRejection>,
) -> Result<Json<InterviewResponse>, AppError> {
    let Json(req) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let turn = req
        .validate()
        .ok_or_else(|| AppError::BadRequest(MISSING_FIELDS_MESSAGE.to_string()))?;

    let outcome = state
        .interview
        .handle_turn(&turn.session_id, &turn.job_title, &turn.user_response)
        .await
        .map_err(|e| turn_error(&turn.session_id, &e))?;

    Ok(Json(InterviewResponse {
        session_id: outcome.session.session_id,
        response: outcome.reply,
        history: outcome.session.history,
    }))
}

async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Session>, AppError> {
    let session = state
        .interview
        .find_session(&session_id)
        .await
        .map_err(|e| turn_error(&session_id, &e))?
        .ok_or_else(|| AppError::NotFound(format!("Session not found: {session_id}")))?;

    Ok(Json(session))
}

async fn get_version() -> &'static str {
    concat!("interview-relay ", env!("CARGO_PKG_VERSION"))
}

/// Log the detailed failure and map it to a client-facing error
fn turn_error(session_id: &str, error: &TurnError) -> AppError {
    tracing::error!(session_id, error = %error, "Interview request failed");
    match error {
        TurnError::Storage(_) => AppError::Internal(STORAGE_FAILURE_MESSAGE.to_string()),
        TurnError::Backend(_) => AppError::Internal(BACKEND_FAILURE_MESSAGE.to_string()),
    }
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
