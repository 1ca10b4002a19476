//! HTTP API for the interview relay
//!
//! Validates request bodies and hands them to the interview engine; the engine's
//! result is serialized back verbatim.

mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::interview::InterviewService;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub interview: Arc<dyn InterviewService>,
}

impl AppState {
    pub fn new(interview: Arc<dyn InterviewService>) -> Self {
        Self { interview }
    }
}
