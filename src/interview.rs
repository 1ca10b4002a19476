//! Interview session handling
//!
//! Turns a `(session id, job title, answer)` request into one user turn and one
//! model turn appended to the session's durable history.

mod engine;
mod format;
mod locks;
pub mod traits;

#[cfg(test)]
pub mod testing;

#[cfg(test)]
mod proptests;

pub use engine::{InterviewEngine, TurnError, OPENING_SENTINEL};
pub use traits::*;

/// Type alias for the production engine with concrete implementations
pub type ProductionEngine = InterviewEngine<DatabaseStore, ServiceCompletionClient>;
