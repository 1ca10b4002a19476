//! Property-based tests for the turn engine
//!
//! These tests verify the history invariants hold across arbitrary sequences
//! of answers, failures and job-title changes.

use super::engine::{InterviewEngine, TurnError, OPENING_SENTINEL};
use super::format::format_turns;
use super::testing::{MockCompletionClient, MockSessionStore};
use crate::db::{Role, Turn};
use crate::llm::{LlmError, MessageRole};
use proptest::prelude::*;
use std::sync::Arc;

// ============================================================================
// Arbitrary Generators
// ============================================================================

/// Candidate answer, empty about a third of the time
fn arb_answer() -> impl Strategy<Value = String> {
    prop_oneof![
        1 => Just(String::new()),
        2 => "[a-zA-Z0-9 .,!?']{1,60}",
    ]
}

fn arb_job_title() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Engineer".to_string()),
        Just("Designer".to_string()),
        Just("Product Manager".to_string()),
    ]
}

/// One request: the answer, the job title sent with it, and whether the backend fails
fn arb_request() -> impl Strategy<Value = (String, String, bool)> {
    (arb_answer(), arb_job_title(), prop::bool::weighted(0.2))
}

fn arb_turns() -> impl Strategy<Value = Vec<Turn>> {
    prop::collection::vec(
        (any::<bool>(), "[a-z ]{0,20}").prop_map(|(is_user, text)| {
            if is_user {
                Turn::user(text)
            } else {
                Turn::model(text)
            }
        }),
        0..20,
    )
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Persisted history always alternates and grows by two per successful turn
    #[test]
    fn prop_history_alternates(requests in prop::collection::vec(arb_request(), 1..12)) {
        block_on(async {
            let store = Arc::new(MockSessionStore::new());
            let client = Arc::new(MockCompletionClient::new());
            let engine = InterviewEngine::new(store.clone(), client.clone());

            let mut expected_len = 0usize;
            for (i, (answer, job_title, fails)) in requests.iter().enumerate() {
                if *fails {
                    client.queue_error(LlmError::server_error("boom"));
                } else {
                    client.queue_reply(format!("Reply {i}"));
                }

                let result = engine.handle_turn("s1", job_title, answer).await;
                if *fails {
                    prop_assert!(matches!(result, Err(TurnError::Backend(_))));
                } else {
                    prop_assert!(result.is_ok());
                    expected_len += 2;
                }

                let saved_len = store.get("s1").map_or(0, |s| s.history.len());
                prop_assert_eq!(saved_len, expected_len);
            }

            if let Some(saved) = store.get("s1") {
                prop_assert!(saved.history.len() % 2 == 0);
                for (i, turn) in saved.history.iter().enumerate() {
                    let expected = if i % 2 == 0 { Role::User } else { Role::Model };
                    prop_assert_eq!(turn.role, expected);
                }
                // Job title follows the last successful request
                let last_ok = requests.iter().rev().find(|(_, _, fails)| !fails).unwrap();
                prop_assert_eq!(&saved.job_title, &last_ok.1);
            }
            Ok(())
        })?;
    }

    /// Only the first turn of a session can carry the sentinel
    #[test]
    fn prop_sentinel_only_on_first_turn(answers in prop::collection::vec(arb_answer(), 1..10)) {
        block_on(async {
            let store = Arc::new(MockSessionStore::new());
            let client = Arc::new(MockCompletionClient::new());
            let engine = InterviewEngine::new(store.clone(), client.clone());

            for answer in &answers {
                client.queue_reply("Next question");
                engine.handle_turn("s1", "Engineer", answer).await.unwrap();
            }

            let saved = store.get("s1").unwrap();
            let user_turns: Vec<_> = saved.history.iter().filter(|t| t.role == Role::User).collect();
            prop_assert_eq!(user_turns.len(), answers.len());

            for (i, (turn, answer)) in user_turns.iter().zip(&answers).enumerate() {
                if i == 0 && answer.is_empty() {
                    prop_assert_eq!(turn.text.as_str(), OPENING_SENTINEL);
                } else {
                    prop_assert_eq!(&turn.text, answer);
                }
            }
            Ok(())
        })?;
    }

    /// Formatting keeps length, order, roles and text
    #[test]
    fn prop_format_is_faithful(turns in arb_turns()) {
        let messages = format_turns(&turns);
        prop_assert_eq!(messages.len(), turns.len());
        for (turn, message) in turns.iter().zip(&messages) {
            let role = match turn.role {
                Role::User => MessageRole::User,
                Role::Model => MessageRole::Model,
            };
            prop_assert_eq!(message.role, role);
            prop_assert_eq!(&message.content, &vec![turn.text.clone()]);
        }
    }
}
