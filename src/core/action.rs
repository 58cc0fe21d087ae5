//! # Actions
//!
//! Everything that can happen in docchat becomes an `Action`.
//! User presses Enter in the chat box? That's `Action::SubmitMessage`.
//! The service answers? That's `Action::ChatAnswered(result)`.
//!
//! `update()` takes the current state and an action, mutates the state, and
//! returns the `Effect` the adapter must perform. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! ## UI lock
//!
//! Every user action acquires `App::is_loading` and every completion action
//! releases it, whatever the outcome. A user action arriving while the lock
//! is held is rejected outright: no render, no history change, no request.

use log::{debug, info, warn};

use crate::backend::BackendError;
use crate::core::state::{App, Turn};

pub const DOCUMENT_LOADED: &str = "Document loaded successfully.";
pub const STORE_RESET: &str = "Database reset. You can load a new document.";
pub const MISSING_DOC_URL: &str = "Please enter a Google Doc URL.";
pub const BUSY: &str = "Busy: waiting for the backend";

const SERVER_ERROR: &str = "Server error";
const NO_ANSWER: &str = "No answer from bot";
const LOAD_FAILED: &str = "Failed to load document";
const RESET_FAILED: &str = "Failed to reset database";
const INSPECT_FAILED: &str = "Failed to inspect store";
const NETWORK_ERROR: &str = "Network error";

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Chat input submitted (raw, untrimmed text).
    SubmitMessage(String),
    /// Load-document control triggered with the URL field's raw text.
    LoadDocument(String),
    ResetStore,
    InspectStore,
    ChatAnswered(Result<String, BackendError>),
    DocumentLoaded(Result<(), BackendError>),
    StoreReset(Result<(), BackendError>),
    StoreInspected(Result<usize, BackendError>),
    Quit,
}

/// A single HTTP call for the adapter to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Chat { message: String, history: Vec<String> },
    IngestDocument { doc_url: String },
    ResetStore,
    InspectStore,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    Send(Request),
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::SubmitMessage(text) => submit_message(app, &text),
        Action::LoadDocument(url) => load_document(app, &url),
        Action::ResetStore => {
            if reject_if_busy(app) {
                return Effect::None;
            }
            app.error = None;
            acquire(app, "Resetting store...");
            Effect::Send(Request::ResetStore)
        }
        Action::InspectStore => {
            if reject_if_busy(app) {
                return Effect::None;
            }
            app.error = None;
            acquire(app, "Inspecting store...");
            Effect::Send(Request::InspectStore)
        }
        Action::ChatAnswered(result) => {
            match result {
                Ok(answer) => {
                    app.push_turn(Turn::bot(answer.clone()));
                    app.history.push_answer(answer);
                    release(app, "Ready");
                }
                Err(e) => fail(app, &e, SERVER_ERROR),
            }
            Effect::None
        }
        Action::DocumentLoaded(result) => {
            match result {
                Ok(()) => {
                    app.push_turn(Turn::bot(DOCUMENT_LOADED));
                    release(app, "Document loaded");
                }
                Err(e) => {
                    let status_text = match &e {
                        BackendError::Status { body, .. } if !body.is_empty() => body.clone(),
                        _ => LOAD_FAILED.to_string(),
                    };
                    fail(app, &e, &status_text);
                }
            }
            Effect::None
        }
        Action::StoreReset(result) => {
            match result {
                Ok(()) => {
                    // Confirmation goes in first, then the whole log is wiped with it.
                    app.push_turn(Turn::bot(STORE_RESET));
                    app.history.clear();
                    app.log.clear();
                    release(app, STORE_RESET);
                }
                Err(e) => fail(app, &e, RESET_FAILED),
            }
            Effect::None
        }
        Action::StoreInspected(result) => {
            match result {
                Ok(count) => release(app, &format!("Store holds {count} chunk(s)")),
                Err(e) => fail(app, &e, INSPECT_FAILED),
            }
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn submit_message(app: &mut App, text: &str) -> Effect {
    if reject_if_busy(app) {
        return Effect::None;
    }
    app.error = None;

    let message = text.trim();
    if message.is_empty() {
        debug!("Ignoring empty chat submission");
        return Effect::None;
    }

    app.push_turn(Turn::user(message));
    acquire(app, "Waiting for answer...");
    app.history.push_user(message);

    Effect::Send(Request::Chat {
        message: message.to_string(),
        history: app.history.to_vec(),
    })
}

fn load_document(app: &mut App, url: &str) -> Effect {
    if reject_if_busy(app) {
        return Effect::None;
    }
    app.error = None;

    let doc_url = url.trim();
    if doc_url.is_empty() {
        app.error = Some(MISSING_DOC_URL.to_string());
        return Effect::None;
    }

    acquire(app, "Loading document...");
    Effect::Send(Request::IngestDocument {
        doc_url: doc_url.to_string(),
    })
}

fn reject_if_busy(app: &mut App) -> bool {
    if app.is_loading {
        info!("Rejected action: request already in flight");
        app.status_message = BUSY.to_string();
    }
    app.is_loading
}

fn acquire(app: &mut App, status: &str) {
    app.is_loading = true;
    app.status_message = status.to_string();
}

fn release(app: &mut App, status: &str) {
    app.is_loading = false;
    app.status_message = status.to_string();
}

fn fail(app: &mut App, err: &BackendError, status_text: &str) {
    warn!("Request failed: {}", err);
    app.error = Some(describe_failure(err, status_text));
    release(app, "Request failed");
}

/// Collapses a backend error into the single line shown to the user.
///
/// `status_text` is used for non-2xx responses. Any empty message falls
/// back to `Network error`.
pub fn describe_failure(err: &BackendError, status_text: &str) -> String {
    let message = match err {
        BackendError::Status { .. } => status_text.to_string(),
        BackendError::MissingAnswer => NO_ANSWER.to_string(),
        BackendError::Config(msg) | BackendError::Network(msg) | BackendError::Parse(msg) => {
            msg.clone()
        }
    };
    if message.is_empty() {
        NETWORK_ERROR.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Sender;
    use crate::test_support::test_app;

    fn status(code: u16, body: &str) -> BackendError {
        BackendError::Status {
            status: code,
            body: body.to_string(),
        }
    }

    fn assert_idle(app: &App) {
        assert!(!app.is_loading, "UI lock should be released");
    }

    // ==========================================================================
    // Chat submission
    // ==========================================================================

    #[test]
    fn submit_renders_user_turn_before_request() {
        let mut app = test_app();
        let effect = update(&mut app, Action::SubmitMessage("  Hello  ".to_string()));

        assert_eq!(app.log, vec![Turn::user("Hello")]);
        assert!(app.is_loading);
        assert_eq!(
            effect,
            Effect::Send(Request::Chat {
                message: "Hello".to_string(),
                history: vec!["Hello".to_string()],
            })
        );
    }

    #[test]
    fn hello_hi_scenario() {
        let mut app = test_app();
        update(&mut app, Action::SubmitMessage("Hello".to_string()));
        assert_eq!(app.history.as_slice(), ["Hello"]);

        let effect = update(&mut app, Action::ChatAnswered(Ok("Hi".to_string())));
        assert_eq!(effect, Effect::None);
        assert_eq!(app.history.as_slice(), ["Hello", "Hi"]);
        assert_eq!(app.log, vec![Turn::user("Hello"), Turn::bot("Hi")]);
        assert_idle(&app);
    }

    #[test]
    fn empty_submission_is_ignored() {
        for text in ["", "   ", "\n\t "] {
            let mut app = test_app();
            let effect = update(&mut app, Action::SubmitMessage(text.to_string()));
            assert_eq!(effect, Effect::None);
            assert!(app.log.is_empty());
            assert!(app.history.is_empty());
            assert!(app.error.is_none());
            assert_idle(&app);
        }
    }

    #[test]
    fn submission_clears_previous_error() {
        let mut app = test_app();
        app.error = Some("old".to_string());
        update(&mut app, Action::SubmitMessage("".to_string()));
        assert!(app.error.is_none());
    }

    #[test]
    fn history_is_truncated_before_append() {
        let mut app = test_app();
        for i in 0..5 {
            update(&mut app, Action::SubmitMessage(format!("q{i}")));
            update(&mut app, Action::ChatAnswered(Ok(format!("a{i}"))));
        }
        assert_eq!(app.history.len(), 10);

        let effect = update(&mut app, Action::SubmitMessage("q5".to_string()));
        let history = match effect {
            Effect::Send(Request::Chat { history, .. }) => history,
            other => panic!("expected chat request, got {other:?}"),
        };
        assert_eq!(history.len(), 10);
        assert_eq!(history[0], "a0");
        assert_eq!(history[9], "q5");
    }

    #[test]
    fn chat_failure_keeps_user_turn() {
        let mut app = test_app();
        update(&mut app, Action::SubmitMessage("Hello".to_string()));
        update(&mut app, Action::ChatAnswered(Err(status(500, "boom"))));

        assert_eq!(app.log, vec![Turn::user("Hello")]);
        assert_eq!(app.history.as_slice(), ["Hello"]);
        assert_eq!(app.error.as_deref(), Some("Server error"));
        assert_idle(&app);
    }

    #[test]
    fn chat_missing_answer_error() {
        let mut app = test_app();
        update(&mut app, Action::SubmitMessage("Hello".to_string()));
        update(&mut app, Action::ChatAnswered(Err(BackendError::MissingAnswer)));
        assert_eq!(app.error.as_deref(), Some("No answer from bot"));
        assert_idle(&app);
    }

    #[test]
    fn chat_network_error_without_message_falls_back() {
        let mut app = test_app();
        update(&mut app, Action::SubmitMessage("Hello".to_string()));
        update(
            &mut app,
            Action::ChatAnswered(Err(BackendError::Network(String::new()))),
        );
        assert_eq!(app.error.as_deref(), Some("Network error"));
    }

    #[test]
    fn chat_parse_error_shows_parser_message() {
        let mut app = test_app();
        update(&mut app, Action::SubmitMessage("Hello".to_string()));
        update(
            &mut app,
            Action::ChatAnswered(Err(BackendError::Parse(
                "expected value at line 1 column 1".to_string(),
            ))),
        );
        assert_eq!(
            app.error.as_deref(),
            Some("expected value at line 1 column 1")
        );
    }

    // ==========================================================================
    // Document load
    // ==========================================================================

    #[test]
    fn load_document_requires_url() {
        let mut app = test_app();
        let effect = update(&mut app, Action::LoadDocument("   ".to_string()));
        assert_eq!(effect, Effect::None);
        assert_eq!(app.error.as_deref(), Some(MISSING_DOC_URL));
        assert_idle(&app);
    }

    #[test]
    fn load_document_sends_trimmed_url() {
        let mut app = test_app();
        let effect = update(
            &mut app,
            Action::LoadDocument(" https://docs.google.com/x ".to_string()),
        );
        assert_eq!(
            effect,
            Effect::Send(Request::IngestDocument {
                doc_url: "https://docs.google.com/x".to_string()
            })
        );
        assert!(app.is_loading);
    }

    #[test]
    fn load_document_success_renders_confirmation() {
        let mut app = test_app();
        update(&mut app, Action::LoadDocument("https://docs.google.com/x".to_string()));
        update(&mut app, Action::DocumentLoaded(Ok(())));
        assert_eq!(app.log, vec![Turn::bot(DOCUMENT_LOADED)]);
        assert!(app.history.is_empty());
        assert_idle(&app);
    }

    #[test]
    fn load_document_failure_prefers_body() {
        let mut app = test_app();
        update(&mut app, Action::LoadDocument("https://docs.google.com/x".to_string()));
        update(&mut app, Action::DocumentLoaded(Err(status(400, "bad url"))));
        assert_eq!(app.error.as_deref(), Some("bad url"));
        assert!(app.log.is_empty());
        assert_idle(&app);
    }

    #[test]
    fn load_document_failure_empty_body_falls_back() {
        let mut app = test_app();
        update(&mut app, Action::LoadDocument("https://docs.google.com/x".to_string()));
        update(&mut app, Action::DocumentLoaded(Err(status(502, ""))));
        assert_eq!(app.error.as_deref(), Some("Failed to load document"));
    }

    #[test]
    fn load_document_transport_failure() {
        let mut app = test_app();
        update(&mut app, Action::LoadDocument("https://docs.google.com/x".to_string()));
        update(
            &mut app,
            Action::DocumentLoaded(Err(BackendError::Network("connection refused".to_string()))),
        );
        assert_eq!(app.error.as_deref(), Some("connection refused"));

        update(&mut app, Action::LoadDocument("https://docs.google.com/x".to_string()));
        update(
            &mut app,
            Action::DocumentLoaded(Err(BackendError::Network(String::new()))),
        );
        assert_eq!(app.error.as_deref(), Some("Network error"));
        assert!(app.log.is_empty());
        assert_idle(&app);
    }

    // ==========================================================================
    // Store reset
    // ==========================================================================

    #[test]
    fn reset_success_clears_history_and_log() {
        let mut app = test_app();
        update(&mut app, Action::SubmitMessage("Hello".to_string()));
        update(&mut app, Action::ChatAnswered(Ok("Hi".to_string())));

        let effect = update(&mut app, Action::ResetStore);
        assert_eq!(effect, Effect::Send(Request::ResetStore));
        update(&mut app, Action::StoreReset(Ok(())));

        assert!(app.history.is_empty());
        assert!(app.log.is_empty());
        assert_eq!(app.status_message, STORE_RESET);
        assert_idle(&app);
    }

    #[test]
    fn reset_failure_leaves_state_untouched() {
        let mut app = test_app();
        update(&mut app, Action::SubmitMessage("Hello".to_string()));
        update(&mut app, Action::ChatAnswered(Ok("Hi".to_string())));

        update(&mut app, Action::ResetStore);
        update(&mut app, Action::StoreReset(Err(status(500, "db down"))));

        assert_eq!(app.history.len(), 2);
        assert_eq!(app.log.len(), 2);
        assert_eq!(app.error.as_deref(), Some("Failed to reset database"));
        assert_idle(&app);
    }

    #[test]
    fn reset_transport_failure() {
        let mut app = test_app();
        update(&mut app, Action::SubmitMessage("Hello".to_string()));
        update(&mut app, Action::ChatAnswered(Ok("Hi".to_string())));

        update(&mut app, Action::ResetStore);
        update(
            &mut app,
            Action::StoreReset(Err(BackendError::Network("connection reset".to_string()))),
        );
        assert_eq!(app.error.as_deref(), Some("connection reset"));

        update(&mut app, Action::ResetStore);
        update(&mut app, Action::StoreReset(Err(BackendError::Network(String::new()))));
        assert_eq!(app.error.as_deref(), Some("Network error"));

        assert_eq!(app.history.len(), 2);
        assert_eq!(app.log.len(), 2);
        assert_idle(&app);
    }

    // ==========================================================================
    // Inspect store
    // ==========================================================================

    #[test]
    fn inspect_reports_count_in_status() {
        let mut app = test_app();
        assert_eq!(
            update(&mut app, Action::InspectStore),
            Effect::Send(Request::InspectStore)
        );
        update(&mut app, Action::StoreInspected(Ok(42)));
        assert_eq!(app.status_message, "Store holds 42 chunk(s)");
        assert!(app.log.is_empty());
        assert_idle(&app);
    }

    #[test]
    fn inspect_failure() {
        let mut app = test_app();
        update(&mut app, Action::InspectStore);
        update(&mut app, Action::StoreInspected(Err(status(404, "Not Found"))));
        assert_eq!(app.error.as_deref(), Some("Failed to inspect store"));
        assert_idle(&app);
    }

    // ==========================================================================
    // UI lock
    // ==========================================================================

    #[test]
    fn actions_are_rejected_while_busy() {
        let mut app = test_app();
        update(&mut app, Action::SubmitMessage("Hello".to_string()));
        assert!(app.is_loading);

        let rejected = [
            Action::SubmitMessage("again".to_string()),
            Action::LoadDocument("https://docs.google.com/x".to_string()),
            Action::ResetStore,
            Action::InspectStore,
        ];
        for action in rejected {
            assert_eq!(update(&mut app, action), Effect::None);
            assert_eq!(app.status_message, BUSY);
        }

        // Nothing leaked from the rejected submissions
        assert_eq!(app.log, vec![Turn::user("Hello")]);
        assert_eq!(app.history.as_slice(), ["Hello"]);
        assert!(app.is_loading);
    }

    #[test]
    fn lock_is_released_on_every_outcome() {
        let outcomes = [
            Action::ChatAnswered(Ok("ok".to_string())),
            Action::ChatAnswered(Err(BackendError::MissingAnswer)),
            Action::ChatAnswered(Err(BackendError::Network("refused".to_string()))),
        ];
        for outcome in outcomes {
            let mut app = test_app();
            update(&mut app, Action::SubmitMessage("Hello".to_string()));
            update(&mut app, outcome);
            assert_idle(&app);
            // A new action is accepted afterwards
            assert!(matches!(
                update(&mut app, Action::ResetStore),
                Effect::Send(Request::ResetStore)
            ));
        }
    }

    #[test]
    fn user_turns_are_tagged_user() {
        let mut app = test_app();
        update(&mut app, Action::SubmitMessage("Hello".to_string()));
        assert_eq!(app.log[0].sender, Sender::User);
    }

    #[test]
    fn quit_effect() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }

    #[test]
    fn describe_failure_fallbacks() {
        assert_eq!(describe_failure(&status(500, "x"), "Server error"), "Server error");
        assert_eq!(describe_failure(&status(500, "x"), ""), "Network error");
        assert_eq!(
            describe_failure(&BackendError::Network("refused".to_string()), "unused"),
            "refused"
        );
    }
}
