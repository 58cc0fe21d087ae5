//! # Application State
//!
//! Core business state for docchat. No terminal types live here;
//! presentation state is owned by the `tui` module.
//!
//! ```text
//! App
//! ├── history: History          // text-only context window sent to /chat
//! ├── log: Vec<Turn>            // every rendered message block, in order
//! ├── is_loading: bool          // UI lock: one request in flight
//! ├── error: Option<String>     // error line text
//! ├── status_message: String    // status bar text
//! └── server_url: String        // shown in the title bar
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::core::config::ResolvedConfig;
use crate::core::history::History;

/// Who a message block belongs to. Drives alignment and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// One rendered message block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub sender: Sender,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
        }
    }
}

pub struct App {
    pub history: History,
    pub log: Vec<Turn>,
    /// Held for the lifetime of exactly one request. Disables every control.
    pub is_loading: bool,
    pub error: Option<String>,
    pub status_message: String,
    pub server_url: String,
}

impl App {
    pub fn new(server_url: String, history_window: usize) -> Self {
        Self {
            history: History::new(history_window),
            log: Vec::new(),
            is_loading: false,
            error: None,
            status_message: String::from("Ready"),
            server_url,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(config.base_url.clone(), config.history_window)
    }

    /// Append a message block to the end of the log.
    pub fn push_turn(&mut self, turn: Turn) {
        self.log.push(turn);
    }
}

#[cfg(test)]
mod tests {
    use crate::core::history::DEFAULT_HISTORY_WINDOW;
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert_eq!(app.status_message, "Ready");
        assert!(!app.is_loading);
        assert!(app.error.is_none());
        assert!(app.log.is_empty());
        assert!(app.history.is_empty());
        assert_eq!(app.history.window(), DEFAULT_HISTORY_WINDOW);
        assert_eq!(app.server_url, "http://test.invalid");
    }
}
