//! # Conversation History
//!
//! The text-only context window sent with every chat turn. Sender tags are
//! not tracked, only message text, in the order the turns happened.
//!
//! Truncation happens *before* a user message is appended: if more than
//! `window` entries are held, only the most recent `window` are kept, then
//! the new message goes on the end. With the default window of 9 the list
//! holds at most 10 entries right after a user append.

/// Entries kept before appending a new user message (about 4-5 exchanges).
pub const DEFAULT_HISTORY_WINDOW: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct History {
    entries: Vec<String>,
    window: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW)
    }
}

impl History {
    pub fn new(window: usize) -> Self {
        Self {
            entries: Vec::new(),
            window,
        }
    }

    /// Truncate to the last `window` entries, then append the user's message.
    pub fn push_user(&mut self, message: impl Into<String>) {
        if self.entries.len() > self.window {
            let excess = self.entries.len() - self.window;
            self.entries.drain(..excess);
        }
        self.entries.push(message.into());
    }

    /// Append the bot's answer. No truncation.
    pub fn push_answer(&mut self, answer: impl Into<String>) {
        self.entries.push(answer.into());
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.clone()
    }
}
