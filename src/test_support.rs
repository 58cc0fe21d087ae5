//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;

use async_trait::async_trait;

use crate::backend::{BackendError, ChatBackend, ChatRequest};
use crate::core::state::App;

/// An in-memory backend that answers every call from canned results
/// and records the chat requests it saw.
pub struct ScriptedBackend {
    pub answer: Result<String, BackendError>,
    pub ingest: Result<(), BackendError>,
    pub reset: Result<(), BackendError>,
    pub count: Result<usize, BackendError>,
    pub chat_requests: Mutex<Vec<ChatRequest>>,
    pub ingested: Mutex<Vec<String>>,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self {
            answer: Ok("scripted answer".to_string()),
            ingest: Ok(()),
            reset: Ok(()),
            count: Ok(0),
            chat_requests: Mutex::new(Vec::new()),
            ingested: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    fn base_url(&self) -> &str {
        "http://scripted.invalid"
    }

    async fn chat(&self, request: &ChatRequest) -> Result<String, BackendError> {
        self.chat_requests.lock().unwrap().push(request.clone());
        self.answer.clone()
    }

    async fn ingest_document(&self, doc_url: &str) -> Result<(), BackendError> {
        self.ingested.lock().unwrap().push(doc_url.to_string());
        self.ingest.clone()
    }

    async fn reset_store(&self) -> Result<(), BackendError> {
        self.reset.clone()
    }

    async fn inspect_store(&self) -> Result<usize, BackendError> {
        self.count.clone()
    }
}

/// Creates a test App with the default history window.
pub fn test_app() -> App {
    App::new("http://test.invalid".to_string(), crate::core::history::DEFAULT_HISTORY_WINDOW)
}
