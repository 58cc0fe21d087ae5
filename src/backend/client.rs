use std::fmt;

use async_trait::async_trait;

use super::types::ChatRequest;

/// Errors that can occur while talking to the chat service.
/// Each variant maps to exactly one user-visible line (see `core::action`).
#[derive(Debug, Clone, PartialEq)]
pub enum BackendError {
    /// Base URL or route could not be turned into a request URL.
    Config(String),
    /// Transport failure (connection refused, DNS, reset).
    Network(String),
    /// Service answered with a non-2xx status. `body` is the raw response text.
    Status { status: u16, body: String },
    /// Response body was not the JSON we expected.
    Parse(String),
    /// `/chat` answered without a usable `answer` field.
    MissingAnswer,
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Config(msg) => write!(f, "config error: {msg}"),
            BackendError::Network(msg) => write!(f, "network error: {msg}"),
            BackendError::Status { status, body } => {
                write!(f, "HTTP {status}: {body}")
            }
            BackendError::Parse(msg) => write!(f, "parse error: {msg}"),
            BackendError::MissingAnswer => write!(f, "response has no answer"),
        }
    }
}

impl std::error::Error for BackendError {}

/// The four calls the client makes against the document chat service.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Base URL requests are resolved against (shown in the title bar).
    fn base_url(&self) -> &str;

    /// `POST /chat`. Returns the bot's answer.
    async fn chat(&self, request: &ChatRequest) -> Result<String, BackendError>;

    /// `POST /ingest-and-store?doc_url=...`.
    async fn ingest_document(&self, doc_url: &str) -> Result<(), BackendError>;

    /// `POST /reset-db`.
    async fn reset_store(&self) -> Result<(), BackendError>;

    /// `GET /debug-db`. Returns the number of stored chunks.
    async fn inspect_store(&self) -> Result<usize, BackendError>;
}
