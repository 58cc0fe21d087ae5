use serde::{Deserialize, Serialize};

/// Body of `POST /chat`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<String>,
}

/// Body returned by `POST /chat`.
///
/// `answer` is optional here so a response without it decodes cleanly and
/// can be reported as a missing answer rather than a parse failure.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ChatResponse {
    #[serde(default)]
    pub answer: Option<String>,
}

impl ChatResponse {
    /// The answer text, treating an empty string the same as a missing field.
    pub fn into_answer(self) -> Option<String> {
        self.answer.filter(|a| !a.is_empty())
    }
}

/// Report returned by `POST /ingest-and-store`.
///
/// The service answers 200 even when ingestion failed on its side, with
/// `status = "error"` and a message. Only logged; success is decided by HTTP status.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct IngestReport {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total_chunks: Option<u64>,
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Report returned by `POST /reset-db`.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ResetReport {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub deleted: Option<u64>,
}

/// Subset of `GET /debug-db` we care about.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct StoreStats {
    pub count: usize,
}
