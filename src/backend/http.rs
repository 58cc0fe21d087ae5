//! reqwest implementation of [`ChatBackend`].
//!
//! One request per call, no retries and no timeout: a request runs until
//! the HTTP stack resolves or rejects it.

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;

use super::client::{BackendError, ChatBackend};
use super::types::{ChatRequest, ChatResponse, IngestReport, ResetReport, StoreStats};

pub const CHAT_ROUTE: &str = "/chat";
pub const INGEST_ROUTE: &str = "/ingest-and-store";
pub const RESET_ROUTE: &str = "/reset-db";
pub const INSPECT_ROUTE: &str = "/debug-db";

/// HTTP client for the document chat service.
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }

    /// Builds the ingest URL with `doc_url` form-encoded into the query string.
    pub fn ingest_url(&self, doc_url: &str) -> Result<Url, BackendError> {
        Url::parse_with_params(&self.endpoint(INGEST_ROUTE), &[("doc_url", doc_url)])
            .map_err(|e| BackendError::Config(format!("invalid base URL {}: {e}", self.base_url)))
    }
}

/// Rejects non-2xx responses without reading their body.
fn require_success(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    debug!("Response status: {}", status);

    if !status.is_success() {
        warn!("Backend returned {}", status.as_u16());
        return Err(BackendError::Status {
            status: status.as_u16(),
            body: String::new(),
        });
    }
    Ok(response)
}

async fn read_body(response: Response) -> Result<String, BackendError> {
    let body = response
        .text()
        .await
        .map_err(|e| BackendError::Network(e.to_string()))?;
    debug!("Response body: {} bytes", body.len());
    Ok(body)
}

/// Reads the full body first, so a non-2xx `BackendError::Status` carries
/// the service's error detail.
async fn body_with_detail(response: Response) -> Result<String, BackendError> {
    let status = response.status();
    debug!("Response status: {}", status);

    let body = read_body(response).await?;
    if !status.is_success() {
        warn!("Backend returned {}: {}", status.as_u16(), body);
        return Err(BackendError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, BackendError> {
    serde_json::from_str(body).map_err(|e| BackendError::Parse(e.to_string()))
}

/// Best-effort decode of an informational report; a body that doesn't
/// match is ignored.
fn decode_report<T: DeserializeOwned>(body: &str) -> Option<T> {
    match serde_json::from_str(body) {
        Ok(report) => Some(report),
        Err(e) => {
            debug!("Ignoring undecodable report body: {}", e);
            None
        }
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn chat(&self, request: &ChatRequest) -> Result<String, BackendError> {
        info!(
            "Chat request: message_len={}, history_len={}",
            request.message.len(),
            request.history.len()
        );

        let response = self
            .client
            .post(self.endpoint(CHAT_ROUTE))
            .json(request)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let body = read_body(require_success(response)?).await?;
        let chat_response: ChatResponse = decode(&body)?;
        let answer = chat_response
            .into_answer()
            .ok_or(BackendError::MissingAnswer)?;

        info!("Chat answer received: {} bytes", answer.len());
        Ok(answer)
    }

    async fn ingest_document(&self, doc_url: &str) -> Result<(), BackendError> {
        let url = self.ingest_url(doc_url)?;
        info!("Ingest request: {}", url);

        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let body = body_with_detail(response).await?;
        match decode_report::<IngestReport>(&body) {
            Some(IngestReport {
                status: Some(status),
                message: Some(message),
                ..
            }) if status == "error" => {
                warn!("Service reported ingest error: {}", message);
            }
            Some(report) => info!(
                "Document ingested: status={:?}, chunks={:?}",
                report.status, report.total_chunks
            ),
            None => info!("Document ingested"),
        }
        Ok(())
    }

    async fn reset_store(&self) -> Result<(), BackendError> {
        info!("Reset request");

        let response = self
            .client
            .post(self.endpoint(RESET_ROUTE))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let body = read_body(require_success(response)?).await?;
        if let Some(report) = decode_report::<ResetReport>(&body) {
            info!(
                "Store reset: status={:?}, deleted={:?}",
                report.status, report.deleted
            );
        }
        Ok(())
    }

    async fn inspect_store(&self) -> Result<usize, BackendError> {
        debug!("Inspect request");

        let response = self
            .client
            .get(self.endpoint(INSPECT_ROUTE))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let body = read_body(require_success(response)?).await?;
        let stats: StoreStats = decode(&body)?;
        info!("Store holds {} chunk(s)", stats.count);
        Ok(stats.count)
    }
}
