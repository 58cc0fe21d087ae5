//! # Backend Client
//!
//! Everything that talks to the document chat service over HTTP.
//! The core never imports from here except the plain error type; requests
//! are described by `core::action::Request` and performed by the TUI adapter.

pub mod client;
pub mod http;
pub mod types;

pub use client::{BackendError, ChatBackend};
pub use http::HttpBackend;
pub use types::{ChatRequest, ChatResponse, IngestReport, ResetReport, StoreStats};
