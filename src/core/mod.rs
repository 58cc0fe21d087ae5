//! # Core Application Logic
//!
//! This module contains docchat's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │ Effect::Send(Request)
//!                                ▼
//!                         ┌────────────┐      ┌────────────┐
//!                         │    TUI     │ ───▶ │  backend   │
//!                         │  Adapter   │ ◀─── │  (reqwest) │
//!                         └────────────┘      └────────────┘
//!                                completion Action
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct holding all application state
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`history`]: The context window sent with each chat turn
//! - [`config`]: Settings resolution

pub mod action;
pub mod config;
pub mod history;
pub mod state;
