//! # TUI Components
//!
//! Widgets that make up the docchat screen.
//!
//! ## Stateless components (props only)
//!
//! - `TitleBar`: service URL, status line and loading spinner
//! - `TurnBlock`: one chat turn as a bordered bubble
//!
//! ## Stateful components (event-driven)
//!
//! - `InputBox`: single-line field, used for both the chat input and the
//!   document URL
//! - `MessageList`: scrollable chat log with a height cache
//!
//! Every component receives what it displays as props copied from `App`
//! each frame. None of them reach into core state directly, so each can be
//! rendered on a `TestBackend` in isolation.
//!
//! ```text
//! components/
//! ├── mod.rs
//! ├── title_bar.rs
//! ├── message.rs
//! ├── message_list.rs
//! └── input_box.rs
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod input_box;
pub use input_box::{INPUT_HEIGHT, InputBox, InputEvent};
pub mod message;
pub mod message_list;
pub use message_list::{MessageList, MessageListState};
