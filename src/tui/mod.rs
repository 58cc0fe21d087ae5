//! # TUI Adapter
//!
//! The ratatui-specific layer. Owns the terminal, draws the screen,
//! translates keys into `core::Action` values and performs the `Effect`s
//! that `update()` hands back.
//!
//! This is the only module that knows about ratatui, crossterm or tokio tasks.
//!
//! ## Request flow
//!
//! ```text
//! key ──▶ route_event() ──▶ Action ──▶ update() ──▶ Effect::Send(Request)
//!                                                          │
//!                                       spawn_request() ◀──┘
//!                                              │ tokio task
//!                                              ▼
//!                             perform() ──▶ completion Action ──▶ mpsc ──▶ update()
//! ```
//!
//! ## Redraw strategy
//!
//! While a request is in flight the loop redraws every ~80ms so the spinner
//! animates. Idle, it sleeps up to 500ms and only redraws on input or when a
//! completion arrives.

mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::backend::{ChatBackend, ChatRequest, HttpBackend};
use crate::core::action::{Action, Effect, Request, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const ANIMATION_TICK: Duration = Duration::from_millis(80);
const IDLE_TICK: Duration = Duration::from_millis(500);

/// Which input box receives typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Chat,
    DocUrl,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Chat => Focus::DocUrl,
            Focus::DocUrl => Focus::Chat,
        }
    }
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub chat_input: InputBox,
    pub url_input: InputBox,
    pub focus: Focus,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            chat_input: InputBox::new("Message", "Ask something about the loaded document"),
            url_input: InputBox::new("Document URL", "https://docs.google.com/document/d/..."),
            focus: Focus::Chat,
        }
    }

    /// Copy lock and focus from core state into the input boxes.
    pub fn sync_props(&mut self, app: &App) {
        self.chat_input.disabled = app.is_loading;
        self.url_input.disabled = app.is_loading;
        self.chat_input.focused = self.focus == Focus::Chat;
        self.url_input.focused = self.focus == Focus::DocUrl;
    }

    fn focused_input(&mut self) -> &mut InputBox {
        match self.focus {
            Focus::Chat => &mut self.chat_input,
            Focus::DocUrl => &mut self.url_input,
        }
    }

    /// The action Enter triggers in the focused field.
    fn submit_action(&self, text: String) -> Action {
        match self.focus {
            Focus::Chat => Action::SubmitMessage(text),
            Focus::DocUrl => Action::LoadDocument(text),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock, // blink timer resets on every draw
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let backend: Arc<dyn ChatBackend> = Arc::new(HttpBackend::new(config.base_url.clone()));
    let mut app = App::from_config(&config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Completion actions from request tasks
    let (tx, rx) = mpsc::channel();

    let start_time = Instant::now();
    let mut needs_redraw = true;

    'event_loop: loop {
        tui.sync_props(&app);

        if app.is_loading {
            needs_redraw = true;
        }
        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if app.is_loading {
            ANIMATION_TICK
        } else {
            IDLE_TICK
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Drain everything pending before the next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let Some(action) = route_event(&app, &mut tui, &event) else {
                continue;
            };
            match apply(&mut app, &mut tui, action) {
                Effect::Quit => break 'event_loop,
                Effect::Send(request) => spawn_request(backend.clone(), request, tx.clone()),
                Effect::None => {}
            }
            // Lock state may have changed mid-drain
            tui.sync_props(&app);
        }

        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if let Effect::Send(request) = apply(&mut app, &mut tui, action) {
                spawn_request(backend.clone(), request, tx.clone());
            }
        }
    }

    info!("Shutting down");
    ratatui::restore();
    Ok(())
}

/// Turn a terminal event into a core action, handling purely
/// presentational events (focus, scrolling, editing) in place.
fn route_event(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    match event {
        TuiEvent::Resize => None,
        TuiEvent::ForceQuit | TuiEvent::Escape => Some(Action::Quit),
        TuiEvent::FocusNext => {
            tui.focus = tui.focus.next();
            tui.sync_props(app);
            None
        }
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.message_list.handle_event(event);
            None
        }
        TuiEvent::LoadDocument => Some(Action::LoadDocument(tui.url_input.buffer.clone())),
        TuiEvent::ResetStore => Some(Action::ResetStore),
        TuiEvent::InspectStore => Some(Action::InspectStore),
        // Disabled boxes swallow Enter; let the reducer report the lock instead
        TuiEvent::Submit if app.is_loading => {
            let text = tui.focused_input().buffer.clone();
            Some(tui.submit_action(text))
        }
        _ => match tui.focused_input().handle_event(event) {
            Some(InputEvent::Submit(text)) => Some(tui.submit_action(text)),
            Some(InputEvent::ContentChanged) | None => None,
        },
    }
}

/// Run the reducer, then apply the presentation side of its outcome.
fn apply(app: &mut App, tui: &mut TuiState, action: Action) -> Effect {
    let effect = update(app, action);
    // A sent message leaves the chat box
    if matches!(effect, Effect::Send(Request::Chat { .. })) {
        tui.chat_input.clear();
    }
    effect
}

/// Perform one request against the backend and wrap the outcome in the
/// matching completion action.
pub async fn perform(backend: &dyn ChatBackend, request: Request) -> Action {
    match request {
        Request::Chat { message, history } => {
            let request = ChatRequest { message, history };
            Action::ChatAnswered(backend.chat(&request).await)
        }
        Request::IngestDocument { doc_url } => {
            Action::DocumentLoaded(backend.ingest_document(&doc_url).await)
        }
        Request::ResetStore => Action::StoreReset(backend.reset_store().await),
        Request::InspectStore => Action::StoreInspected(backend.inspect_store().await),
    }
}

fn spawn_request(backend: Arc<dyn ChatBackend>, request: Request, tx: mpsc::Sender<Action>) {
    info!("Spawning request against {}: {:?}", backend.base_url(), request);
    tokio::spawn(async move {
        let started = Instant::now();
        let action = perform(backend.as_ref(), request).await;
        debug!("Request finished in {}ms", started.elapsed().as_millis());
        if tx.send(action).is_err() {
            warn!("Failed to deliver completion: receiver dropped");
        }
    });
}
