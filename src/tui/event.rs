use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};

/// Terminal input, already translated into what docchat cares about.
#[derive(Debug, Clone, PartialEq)]
pub enum TuiEvent {
    // Routed to core::update
    ForceQuit, // Ctrl+C
    Escape, // Esc also quits
    Submit, // Enter
    LoadDocument, // Ctrl+L
    ResetStore, // Ctrl+R
    InspectStore, // Ctrl+S

    // Handled by the focused input box
    InputChar(char),
    Paste(String),
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,

    // Handled in the TUI layer
    FocusNext, // Tab
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    Resize,
}

/// Poll for an event, blocking up to `timeout`.
///
/// Terminal read errors are logged and treated as "no event" so a transient
/// failure doesn't tear down the UI.
pub fn poll_event_timeout(timeout: Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => {}
        Ok(false) => return None,
        Err(e) => {
            log::warn!("Polling terminal events failed: {}", e);
            return None;
        }
    }
    match event::read() {
        Ok(event) => translate(event),
        Err(e) => {
            log::warn!("Reading terminal event failed: {}", e);
            None
        }
    }
}

/// Poll for an event without blocking.
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(Duration::ZERO)
}

fn translate(event: Event) -> Option<TuiEvent> {
    match event {
        Event::Key(key) => map_key(key),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
            _ => None,
        },
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

pub fn map_key(key: KeyEvent) -> Option<TuiEvent> {
    // Windows terminals report releases too
    if key.kind != KeyEventKind::Press {
        return None;
    }
    log::debug!("Key event: {:?} with modifiers {:?}", key.code, key.modifiers);

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(TuiEvent::ForceQuit),
            KeyCode::Char('l') => Some(TuiEvent::LoadDocument),
            KeyCode::Char('r') => Some(TuiEvent::ResetStore),
            KeyCode::Char('s') => Some(TuiEvent::InspectStore),
            KeyCode::Char('a') => Some(TuiEvent::CursorHome),
            KeyCode::Char('e') => Some(TuiEvent::CursorEnd),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(c) => Some(TuiEvent::InputChar(c)),
        KeyCode::Backspace => Some(TuiEvent::Backspace),
        KeyCode::Delete => Some(TuiEvent::Delete),
        KeyCode::Enter => Some(TuiEvent::Submit),
        KeyCode::Esc => Some(TuiEvent::Escape),
        KeyCode::Tab | KeyCode::BackTab => Some(TuiEvent::FocusNext),
        KeyCode::Left => Some(TuiEvent::CursorLeft),
        KeyCode::Right => Some(TuiEvent::CursorRight),
        KeyCode::Home => Some(TuiEvent::CursorHome),
        KeyCode::End => Some(TuiEvent::CursorEnd),
        KeyCode::Up => Some(TuiEvent::ScrollUp),
        KeyCode::Down => Some(TuiEvent::ScrollDown),
        KeyCode::PageUp => Some(TuiEvent::ScrollPageUp),
        KeyCode::PageDown => Some(TuiEvent::ScrollPageDown),
        _ => None,
    }
}
