//! # InputBox Component
//!
//! Single-line text field used for both the chat input and the document URL.
//!
//! ## Responsibilities
//!
//! - Capture text input and paste (newlines flattened to spaces)
//! - Cursor movement and editing (backspace, delete, home, end)
//! - Emit `Submit` on Enter with the raw buffer; the parent decides whether
//!   to clear it
//! - Horizontal scrolling so the cursor stays visible
//!
//! ## Props
//!
//! `disabled` and `focused` are set by the parent every frame. A disabled
//! box renders greyed out and ignores every event.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Border (2) + padding (2) consumed horizontally by the bordered block
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Input boxes are always one line of text plus borders.
pub const INPUT_HEIGHT: u16 = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Enter pressed. Carries the untrimmed buffer.
    Submit(String),
    ContentChanged,
}

pub struct InputBox {
    pub buffer: String,
    pub title: &'static str,
    pub placeholder: &'static str,
    /// Prop: UI lock held
    pub disabled: bool,
    /// Prop: receives keyboard input
    pub focused: bool,
    /// Byte offset into `buffer`
    cursor: usize,
    /// Display columns scrolled off the left edge
    scroll: usize,
}

impl InputBox {
    pub fn new(title: &'static str, placeholder: &'static str) -> Self {
        Self {
            buffer: String::new(),
            title,
            placeholder,
            disabled: false,
            focused: false,
            cursor: 0,
            scroll: 0,
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.scroll = 0;
    }

    fn insert_str(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    fn prev_boundary(&self) -> usize {
        self.buffer[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.buffer[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(self.buffer.len())
    }

    /// Display column of the cursor within the whole buffer.
    fn cursor_column(&self) -> usize {
        self.buffer[..self.cursor].width()
    }

    fn update_scroll(&mut self, width: usize) {
        let col = self.cursor_column();
        if width == 0 {
            self.scroll = col;
        } else if col < self.scroll {
            self.scroll = col;
        } else if col >= self.scroll + width {
            self.scroll = col + 1 - width;
        }
    }

    /// The slice of the buffer that fits in `width` columns after scrolling.
    fn visible_text(&self, width: usize) -> String {
        let mut col = 0;
        let mut out = String::new();
        for c in self.buffer.chars() {
            let w = c.width().unwrap_or(0);
            if col >= self.scroll && col + w <= self.scroll + width {
                out.push(c);
            }
            col += w;
            if col > self.scroll + width {
                break;
            }
        }
        out
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = area.width.saturating_sub(HORIZONTAL_OVERHEAD) as usize;
        self.update_scroll(width);

        let border_style = if self.disabled {
            Style::default().fg(Color::DarkGray)
        } else if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };

        let title = if self.disabled {
            format!("{} (busy)", self.title)
        } else {
            self.title.to_string()
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title)
            .padding(Padding::horizontal(1));

        let content = if self.buffer.is_empty() {
            Span::styled(
                self.placeholder,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            let style = if self.disabled {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };
            Span::styled(self.visible_text(width), style)
        };

        let inner = block.inner(area);
        frame.render_widget(Paragraph::new(content).block(block), area);

        if self.focused && !self.disabled {
            let x = inner.x + (self.cursor_column() - self.scroll) as u16;
            frame.set_cursor_position((x.min(inner.right().saturating_sub(1)), inner.y));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.disabled {
            return None;
        }
        match event {
            TuiEvent::InputChar(c) if !c.is_control() => {
                let mut utf8 = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut utf8));
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                let flat: String = text
                    .chars()
                    .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
                    .filter(|c| !c.is_control())
                    .collect();
                self.insert_str(&flat);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace if self.cursor > 0 => {
                let prev = self.prev_boundary();
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Delete if self.cursor < self.buffer.len() => {
                let next = self.next_boundary();
                self.buffer.drain(self.cursor..next);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorLeft if self.cursor > 0 => {
                self.cursor = self.prev_boundary();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorRight if self.cursor < self.buffer.len() => {
                self.cursor = self.next_boundary();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorHome => {
                self.cursor = 0;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorEnd => {
                self.cursor = self.buffer.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Submit => Some(InputEvent::Submit(self.buffer.clone())),
            _ => None,
        }
    }
}
