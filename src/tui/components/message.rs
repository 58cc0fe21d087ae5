use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::state::{Sender, Turn};
use crate::tui::component::Component;
use crate::tui::markdown;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;
/// A bubble never takes more than this share of the log width.
pub const MAX_WIDTH_PERCENT: u16 = 75;
/// Below this log width bubbles use the full width.
const MIN_BUBBLE_WIDTH: u16 = 16;

/// A single chat turn rendered as a bordered bubble.
///
/// User turns sit on the right edge of the log, bot turns on the left.
/// The bubble shrinks to fit short messages and caps at
/// [`MAX_WIDTH_PERCENT`] of the available width.
///
/// Transient: created fresh each frame by `MessageList`.
#[derive(Clone, Copy)]
pub struct TurnBlock<'a> {
    pub turn: &'a Turn,
}

impl<'a> TurnBlock<'a> {
    pub fn new(turn: &'a Turn) -> Self {
        Self { turn }
    }

    fn body(turn: &Turn) -> Text<'static> {
        markdown::render(&turn.text, sender_color(turn.sender))
    }

    /// Width of the bubble for `body` inside a log of width `width`.
    fn bubble_width(sender: Sender, body: &Text<'_>, width: u16) -> u16 {
        if width <= MIN_BUBBLE_WIDTH {
            return width;
        }
        let cap = ((width as u32 * MAX_WIDTH_PERCENT as u32) / 100) as u16;
        let cap = cap.max(MIN_BUBBLE_WIDTH);

        let label = sender_label(sender).len() as u16 + 2;
        let wanted = (body.width() as u16)
            .max(label)
            .saturating_add(HORIZONTAL_OVERHEAD);
        wanted.min(cap)
    }

    /// Where the bubble sits inside `area`: right-aligned for the user.
    pub fn bubble_rect(turn: &Turn, area: Rect) -> Rect {
        let body = Self::body(turn);
        let width = Self::bubble_width(turn.sender, &body, area.width);
        let x = match turn.sender {
            Sender::User => area.x + area.width.saturating_sub(width),
            Sender::Bot => area.x,
        };
        Rect::new(x, area.y, width, area.height)
    }

    /// Rows this turn occupies in a log of width `width`.
    ///
    /// Measured on the same rendered markdown the widget draws, so the
    /// scroll canvas and the drawn blocks agree.
    pub fn calculate_height(turn: &Turn, width: u16) -> u16 {
        let body = Self::body(turn);
        let bubble = Self::bubble_width(turn.sender, &body, width);
        let content_width = bubble.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Degenerate case: terminal too narrow for borders + padding.
            return 1;
        }

        let lines = Paragraph::new(body)
            .wrap(Wrap { trim: false })
            .line_count(content_width);
        u16::try_from(lines)
            .unwrap_or(u16::MAX)
            .max(1)
            .saturating_add(VERTICAL_OVERHEAD)
    }
}

impl<'a> Widget for TurnBlock<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let color = sender_color(self.turn.sender);
        let border_style = Style::default().fg(color).add_modifier(Modifier::DIM);

        let label = Line::from(sender_label(self.turn.sender));
        let label = match self.turn.sender {
            Sender::User => label.right_aligned(),
            Sender::Bot => label.left_aligned(),
        };

        let block = Block::bordered()
            .title(label)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let bubble = Self::bubble_rect(self.turn, area);
        let inner = block.inner(bubble);
        block.render(bubble, buf);

        Paragraph::new(Self::body(self.turn))
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

impl<'a> Component for TurnBlock<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}

pub fn sender_label(sender: Sender) -> &'static str {
    match sender {
        Sender::User => "you",
        Sender::Bot => "bot",
    }
}

pub fn sender_color(sender: Sender) -> Color {
    match sender {
        Sender::User => Color::LightBlue,
        Sender::Bot => Color::Gray,
    }
}
