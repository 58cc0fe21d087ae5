//! # TitleBar Component
//!
//! Top status bar: service URL, status text and the loading indicator.
//!
//! Stateless. All fields are props copied from `App` and `TuiState` each
//! frame. The spinner stands in for the page's loading element and is shown
//! exactly while the UI lock is held.
//!
//! ```text
//! docchat (http://localhost:8000) | Waiting for answer... ⠹
//! docchat (http://localhost:8000) | Ready | ↓ New
//! ```

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct TitleBar {
    pub server_url: String,
    pub status_message: String,
    pub is_loading: bool,
    pub spinner_frame: usize,
    /// Whether there's content below the current scroll position
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(server_url: String, status_message: String, is_loading: bool) -> Self {
        Self {
            server_url,
            status_message,
            is_loading,
            spinner_frame: 0,
            has_unseen_content: false,
        }
    }

    fn text(&self) -> String {
        let mut title = format!("docchat ({})", self.server_url);
        if !self.status_message.is_empty() {
            title.push_str(" | ");
            title.push_str(&self.status_message);
        }
        if self.has_unseen_content {
            title.push_str(" | ↓ New");
        }
        title
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::raw(self.text())];
        if self.is_loading {
            let glyph = SPINNER[self.spinner_frame % SPINNER.len()];
            spans.push(Span::raw(" "));
            spans.push(Span::styled(glyph, Style::default().fg(Color::Yellow)));
        }
        frame.render_widget(Line::from(spans), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(title_bar: &mut TitleBar) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 1)).unwrap();
        terminal.draw(|f| title_bar.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn shows_server_and_status() {
        let mut title_bar = TitleBar::new(
            "http://localhost:8000".to_string(),
            "Ready".to_string(),
            false,
        );
        let text = rendered(&mut title_bar);
        assert!(text.contains("docchat (http://localhost:8000) | Ready"));
        assert!(!text.contains("↓ New"));
    }

    #[test]
    fn spinner_only_while_loading() {
        let mut idle = TitleBar::new("http://x".to_string(), "Ready".to_string(), false);
        let text = rendered(&mut idle);
        assert!(!SPINNER.iter().any(|g| text.contains(*g)));

        let mut busy = TitleBar::new("http://x".to_string(), "Waiting".to_string(), true);
        busy.spinner_frame = 12;
        assert!(rendered(&mut busy).contains(SPINNER[2]));
    }

    #[test]
    fn empty_status_has_no_separator() {
        let mut title_bar = TitleBar::new("http://x".to_string(), String::new(), false);
        assert!(!rendered(&mut title_bar).contains('|'));
    }

    #[test]
    fn unseen_indicator() {
        let mut title_bar = TitleBar::new("http://x".to_string(), "Ready".to_string(), false);
        title_bar.has_unseen_content = true;
        assert!(rendered(&mut title_bar).contains("↓ New"));
    }
}
