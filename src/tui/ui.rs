use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{INPUT_HEIGHT, MessageList, TitleBar};

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Wrap};

/// Error text never takes more rows than this.
const MAX_ERROR_ROWS: u16 = 3;

const EMPTY_LOG_HINT: &str =
    "Load a Google Doc (Tab to the URL field, then Enter or Ctrl+L) and ask questions about it.";

const HELP: &str =
    "Enter send · Tab switch field · Ctrl+L load · Ctrl+R reset · Ctrl+S inspect · Esc quit";

/// ```text
/// ┌ title bar ─────────────────────────────┐ 1
/// │ chat log                               │ Min(0)
/// │ error line (only while app.error set)  │ 0..=3
/// │ chat input                             │ 3
/// │ document URL input                     │ 3
/// └ help ──────────────────────────────────┘ 1
/// ```
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};

    tui.sync_props(app);

    let area = frame.area();
    let error_height = app
        .error
        .as_deref()
        .map(|e| error_rows(e, area.width))
        .unwrap_or(0);

    let layout = Layout::vertical([
        Length(1),
        Min(0),
        Length(error_height),
        Length(INPUT_HEIGHT),
        Length(INPUT_HEIGHT),
        Length(1),
    ]);
    let [title_area, log_area, error_area, chat_area, url_area, help_area] = layout.areas(area);

    // Log first: it decides whether there is unseen content for the title bar
    if app.log.is_empty() {
        draw_empty_hint(frame, log_area);
        tui.message_list = Default::default();
    } else {
        MessageList::new(&mut tui.message_list, &app.log).render(frame, log_area);
    }

    let mut title_bar = TitleBar::new(
        app.server_url.clone(),
        app.status_message.clone(),
        app.is_loading,
    );
    title_bar.spinner_frame = spinner_frame;
    title_bar.has_unseen_content = !app.log.is_empty() && tui.message_list.has_unseen_content();
    title_bar.render(frame, title_area);

    if let Some(error) = &app.error {
        let paragraph = Paragraph::new(error.as_str())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, error_area);
    }

    tui.chat_input.render(frame, chat_area);
    tui.url_input.render(frame, url_area);

    let help = Line::from(HELP)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, help_area);
}

fn draw_empty_hint(frame: &mut Frame, area: Rect) {
    let hint = Paragraph::new(EMPTY_LOG_HINT)
        .style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    // Vertically centred, at most two rows
    let y = area.y + area.height / 2;
    let height = area.bottom().saturating_sub(y).min(2);
    let hint_area = Rect::new(area.x, y, area.width, height);
    frame.render_widget(hint, hint_area);
}

fn error_rows(error: &str, width: u16) -> u16 {
    let width = (width as usize).max(1);
    let rows = textwrap::wrap(error, width).len() as u16;
    rows.clamp(1, MAX_ERROR_ROWS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Turn;
    use crate::test_support::test_app;
    use crate::tui::Focus;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(app: &App, tui: &mut TuiState) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui, 0)).unwrap();
        terminal
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn empty_log_shows_hint_and_both_inputs() {
        let app = test_app();
        let mut tui = TuiState::new();
        let text = screen(&draw(&app, &mut tui));
        assert!(text.contains("Load a Google Doc"));
        assert!(text.contains("Message"));
        assert!(text.contains("Document URL"));
        assert!(text.contains("docchat (http://test.invalid) | Ready"));
    }

    #[test]
    fn log_turns_are_drawn() {
        let mut app = test_app();
        app.push_turn(Turn::user("Hello"));
        app.push_turn(Turn::bot("Hi"));
        let mut tui = TuiState::new();
        let text = screen(&draw(&app, &mut tui));
        assert!(text.contains("Hello"));
        assert!(text.contains("Hi"));
        assert!(!text.contains("Load a Google Doc"));
    }

    #[test]
    fn error_line_only_when_set() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        assert!(!screen(&draw(&app, &mut tui)).contains("Server error"));

        app.error = Some("Server error".to_string());
        assert!(screen(&draw(&app, &mut tui)).contains("Server error"));
    }

    #[test]
    fn loading_disables_both_inputs() {
        let mut app = test_app();
        app.is_loading = true;
        let mut tui = TuiState::new();
        draw(&app, &mut tui);
        assert!(tui.chat_input.disabled);
        assert!(tui.url_input.disabled);
    }

    #[test]
    fn focus_follows_tui_state() {
        let app = test_app();
        let mut tui = TuiState::new();
        tui.focus = Focus::DocUrl;
        draw(&app, &mut tui);
        assert!(!tui.chat_input.focused);
        assert!(tui.url_input.focused);
    }

    #[test]
    fn error_rows_are_capped() {
        assert_eq!(error_rows("short", 80), 1);
        assert_eq!(error_rows(&"long words ".repeat(100), 20), MAX_ERROR_ROWS);
    }
}
