//! Markdown → ratatui `Text` renderer.
//!
//! Converts `pulldown_cmark` events into styled `Line`/`Span` values:
//! headings, emphasis, inline code, fenced code blocks (syntect highlighted),
//! lists, blockquotes, links and images.
//!
//! Message text comes from the user and from the service, so it is treated
//! as untrusted. Control characters are stripped before parsing (an embedded
//! ESC sequence would otherwise reach the terminal) and raw HTML is dropped.

use std::borrow::Cow;
use std::sync::LazyLock;

use log::debug;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const CODE_THEME: &str = "base16-ocean.dark";
const TAB: &str = "    ";

/// Remove control characters other than newline and tab.
pub fn sanitize(content: &str) -> Cow<'_, str> {
    let keep = |c: &char| !c.is_control() || *c == '\n' || *c == '\t';
    if content.chars().all(|c| keep(&c)) {
        Cow::Borrowed(content)
    } else {
        Cow::Owned(content.chars().filter(keep).collect())
    }
}

/// Render markdown content into styled `Text`, using `base_fg` for body text.
///
/// Returns owned text (`'static`) so callers aren't constrained by input lifetime.
pub fn render(content: &str, base_fg: Color) -> Text<'static> {
    let clean = sanitize(content);

    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);

    let mut w = Writer::new(base_fg);
    for event in Parser::new_ext(&clean, opts) {
        w.handle(event);
    }
    w.text
}

struct Writer {
    text: Text<'static>,
    base_fg: Color,
    /// Inline styles, composed with `patch` so nesting works.
    styles: Vec<Style>,
    /// Prefix spans repeated on every line (blockquote bar, code border).
    line_prefixes: Vec<Span<'static>>,
    /// None = bullet list, Some(n) = ordered list at item n.
    list_indices: Vec<Option<u64>>,
    highlighter: Option<HighlightLines<'static>>,
    in_plain_code: bool,
    link_url: Option<String>,
    needs_blank_line: bool,
}

impl Writer {
    fn new(base_fg: Color) -> Self {
        Self {
            text: Text::default(),
            base_fg,
            styles: vec![],
            line_prefixes: vec![],
            list_indices: vec![],
            highlighter: None,
            in_plain_code: false,
            link_url: None,
            needs_blank_line: false,
        }
    }

    fn style(&self) -> Style {
        self.styles
            .last()
            .copied()
            .unwrap_or_else(|| Style::default().fg(self.base_fg))
    }

    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.style().patch(overlay));
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    fn push_line(&mut self, line: Line<'static>) {
        let mut out = line;
        for prefix in self.line_prefixes.iter().rev().cloned() {
            out.spans.insert(0, prefix);
        }
        self.text.lines.push(out);
    }

    fn push_span(&mut self, span: Span<'static>) {
        match self.text.lines.last_mut() {
            Some(line) => line.push_span(span),
            None => self.push_line(Line::from(vec![span])),
        }
    }

    fn start_block(&mut self) {
        if self.needs_blank_line {
            self.push_line(Line::default());
            self.needs_blank_line = false;
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(t) => self.text(t),
            Event::Code(c) => self.inline_code(c),
            Event::SoftBreak => self.push_span(Span::raw(" ")),
            Event::HardBreak => self.push_line(Line::default()),
            Event::Rule => {
                self.start_block();
                self.push_line(Line::from(Span::styled(
                    "─".repeat(32),
                    Style::default().fg(Color::DarkGray),
                )));
                self.needs_blank_line = true;
            }
            Event::TaskListMarker(done) => {
                self.push_span(Span::raw(if done { "[x] " } else { "[ ] " }));
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                debug!("Dropping raw HTML from message ({} bytes)", html.len());
            }
            _ => {}
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.start_block();
                self.push_line(Line::default());
            }
            Tag::Heading { level, .. } => {
                self.start_block();
                self.push_line(Line::default());
                self.push_style(heading_style(level));
            }
            Tag::BlockQuote(_) => {
                self.start_block();
                self.line_prefixes
                    .push(Span::styled("▎ ", Style::default().fg(Color::DarkGray)));
                self.push_style(Style::default().add_modifier(Modifier::ITALIC));
            }
            Tag::CodeBlock(kind) => self.open_code_block(kind),
            Tag::List(start) => {
                if self.list_indices.is_empty() {
                    self.start_block();
                }
                self.list_indices.push(start);
            }
            Tag::Item => {
                self.push_line(Line::default());
                let indent = "  ".repeat(self.list_indices.len().saturating_sub(1));
                let marker = match self.list_indices.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{indent}{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => format!("{indent}• "),
                };
                self.push_span(Span::styled(marker, Style::default().fg(Color::DarkGray)));
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.link_url = Some(dest_url.to_string());
                self.push_style(link_style());
            }
            Tag::Image { .. } => {
                self.push_span(Span::styled("[image: ", Style::default().fg(Color::DarkGray)));
                self.push_style(Style::default().add_modifier(Modifier::ITALIC));
            }
            _ => {}
        }
    }

    fn open_code_block(&mut self, kind: CodeBlockKind<'_>) {
        if !self.text.lines.is_empty() {
            self.push_line(Line::default());
        }
        let lang = match &kind {
            CodeBlockKind::Fenced(l) => l.as_ref(),
            CodeBlockKind::Indented => "",
        };

        let border = Style::default().fg(Color::DarkGray);
        let mut top = vec![Span::styled("┌─", border)];
        if !lang.is_empty() {
            top.push(Span::styled(format!(" {lang} "), border.add_modifier(Modifier::BOLD)));
        }
        self.push_line(Line::from(top));
        self.line_prefixes.push(Span::styled("│ ", border));

        if !lang.is_empty()
            && let Some(syntax) = SYNTAX_SET.find_syntax_by_token(lang)
        {
            self.highlighter = Some(HighlightLines::new(syntax, &THEME_SET.themes[CODE_THEME]));
        }
        self.in_plain_code = self.highlighter.is_none();
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.needs_blank_line = true,
            TagEnd::Heading(_) => {
                self.pop_style();
                self.needs_blank_line = true;
            }
            TagEnd::BlockQuote(_) => {
                self.line_prefixes.pop();
                self.pop_style();
                self.needs_blank_line = true;
            }
            TagEnd::CodeBlock => {
                self.highlighter = None;
                self.in_plain_code = false;
                self.line_prefixes.pop();
                self.push_line(Line::from(Span::styled(
                    "└─",
                    Style::default().fg(Color::DarkGray),
                )));
                self.needs_blank_line = true;
            }
            TagEnd::List(_) => {
                self.list_indices.pop();
                self.needs_blank_line = true;
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link => {
                self.pop_style();
                if let Some(url) = self.link_url.take() {
                    self.push_span(Span::raw(" <"));
                    self.push_span(Span::styled(url, link_style()));
                    self.push_span(Span::raw(">"));
                }
            }
            TagEnd::Image => {
                self.pop_style();
                self.push_span(Span::styled("]", Style::default().fg(Color::DarkGray)));
            }
            _ => {}
        }
    }

    fn text(&mut self, cow: CowStr<'_>) {
        // ratatui renders \t as zero-width
        let text = cow.replace('\t', TAB);

        if let Some(mut hl) = self.highlighter.take() {
            for line in LinesWithEndings::from(text.as_str()) {
                let Ok(ranges) = hl.highlight_line(line, &SYNTAX_SET) else {
                    continue;
                };
                let spans: Vec<Span<'static>> = ranges
                    .into_iter()
                    .filter_map(|(style, fragment)| {
                        let fragment = fragment.trim_end_matches('\n');
                        (!fragment.is_empty()).then(|| {
                            let fg = style.foreground;
                            Span::styled(
                                fragment.to_owned(),
                                Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b)),
                            )
                        })
                    })
                    .collect();
                self.push_line(Line::from(spans));
            }
            self.highlighter = Some(hl);
            return;
        }

        if self.in_plain_code {
            let code = Style::default().fg(Color::White);
            for line in text.lines() {
                self.push_line(Line::from(Span::styled(line.to_owned(), code)));
            }
            return;
        }

        let style = self.style();
        self.push_span(Span::styled(text, style));
    }

    fn inline_code(&mut self, cow: CowStr<'_>) {
        self.push_span(Span::styled(
            cow.to_string(),
            Style::default().fg(Color::White).bg(Color::DarkGray),
        ));
    }
}

fn heading_style(level: HeadingLevel) -> Style {
    match level {
        HeadingLevel::H1 => Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        HeadingLevel::H2 => Style::default().add_modifier(Modifier::BOLD),
        _ => Style::default().add_modifier(Modifier::BOLD | Modifier::ITALIC),
    }
}

fn link_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::UNDERLINED)
}
