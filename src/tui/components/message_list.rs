//! # MessageList Component
//!
//! Scrollable view of the chat log.
//!
//! ## Responsibilities
//!
//! - Display every turn in order
//! - Jump to the bottom whenever a turn is appended
//! - Let the user scroll back, and re-pin when they scroll to the end
//! - Cache block heights so only new turns are measured
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the log slice (props).

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::state::Turn;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::TurnBlock;
use crate::tui::event::TuiEvent;

/// Scroll and layout state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on every frame
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            viewport_height: 0,
        }
    }

    fn max_scroll(&self) -> u16 {
        self.layout.total_height().saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_scroll();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll once the user has scrolled back to the end.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_scroll();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Whether there is content below the visible window.
    pub fn has_unseen_content(&self) -> bool {
        self.scroll_state.offset().y < self.max_scroll()
    }
}

/// Scrollable chat log component.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub log: &'a [Turn],
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a mut MessageListState, log: &'a [Turn]) -> Self {
        Self { state, log }
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar

        // 1. Measure new turns; a shrunk log or new width re-measures everything
        match self.state.layout.sync(self.log, content_width) {
            LayoutChange::Appended => self.state.stick_to_bottom = true,
            LayoutChange::Reset => {
                self.state.scroll_state = ScrollViewState::default();
                self.state.stick_to_bottom = true;
            }
            LayoutChange::Unchanged => {}
        }
        let total_height = self.state.layout.total_height();

        // 2. Pin to the bottom, or clamp so we never overscroll past content
        self.state.viewport_height = area.height;
        if self.state.stick_to_bottom {
            let bottom = total_height.saturating_sub(area.height);
            self.state.scroll_state.set_offset(Position { x: 0, y: bottom });
        } else {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render only the turns near the viewport
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        // The canvas is capped at u16::MAX rows; turns past it are not drawn
        let canvas = Rect::new(0, 0, content_width, total_height);
        let mut y_offset = self.state.layout.top_of(visible.start);
        for i in visible {
            if y_offset >= total_height {
                break;
            }
            let height = self.state.layout.heights[i];
            let rect = Rect::new(0, y_offset, content_width, height).intersection(canvas);
            if !rect.is_empty() {
                scroll_view.render_widget(TurnBlock::new(&self.log[i]), rect);
            }
            y_offset = y_offset.saturating_add(height);
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            _ => {}
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutChange {
    Unchanged,
    Appended,
    Reset,
}

/// Cached block heights. The log only ever grows or is wiped, so
/// cached heights stay valid until the width changes or the log shrinks.
#[derive(Default)]
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    content_width: u16,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sync(&mut self, log: &[Turn], content_width: u16) -> LayoutChange {
        let previous = self.heights.len();
        if log.len() < previous || content_width != self.content_width {
            self.heights.clear();
        }
        self.content_width = content_width;

        let measured = self.heights.len();
        for turn in &log[measured..] {
            self.heights
                .push(TurnBlock::calculate_height(turn, content_width));
        }

        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();

        match log.len().cmp(&previous) {
            std::cmp::Ordering::Less => LayoutChange::Reset,
            std::cmp::Ordering::Greater => LayoutChange::Appended,
            std::cmp::Ordering::Equal => LayoutChange::Unchanged,
        }
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Canvas row where turn `index` starts.
    pub fn top_of(&self, index: usize) -> u16 {
        if index == 0 {
            0
        } else {
            self.prefix_heights[index - 1]
        }
    }

    /// Turns overlapping the viewport, with half a screen of slack either side.
    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let slack = viewport_height / 2;
        let from = scroll_offset.saturating_sub(slack);
        let to = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(slack);

        let start = self.prefix_heights.partition_point(|&end| end <= from);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < to)
            .saturating_add(1)
            .min(self.prefix_heights.len());
        start..end
    }
}
