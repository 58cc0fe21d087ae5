use ratatui::Frame;
use ratatui::layout::Rect;

use super::event::TuiEvent;

/// A piece of the screen.
///
/// Components take what they show as props (struct fields) and may borrow
/// persistent state owned by `TuiState`. `render` takes `&mut self` so a
/// component can refresh caches such as measured heights or horizontal
/// scroll during the draw pass.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that reacts to terminal input.
pub trait EventHandler {
    /// Higher-level event emitted to the parent.
    type Event;

    /// Consume a `TuiEvent`, returning an event when the parent must act.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
