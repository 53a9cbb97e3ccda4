use ratatui::Frame;
use ratatui::layout::Rect;

use super::event::TuiEvent;

/// Something that draws itself into a region of the frame.
///
/// Props are struct fields; stateful components borrow their persistent
/// state (`&'a mut FooState`) and are rebuilt every frame. `render` takes
/// `&mut self` so that borrowed state (scroll offsets, cached heights) can be
/// updated during the render pass, as with ratatui's `StatefulWidget`.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// Translates low-level `TuiEvent`s into a component's own events.
pub trait EventHandler {
    type Event;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
