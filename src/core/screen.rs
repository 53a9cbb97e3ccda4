//! # Screen Stack
//!
//! Navigation stack for the UI. The main screen sits at the bottom and can
//! never be popped; only `update()` in action.rs pushes or pops.

use log::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Main,
    /// Overlay shown while background work is in flight.
    Loading { label: String, slow: bool },
    /// Modal form collecting a search term and query option.
    QueryForm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenStack {
    screens: Vec<Screen>,
}

impl Default for ScreenStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenStack {
    pub fn new() -> Self {
        Self {
            screens: vec![Screen::Main],
        }
    }

    pub fn top(&self) -> &Screen {
        // The bottom Main screen is never removed, so the stack is never empty.
        self.screens.last().unwrap_or(&Screen::Main)
    }

    pub fn depth(&self) -> usize {
        self.screens.len()
    }

    pub fn push(&mut self, screen: Screen) {
        self.screens.push(screen);
    }

    /// Pop the top screen. Popping the main screen is a logged no-op.
    pub fn pop(&mut self) -> Option<Screen> {
        if self.screens.len() <= 1 {
            warn!("Ignoring pop with only the main screen on the stack");
            return None;
        }
        self.screens.pop()
    }

    /// Show a loading overlay, relabelling the current one instead of stacking a second.
    pub fn show_loading(&mut self, label: String, slow: bool) {
        if let Some(Screen::Loading { .. }) = self.screens.last() {
            self.screens.pop();
        }
        self.screens.push(Screen::Loading { label, slow });
    }

    /// Pop the top screen only if it is a loading overlay.
    pub fn pop_loading(&mut self) -> bool {
        if matches!(self.top(), Screen::Loading { .. }) {
            self.screens.pop();
            true
        } else {
            warn!("Expected a loading screen on top, found {:?}", self.top());
            false
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Screen> {
        self.screens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_screen_never_popped() {
        let mut stack = ScreenStack::new();
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top(), &Screen::Main);
    }

    #[test]
    fn test_push_pop() {
        let mut stack = ScreenStack::new();
        stack.push(Screen::QueryForm);
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.pop(), Some(Screen::QueryForm));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_show_loading_replaces_existing_overlay() {
        let mut stack = ScreenStack::new();
        stack.show_loading("first".into(), false);
        stack.show_loading("second".into(), false);
        assert_eq!(stack.depth(), 2);
        assert_eq!(
            stack.top(),
            &Screen::Loading {
                label: "second".into(),
                slow: false
            }
        );
    }

    #[test]
    fn test_pop_loading_guards_other_screens() {
        let mut stack = ScreenStack::new();
        assert!(!stack.pop_loading());
        stack.push(Screen::QueryForm);
        assert!(!stack.pop_loading());
        assert_eq!(stack.depth(), 2);
    }
}
