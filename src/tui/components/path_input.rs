//! # PathInput Component
//!
//! The bordered field at the bottom of the main screen where the user types
//! the spreadsheet path. Enter emits the text and clears the field.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};

use super::text_field::TextField;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

pub const PLACEHOLDER: &str = "enter path to excel file here...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathInputEvent {
    Submit(String),
}

#[derive(Debug)]
pub struct PathInput {
    field: TextField,
    /// Dimmed and cursorless while an overlay owns the keyboard (Prop)
    pub focused: bool,
}

impl PathInput {
    pub fn new() -> Self {
        Self {
            field: TextField::new(),
            focused: true,
        }
    }

    pub fn text(&self) -> &str {
        self.field.text()
    }
}

impl Component for PathInput {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(" File ");
        let inner = block.inner(area);

        let paragraph = if self.field.is_empty() {
            Paragraph::new(PLACEHOLDER).style(Style::default().fg(Color::DarkGray))
        } else {
            let (visible, _) = self.field.viewport(inner.width);
            let color = if self.focused {
                Color::Green
            } else {
                Color::DarkGray
            };
            Paragraph::new(visible.to_string()).style(Style::default().fg(color))
        };
        frame.render_widget(paragraph.block(block), area);

        if self.focused {
            let (_, column) = self.field.viewport(inner.width);
            frame.set_cursor_position((inner.x + column, inner.y));
        }
    }
}

impl EventHandler for PathInput {
    type Event = PathInputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Submit => {
                if self.field.text().trim().is_empty() {
                    return None;
                }
                Some(PathInputEvent::Submit(self.field.take()))
            }
            other => {
                self.field.handle_event(other);
                None
            }
        }
    }
}
