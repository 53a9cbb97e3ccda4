//! # LogView Component
//!
//! Scrollable view of the activity log on the main screen.
//!
//! `LogView` is a transient component (created each frame) that wraps
//! `&'a mut LogViewState` (persistent state) and the `ActivityLog` (props).
//! Lines are wrapped with `textwrap` to the viewport width so their heights
//! are known before rendering into a `ScrollView`.
//!
//! The view sticks to the bottom while new lines arrive; scrolling up
//! detaches it and scrolling back to the end re-attaches.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::activity::{ActivityLog, Level, LogLine};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Scroll state for the activity log. Must be persisted in the parent TuiState.
#[derive(Debug)]
pub struct LogViewState {
    pub scroll_state: ScrollViewState,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Wrapped height of all lines from the last render
    pub content_height: u16,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for LogViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl LogViewState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            stick_to_bottom: true,
            content_height: 0,
            viewport_height: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
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
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

impl EventHandler for LogViewState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp | TuiEvent::CursorUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown | TuiEvent::CursorDown => {
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

fn level_style(level: Level) -> Style {
    match level {
        Level::Info => Style::default().fg(Color::Gray),
        Level::Warn => Style::default().fg(Color::Yellow),
        Level::Error => Style::default().fg(Color::Red),
    }
}

/// Wrap one log line to `width`, dimming the timestamp on its first row.
fn wrap_line(line: &LogLine, width: u16) -> Vec<Line<'static>> {
    let stamp = line.timestamp();
    let full = format!("{}  {}", stamp, line.text);
    let style = level_style(line.level);
    if width == 0 {
        return vec![Line::from(Span::styled(full, style))];
    }
    let options = textwrap::Options::new(width as usize).break_words(true);
    textwrap::wrap(&full, options)
        .into_iter()
        .enumerate()
        .map(|(i, row)| match row.strip_prefix(stamp.as_str()) {
            Some(rest) if i == 0 => Line::from(vec![
                Span::styled(stamp.clone(), Style::default().fg(Color::DarkGray)),
                Span::styled(rest.to_string(), style),
            ]),
            _ => Line::from(Span::styled(row.into_owned(), style)),
        })
        .collect()
}

/// Scrollable activity log. Created fresh each frame.
pub struct LogView<'a> {
    pub state: &'a mut LogViewState,
    pub log: &'a ActivityLog,
}

impl<'a> LogView<'a> {
    pub fn new(state: &'a mut LogViewState, log: &'a ActivityLog) -> Self {
        Self { state, log }
    }
}

impl<'a> Component for LogView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Activity ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let content_width = inner.width.saturating_sub(1); // scrollbar column
        let lines: Vec<Line> = self
            .log
            .iter()
            .flat_map(|line| wrap_line(line, content_width))
            .collect();
        let total_height = u16::try_from(lines.len()).unwrap_or(u16::MAX);

        self.state.content_height = total_height;
        self.state.viewport_height = inner.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(
            Paragraph::new(lines),
            Rect::new(0, 0, content_width, total_height),
        );

        if self.state.stick_to_bottom {
            let max_y = self.state.max_offset();
            self.state.scroll_state.set_offset(Position { x: 0, y: max_y });
        }
        frame.render_stateful_widget(scroll_view, inner, &mut self.state.scroll_state);
    }
}
