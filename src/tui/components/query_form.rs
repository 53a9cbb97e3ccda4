//! # Query Form Component
//!
//! Modal overlay collecting a search term and one of the query options.
//! Opened with Ctrl+N once a table is loaded.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `QueryFormState` lives in `TuiState` and is reset each time the form opens
//! - `QueryForm` is created each frame with borrowed state
//!
//! Nothing is selected when the form opens; Enter refuses to confirm until
//! both a non-blank search term and an option are chosen, and shows why.

use std::fmt;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Padding, Paragraph};

use super::centered_rect;
use super::text_field::TextField;
use crate::core::action::QueryRequest;
use crate::table::QueryKind;
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    EmptySearchText,
    NoQueryKindSelected,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptySearchText => write!(f, "Enter a search term"),
            ValidationError::NoQueryKindSelected => write!(f, "Choose a query"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check the form's inputs and build the request the reducer expects.
///
/// The search text is passed through as typed; lookups match cells exactly,
/// surrounding whitespace included.
pub fn validate(search: &str, selected: Option<usize>) -> Result<QueryRequest, ValidationError> {
    if search.trim().is_empty() {
        return Err(ValidationError::EmptySearchText);
    }
    let kind_index = selected
        .filter(|i| QueryKind::from_index(*i).is_some())
        .ok_or(ValidationError::NoQueryKindSelected)?;
    Ok(QueryRequest {
        search: search.to_string(),
        kind_index,
    })
}

/// Events emitted by the query form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryFormEvent {
    Confirm(QueryRequest),
    Cancel,
}

/// Persistent state for the query form overlay.
#[derive(Debug, Default)]
pub struct QueryFormState {
    search: TextField,
    selected: Option<usize>,
    list_state: ListState,
    error: Option<ValidationError>,
}

impl QueryFormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn error(&self) -> Option<ValidationError> {
        self.error
    }

    fn select(&mut self, index: usize) {
        self.selected = Some(index);
        self.list_state.select(Some(index));
        self.error = None;
    }

    pub fn handle_event(&mut self, event: &TuiEvent) -> Option<QueryFormEvent> {
        let count = QueryKind::ALL.len();
        match event {
            TuiEvent::Escape => Some(QueryFormEvent::Cancel),
            TuiEvent::Submit => match validate(self.search.text(), self.selected) {
                Ok(request) => Some(QueryFormEvent::Confirm(request)),
                Err(e) => {
                    self.error = Some(e);
                    None
                }
            },
            TuiEvent::CursorUp => {
                let index = match self.selected {
                    Some(i) => i.saturating_sub(1),
                    None => count - 1,
                };
                self.select(index);
                None
            }
            TuiEvent::CursorDown | TuiEvent::Tab => {
                let index = match self.selected {
                    Some(i) if i + 1 < count => i + 1,
                    Some(_) if matches!(event, TuiEvent::CursorDown) => count - 1,
                    _ => 0,
                };
                self.select(index);
                None
            }
            other => {
                if self.search.handle_event(other) {
                    self.error = None;
                }
                None
            }
        }
    }
}

/// Transient render wrapper for the query form overlay.
pub struct QueryForm<'a> {
    state: &'a mut QueryFormState,
}

impl<'a> QueryForm<'a> {
    pub fn new(state: &'a mut QueryFormState) -> Self {
        Self { state }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(70, 70, area);
        frame.render_widget(Clear, overlay);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" New Query ")
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(" Enter Search  ↑↓/Tab Choose  Esc Back ").centered())
            .padding(Padding::horizontal(1));
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let [search_area, list_area, error_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        let search_block = Block::bordered().title(" Search ");
        let search_inner = search_block.inner(search_area);
        let (visible, column) = self.state.search.viewport(search_inner.width);
        frame.render_widget(
            Paragraph::new(visible.to_string()).block(search_block),
            search_area,
        );
        frame.set_cursor_position((search_inner.x + column, search_inner.y));

        let items: Vec<ListItem> = QueryKind::ALL
            .iter()
            .enumerate()
            .map(|(i, kind)| {
                let style = if self.state.selected == Some(i) {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(Line::styled(format!("{}. {}", i + 1, kind.label()), style))
            })
            .collect();
        let list = List::new(items).block(Block::default().borders(Borders::TOP).title(" Query "));
        frame.render_stateful_widget(list, list_area, &mut self.state.list_state);

        if let Some(error) = self.state.error {
            frame.render_widget(
                Paragraph::new(error.to_string()).style(Style::default().fg(Color::Red)),
                error_area,
            );
        }
    }
}
