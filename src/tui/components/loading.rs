//! Loading overlay: spinner, task label and a cancel hint, centered over
//! the activity log while a load or query is in flight.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph, Wrap};

use super::centered_rect;
use crate::tui::component::Component;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct LoadingOverlay<'a> {
    pub label: &'a str,
    /// Query scans every community
    pub slow: bool,
    pub spinner_frame: usize,
}

impl<'a> LoadingOverlay<'a> {
    pub fn new(label: &'a str, slow: bool, spinner_frame: usize) -> Self {
        Self {
            label,
            slow,
            spinner_frame,
        }
    }
}

impl Component for LoadingOverlay<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(60, 40, area);
        frame.render_widget(Clear, overlay);

        let spinner = SPINNER[self.spinner_frame % SPINNER.len()];
        let mut lines = vec![
            Line::default(),
            Line::from(vec![
                Span::styled(spinner, Style::default().fg(Color::Cyan)),
                Span::raw(" "),
                Span::styled(
                    self.label.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]),
        ];
        if self.slow {
            lines.push(Line::styled(
                "Searching every roster may take a while.",
                Style::default().fg(Color::Yellow),
            ));
        }

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .title_bottom(Line::from(" Esc to cancel ").centered());
        let body = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(body, overlay);
    }
}
