//! # TitleBar Component
//!
//! Top status bar: application title, subtitle (version and loaded file),
//! and the current phase right-aligned.
//!
//! TitleBar is purely presentational. It receives all data as props and has
//! no internal state:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(&app.title, &app.subtitle, &app.phase_label());
//! title_bar.render(frame, area);
//! ```

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

pub struct TitleBar<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
    pub phase: &'a str,
}

impl<'a> TitleBar<'a> {
    pub fn new(title: &'a str, subtitle: &'a str, phase: &'a str) -> Self {
        Self {
            title,
            subtitle,
            phase,
        }
    }
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let left = Line::from(vec![
            Span::styled(
                self.title.to_string(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(self.subtitle.to_string(), Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(left), area);

        let right = Paragraph::new(format!("{} ", self.phase)).alignment(Alignment::Right);
        frame.render_widget(right, area);
    }
}
