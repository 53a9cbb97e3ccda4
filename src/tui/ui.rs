use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;

use crate::core::screen::Screen;
use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{LoadingOverlay, LogView, QueryForm, TitleBar};

/// Key hints for the footer, by whichever screen owns the keyboard.
pub fn footer_hint(top: &Screen) -> &'static str {
    match top {
        Screen::Main => " Enter Load  Ctrl+N Query  Ctrl+L Clear log  ↑↓ Scroll  Ctrl+C Quit",
        Screen::Loading { .. } => " Esc Cancel  Enter Load another file  Ctrl+C Quit",
        Screen::QueryForm => " Enter Search  Esc Back  Ctrl+C Quit",
    }
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let [title_area, log_area, input_area, footer_area] =
        Layout::vertical([Length(1), Min(3), Length(3), Length(1)]).areas(frame.area());

    let phase = app.phase_label();
    TitleBar::new(&app.title, &app.subtitle, &phase).render(frame, title_area);

    LogView::new(&mut tui.log_view, &app.activity).render(frame, log_area);

    let top = app.screens.top();
    tui.path_input.focused = !matches!(top, Screen::QueryForm);
    tui.path_input.render(frame, input_area);

    frame.render_widget(
        Paragraph::new(footer_hint(top)).style(Style::default().fg(Color::DarkGray)),
        footer_area,
    );

    // Overlays draw bottom-up so the top of the stack lands last
    for screen in app.screens.iter() {
        match screen {
            Screen::Main => {}
            Screen::Loading { label, slow } => {
                LoadingOverlay::new(label, *slow, spinner_frame).render(frame, log_area);
            }
            Screen::QueryForm => {
                QueryForm::new(&mut tui.query_form).render(frame, frame.area());
            }
        }
    }
}
