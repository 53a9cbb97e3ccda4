//! # TUI Components
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as props:
//! - `TitleBar`: Title, subtitle and current phase
//! - `LoadingOverlay`: Spinner and cancel hint over the log
//!
//! ### Stateful Components (Event-Driven)
//!
//! Persistent state lives in `TuiState`; a transient wrapper borrows it
//! each frame to render:
//! - `PathInput`: File path field on the main screen
//! - `LogViewState` / `LogView`: Scrollable activity log
//! - `QueryFormState` / `QueryForm`: Modal search form
//!
//! `TextField` is the single-line editor shared by the path input and the
//! query form.
//!
//! ```text
//! components/
//! ├── mod.rs         (this file)
//! ├── title_bar.rs
//! ├── log_view.rs
//! ├── path_input.rs
//! ├── text_field.rs
//! ├── loading.rs
//! └── query_form.rs
//! ```

use ratatui::layout::{Constraint, Layout, Rect};

mod loading;
mod log_view;
mod path_input;
mod query_form;
mod text_field;
mod title_bar;

pub use loading::LoadingOverlay;
pub use log_view::{LogView, LogViewState};
pub use path_input::{PathInput, PathInputEvent};
pub use query_form::{QueryForm, QueryFormEvent, QueryFormState, ValidationError};
pub use text_field::TextField;
pub use title_bar::TitleBar;

/// Compute a centered rect using percentage of the outer rect.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}
