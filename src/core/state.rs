//! # Application State
//!
//! Core business state for rosterget. Domain logic only, no TUI-specific
//! types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── orchestrator: Orchestrator   // in-flight task + loaded table
//! ├── screens: ScreenStack         // Main at the bottom, overlays above
//! ├── activity: ActivityLog        // timestamped user-facing log
//! ├── title: String                // header title
//! └── subtitle: String             // header subtitle (version, file name)
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::core::activity::ActivityLog;
use crate::core::config::ResolvedConfig;
use crate::core::orchestrator::{Orchestrator, Phase};
use crate::core::screen::ScreenStack;

pub const APP_TITLE: &str = "rosterget";

pub struct App {
    pub orchestrator: Orchestrator,
    pub screens: ScreenStack,
    pub activity: ActivityLog,
    pub title: String,
    pub subtitle: String,
}

impl App {
    pub fn new(max_log_lines: usize) -> Self {
        let mut activity = ActivityLog::new(max_log_lines);
        activity.info("Enter the path to a roster spreadsheet to begin.");
        Self {
            orchestrator: Orchestrator::new(),
            screens: ScreenStack::new(),
            activity,
            title: APP_TITLE.to_string(),
            subtitle: version_subtitle(),
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(config.max_log_lines)
    }

    pub fn phase(&self) -> Phase {
        self.orchestrator.phase()
    }

    /// Human-readable phase for the title bar.
    pub fn phase_label(&self) -> String {
        match self.phase() {
            Phase::Idle => "Idle".to_string(),
            Phase::Loading => "Loading".to_string(),
            Phase::Ready => {
                let rows = self
                    .orchestrator
                    .table()
                    .map(|t| t.row_count())
                    .unwrap_or_default();
                format!("Ready ({rows} rows)")
            }
            Phase::Querying => "Querying".to_string(),
        }
    }
}

pub fn version_subtitle() -> String {
    format!("v{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use crate::core::screen::Screen;
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert_eq!(app.title, "rosterget");
        assert!(app.subtitle.starts_with('v'));
        assert_eq!(app.screens.top(), &Screen::Main);
        assert_eq!(app.phase_label(), "Idle");
        assert_eq!(app.activity.len(), 1);
    }
}
