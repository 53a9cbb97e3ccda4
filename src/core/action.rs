//! # Actions
//!
//! Everything that can happen in rosterget becomes an `Action`.
//! User presses Enter on a path? That's `Action::SubmitPath(path)`.
//! A worker finishes loading? That's `Action::LoadFinished { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing any I/O the caller must
//! perform. No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Worker completions arrive here as actions on the UI thread. The
//! orchestrator's generation check runs before anything else, so a stale
//! completion can never pop a screen or touch the table.

use std::path::Path;

use log::{debug, info, warn};

use crate::core::orchestrator::{LoadTicket, Phase, QueryTicket, TaskMessage};
use crate::core::screen::Screen;
use crate::core::state::{App, version_subtitle};
use crate::table::loader::expand_path;
use crate::table::{LoadError, Query, QueryError, QueryKind, QueryResult, Table};

/// What the query form yields when the user confirms it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub search: String,
    pub kind_index: usize,
}

#[derive(Debug)]
pub enum Action {
    /// User entered a file path on the main screen.
    SubmitPath(String),
    /// User asked to open the query form.
    RequestQuery,
    /// The query form closed; `None` means the user backed out.
    QueryFormDismissed(Option<QueryRequest>),
    /// User abandoned the in-flight task from the loading overlay.
    CancelTask,
    LoadFinished {
        generation: u64,
        outcome: Result<Table, LoadError>,
    },
    QueryFinished {
        generation: u64,
        outcome: Result<QueryResult, QueryError>,
    },
    ClearLog,
    Quit,
}

/// Side effects requested by `update()`, performed by the TUI loop.
#[derive(Debug)]
pub enum Effect {
    None,
    Quit,
    /// A query form was pushed; reset its presentation state.
    OpenQueryForm,
    SpawnLoad(LoadTicket),
    SpawnQuery(QueryTicket),
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::SubmitPath(input) => {
            if input.trim().is_empty() {
                return Effect::None;
            }
            let path = expand_path(&input);
            let ticket = app.orchestrator.begin_load(path.clone());
            app.screens
                .show_loading(format!("Loading {}...", file_name(&path)), false);
            app.activity.info(format!("Loading {}", path.display()));
            Effect::SpawnLoad(ticket)
        }

        Action::RequestQuery => {
            if app.screens.top() == &Screen::QueryForm {
                return Effect::None;
            }
            match app.phase() {
                Phase::Ready => {
                    app.screens.push(Screen::QueryForm);
                    Effect::OpenQueryForm
                }
                Phase::Querying => {
                    app.activity.warn(QueryError::Busy.reason());
                    Effect::None
                }
                Phase::Idle | Phase::Loading => {
                    app.activity.warn(QueryError::NoTableLoaded.reason());
                    Effect::None
                }
            }
        }

        Action::QueryFormDismissed(request) => {
            if app.screens.top() != &Screen::QueryForm {
                warn!("Query form dismissed but not on top of the stack");
                return Effect::None;
            }
            app.screens.pop();
            let Some(request) = request else {
                debug!("Query form cancelled");
                return Effect::None;
            };
            let Some(kind) = QueryKind::from_index(request.kind_index) else {
                warn!("Query form returned unknown option {}", request.kind_index);
                return Effect::None;
            };
            start_query(app, kind.build(request.search))
        }

        Action::CancelTask => {
            if app.orchestrator.cancel().is_some() {
                app.screens.pop_loading();
                app.activity.warn("Cancelled");
            }
            Effect::None
        }

        Action::LoadFinished {
            generation,
            outcome,
        } => {
            if let Some(message) = app.orchestrator.finish_load(generation, outcome) {
                apply_message(app, message);
            }
            Effect::None
        }

        Action::QueryFinished {
            generation,
            outcome,
        } => {
            if let Some(message) = app.orchestrator.finish_query(generation, outcome) {
                apply_message(app, message);
            }
            Effect::None
        }

        Action::ClearLog => {
            app.activity.clear();
            Effect::None
        }

        Action::Quit => Effect::Quit,
    }
}

fn start_query(app: &mut App, query: Query) -> Effect {
    match app.orchestrator.begin_query(query.clone()) {
        Ok(ticket) => {
            app.screens
                .show_loading("Running query...".to_string(), query.is_slow());
            app.activity.info(format!("Searching: {}", query.describe()));
            Effect::SpawnQuery(ticket)
        }
        Err(err) => {
            app.activity.warn(err.reason());
            Effect::None
        }
    }
}

/// Apply a live task completion: pop the loading overlay and log the outcome.
fn apply_message(app: &mut App, message: TaskMessage) {
    app.screens.pop_loading();
    match message {
        TaskMessage::LoadSucceeded { rows, path } => {
            info!("Table ready: {} rows from {}", rows, path.display());
            app.activity
                .info(format!("Loaded table successfully. ({rows} rows)"));
            app.subtitle = format!("{} | {}", version_subtitle(), file_name(&path));
        }
        TaskMessage::LoadFailed(err) => {
            warn!("Load failed: {}", err);
            app.activity.error(err.reason());
        }
        TaskMessage::QuerySucceeded { query, result } => log_result(app, &query, &result),
        TaskMessage::QueryFailed(err) => {
            warn!("Query failed: {}", err);
            app.activity.error(err.reason());
        }
    }
}

fn log_result(app: &mut App, query: &Query, result: &QueryResult) {
    if result.is_empty() {
        app.activity.info(format!("{}: no matches", query.describe()));
        return;
    }
    match result {
        QueryResult::Rows(rows) => {
            // Spreadsheet numbering: header is row 1
            let numbers: Vec<String> = rows.iter().map(|i| (i + 2).to_string()).collect();
            app.activity
                .info(format!("{}: row {}", query.describe(), numbers.join(", ")));
        }
        QueryResult::Flat(values) => {
            app.activity.info(format!(
                "{} ({}): {}",
                query.describe(),
                values.len(),
                values.join(", ")
            ));
        }
        QueryResult::Nested(groups) => {
            app.activity
                .info(format!("{} ({} rosters):", query.describe(), groups.len()));
            for (i, group) in groups.iter().enumerate() {
                app.activity
                    .info(format!("  [{}] {}", i + 1, group.join(", ")));
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
