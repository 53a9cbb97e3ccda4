//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Routing
//!
//! Keys go to whichever screen is on top of `app.screens`:
//!
//! - **Main**: editing keys go to the path input, arrows scroll the log,
//!   Ctrl+N asks for the query form, Ctrl+L clears the log.
//! - **Loading**: same as Main, plus Esc cancels the in-flight task.
//!   Entering a new path while loading supersedes the running load.
//! - **QueryForm**: everything goes to the form until it is dismissed.
//!
//! Ctrl+C quits from anywhere.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (loading overlay): draws every `tick_rate_ms` for the spinner.
//! - **Idle**: sleeps up to 500ms, only redraws on events, worker results
//!   or terminal resize.

pub mod component;
pub mod components;
pub mod event;
mod ui;
pub mod worker;

use log::{debug, info};
use std::io::stdout;
use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::screen::Screen;
use crate::core::state::App;
use crate::table::FileSource;
use crate::tui::component::EventHandler;
use crate::tui::components::{LogViewState, PathInput, PathInputEvent, QueryFormEvent, QueryFormState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::worker::{Job, Worker};

const IDLE_POLL: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub log_view: LogViewState,
    pub path_input: PathInput,
    pub query_form: QueryFormState,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            log_view: LogViewState::new(),
            path_input: PathInput::new(),
            query_form: QueryFormState::new(),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,                        // Show cursor for path editing
            SetCursorStyle::SteadyBlock, // Non-blinking: redraws reset the blink timer
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Route one input event for the screen currently on top.
fn route_event(top: &Screen, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    if let Screen::QueryForm = top {
        return tui.query_form.handle_event(event).map(|e| match e {
            QueryFormEvent::Confirm(request) => Action::QueryFormDismissed(Some(request)),
            QueryFormEvent::Cancel => Action::QueryFormDismissed(None),
        });
    }
    match event {
        TuiEvent::Escape if matches!(top, Screen::Loading { .. }) => Some(Action::CancelTask),
        TuiEvent::Escape => None,
        TuiEvent::NewQuery => Some(Action::RequestQuery),
        TuiEvent::ClearLog => Some(Action::ClearLog),
        TuiEvent::CursorUp
        | TuiEvent::CursorDown
        | TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.log_view.handle_event(event);
            None
        }
        other => tui
            .path_input
            .handle_event(other)
            .map(|PathInputEvent::Submit(path)| Action::SubmitPath(path)),
    }
}

/// Apply an action and carry out its effect. Returns `true` to quit.
fn dispatch(app: &mut App, tui: &mut TuiState, worker: &Worker, action: Action) -> bool {
    match update(app, action) {
        Effect::None => false,
        Effect::Quit => true,
        Effect::OpenQueryForm => {
            tui.query_form = QueryFormState::new();
            false
        }
        Effect::SpawnLoad(ticket) => {
            worker.submit(Job::Load(ticket));
            false
        }
        Effect::SpawnQuery(ticket) => {
            worker.submit(Job::Query(ticket));
            false
        }
    }
}

/// Run the UI until the user quits. `initial_file` is loaded straight away
/// when given. Must be called from within a tokio runtime.
pub fn run(config: ResolvedConfig, initial_file: Option<PathBuf>) -> std::io::Result<()> {
    let mut app = App::from_config(&config);
    let mut tui = TuiState::new();

    // Channel for actions from the background worker
    let (tx, rx) = mpsc::channel();
    let worker = Worker::spawn(Arc::new(FileSource), tx);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    if let Some(path) = initial_file {
        dispatch(
            &mut app,
            &mut tui,
            &worker,
            Action::SubmitPath(path.to_string_lossy().into_owned()),
        );
    }

    let tick = Duration::from_millis(config.tick_rate_ms);
    let start_time = std::time::Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        let animating = matches!(app.screens.top(), Screen::Loading { .. });
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_millis() / 80) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating { tick } else { IDLE_POLL };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let action = match event {
                TuiEvent::Resize => continue,
                TuiEvent::ForceQuit => Some(Action::Quit),
                ref other => {
                    let top = app.screens.top().clone();
                    route_event(&top, &mut tui, other)
                }
            };
            if let Some(action) = action
                && dispatch(&mut app, &mut tui, &worker, action)
            {
                should_quit = true;
            }
        }

        // Worker completions
        while let Ok(action) = rx.try_recv() {
            debug!("Worker result received");
            needs_redraw = true;
            if dispatch(&mut app, &mut tui, &worker, action) {
                should_quit = true;
            }
        }

        if should_quit {
            break;
        }
    }

    drop(worker);
    ratatui::restore();
    info!("UI loop exited");
    Ok(())
}
