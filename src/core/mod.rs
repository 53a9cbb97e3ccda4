//! # Core Application Logic
//!
//! This module contains rosterget's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • Orchestrator         │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                  ┌─────────────┴─────────────┐
//!                  ▼                           ▼
//!           ┌────────────┐              ┌────────────┐
//!           │    TUI     │   Actions    │   Worker   │
//!           │  Adapter   │ ◄─────────── │  (tokio    │
//!           │ (ratatui)  │   (mpsc)     │  blocking) │
//!           └────────────┘              └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and `update()` reducer
//! - [`orchestrator`]: Generation-checked, one-at-a-time background tasks
//! - [`screen`]: The screen stack
//! - [`activity`]: Timestamped user-facing log
//! - [`config`]: `~/.rosterget/config.toml` loading and resolution

pub mod action;
pub mod activity;
pub mod config;
pub mod orchestrator;
pub mod screen;
pub mod state;
