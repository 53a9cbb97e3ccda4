//! # Task Orchestrator
//!
//! Tracks the single in-flight background task and owns the loaded table.
//!
//! ```text
//!            begin_load                  finish_load(Ok)
//!   Idle ─────────────────► Loading ─────────────────────► Ready
//!    ▲                        │  finish_load(Err)            │  ▲
//!    └────────────────────────┘  (back to Ready if a         │  │ finish_query
//!                                 table was already loaded)  ▼  │
//!                                                          Querying
//! ```
//!
//! Every `begin_*` (and `cancel`) bumps the generation and flags the previous
//! task as cancelled. Completions carry the generation they were started
//! with; a completion whose generation is not the live one is stale and is
//! dropped without touching any state.
//!
//! A query runs against an `Arc<Table>` pinned at submission. Starting a new
//! load while a query runs is allowed: the query keeps its pinned table and
//! its late result is discarded as stale.
//!
//! No I/O and no threads here. `tui::worker` runs the tickets and posts the
//! completions back to the UI loop, which calls `finish_*` on its own thread.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info};

use crate::table::{LoadError, Query, QueryError, QueryResult, Table};

/// Shared flag a worker can poll to skip work nobody will read.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Load,
    Query,
}

#[derive(Debug, Clone)]
pub struct TaskDescriptor {
    pub kind: TaskKind,
    pub generation: u64,
    pub cancel: CancelFlag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Querying,
}

/// Everything a worker needs to run a load.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    pub generation: u64,
    pub path: PathBuf,
    pub cancel: CancelFlag,
}

/// Everything a worker needs to run a query, including the pinned table.
#[derive(Debug, Clone)]
pub struct QueryTicket {
    pub generation: u64,
    pub table: Arc<Table>,
    pub query: Query,
    pub cancel: CancelFlag,
}

/// The one message a live completion produces for the UI state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskMessage {
    LoadSucceeded { rows: usize, path: PathBuf },
    LoadFailed(LoadError),
    QuerySucceeded { query: Query, result: QueryResult },
    QueryFailed(QueryError),
}

#[derive(Debug, Default)]
pub struct Orchestrator {
    generation: u64,
    in_flight: Option<TaskDescriptor>,
    table: Option<Arc<Table>>,
    /// Path of the in-flight load, reported back on success.
    pending_path: Option<PathBuf>,
    /// Query of the in-flight query, reported back on success.
    pending_query: Option<Query>,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn in_flight(&self) -> Option<&TaskDescriptor> {
        self.in_flight.as_ref()
    }

    pub fn table(&self) -> Option<&Arc<Table>> {
        self.table.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.table.is_some()
    }

    pub fn phase(&self) -> Phase {
        match (&self.in_flight, &self.table) {
            (Some(task), _) if task.kind == TaskKind::Load => Phase::Loading,
            (Some(_), _) => Phase::Querying,
            (None, Some(_)) => Phase::Ready,
            (None, None) => Phase::Idle,
        }
    }

    /// Start a new generation, cancelling whatever was in flight.
    fn supersede(&mut self, kind: TaskKind) -> TaskDescriptor {
        if let Some(previous) = self.in_flight.take() {
            debug!(
                "Superseding {:?} task (generation {})",
                previous.kind, previous.generation
            );
            previous.cancel.cancel();
        }
        self.pending_path = None;
        self.pending_query = None;
        self.generation += 1;
        let task = TaskDescriptor {
            kind,
            generation: self.generation,
            cancel: CancelFlag::default(),
        };
        self.in_flight = Some(task.clone());
        task
    }

    /// Begin loading `path`. Always accepted; supersedes any in-flight task.
    pub fn begin_load(&mut self, path: PathBuf) -> LoadTicket {
        let task = self.supersede(TaskKind::Load);
        info!("Load generation {} started: {}", task.generation, path.display());
        self.pending_path = Some(path.clone());
        LoadTicket {
            generation: task.generation,
            path,
            cancel: task.cancel,
        }
    }

    /// Begin a query. Requires `Ready`.
    pub fn begin_query(&mut self, query: Query) -> Result<QueryTicket, QueryError> {
        match self.phase() {
            Phase::Idle | Phase::Loading => return Err(QueryError::NoTableLoaded),
            Phase::Querying => return Err(QueryError::Busy),
            Phase::Ready => {}
        }
        let Some(table) = self.table.clone() else {
            return Err(QueryError::NoTableLoaded);
        };
        let task = self.supersede(TaskKind::Query);
        info!("Query generation {} started: {:?}", task.generation, query);
        self.pending_query = Some(query.clone());
        Ok(QueryTicket {
            generation: task.generation,
            table,
            query,
            cancel: task.cancel,
        })
    }

    /// Abandon the in-flight task, if any. Its completion will be stale.
    pub fn cancel(&mut self) -> Option<TaskKind> {
        let task = self.in_flight.take()?;
        task.cancel.cancel();
        self.pending_path = None;
        self.pending_query = None;
        self.generation += 1;
        info!("Cancelled {:?} task (generation {})", task.kind, task.generation);
        Some(task.kind)
    }

    /// Take the in-flight task if `generation` identifies it.
    fn take_live(&mut self, generation: u64, kind: TaskKind) -> Option<TaskDescriptor> {
        match &self.in_flight {
            Some(task) if task.generation == generation && task.kind == kind => {
                self.in_flight.take()
            }
            _ => {
                debug!(
                    "Dropping stale {:?} completion (generation {}, live {})",
                    kind, generation, self.generation
                );
                None
            }
        }
    }

    /// Apply a load completion. Returns `None` for a stale completion.
    pub fn finish_load(
        &mut self,
        generation: u64,
        outcome: Result<Table, LoadError>,
    ) -> Option<TaskMessage> {
        self.take_live(generation, TaskKind::Load)?;
        let path = self.pending_path.take().unwrap_or_default();
        Some(match outcome {
            Ok(table) => {
                let rows = table.row_count();
                self.table = Some(Arc::new(table));
                TaskMessage::LoadSucceeded { rows, path }
            }
            // A failed reload keeps the previously loaded table.
            Err(err) => TaskMessage::LoadFailed(err),
        })
    }

    /// Apply a query completion. Returns `None` for a stale completion.
    pub fn finish_query(
        &mut self,
        generation: u64,
        outcome: Result<QueryResult, QueryError>,
    ) -> Option<TaskMessage> {
        self.take_live(generation, TaskKind::Query)?;
        let query = self.pending_query.take();
        Some(match (outcome, query) {
            (Ok(result), Some(query)) => TaskMessage::QuerySucceeded { query, result },
            (Ok(_), None) => TaskMessage::QueryFailed(QueryError::Aborted(
                "query completed without a pending request".to_string(),
            )),
            (Err(err), _) => TaskMessage::QueryFailed(err),
        })
    }
}
