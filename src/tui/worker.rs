//! # Background Worker
//!
//! Runs load and query tickets off the UI thread, one at a time.
//!
//! Jobs queue on a tokio channel and a single consumer task runs each on
//! `spawn_blocking`, so two background operations never overlap. Results
//! go back to the UI loop as `Action`s over the std `mpsc` channel the loop
//! drains every frame; the worker never touches `App` directly.
//!
//! A job whose cancel flag is already set when it reaches the front of the
//! queue is skipped: its completion would be stale anyway.

use std::sync::{Arc, mpsc};

use log::{debug, info, warn};
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;

use crate::core::action::Action;
use crate::core::orchestrator::{LoadTicket, QueryTicket};
use crate::table::{LoadError, QueryError, TableSource, execute};

#[derive(Debug)]
pub enum Job {
    Load(LoadTicket),
    Query(QueryTicket),
}

pub struct Worker {
    jobs: UnboundedSender<Job>,
    handle: JoinHandle<()>,
}

impl Worker {
    /// Start the consumer task. Must be called from within a tokio runtime.
    pub fn spawn(source: Arc<dyn TableSource>, tx: mpsc::Sender<Action>) -> Self {
        let (jobs, mut queue) = unbounded_channel::<Job>();
        let handle = tokio::spawn(async move {
            while let Some(job) = queue.recv().await {
                let Some(action) = run_job(job, source.clone()).await else {
                    continue;
                };
                if tx.send(action).is_err() {
                    warn!("Failed to deliver worker result: receiver dropped");
                    break;
                }
            }
            debug!("Worker stopped");
        });
        Self { jobs, handle }
    }

    pub fn submit(&self, job: Job) {
        if self.jobs.send(job).is_err() {
            warn!("Worker is not running; job dropped");
        }
    }

    /// Stop accepting jobs and wait for the queue to drain.
    pub async fn shutdown(self) {
        drop(self.jobs);
        if let Err(e) = self.handle.await {
            warn!("Worker task ended abnormally: {}", e);
        }
    }
}

async fn run_job(job: Job, source: Arc<dyn TableSource>) -> Option<Action> {
    match job {
        Job::Load(ticket) => {
            if ticket.cancel.is_cancelled() {
                debug!("Skipping cancelled load (generation {})", ticket.generation);
                return None;
            }
            info!(
                "Worker loading {} (generation {})",
                ticket.path.display(),
                ticket.generation
            );
            let generation = ticket.generation;
            let path = ticket.path;
            let outcome = tokio::task::spawn_blocking(move || source.load(&path))
                .await
                .unwrap_or_else(|e| {
                    warn!("Load worker panicked: {}", e);
                    Err(LoadError::Unknown(e.to_string()))
                });
            Some(Action::LoadFinished {
                generation,
                outcome,
            })
        }
        Job::Query(ticket) => {
            if ticket.cancel.is_cancelled() {
                debug!("Skipping cancelled query (generation {})", ticket.generation);
                return None;
            }
            info!("Worker querying (generation {})", ticket.generation);
            let generation = ticket.generation;
            let started = std::time::Instant::now();
            let outcome = tokio::task::spawn_blocking(move || execute(&ticket.table, &ticket.query))
                .await
                .unwrap_or_else(|e| {
                    warn!("Query worker panicked: {}", e);
                    Err(QueryError::Aborted(e.to_string()))
                });
            debug!(
                "Query generation {} finished in {}ms",
                generation,
                started.elapsed().as_millis()
            );
            Some(Action::QueryFinished {
                generation,
                outcome,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    use crate::core::orchestrator::CancelFlag;
    use crate::table::{Query, QueryResult, Table};
    use crate::test_support::roster_table;

    struct FixedSource;

    impl TableSource for FixedSource {
        fn load(&self, path: &Path) -> Result<Table, LoadError> {
            if path.ends_with("missing.csv") {
                Err(LoadError::NotFound)
            } else {
                Ok(roster_table())
            }
        }
    }

    fn load_ticket(generation: u64, path: &str) -> LoadTicket {
        LoadTicket {
            generation,
            path: PathBuf::from(path),
            cancel: CancelFlag::default(),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_load_and_query_in_order() {
        let (tx, rx) = mpsc::channel();
        let worker = Worker::spawn(Arc::new(FixedSource), tx);

        worker.submit(Job::Load(load_ticket(1, "roster.csv")));
        worker.submit(Job::Query(QueryTicket {
            generation: 2,
            table: Arc::new(roster_table()),
            query: Query::RowsByName("Cy".into()),
            cancel: CancelFlag::default(),
        }));
        worker.submit(Job::Load(load_ticket(3, "missing.csv")));
        worker.shutdown().await;

        let actions: Vec<Action> = rx.try_iter().collect();
        assert_eq!(actions.len(), 3);
        assert!(matches!(
            &actions[0],
            Action::LoadFinished { generation: 1, outcome: Ok(t) } if t.row_count() == 5
        ));
        assert!(matches!(
            &actions[1],
            Action::QueryFinished { generation: 2, outcome: Ok(QueryResult::Rows(rows)) } if rows == &vec![3]
        ));
        assert!(matches!(
            &actions[2],
            Action::LoadFinished { generation: 3, outcome: Err(LoadError::NotFound) }
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_cancelled_job_skipped() {
        let (tx, rx) = mpsc::channel();
        let worker = Worker::spawn(Arc::new(FixedSource), tx);

        let stale = load_ticket(1, "roster.csv");
        stale.cancel.cancel();
        worker.submit(Job::Load(stale));
        worker.submit(Job::Load(load_ticket(2, "roster.csv")));

        let action = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(action, Action::LoadFinished { generation: 2, .. }));
        worker.shutdown().await;
        assert!(rx.try_recv().is_err());
    }
}
