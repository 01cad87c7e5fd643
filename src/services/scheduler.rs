//! Background job scheduler.
//!
//! Jobs are registered during startup and started once the runtime is up.
//! A single tokio timer task per job parks until its next deadline — no
//! polling. Jobs run until process exit; this is bootstrap-owned plumbing,
//! not a user-facing scheduling API.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tracing::{debug, warn};

struct Job {
    name: String,
    every: Duration,
    task: Box<dyn Fn() + Send + Sync>,
}

/// In-process job scheduler. Constructed empty; [`Scheduler::start`] spawns
/// the timer tasks for everything registered so far.
#[derive(Default)]
pub struct Scheduler {
    jobs: Mutex<Vec<Arc<Job>>>,
    started: AtomicBool,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a repeating job. Must be called before [`Scheduler::start`];
    /// later registrations are kept but not scheduled.
    pub fn register<F>(&self, name: impl Into<String>, every: Duration, task: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let name = name.into();
        if self.started.load(Ordering::SeqCst) {
            warn!(job = %name, "scheduler already started, job will not run");
        }
        self.lock_jobs().push(Arc::new(Job {
            name,
            every,
            task: Box::new(task),
        }));
    }

    pub fn job_names(&self) -> Vec<String> {
        self.lock_jobs().iter().map(|j| j.name.clone()).collect()
    }

    /// Spawn a timer task per registered job and return how many were
    /// started. Idempotent: a second call starts nothing.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> usize {
        if self.started.swap(true, Ordering::SeqCst) {
            return 0;
        }
        let jobs: Vec<Arc<Job>> = self.lock_jobs().clone();
        let count = jobs.len();
        for job in jobs {
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(job.every);
                // the first tick fires immediately; skip it so `every` means
                // "first run after one period"
                interval.tick().await;
                loop {
                    interval.tick().await;
                    debug!(job = %job.name, "job firing");
                    (job.task)();
                }
            });
        }
        count
    }

    fn lock_jobs(&self) -> std::sync::MutexGuard<'_, Vec<Arc<Job>>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
