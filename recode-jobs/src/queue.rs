//! Bounded-concurrency job queue.
//!
//! Jobs enter in `Prepared` state and start oldest-first whenever a
//! slot is free: on an explicit `start` call and again each time a
//! running job reaches a terminal state. At most `cap` jobs run at
//! once, each on its own worker thread. Failed jobs stay failed until
//! an explicit `retry`.

use crate::config::JobConfig;
use crate::runner::{JobRunner, JobState, ProgressSink};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::{Condvar, Mutex};
use recode_core::{ErrorKind, JobError};
use recode_codec::MediaBackend;
use recode_pipeline::CancelToken;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tracing::{debug, info};
use uuid::Uuid;

/// Opaque job identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(Uuid);

impl JobId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything observers learn about the queue, in order per job.
#[derive(Debug, Clone, PartialEq)]
pub enum JobEvent {
    Started(JobId),
    /// Coalesced to at most one per scheduler burst.
    Progress(JobId, f64),
    Succeeded(JobId),
    Failed(JobId, JobError),
    Cancelled(JobId),
}

struct JobEntry {
    id: JobId,
    input: PathBuf,
    config: JobConfig,
    state: JobState,
    cancel: CancelToken,
}

struct Inner {
    jobs: Vec<JobEntry>,
    started: bool,
}

impl Inner {
    fn running_count(&self) -> usize {
        self.jobs
            .iter()
            .filter(|j| j.state == JobState::Running)
            .count()
    }

    fn entry_mut(&mut self, id: JobId) -> Option<&mut JobEntry> {
        self.jobs.iter_mut().find(|j| j.id == id)
    }
}

/// FIFO queue of transcoding jobs with a cap on parallelism.
pub struct JobQueue {
    backend: Arc<dyn MediaBackend>,
    cap: usize,
    inner: Mutex<Inner>,
    idle: Condvar,
    events_tx: Sender<JobEvent>,
    events_rx: Receiver<JobEvent>,
}

impl JobQueue {
    /// `cap` is the maximum number of simultaneously running jobs.
    pub fn new(backend: Arc<dyn MediaBackend>, cap: usize) -> Arc<Self> {
        let (events_tx, events_rx) = unbounded();
        Arc::new(Self {
            backend,
            cap: cap.max(1),
            inner: Mutex::new(Inner {
                jobs: Vec::new(),
                started: false,
            }),
            idle: Condvar::new(),
            events_tx,
            events_rx,
        })
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// The queue's event stream. Hand the receiver to one observer.
    pub fn events(&self) -> Receiver<JobEvent> {
        self.events_rx.clone()
    }

    /// Append a job in `Prepared` state. Nothing runs until `start`.
    pub fn enqueue(self: &Arc<Self>, input: impl Into<PathBuf>, config: JobConfig) -> JobId {
        let id = JobId::new();
        let mut inner = self.inner.lock();
        inner.jobs.push(JobEntry {
            id,
            input: input.into(),
            config,
            state: JobState::Prepared,
            cancel: CancelToken::new(),
        });
        let started = inner.started;
        drop(inner);

        debug!(%id, "job enqueued");
        if started {
            self.pump();
        }
        id
    }

    /// Begin draining the queue. Safe to call repeatedly.
    pub fn start(self: &Arc<Self>) {
        self.inner.lock().started = true;
        self.pump();
    }

    /// Request cooperative cancellation. Prepared jobs cancel
    /// immediately; running jobs finish their current burst, close the
    /// output, and report `Cancelled`.
    pub fn cancel(self: &Arc<Self>, id: JobId) {
        let mut inner = self.inner.lock();
        if let Some(entry) = inner.entry_mut(id) {
            match entry.state {
                JobState::Prepared => {
                    entry.state = JobState::Cancelled;
                    let _ = self.events_tx.send(JobEvent::Cancelled(id));
                    self.idle.notify_all();
                }
                JobState::Running => entry.cancel.cancel(),
                _ => {}
            }
        }
    }

    /// Put a failed job back into `Prepared`. The next `start` call or
    /// terminal event picks it up; a job never restarts implicitly.
    pub fn retry(self: &Arc<Self>, id: JobId) -> bool {
        let mut inner = self.inner.lock();
        match inner.entry_mut(id) {
            Some(entry) if matches!(entry.state, JobState::Failed(_)) => {
                entry.state = JobState::Prepared;
                entry.cancel = CancelToken::new();
                info!(%id, "failed job reset to prepared");
                true
            }
            _ => false,
        }
    }

    pub fn state(&self, id: JobId) -> Option<JobState> {
        self.inner
            .lock()
            .jobs
            .iter()
            .find(|j| j.id == id)
            .map(|j| j.state.clone())
    }

    /// Number of jobs currently running.
    pub fn running(&self) -> usize {
        self.inner.lock().running_count()
    }

    /// Block until no job is running or waiting to run.
    pub fn wait_idle(&self) {
        let mut inner = self.inner.lock();
        while inner
            .jobs
            .iter()
            .any(|j| matches!(j.state, JobState::Running | JobState::Prepared))
        {
            self.idle.wait(&mut inner);
        }
    }

    /// Start prepared jobs, oldest first, while slots are free.
    fn pump(self: &Arc<Self>) {
        let mut inner = self.inner.lock();
        if !inner.started {
            return;
        }
        while inner.running_count() < self.cap {
            let Some(entry) = inner
                .jobs
                .iter_mut()
                .find(|j| j.state == JobState::Prepared)
            else {
                break;
            };
            entry.state = JobState::Running;
            let id = entry.id;
            let input = entry.input.clone();
            let config = entry.config.clone();
            let cancel = entry.cancel.clone();
            let queue = Arc::clone(self);
            let _ = self.events_tx.send(JobEvent::Started(id));
            debug!(%id, running = inner.running_count(), "job starting");

            let spawned = thread::Builder::new()
                .name(format!("recode-job-{id}"))
                .spawn(move || {
                    let runner = JobRunner::new(queue.backend.clone(), input, config);
                    let sink = QueueSink {
                        id,
                        events: queue.events_tx.clone(),
                    };
                    let state = runner.run(&cancel, &sink);
                    queue.finish(id, state);
                });
            if let Err(err) = spawned {
                let error = JobError::new(ErrorKind::OpenIo, format!("worker spawn: {err}"));
                if let Some(entry) = inner.entry_mut(id) {
                    entry.state = JobState::Failed(error.clone());
                }
                let _ = self.events_tx.send(JobEvent::Failed(id, error));
            }
        }
    }

    /// Record a terminal state and refill the freed slot.
    fn finish(self: &Arc<Self>, id: JobId, state: JobState) {
        {
            let mut inner = self.inner.lock();
            if let Some(entry) = inner.entry_mut(id) {
                entry.state = state;
            }
        }
        self.idle.notify_all();
        self.pump();
    }
}

/// Forwards runner callbacks onto the queue's event channel.
struct QueueSink {
    id: JobId,
    events: Sender<JobEvent>,
}

impl ProgressSink for QueueSink {
    fn on_progress(&self, progress: f64) {
        let _ = self.events.send(JobEvent::Progress(self.id, progress));
    }

    fn on_success(&self) {
        let _ = self.events.send(JobEvent::Succeeded(self.id));
    }

    fn on_fail(&self, error: &JobError) {
        let event = if error.kind == ErrorKind::Cancelled {
            JobEvent::Cancelled(self.id)
        } else {
            JobEvent::Failed(self.id, error.clone())
        };
        let _ = self.events.send(event);
    }
}
