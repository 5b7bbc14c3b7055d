//! Cancellable scheduled tasks.
//!
//! Controllers never touch a timer primitive directly. They ask a
//! [`Scheduler`] for a recurring or one-shot task and keep the returned
//! [`TaskHandle`] so teardown can cancel it. [`TokioScheduler`] drives real
//! time; [`ManualScheduler`] lets tests step a virtual clock.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Work run by a scheduled task. Recurring tasks call it once per tick.
pub type Job = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Wrap an async closure as a [`Job`].
pub fn job<F, Fut>(f: F) -> Job
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move || f().boxed())
}

/// Cancels a scheduled task. Cloning shares the same task.
#[derive(Debug, Clone, Default)]
pub struct TaskHandle {
    token: CancellationToken,
}

impl TaskHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops future runs. A run already in progress finishes.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

pub trait Scheduler: Send + Sync {
    /// Run `job` every `period`, first after one full period.
    fn every(&self, period: Duration, job: Job) -> TaskHandle;

    /// Run `job` once after `delay`.
    fn after(&self, delay: Duration, job: Job) -> TaskHandle;
}

// =============================================================================
// Tokio
// =============================================================================

/// Real-time scheduler on the ambient tokio runtime.
///
/// Each tick spawns the job instead of awaiting it, so a slow refresh does not
/// hold back the next one and cycles may overlap.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn every(&self, period: Duration, job: Job) -> TaskHandle {
        let handle = TaskHandle::new();
        let shutdown = handle.token();
        let period = period.max(Duration::from_millis(1));
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        debug!("Recurring task cancelled");
                        break;
                    }
                    _ = ticker.tick() => {
                        tokio::spawn(job());
                    }
                }
            }
        });
        handle
    }

    fn after(&self, delay: Duration, job: Job) -> TaskHandle {
        let handle = TaskHandle::new();
        let shutdown = handle.token();
        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {}
                _ = tokio::time::sleep(delay) => job().await,
            }
        });
        handle
    }
}

// =============================================================================
// Manual
// =============================================================================

struct Entry {
    id: u64,
    due: Duration,
    period: Option<Duration>,
    job: Job,
    handle: TaskHandle,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_id: u64,
    entries: Vec<Entry>,
}

/// Virtual-time scheduler. Nothing runs until [`advance`](Self::advance) is
/// awaited; due jobs then run one at a time in due order.
#[derive(Default)]
pub struct ManualScheduler {
    state: Mutex<ManualState>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, delay: Duration, period: Option<Duration>, job: Job) -> TaskHandle {
        let handle = TaskHandle::new();
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let id = state.next_id;
        state.next_id += 1;
        let due = state.now + delay;
        state.entries.push(Entry {
            id,
            due,
            period,
            job,
            handle: handle.clone(),
        });
        handle
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).now
    }

    /// Tasks that have not been cancelled and may still run.
    pub fn pending(&self) -> usize {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state
            .entries
            .iter()
            .filter(|e| !e.handle.is_cancelled())
            .count()
    }

    /// Move virtual time forward, running every job that falls due.
    pub async fn advance(&self, by: Duration) {
        let target = self.now() + by;
        while let Some(job) = self.next_due(target) {
            job().await;
        }
    }

    /// Pop the earliest due job (ties by creation order) and re-arm it if
    /// recurring. Returns `None` once nothing is due before `target`.
    fn next_due(&self, target: Duration) -> Option<Job> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.entries.retain(|e| !e.handle.is_cancelled());
        let index = state
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= target)
            .min_by_key(|(_, e)| (e.due, e.id))
            .map(|(i, _)| i);
        let Some(index) = index else {
            state.now = target;
            return None;
        };
        state.now = state.entries[index].due;
        let job = state.entries[index].job.clone();
        match state.entries[index].period {
            Some(period) => state.entries[index].due += period.max(Duration::from_millis(1)),
            None => {
                state.entries.remove(index);
            }
        }
        Some(job)
    }
}

impl Scheduler for ManualScheduler {
    fn every(&self, period: Duration, job: Job) -> TaskHandle {
        self.push(period, Some(period), job)
    }

    fn after(&self, delay: Duration, job: Job) -> TaskHandle {
        self.push(delay, None, job)
    }
}
