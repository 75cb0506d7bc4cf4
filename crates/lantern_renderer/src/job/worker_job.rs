use crate::error::{JobError, JobResult};
use crate::sync::Guarded;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Condvar;

/// Lifecycle of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    /// Sitting in a job group, not yet picked up
    Queued,
    Running,
    Completed,
}

/// State and cancellation flag shared between a job's owner and the worker
/// running it.
#[derive(Debug)]
pub struct WorkerJob {
    state: Guarded<JobState>,
    changed: Condvar,
    interrupted: AtomicBool,
}

impl WorkerJob {
    pub fn new() -> Self {
        Self {
            state: Guarded::new(JobState::Idle),
            changed: Condvar::new(),
            interrupted: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> JobState {
        self.state.get()
    }

    pub fn is_completed(&self) -> bool {
        self.state() == JobState::Completed
    }

    /// Idle -> Queued.
    pub fn mark_queued(&self) -> JobResult<()> {
        self.transition(|s| match s {
            JobState::Idle => Ok(JobState::Queued),
            other => Err(JobError::NotIdle(other)),
        })
    }

    /// Queued -> Idle, for jobs removed from a queue before running.
    pub fn unqueue(&self) {
        let _ = self.transition(|s| match s {
            JobState::Queued => Ok(JobState::Idle),
            other => Err(JobError::NotIdle(other)),
        });
    }

    /// Idle or Queued -> Running.
    pub fn start(&self) -> JobResult<()> {
        self.transition(|s| match s {
            JobState::Idle | JobState::Queued => Ok(JobState::Running),
            other => Err(JobError::NotIdle(other)),
        })
    }

    /// Running -> Completed.
    pub fn finish(&self) {
        self.state.set(JobState::Completed);
        self.changed.notify_all();
    }

    /// Ask the job body to stop. Valid in any state.
    pub fn interrupt(&self) {
        self.interrupted.store(true, Ordering::Release);
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::Acquire)
    }

    /// Block while the job is queued or running.
    pub fn wait_for_completion(&self) {
        let _state = self.state.wait_while(&self.changed, |s| {
            matches!(s, JobState::Queued | JobState::Running)
        });
    }

    /// Interrupt, wait for the body to stop, then return to `Idle`.
    pub fn reset(&self) {
        self.interrupt();
        let mut state = self.state.wait_while(&self.changed, |s| {
            matches!(s, JobState::Queued | JobState::Running)
        });
        *state = JobState::Idle;
        self.interrupted.store(false, Ordering::Release);
        drop(state);
        self.changed.notify_all();
    }

    fn transition(&self, f: impl FnOnce(JobState) -> JobResult<JobState>) -> JobResult<()> {
        self.state.with(|state| -> JobResult<()> {
            *state = f(*state)?;
            Ok(())
        })?;
        self.changed.notify_all();
        Ok(())
    }
}

impl Default for WorkerJob {
    fn default() -> Self {
        Self::new()
    }
}
