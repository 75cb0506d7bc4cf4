//! Job infrastructure: a job state machine, a FIFO job group and the worker
//! threads that drain it.

mod job_group;
mod scheduler;
mod worker_job;
mod worker_thread;

pub use job_group::JobGroup;
pub use scheduler::{default_thread_count, Scheduler};
pub use worker_job::{JobState, WorkerJob};
pub use worker_thread::WorkerThread;

use crate::error::JobResult;

/// A unit of work executed on a worker thread.
///
/// Implementors embed a `WorkerJob` for state tracking and cancellation, and
/// should poll `worker_job().is_interrupted()` regularly inside `work`.
pub trait Job: Send + Sync {
    fn worker_job(&self) -> &WorkerJob;

    /// The job body.
    fn work(&self);

    /// Run the job: `Idle`/`Queued` -> `Running` -> `Completed`.
    ///
    /// Fails without running if the job is already running or completed.
    /// Completion is recorded even if `work` panics.
    fn execute(&self) -> JobResult<()> {
        let state = self.worker_job();
        state.start()?;

        struct Completion<'a>(&'a WorkerJob);
        impl Drop for Completion<'_> {
            fn drop(&mut self) {
                self.0.finish();
            }
        }

        let _completion = Completion(state);
        self.work();
        Ok(())
    }
}
