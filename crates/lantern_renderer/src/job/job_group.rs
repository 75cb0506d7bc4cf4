use super::Job;
use crate::error::JobResult;
use crate::sync::{Guarded, Semaphore};
use std::collections::VecDeque;
use std::sync::Arc;

/// Thread-safe FIFO of pending jobs.
///
/// The semaphore counts wake-ups, not jobs: `clear_queue` leaves it untouched,
/// so a woken worker may find the queue empty and must go back to waiting.
pub struct JobGroup {
    queue: Guarded<VecDeque<Arc<dyn Job>>>,
    available: Semaphore,
}

impl JobGroup {
    pub fn new() -> Self {
        Self {
            queue: Guarded::new(VecDeque::new()),
            available: Semaphore::new(0, usize::MAX),
        }
    }

    /// Mark the job queued, append it and wake one worker.
    pub fn enqueue_job(&self, job: Arc<dyn Job>) -> JobResult<()> {
        job.worker_job().mark_queued()?;
        self.queue.lock().push_back(job);
        self.available.signal(1);
        Ok(())
    }

    /// Pop the oldest job, if any.
    pub fn dequeue_job(&self) -> Option<Arc<dyn Job>> {
        self.queue.lock().pop_front()
    }

    /// Block until woken, then try to pop a job.
    pub fn wait_for_job(&self) -> Option<Arc<dyn Job>> {
        self.available.wait();
        self.dequeue_job()
    }

    /// Drop every pending job, returning them to `Idle`. Returns how many were removed.
    pub fn clear_queue(&self) -> usize {
        let drained: Vec<_> = self.queue.lock().drain(..).collect();
        for job in &drained {
            job.worker_job().unqueue();
        }
        drained.len()
    }

    /// Wake `count` waiting workers without adding work.
    pub fn wake_workers(&self, count: usize) {
        self.available.signal(count);
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}

impl Default for JobGroup {
    fn default() -> Self {
        Self::new()
    }
}
