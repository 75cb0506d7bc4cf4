use super::{Job, JobGroup, WorkerThread};
use crate::error::JobResult;
use std::sync::Arc;

/// Logical CPUs minus one for the host thread, at least one.
pub fn default_thread_count() -> usize {
    num_cpus::get().saturating_sub(1).max(1)
}

/// A fixed pool of worker threads sharing one job group.
pub struct Scheduler {
    group: Arc<JobGroup>,
    workers: Vec<WorkerThread>,
}

impl Scheduler {
    pub fn new(thread_count: usize) -> JobResult<Self> {
        let group = Arc::new(JobGroup::new());
        let workers = (0..thread_count.max(1))
            .map(|i| WorkerThread::spawn(i, Arc::clone(&group)))
            .collect::<JobResult<Vec<_>>>()?;

        log::info!("Spawned {} worker threads", workers.len());

        Ok(Self { group, workers })
    }

    pub fn group(&self) -> &JobGroup {
        &self.group
    }

    pub fn enqueue(&self, job: Arc<dyn Job>) -> JobResult<()> {
        self.group.enqueue_job(job)
    }

    pub fn thread_count(&self) -> usize {
        self.workers.len()
    }

    /// Stop and join every worker. Pending jobs are returned to `Idle`.
    pub fn shutdown(&mut self) {
        if self.workers.is_empty() {
            return;
        }
        self.group.clear_queue();
        for worker in &self.workers {
            worker.stop();
        }
        // One wake-up per worker so each observes the stop flag
        self.group.wake_workers(self.workers.len());
        for worker in &mut self.workers {
            worker.join();
        }
        log::debug!("Joined {} worker threads", self.workers.len());
        self.workers.clear();
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
