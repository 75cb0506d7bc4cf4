use super::JobGroup;
use crate::error::{JobError, JobResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// An OS thread draining a `JobGroup`.
pub struct WorkerThread {
    name: String,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl WorkerThread {
    pub fn spawn(index: usize, group: Arc<JobGroup>) -> JobResult<Self> {
        let name = format!("lantern-worker-{}", index);
        let running = Arc::new(AtomicBool::new(true));

        let handle = {
            let running = Arc::clone(&running);
            thread::Builder::new()
                .name(name.clone())
                .spawn(move || Self::run(&group, &running))
                .map_err(JobError::Spawn)?
        };

        Ok(Self {
            name,
            running,
            handle: Some(handle),
        })
    }

    fn run(group: &JobGroup, running: &AtomicBool) {
        while running.load(Ordering::Acquire) {
            let job = group.wait_for_job();
            if !running.load(Ordering::Acquire) {
                if let Some(job) = job {
                    job.worker_job().unqueue();
                }
                break;
            }
            if let Some(job) = job {
                if let Err(e) = job.execute() {
                    log::error!(
                        "{}: job failed to execute: {}",
                        thread::current().name().unwrap_or("worker"),
                        e
                    );
                }
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Ask the thread to exit after its current job. The owner must also wake
    /// it through the job group.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("{} panicked", self.name);
            }
        }
    }
}
