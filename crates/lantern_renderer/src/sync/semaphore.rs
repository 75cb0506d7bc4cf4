use super::Guarded;
use std::sync::Condvar;

/// Counting semaphore with an upper bound on its count.
#[derive(Debug)]
pub struct Semaphore {
    count: Guarded<usize>,
    max: usize,
    available: Condvar,
}

impl Semaphore {
    pub fn new(initial: usize, max: usize) -> Self {
        Self {
            count: Guarded::new(initial.min(max)),
            max,
            available: Condvar::new(),
        }
    }

    /// Block until the count is non-zero, then decrement it.
    pub fn wait(&self) {
        let mut count = self.count.wait_while(&self.available, |c| *c == 0);
        *count -= 1;
    }

    /// Add `n` to the count, clamped to the maximum, and wake waiters.
    pub fn signal(&self, n: usize) {
        if n == 0 {
            return;
        }
        self.count
            .with(|c| *c = c.saturating_add(n).min(self.max));
        if n == 1 {
            self.available.notify_one();
        } else {
            self.available.notify_all();
        }
    }

    pub fn count(&self) -> usize {
        self.count.get()
    }
}
