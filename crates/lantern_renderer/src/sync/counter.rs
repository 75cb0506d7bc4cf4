use super::Guarded;
use std::sync::Condvar;
use std::time::Duration;

/// Count-down latch: waiters block until the count reaches zero.
#[derive(Debug)]
pub struct Counter {
    remaining: Guarded<usize>,
    zero: Condvar,
}

impl Counter {
    pub fn new(count: usize) -> Self {
        Self {
            remaining: Guarded::new(count),
            zero: Condvar::new(),
        }
    }

    /// Re-arm the latch.
    pub fn reset(&self, count: usize) {
        self.remaining.set(count);
        if count == 0 {
            self.zero.notify_all();
        }
    }

    /// Decrement, saturating at zero. Returns the new count.
    pub fn decrement(&self) -> usize {
        let remaining = self.remaining.with(|r| {
            *r = r.saturating_sub(1);
            *r
        });
        if remaining == 0 {
            self.zero.notify_all();
        }
        remaining
    }

    pub fn count(&self) -> usize {
        self.remaining.get()
    }

    /// Block until zero or `timeout`. Returns true if the count reached zero.
    pub fn wait_zero_timeout(&self, timeout: Duration) -> bool {
        let (remaining, _) = self
            .zero
            .wait_timeout_while(self.remaining.lock(), timeout, |r| *r > 0)
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_decrement_saturates() {
        let counter = Counter::new(1);

        assert_eq!(counter.decrement(), 0);
        assert_eq!(counter.decrement(), 0);
    }

    #[test]
    fn test_wait_zero_releases_after_last_decrement() {
        let counter = Arc::new(Counter::new(4));
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    thread::sleep(Duration::from_millis(5));
                    counter.decrement();
                })
            })
            .collect();

        assert!(counter.wait_zero_timeout(Duration::from_secs(10)));
        assert_eq!(counter.count(), 0);
        for worker in workers {
            worker.join().unwrap();
        }
    }

    #[test]
    fn test_wait_zero_timeout() {
        let counter = Counter::new(2);
        assert!(!counter.wait_zero_timeout(Duration::from_millis(10)));

        counter.reset(0);
        assert!(counter.wait_zero_timeout(Duration::from_millis(10)));
    }
}
