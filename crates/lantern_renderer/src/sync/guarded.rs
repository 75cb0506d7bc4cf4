use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// A value that is only reachable through a scoped lock.
#[derive(Debug, Default)]
pub struct Guarded<T> {
    value: Mutex<T>,
}

impl<T> Guarded<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Mutex::new(value),
        }
    }

    /// Lock the value. The lock is released when the guard drops.
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.value.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn set(&self, value: T) {
        *self.lock() = value;
    }

    /// Block on `condvar` while `condition` holds, returning the held lock.
    pub fn wait_while<'a>(
        &'a self,
        condvar: &Condvar,
        condition: impl FnMut(&mut T) -> bool,
    ) -> MutexGuard<'a, T> {
        condvar
            .wait_while(self.lock(), condition)
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> Guarded<T> {
    pub fn get(&self) -> T {
        self.lock().clone()
    }
}
