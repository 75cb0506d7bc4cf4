//! Blocking primitives used by the job layer.
//!
//! All of them recover from lock poisoning: a panicking job must not take the
//! whole worker pool down with it.

mod counter;
mod guarded;
mod semaphore;

pub use counter::Counter;
pub use guarded::Guarded;
pub use semaphore::Semaphore;
