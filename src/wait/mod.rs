/*!
 * Wait/Wake Substrate
 *
 * Parking primitives the blocking synchronizer is built on:
 * - Futex-based (Linux) for minimal overhead
 * - Condvar-based (cross-platform) for reliability
 * - Adaptive spinwait for low-latency handoffs
 *
 * # Architecture
 *
 * A unified [`WaitQueue`] abstraction parks waiters under arbitrary keys
 * (the lock parks them under the side they want) with a pluggable waiting
 * strategy. All strategies support *validated parking*: the caller's
 * predicate is re-checked atomically with respect to the wake path, so a
 * state change published before a wake can never strand a waiter.
 */

mod condvar;
mod futex;
mod queue;
mod spinwait;
mod traits;

pub use queue::{WaitError, WaitQueue, WaitResult};
pub use traits::{WaitStrategy, WakeResult};

// Re-export specific strategies for advanced users
pub use condvar::CondvarWait;
pub use futex::FutexWait;
pub use spinwait::SpinWait;
