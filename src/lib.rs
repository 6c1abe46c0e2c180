/*!
 * Side-Exclusive Shared Lock
 *
 * A binary lock with two sides, LEFT and RIGHT. Any number of threads may
 * hold one side concurrently; while a side is held, acquisition of the
 * other side blocks (or fails, for try variants) until every holder has
 * released.
 *
 * # Architecture
 *
 * - [`SideLock`]: the public façade with `lock_left`/`lock_right`,
 *   `try_lock_left`/`try_lock_right`, `release_left`/`release_right`, timed
 *   variants, and RAII guards.
 * - `SideSync`: the blocking synchronizer, a lock-free CAS retry loop over
 *   a single signed counter plus parking for contended acquirers.
 * - [`wait`]: the park/wake substrate, futex-backed on Linux, condvar
 *   elsewhere, adaptive spinwait for low-latency configurations.
 *
 * The single signed counter is the entire lock state: zero is free, the
 * sign says which side is active, the magnitude counts holders. All
 * mutation goes through one atomic compare-and-swap loop; there is no
 * secondary mutex.
 */

pub mod config;
pub mod limits;
mod lock;
mod side;
mod state;
mod sync;
pub mod wait;

// Re-exports
pub use config::{StrategyType, SyncConfig};
pub use lock::{SideGuard, SideLock};
pub use side::Side;
pub use sync::SideSync;
pub use wait::{WaitError, WaitQueue, WaitResult, WakeResult};
