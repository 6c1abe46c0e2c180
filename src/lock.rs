/*!
 * Side Lock Façade
 *
 * The public lock API: the six named side operations, timed variants, and
 * RAII guards over the blocking synchronizer.
 */

use crate::config::SyncConfig;
use crate::side::Side;
use crate::sync::SideSync;
use log::debug;
use std::time::Duration;

/// A binary side-exclusive shared lock.
///
/// Exposes two sides, LEFT and RIGHT. While LEFT is held, other threads can
/// also acquire LEFT, but threads acquiring RIGHT block (or fail, for the
/// try variants) until every LEFT holder has released; RIGHT excludes LEFT
/// symmetrically. Within a side the lock behaves like a counting semaphore, not
/// an owner-checked mutex.
///
/// # Preconditions
///
/// The lock does not track which thread holds which unit. Each successful
/// acquisition must be paired with exactly one release of the same side by
/// its logical holder; an unmatched release is not detected and silently
/// corrupts the holder count. The 32-bit counter is likewise unguarded
/// against overflow.
///
/// # Ordering
///
/// Acquisition order is not FIFO. A thread arriving while waiters are
/// parked can acquire first (barging); this favors throughput over
/// fairness.
///
/// # Examples
///
/// ```
/// use sidelock::SideLock;
///
/// let lock = SideLock::new();
///
/// lock.lock_left();
/// assert!(!lock.try_lock_right()); // other side excluded
/// assert!(lock.try_lock_left());   // same side shared
///
/// lock.release_left();
/// lock.release_left();
/// assert!(lock.try_lock_right());  // free again
/// lock.release_right();
/// ```
pub struct SideLock {
    sync: SideSync,
}

impl SideLock {
    /// New lock with the platform-default wait strategy
    pub fn new() -> Self {
        Self::with_config(SyncConfig::default())
    }

    /// New lock with an explicit wait configuration
    pub fn with_config(config: SyncConfig) -> Self {
        let sync = SideSync::new(config);
        debug!("side lock created with {} wait strategy", sync.strategy_name());
        Self { sync }
    }

    /// New lock tuned for very short holds
    pub fn low_latency() -> Self {
        Self::with_config(SyncConfig::low_latency())
    }

    /// Acquire one unit of `side`, blocking while the opposite side is held
    #[inline]
    pub fn lock(&self, side: Side) {
        self.sync.acquire(side);
    }

    /// Acquire one unit of `side` without blocking
    #[inline]
    pub fn try_lock(&self, side: Side) -> bool {
        self.sync.try_acquire(side)
    }

    /// Acquire one unit of `side`, giving up after `timeout`
    #[inline]
    pub fn try_lock_for(&self, side: Side, timeout: Duration) -> bool {
        self.sync.acquire_timeout(side, timeout)
    }

    /// Release one unit of `side`
    #[inline]
    pub fn release(&self, side: Side) {
        let _ = self.sync.release(side);
    }

    /// Acquire the LEFT side, blocking while RIGHT is held
    pub fn lock_left(&self) {
        self.lock(Side::Left);
    }

    /// Acquire the RIGHT side, blocking while LEFT is held
    pub fn lock_right(&self) {
        self.lock(Side::Right);
    }

    /// Acquire LEFT without blocking; `true` if acquired
    pub fn try_lock_left(&self) -> bool {
        self.try_lock(Side::Left)
    }

    /// Acquire RIGHT without blocking; `true` if acquired
    pub fn try_lock_right(&self) -> bool {
        self.try_lock(Side::Right)
    }

    /// Acquire LEFT, giving up after `timeout`; `true` if acquired
    pub fn try_lock_left_for(&self, timeout: Duration) -> bool {
        self.try_lock_for(Side::Left, timeout)
    }

    /// Acquire RIGHT, giving up after `timeout`; `true` if acquired
    pub fn try_lock_right_for(&self, timeout: Duration) -> bool {
        self.try_lock_for(Side::Right, timeout)
    }

    /// Release one unit of LEFT
    pub fn release_left(&self) {
        self.release(Side::Left);
    }

    /// Release one unit of RIGHT
    pub fn release_right(&self) {
        self.release(Side::Right);
    }

    /// Acquire `side` and return a guard that releases it on drop
    pub fn guard(&self, side: Side) -> SideGuard<'_> {
        self.lock(side);
        SideGuard { lock: self, side }
    }

    /// Try to acquire `side`; on success, a guard that releases it on drop
    pub fn try_guard(&self, side: Side) -> Option<SideGuard<'_>> {
        self.try_lock(side).then(|| SideGuard { lock: self, side })
    }

    /// Blocking LEFT acquisition as an RAII guard
    pub fn left_guard(&self) -> SideGuard<'_> {
        self.guard(Side::Left)
    }

    /// Blocking RIGHT acquisition as an RAII guard
    pub fn right_guard(&self) -> SideGuard<'_> {
        self.guard(Side::Right)
    }

    /// Non-blocking LEFT acquisition as an RAII guard
    pub fn try_left_guard(&self) -> Option<SideGuard<'_>> {
        self.try_guard(Side::Left)
    }

    /// Non-blocking RIGHT acquisition as an RAII guard
    pub fn try_right_guard(&self) -> Option<SideGuard<'_>> {
        self.try_guard(Side::Right)
    }

    /// Signed holder snapshot: negative = LEFT holders, positive = RIGHT
    /// holders, zero = free. Diagnostics only; stale immediately.
    pub fn holders(&self) -> i32 {
        self.sync.holders()
    }

    /// Name of the wait strategy backing this lock
    pub fn strategy_name(&self) -> &'static str {
        self.sync.strategy_name()
    }
}

impl Default for SideLock {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SideLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SideLock")
            .field("holders", &self.holders())
            .field("strategy", &self.strategy_name())
            .finish()
    }
}

/// RAII guard for one held unit of a side.
///
/// Dropping the guard releases the unit. Sugar over the manual
/// `lock_*`/`release_*` pairs; mixing guards with manual calls on the same
/// acquisition double-releases and corrupts the count.
#[must_use = "dropping the guard immediately releases the side"]
pub struct SideGuard<'a> {
    lock: &'a SideLock,
    side: Side,
}

impl SideGuard<'_> {
    /// The side this guard holds
    pub fn side(&self) -> Side {
        self.side
    }
}

impl Drop for SideGuard<'_> {
    fn drop(&mut self) {
        self.lock.release(self.side);
    }
}

impl std::fmt::Debug for SideGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SideGuard").field("side", &self.side).finish()
    }
}
