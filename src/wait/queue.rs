/*!
 * Wait Queue
 *
 * Front end over the wait strategies. Selects the optimal strategy for the
 * platform and configuration at construction time.
 *
 * # Design: Enum Dispatch
 *
 * An enum over the concrete strategies instead of `Arc<dyn WaitStrategy>`:
 * no vtable lookup on the hot path, full inlining, and the strategy choice
 * is fixed for the queue's lifetime anyway.
 */

use super::condvar::CondvarWait;
use super::futex::FutexWait;
use super::spinwait::SpinWait;
use super::traits::{WaitStrategy, WakeResult};
use crate::config::{StrategyType, SyncConfig};
use std::time::Duration;
use thiserror::Error;

/// Result type for wait operations
pub type WaitResult<T> = Result<T, WaitError>;

/// Wait operation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WaitError {
    #[error("Wait operation timed out")]
    Timeout,
}

/// Wait strategy implementation (enum dispatch for zero overhead)
enum WaitStrategyImpl<K>
where
    K: Eq + std::hash::Hash + Copy + Send + Sync + 'static,
{
    Futex(FutexWait<K>),
    Condvar(CondvarWait<K>),
    SpinWait(SpinWait<K>),
}

impl<K> WaitStrategyImpl<K>
where
    K: Eq + std::hash::Hash + Copy + Send + Sync + 'static,
{
    #[inline(always)]
    fn wait(&self, key: K, should_park: &dyn Fn() -> bool, timeout: Option<Duration>) -> bool {
        match self {
            Self::Futex(s) => s.wait(key, should_park, timeout),
            Self::Condvar(s) => s.wait(key, should_park, timeout),
            Self::SpinWait(s) => s.wait(key, should_park, timeout),
        }
    }

    #[inline(always)]
    fn wake_one(&self, key: K) -> WakeResult {
        match self {
            Self::Futex(s) => s.wake_one(key),
            Self::Condvar(s) => s.wake_one(key),
            Self::SpinWait(s) => s.wake_one(key),
        }
    }

    #[inline(always)]
    fn wake_all(&self, key: K) -> WakeResult {
        match self {
            Self::Futex(s) => s.wake_all(key),
            Self::Condvar(s) => s.wake_all(key),
            Self::SpinWait(s) => s.wake_all(key),
        }
    }

    #[inline(always)]
    fn waiter_count(&self, key: K) -> usize {
        match self {
            Self::Futex(s) => s.waiter_count(key),
            Self::Condvar(s) => s.waiter_count(key),
            Self::SpinWait(s) => s.waiter_count(key),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Futex(s) => s.name(),
            Self::Condvar(s) => s.name(),
            Self::SpinWait(s) => s.name(),
        }
    }
}

/// Generic wait queue for any key type.
///
/// # Examples
///
/// ```
/// use sidelock::wait::WaitQueue;
/// use std::time::Duration;
///
/// let queue = WaitQueue::<u64>::with_defaults();
///
/// // Nothing wakes key 42 here, so the wait times out
/// let result = queue.wait(42, &|| true, Some(Duration::from_millis(10)));
/// assert!(result.is_err());
/// ```
pub struct WaitQueue<K>
where
    K: Eq + std::hash::Hash + Copy + Send + Sync + 'static,
{
    strategy: WaitStrategyImpl<K>,
}

impl<K> WaitQueue<K>
where
    K: Eq + std::hash::Hash + Copy + Send + Sync + 'static,
{
    /// Create a new wait queue with the specified configuration
    pub fn new(config: SyncConfig) -> Self {
        let strategy = match config.select_strategy() {
            StrategyType::Futex => WaitStrategyImpl::Futex(FutexWait::new()),
            StrategyType::Condvar => WaitStrategyImpl::Condvar(CondvarWait::new()),
            StrategyType::SpinWait => {
                WaitStrategyImpl::SpinWait(SpinWait::new(config.spin_duration, config.max_spins))
            }
            StrategyType::Auto => {
                // select_strategy resolves Auto; keep a portable default as
                // the unreachable arm
                WaitStrategyImpl::Condvar(CondvarWait::new())
            }
        };

        Self { strategy }
    }

    /// Create with default configuration (auto-selects best strategy)
    pub fn with_defaults() -> Self {
        Self::new(SyncConfig::default())
    }

    /// Create optimized for short waits
    pub fn low_latency() -> Self {
        Self::new(SyncConfig::low_latency())
    }

    /// Park under `key` until woken, aborted, or timed out.
    ///
    /// `should_park` is evaluated under the strategy's internal lock after
    /// the waiter registers; returning `false` aborts the wait. `Ok(())`
    /// means woken or aborted, `Err(WaitError::Timeout)` means the timeout
    /// elapsed first.
    #[inline]
    pub fn wait(
        &self,
        key: K,
        should_park: &dyn Fn() -> bool,
        timeout: Option<Duration>,
    ) -> WaitResult<()> {
        if self.strategy.wait(key, should_park, timeout) {
            Ok(())
        } else {
            Err(WaitError::Timeout)
        }
    }

    /// Wake one waiter parked under `key`
    #[inline]
    pub fn wake_one(&self, key: K) -> WakeResult {
        self.strategy.wake_one(key)
    }

    /// Wake all waiters parked under `key`
    #[inline]
    pub fn wake_all(&self, key: K) -> WakeResult {
        self.strategy.wake_all(key)
    }

    /// Approximate count of waiters for a key (for diagnostics)
    #[inline]
    pub fn waiter_count(&self, key: K) -> usize {
        self.strategy.waiter_count(key)
    }

    /// Name of the active strategy
    #[inline]
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }
}
