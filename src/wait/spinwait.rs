/*!
 * Adaptive Spin-Wait Strategy
 *
 * Optimized for waits that are typically very short: spins on the condition
 * for a bounded budget, then parks on the condvar fallback.
 */

use super::condvar::CondvarWait;
use super::traits::{WaitStrategy, WakeResult};
use std::thread;
use std::time::{Duration, Instant};

/// Adaptive spin-wait strategy
///
/// Best when the expected block time is under ~100µs and the extra CPU of
/// spinning is an acceptable trade for skipping the park/unpark round trip.
pub struct SpinWait<K>
where
    K: Eq + std::hash::Hash + Copy + Send + Sync + 'static,
{
    /// Fallback parking for waits that outlive the spin budget
    fallback: CondvarWait<K>,
    /// Spin duration before falling back
    spin_duration: Duration,
    /// Maximum spin iterations
    max_spins: u32,
}

impl<K> SpinWait<K>
where
    K: Eq + std::hash::Hash + Copy + Send + Sync + 'static,
{
    pub fn new(spin_duration: Duration, max_spins: u32) -> Self {
        Self {
            fallback: CondvarWait::new(),
            spin_duration,
            max_spins,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(Duration::from_micros(50), 500)
    }
}

impl<K> Default for SpinWait<K>
where
    K: Eq + std::hash::Hash + Copy + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl<K> WaitStrategy<K> for SpinWait<K>
where
    K: Eq + std::hash::Hash + Copy + Send + Sync + 'static,
{
    fn wait(&self, key: K, should_park: &dyn Fn() -> bool, timeout: Option<Duration>) -> bool {
        let start = Instant::now();
        let mut spin_count = 0;

        // Spin phase: poll the condition within the budget
        while spin_count < self.max_spins && start.elapsed() < self.spin_duration {
            if !should_park() {
                return true;
            }
            if let Some(timeout) = timeout {
                if start.elapsed() >= timeout {
                    return false;
                }
            }
            // Yield to scheduler occasionally
            if spin_count % 10 == 0 {
                thread::yield_now();
            }
            spin_count += 1;
        }

        // Budget exhausted: park for the remainder
        let remaining = timeout.map(|t| t.saturating_sub(start.elapsed()));
        if remaining == Some(Duration::ZERO) {
            return false;
        }
        self.fallback.wait(key, should_park, remaining)
    }

    fn wake_one(&self, key: K) -> WakeResult {
        // Spinners notice the condition themselves; only parked waiters need it
        self.fallback.wake_one(key)
    }

    fn wake_all(&self, key: K) -> WakeResult {
        self.fallback.wake_all(key)
    }

    fn waiter_count(&self, key: K) -> usize {
        self.fallback.waiter_count(key)
    }

    fn name(&self) -> &'static str {
        "spinwait"
    }
}
