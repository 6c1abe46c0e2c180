/*!
 * Condvar-Based Wait Strategy
 *
 * Cross-platform fallback using parking_lot::Condvar over a fixed sharded
 * slot array.
 *
 * # Design
 *
 * - Zero allocations after initialization
 * - Stable slot addresses (required for condvars)
 * - Multiple keys may share a slot: spurious wakeups, acceptable for
 *   condition-rechecking callers
 *
 * The `should_park` predicate and the waiter registration both happen under
 * the slot mutex, and wakers take the same mutex after publishing their
 * state change. Either a waiter is already parked when the waker notifies,
 * or the waiter observes the changed state and refuses to park.
 */

use super::traits::{WaitStrategy, WakeResult};
use crate::limits::WAIT_PARKING_SLOTS;
use parking_lot::{Condvar, Mutex};
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const SLOT_MASK: usize = WAIT_PARKING_SLOTS - 1;

/// A single condvar slot with waiter count
#[repr(C, align(64))] // Cache-line aligned to prevent false sharing
struct CondvarSlot {
    condvar: Condvar,
    mutex: Mutex<()>,
    waiters: AtomicUsize,
}

impl CondvarSlot {
    const fn new() -> Self {
        Self {
            condvar: Condvar::new(),
            mutex: Mutex::new(()),
            waiters: AtomicUsize::new(0),
        }
    }
}

/// Condvar-based wait strategy with fixed sharded slots
pub struct CondvarWait<K>
where
    K: Eq + Hash + Copy + Send + Sync + 'static,
{
    /// Fixed array of condvar slots (never resizes, stable addresses)
    slots: Box<[CondvarSlot; WAIT_PARKING_SLOTS]>,
    _phantom: std::marker::PhantomData<K>,
}

impl<K> CondvarWait<K>
where
    K: Eq + Hash + Copy + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            slots: Box::new([const { CondvarSlot::new() }; WAIT_PARKING_SLOTS]),
            _phantom: std::marker::PhantomData,
        }
    }

    /// Hash key to slot index
    #[inline]
    fn slot_index(&self, key: K) -> usize {
        let mut hasher = ahash::AHasher::default();
        key.hash(&mut hasher);
        (hasher.finish() as usize) & SLOT_MASK
    }
}

impl<K> Default for CondvarWait<K>
where
    K: Eq + Hash + Copy + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> WaitStrategy<K> for CondvarWait<K>
where
    K: Eq + Hash + Copy + Send + Sync + 'static,
{
    fn wait(&self, key: K, should_park: &dyn Fn() -> bool, timeout: Option<Duration>) -> bool {
        let idx = self.slot_index(key);
        let slot = &self.slots[idx];

        let mut guard = slot.mutex.lock();

        // Checked under the slot mutex: a waker that changed the condition
        // before this point is observed here; one that changes it later must
        // queue on the mutex until this thread is parked in wait()
        if !should_park() {
            return true;
        }

        slot.waiters.fetch_add(1, Ordering::Relaxed);

        let timed_out = if let Some(timeout) = timeout {
            slot.condvar.wait_for(&mut guard, timeout).timed_out()
        } else {
            slot.condvar.wait(&mut guard);
            false
        };

        slot.waiters.fetch_sub(1, Ordering::Relaxed);

        !timed_out
    }

    fn wake_one(&self, key: K) -> WakeResult {
        let idx = self.slot_index(key);
        let slot = &self.slots[idx];

        // The mutex orders this wake after any in-flight registration
        let _guard = slot.mutex.lock();
        if slot.waiters.load(Ordering::Relaxed) == 0 {
            return WakeResult::NoWaiters;
        }

        slot.condvar.notify_one();
        WakeResult::Woken(1)
    }

    fn wake_all(&self, key: K) -> WakeResult {
        let idx = self.slot_index(key);
        let slot = &self.slots[idx];

        let _guard = slot.mutex.lock();
        let count = slot.waiters.load(Ordering::Relaxed);
        if count == 0 {
            return WakeResult::NoWaiters;
        }

        slot.condvar.notify_all();
        WakeResult::Woken(count)
    }

    fn waiter_count(&self, key: K) -> usize {
        let idx = self.slot_index(key);
        self.slots[idx].waiters.load(Ordering::Relaxed)
    }

    fn name(&self) -> &'static str {
        "condvar"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn test_condvar_wake_one() {
        let cv = Arc::new(CondvarWait::<u64>::new());
        let cv_clone = cv.clone();

        let handle =
            thread::spawn(move || cv_clone.wait(42, &|| true, Some(Duration::from_secs(1))));

        // Give thread time to wait
        thread::sleep(Duration::from_millis(50));

        let result = cv.wake_one(42);
        assert!(matches!(result, WakeResult::Woken(1)));

        assert!(handle.join().unwrap());
    }

    #[test]
    fn test_condvar_timeout() {
        let cv = CondvarWait::<u64>::new();
        let start = Instant::now();
        let result = cv.wait(99, &|| true, Some(Duration::from_millis(50)));
        let elapsed = start.elapsed();

        assert!(!result);
        assert!(elapsed >= Duration::from_millis(50));
    }

    #[test]
    fn test_condvar_wake_all() {
        let cv = Arc::new(CondvarWait::<u64>::new());

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let cv_clone = cv.clone();
                thread::spawn(move || cv_clone.wait(100, &|| true, Some(Duration::from_secs(1))))
            })
            .collect();

        // Give threads time to wait
        thread::sleep(Duration::from_millis(100));

        let result = cv.wake_all(100);
        assert!(matches!(result, WakeResult::Woken(_)));

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }

    #[test]
    fn test_condvar_refused_park_returns_immediately() {
        let cv = CondvarWait::<u64>::new();
        let start = Instant::now();
        assert!(cv.wait(7, &|| false, None));
        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
