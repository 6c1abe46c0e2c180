/*!
 * Futex-Based Wait Strategy
 *
 * Uses parking_lot_core for futex-like parking on all platforms. On Linux
 * this maps directly to futex syscalls.
 *
 * # Design
 *
 * A fixed sharded table of parking slots, like the Linux futex hash table:
 * - Zero allocations after initialization
 * - Stable slot addresses (the address is the parking key)
 * - Multiple keys can share a slot; spurious wakeups are acceptable because
 *   woken callers re-check their condition and re-park
 *
 * The `should_park` predicate runs inside parking_lot_core's validate
 * callback, which holds the queue lock that `unpark_*` also takes. A wake
 * issued after the predicate turns false can therefore never be lost.
 */

use super::traits::{WaitStrategy, WakeResult};
use crate::limits::WAIT_PARKING_SLOTS;
use parking_lot_core::{park, unpark_all, unpark_one, ParkResult, ParkToken, UnparkToken};
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

const SLOT_MASK: usize = WAIT_PARKING_SLOTS - 1;

/// A single parking slot with a waiter counter
#[repr(C, align(64))] // Cache-line aligned to prevent false sharing
struct ParkingSlot {
    waiters: AtomicUsize,
}

impl ParkingSlot {
    const fn new() -> Self {
        Self {
            waiters: AtomicUsize::new(0),
        }
    }
}

/// Futex-based wait strategy using sharded parking slots
pub struct FutexWait<K>
where
    K: Eq + Hash + Copy + Send + Sync + 'static,
{
    /// Fixed array of parking slots (never resizes, stable addresses)
    slots: Box<[ParkingSlot; WAIT_PARKING_SLOTS]>,
    _phantom: std::marker::PhantomData<K>,
}

impl<K> FutexWait<K>
where
    K: Eq + Hash + Copy + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            slots: Box::new([const { ParkingSlot::new() }; WAIT_PARKING_SLOTS]),
            _phantom: std::marker::PhantomData,
        }
    }

    /// Hash key to parking slot index
    #[inline]
    fn slot_index(&self, key: K) -> usize {
        let mut hasher = ahash::AHasher::default();
        key.hash(&mut hasher);
        (hasher.finish() as usize) & SLOT_MASK
    }
}

impl<K> Default for FutexWait<K>
where
    K: Eq + Hash + Copy + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> WaitStrategy<K> for FutexWait<K>
where
    K: Eq + Hash + Copy + Send + Sync + 'static,
{
    fn wait(&self, key: K, should_park: &dyn Fn() -> bool, timeout: Option<Duration>) -> bool {
        let idx = self.slot_index(key);
        let slot = &self.slots[idx];

        slot.waiters.fetch_add(1, Ordering::Relaxed);

        // Stable parking address, shared with the wake methods
        let addr = &slot.waiters as *const AtomicUsize as usize;
        let deadline = timeout.map(|d| Instant::now() + d);

        // SAFETY: addr is a stable address owned by self for its lifetime,
        // and the callbacks do not panic or park
        let result = unsafe {
            park(
                addr,
                // Runs with the queue lock held; refusing to park here is
                // what makes a concurrent wake impossible to miss
                || should_park(),
                || {},
                |_key, _was_last| {},
                ParkToken(0),
                deadline,
            )
        };

        slot.waiters.fetch_sub(1, Ordering::Relaxed);

        match result {
            ParkResult::Unparked(_) => true,
            // Validation refused the park: the condition already changed
            ParkResult::Invalid => true,
            ParkResult::TimedOut => false,
        }
    }

    fn wake_one(&self, key: K) -> WakeResult {
        let idx = self.slot_index(key);
        let slot = &self.slots[idx];

        if slot.waiters.load(Ordering::Relaxed) == 0 {
            return WakeResult::NoWaiters;
        }

        let addr = &slot.waiters as *const AtomicUsize as usize;
        // SAFETY: same stable address as the park side
        let result = unsafe { unpark_one(addr, |_| UnparkToken(0)) };

        WakeResult::Woken(result.unparked_threads)
    }

    fn wake_all(&self, key: K) -> WakeResult {
        let idx = self.slot_index(key);
        let slot = &self.slots[idx];

        if slot.waiters.load(Ordering::Relaxed) == 0 {
            return WakeResult::NoWaiters;
        }

        let addr = &slot.waiters as *const AtomicUsize as usize;
        // SAFETY: same stable address as the park side
        let unparked = unsafe { unpark_all(addr, UnparkToken(0)) };

        WakeResult::Woken(unparked)
    }

    fn waiter_count(&self, key: K) -> usize {
        let idx = self.slot_index(key);
        self.slots[idx].waiters.load(Ordering::Relaxed)
    }

    fn name(&self) -> &'static str {
        "futex"
    }
}
