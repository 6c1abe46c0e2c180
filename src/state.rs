/*!
 * Side-Exclusive State
 *
 * The single shared counter encoding the active side and its holder count,
 * mutated only through an optimistic CAS retry loop.
 *
 * # Design
 *
 * The CAS loop is the critical section. There is no secondary mutex guarding
 * the counter: every transition either observes a compatible state and
 * installs its successor atomically, or fails without side effects.
 */

use std::sync::atomic::{AtomicI32, Ordering};

/// Direction of a state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Acquire: one more holder on the requested side
    Add,
    /// Release: one less holder on the requested side
    Remove,
}

/// Signed holder counter for a side lock.
///
/// - `0`: free, no side active
/// - `> 0`: RIGHT active, value is the holder count
/// - `< 0`: LEFT active, negated value is the holder count
///
/// A transition is permitted only when the current state is `0` or carries
/// the same sign as the requested side, so the two sides can never mix
/// within one acquisition window.
///
/// # Limitations
///
/// The counter is not guarded against 32-bit overflow: enough concurrent
/// holders of one side would wrap it. Callers are likewise trusted to pair
/// acquires and releases; a release that was never matched by an acquire
/// goes undetected and corrupts the count (releasing LEFT on a free lock
/// leaves the counter at +1, as if RIGHT were held).
#[derive(Debug)]
pub struct SideCount {
    state: AtomicI32,
}

impl SideCount {
    /// New counter in the free state
    pub const fn new() -> Self {
        Self {
            state: AtomicI32::new(0),
        }
    }

    /// Raw counter snapshot. Diagnostics only: the value can be stale by the
    /// time the caller looks at it.
    #[inline]
    pub fn holders(&self) -> i32 {
        self.state.load(Ordering::Acquire)
    }

    /// Whether `side` could be acquired right now. Advisory: the answer can
    /// change before the caller acts on it, so it never substitutes for
    /// [`try_change`](Self::try_change).
    #[inline]
    pub fn admits(&self, side: i32) -> bool {
        same_side(self.state.load(Ordering::Acquire), side)
    }

    /// Attempt one state transition for `side` (−1 or +1).
    ///
    /// Returns `false` only when the opposite side is active. Conflicts with
    /// concurrent transitions retry internally; the sign precondition is
    /// re-checked on every retry.
    ///
    /// # Panics
    ///
    /// A `side` unit outside {−1, +1} is a programming error and asserts.
    /// The public layers only ever pass [`Side::unit`](crate::Side::unit),
    /// which makes the assertion unreachable through the façade.
    pub fn try_change(&self, side: i32, change: Change) -> bool {
        assert!(
            side == 1 || side == -1,
            "side unit must be -1 or +1, got {side}"
        );

        let mut cur = self.state.load(Ordering::Relaxed);
        loop {
            if !same_side(cur, side) {
                return false;
            }
            let next = match change {
                Change::Add => cur + side,
                Change::Remove => cur - side,
            };
            // AcqRel on success: the same loop performs both acquire- and
            // release-flavored transitions.
            match self
                .state
                .compare_exchange(cur, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return true,
                Err(actual) => cur = actual,
            }
        }
    }
}

impl Default for SideCount {
    fn default() -> Self {
        Self::new()
    }
}

/// Free (0) or same-signed as the requested side
#[inline(always)]
fn same_side(cur: i32, side: i32) -> bool {
    cur == 0 || (cur < 0) == (side < 0)
}
