/*!
 * Limits and Constants
 *
 * Centralized location for crate-wide limits and tuning constants.
 * All values include rationale comments explaining WHY they exist.
 */

use std::time::Duration;

/// Parking slot count for wait strategies (power of 2 for fast modulo)
/// Each lock instance keys waiters by side, so two hot slots per instance;
/// 64 keeps collisions rare when many instances share one strategy table.
/// [PERF] Slots are cache-line aligned; 64 slots = 4KB per table
pub const WAIT_PARKING_SLOTS: usize = 64;

/// Default spin budget before an adaptive waiter parks
/// [PERF] Side handoffs complete in single-digit microseconds when the
/// holder count is low; spinning briefly avoids the park/unpark round trip
pub const DEFAULT_SPIN_DURATION: Duration = Duration::from_micros(10);

/// Default maximum spin iterations before falling back to parking
pub const DEFAULT_MAX_SPINS: u32 = 100;
