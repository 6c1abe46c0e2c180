/*!
 * Wait Strategy Configuration
 *
 * Runtime configuration for how blocked acquirers wait
 */

use crate::limits::{DEFAULT_MAX_SPINS, DEFAULT_SPIN_DURATION};
use std::time::Duration;

/// Strategy type selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyType {
    /// Futex-backed parking (Linux only, fastest)
    Futex,
    /// Condvar-based parking (cross-platform, reliable)
    Condvar,
    /// Adaptive spinwait (low-latency, higher CPU for short waits)
    SpinWait,
    /// Auto-select based on platform
    Auto,
}

/// Configuration for the wait layer of a lock instance
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Preferred strategy
    pub strategy: StrategyType,
    /// Spin duration before parking (for SpinWait)
    pub spin_duration: Duration,
    /// Maximum spin iterations before parking
    pub max_spins: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyType::Auto,
            spin_duration: DEFAULT_SPIN_DURATION,
            max_spins: DEFAULT_MAX_SPINS,
        }
    }
}

impl SyncConfig {
    /// Configuration optimized for short holds (< 1ms expected block time)
    pub const fn low_latency() -> Self {
        Self {
            strategy: StrategyType::SpinWait,
            spin_duration: Duration::from_micros(50),
            max_spins: 500,
        }
    }

    /// Configuration optimized for long holds (> 1ms expected block time)
    pub const fn long_wait() -> Self {
        Self {
            strategy: StrategyType::Auto,
            spin_duration: Duration::from_micros(1),
            max_spins: 10,
        }
    }

    /// Resolve `Auto` to the best strategy for the current platform
    pub fn select_strategy(&self) -> StrategyType {
        match self.strategy {
            StrategyType::Auto => {
                // Prefer futex on Linux, condvar elsewhere
                #[cfg(target_os = "linux")]
                {
                    StrategyType::Futex
                }
                #[cfg(not(target_os = "linux"))]
                {
                    StrategyType::Condvar
                }
            }
            other => other,
        }
    }
}
