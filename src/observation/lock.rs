//! Cycle slip detection from lock time indicators.

use std::collections::HashMap;

use gnss::prelude::SV;

/// A previous indicator above this value counts as steady tracking.
pub const LOCK_STEADY_MIN: f64 = 10.0;

/// An indicator at or below this value counts as a tracker reset.
pub const LOCK_RESET_MAX: f64 = 2.0;

/// The published slip signature: the bounded lock time counter is
/// reset toward zero on loss of lock, so a steady-to-reset transition
/// marks a cycle slip.
pub(crate) fn is_slip(previous: f64, current: f64) -> bool {
    previous > LOCK_STEADY_MIN && current <= LOCK_RESET_MAX
}

/// Last seen lock time indicator per (satellite, signal) pair.
/// Transient: lives for one parse only, never serialized.
#[derive(Debug, Clone, Default)]
pub struct LockHistory {
    previous: HashMap<(SV, String), f64>,
}

impl LockHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `lock_time` for (sv, signal) and reports whether the
    /// transition from the previous indicator qualifies as a slip.
    /// The new value is stored either way.
    pub fn check_slip(&mut self, sv: SV, signal: &str, lock_time: f64) -> bool {
        let key = (sv, signal.to_string());
        let slip = match self.previous.get(&key) {
            Some(&previous) => is_slip(previous, lock_time),
            None => false,
        };
        self.previous.insert(key, lock_time);
        slip
    }
}
