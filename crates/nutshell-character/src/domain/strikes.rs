//! Damage capacity: the strike envelope derived from endurance.

use serde::{Deserialize, Serialize};

/// Strikes a character can take before any endurance bonus.
pub const BASE_MAX_STRIKES: i32 = 4;

/// The `{max, taken, remaining}` triple.
///
/// Only `taken` is authoritative. `max` and `remaining` are derived by
/// [`Strikes::recompute`] and are overwritten on every load and mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Strikes {
    /// `4 + endurance`. Not clamped: negative endurance can push it below 4.
    pub max: i32,
    /// Damage taken so far.
    pub taken: i32,
    /// `max(0, max - taken)`.
    pub remaining: i32,
}

impl Strikes {
    /// Creates an envelope with `taken` strikes and derived fields filled in.
    #[must_use]
    pub fn new(endurance: i32, taken: i32) -> Self {
        let mut strikes = Self {
            taken,
            ..Self::default()
        };
        strikes.recompute(endurance);
        strikes
    }

    /// Recomputes `max` and `remaining` from `endurance` and `taken`.
    ///
    /// A negative `taken` (corrupted input) is clamped to zero first.
    /// Idempotent.
    pub fn recompute(&mut self, endurance: i32) {
        self.taken = self.taken.max(0);
        self.max = BASE_MAX_STRIKES.saturating_add(endurance);
        self.remaining = self.max.saturating_sub(self.taken).max(0);
    }

    /// True once no strikes remain.
    #[must_use]
    pub fn is_down(&self) -> bool {
        self.remaining == 0
    }
}
