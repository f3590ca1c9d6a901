//! Avatar domain: dash charge bookkeeping.

use bevy::log::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashCharges {
    remaining: u32,
    max: u32,
}

impl DashCharges {
    /// Starts full.
    pub fn new(max: u32) -> Self {
        Self {
            remaining: max,
            max,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn available(&self) -> bool {
        self.remaining > 0
    }

    pub fn is_full(&self) -> bool {
        self.remaining == self.max
    }

    /// Spend one charge. Never goes below zero.
    pub fn spend(&mut self) {
        if self.remaining == 0 {
            warn!("Dash charge spent with none remaining");
            return;
        }
        self.remaining -= 1;
    }

    pub fn refill(&mut self) {
        self.remaining = self.max;
    }

    /// Overwrite the remaining count, clamped to `[0, max]`.
    pub fn set_remaining(&mut self, remaining: u32) {
        self.remaining = remaining.min(self.max);
    }
}
