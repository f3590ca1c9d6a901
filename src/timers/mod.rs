//! Timers domain: named countdown timers owned by a single avatar.
//!
//! A timer lives from [`TimerRegistry::create_timer`] until the tick its remaining
//! time reaches zero, then it is dropped. [`TimerRegistry::is_over_or_null`] treats a
//! timer that never started and one that already ran out the same way, so callers
//! can test readiness without knowing whether a cooldown was ever armed.

use std::collections::HashMap;

use bevy::log::warn;


/// Armed when a dash starts; the dash ends once it runs out.
pub const DASH_DURATION: &str = "DashDuration";
/// Armed when a dash ends; the next dash waits for it.
pub const DASH_RECOVERY: &str = "DashRecovery";

#[derive(Debug, Clone, Default)]
pub struct TimerRegistry {
    timers: HashMap<String, f32>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every timer down by `dt` seconds and drop the ones that ran out.
    pub fn tick(&mut self, dt: f32) {
        self.timers.retain(|_, remaining| {
            *remaining -= dt;
            *remaining > 0.0
        });
    }

    /// Start a timer. An existing timer with the same name is left untouched.
    pub fn create_timer(&mut self, name: &str, duration: f32) {
        if self.exists(name) {
            warn!("Timer '{}' already exists, ignoring create", name);
            return;
        }
        self.timers.insert(name.to_string(), duration);
    }

    pub fn remove_timer(&mut self, name: &str) {
        if self.timers.remove(name).is_none() {
            warn!("Timer '{}' does not exist, nothing to remove", name);
        }
    }

    /// Seconds left on `name`, or 0.0 when it is not running.
    pub fn remaining(&self, name: &str) -> f32 {
        self.timers.get(name).copied().unwrap_or(0.0)
    }

    /// Extend a running timer by `duration` seconds.
    pub fn add_time(&mut self, name: &str, duration: f32) {
        match self.timers.get_mut(name) {
            Some(remaining) => *remaining += duration,
            None => warn!("Timer '{}' does not exist, cannot add {}s", name, duration),
        }
    }

    pub fn exists(&self, name: &str) -> bool {
        self.timers.contains_key(name)
    }

    pub fn is_over_or_null(&self, name: &str) -> bool {
        !self.exists(name)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
