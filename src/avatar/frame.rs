//! Avatar domain: the per-frame driver shared by every actor.
//!
//! Hosts that own their own loop call [`run_frame`] once per rendered frame. The
//! fixed-rate hook runs zero or more times first, as many steps as the elapsed
//! time covers, so contact flags may be several steps old by the time the
//! variable-rate hook reads them.

use crate::avatar::{AnimationSink, AvatarController, InputSource};
use crate::probe::Raycaster;

/// Seconds per physics step when nothing else is configured (50 Hz).
pub const DEFAULT_FIXED_STEP: f32 = 0.02;
/// Longest frame the clock accepts. Longer stalls are dropped rather than replayed,
/// matching bevy's default `Time<Virtual>` max delta.
pub const MAX_FRAME_DELTA: f32 = 0.25;
/// Upper bound on fixed steps replayed in one frame.
pub const MAX_STEPS_PER_FRAME: u32 = 64;

/// The two hooks a frame-driven actor exposes.
pub trait FrameHooks {
    fn on_tick(&mut self, input: &impl InputSource, dt: f32, animator: &mut impl AnimationSink);
    fn on_fixed_tick(&mut self, caster: &impl Raycaster);
}

impl FrameHooks for AvatarController {
    fn on_tick(&mut self, input: &impl InputSource, dt: f32, animator: &mut impl AnimationSink) {
        AvatarController::on_tick(self, input, dt, animator);
    }

    fn on_fixed_tick(&mut self, caster: &impl Raycaster) {
        AvatarController::on_fixed_tick(self, caster);
    }
}

/// Fixed-step accumulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    fixed_step: f32,
    accumulator: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_FIXED_STEP)
    }
}

impl FrameClock {
    pub fn new(fixed_step: f32) -> Self {
        Self {
            fixed_step,
            accumulator: 0.0,
        }
    }

    pub fn fixed_step(&self) -> f32 {
        self.fixed_step
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Add `frame_dt`, clamped to [`MAX_FRAME_DELTA`], and return how many whole
    /// fixed steps are now due.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        if !self.fixed_step.is_finite() || self.fixed_step <= 0.0 {
            return 0;
        }
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            return 0;
        }

        self.accumulator += frame_dt.min(MAX_FRAME_DELTA);
        let steps = (self.accumulator / self.fixed_step)
            .floor()
            .min(MAX_STEPS_PER_FRAME as f32);
        self.accumulator = (self.accumulator - steps * self.fixed_step).clamp(0.0, self.fixed_step);
        steps as u32
    }
}

/// Run the due fixed steps, then one variable step. Returns the fixed steps run.
pub fn run_frame<A: FrameHooks>(
    actor: &mut A,
    clock: &mut FrameClock,
    input: &impl InputSource,
    dt: f32,
    caster: &impl Raycaster,
    animator: &mut impl AnimationSink,
) -> u32 {
    let steps = clock.advance(dt);
    for _ in 0..steps {
        actor.on_fixed_tick(caster);
    }
    actor.on_tick(input, dt, animator);
    steps
}
