//! Avatar domain: the motion state machine.
//!
//! Each frame runs exactly one phase of the active state: its entry branch right
//! after a transition, otherwise its update branch. A transition made during an
//! update is only acted on by the next frame's entry.

use bevy::prelude::*;

use crate::avatar::{
    AnimationSink, AvatarState, AvatarTuning, Body, ColliderPose, DashAim, DashCharges,
    InputFrame, InputSource, is_epsilon_zero,
};
use crate::probe::{Aabb, CollisionProbe, ContactSet, Raycaster};
use crate::timers::{DASH_DURATION, DASH_RECOVERY, TimerRegistry};

#[derive(Component, Debug, Clone)]
pub struct AvatarController {
    tuning: AvatarTuning,
    body: Body,
    gravity_scale_default: f32,
    collider: ColliderPose,
    /// Standing pose saved on entering Crawl; `Some` while the collider is shrunk.
    stored_collider: Option<ColliderPose>,
    probe: CollisionProbe,
    state: AvatarState,
    entry_pending: bool,
    facing_right: bool,
    visual_scale: Vec2,
    controls_enabled: bool,
    dash_charges: DashCharges,
    timers: TimerRegistry,
    input: InputFrame,
    /// Velocity captured at hop take-off.
    stored_velocity: Vec2,
    /// Probe generation when Crawl was last entered.
    crawl_probe_generation: u64,
}

impl AvatarController {
    pub fn new(tuning: AvatarTuning, position: Vec2) -> Self {
        Self {
            body: Body::new(position, tuning.gravity_scale, tuning.mass),
            gravity_scale_default: tuning.gravity_scale,
            collider: ColliderPose::default(),
            stored_collider: None,
            probe: CollisionProbe::new(tuning.probe_distances, tuning.draw_debug_rays),
            state: AvatarState::Idle,
            entry_pending: true,
            facing_right: true,
            visual_scale: Vec2::ONE,
            controls_enabled: true,
            dash_charges: DashCharges::new(tuning.max_dash_charges),
            timers: TimerRegistry::new(),
            input: InputFrame::default(),
            stored_velocity: Vec2::ZERO,
            crawl_probe_generation: 0,
            tuning,
        }
    }

    /// Variable-rate pass: sample input, gate actions, run the state, flip facing,
    /// then count timers down by `dt`.
    pub fn on_tick(
        &mut self,
        source: &impl InputSource,
        dt: f32,
        animator: &mut impl AnimationSink,
    ) {
        self.input = InputFrame::sample(source);

        if self.controls_enabled {
            self.handle_actions();
        }

        if self.entry_pending {
            self.entry_pending = false;
            self.enter_state(animator);
        } else {
            self.update_state();
        }

        self.update_facing();
        self.timers.tick(dt);
    }

    /// Fixed-rate pass: re-probe contacts, then refill dash charges on the ground.
    pub fn on_fixed_tick(&mut self, caster: &impl Raycaster) {
        let bounds = self.collider_bounds();
        self.probe.refresh(bounds, caster);

        if self.state != AvatarState::Dash && self.is_grounded() {
            self.dash_charges.refill();
        }
    }

    /// Bottom contact with (near) zero vertical velocity.
    pub fn is_grounded(&self) -> bool {
        is_epsilon_zero(self.body.velocity.y) && self.probe.contacts().bottom
    }

    pub fn current_state_name(&self) -> &'static str {
        self.state.name()
    }

    pub fn state(&self) -> AvatarState {
        self.state
    }

    pub fn entry_pending(&self) -> bool {
        self.entry_pending
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Hosts write integrated position and velocity back through this.
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn gravity_scale_default(&self) -> f32 {
        self.gravity_scale_default
    }

    pub fn contacts(&self) -> ContactSet {
        self.probe.contacts()
    }

    pub fn probe(&self) -> &CollisionProbe {
        &self.probe
    }

    pub fn collider_pose(&self) -> ColliderPose {
        self.collider
    }

    pub fn collider_bounds(&self) -> Aabb {
        self.collider
            .bounds(self.body.position, self.tuning.collider_size())
    }

    pub fn facing_right(&self) -> bool {
        self.facing_right
    }

    pub fn visual_scale(&self) -> Vec2 {
        self.visual_scale
    }

    pub fn controls_enabled(&self) -> bool {
        self.controls_enabled
    }

    pub fn dash_charges(&self) -> &DashCharges {
        &self.dash_charges
    }

    pub fn dash_charges_mut(&mut self) -> &mut DashCharges {
        &mut self.dash_charges
    }

    pub fn timers(&self) -> &TimerRegistry {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut TimerRegistry {
        &mut self.timers
    }

    pub fn tuning(&self) -> &AvatarTuning {
        &self.tuning
    }

    /// Input sampled on the last frame.
    pub fn input(&self) -> &InputFrame {
        &self.input
    }

    fn set_state(&mut self, next: AvatarState) {
        debug!("Avatar state {} -> {}", self.state, next);
        self.state = next;
        self.entry_pending = true;
    }

    fn apply_impulse(&mut self, force: Vec2) {
        self.body.apply_force(force, self.tuning.force_step);
    }

    // --- Actions ---

    fn handle_actions(&mut self) {
        let blocked = self.state.blocks_actions();

        if self.input.jump_pressed && self.is_grounded() && !blocked {
            self.apply_impulse(Vec2::Y * self.tuning.jump_force);
            self.set_state(AvatarState::Jump);
        } else if self.input.dash_pressed
            && self.dash_charges.available()
            && self.timers.is_over_or_null(DASH_RECOVERY)
            && !blocked
        {
            self.set_state(AvatarState::Dash);
        }
    }

    /// Unit dash direction from the configured axes, or facing when they are idle.
    fn dash_direction(&self) -> Vec2 {
        let axes = match self.tuning.dash_aim {
            DashAim::Aim => self.input.aim,
            DashAim::Movement => self.input.movement,
        };
        let facing = if self.facing_right { Vec2::X } else { Vec2::NEG_X };

        if is_epsilon_zero(axes.x) && is_epsilon_zero(axes.y) {
            return facing;
        }
        let direction = axes.normalize_or_zero();
        if direction == Vec2::ZERO {
            facing
        } else {
            direction
        }
    }

    fn update_facing(&mut self) {
        let vx = self.body.velocity.x;
        if is_epsilon_zero(vx) {
            return;
        }
        let moving_right = vx > 0.0;
        if moving_right != self.facing_right {
            self.facing_right = moving_right;
            self.visual_scale.x = -self.visual_scale.x;
        }
    }

    // --- Entry ---

    fn enter_state(&mut self, animator: &mut impl AnimationSink) {
        animator.play(self.state.clip());

        match self.state {
            AvatarState::Idle => self.body.set_velocity(Some(0.0), None),
            AvatarState::Walk | AvatarState::Jump | AvatarState::Crouch => {}
            AvatarState::Hop => self.enter_hop(),
            AvatarState::Dash => self.enter_dash(),
            AvatarState::Crawl => self.enter_crawl(),
        }
    }

    fn enter_hop(&mut self) {
        let vx = self.input.horizontal_sign() * self.tuning.move_speed;
        self.body.set_velocity(Some(vx), Some(0.0));
        self.stored_velocity = self.body.velocity;
        self.apply_impulse(Vec2::Y * self.tuning.hop_force);
        self.controls_enabled = false;
    }

    fn enter_dash(&mut self) {
        self.timers
            .create_timer(DASH_DURATION, self.tuning.dash_duration);
        self.body.gravity_scale = 0.0;
        self.body.velocity = Vec2::ZERO;
        let direction = self.dash_direction();
        self.apply_impulse(direction * self.tuning.dash_force);
    }

    fn enter_crawl(&mut self) {
        // Coming from Crouch the collider is already shrunk.
        if self.stored_collider.is_none() {
            self.stored_collider = Some(self.collider);
            self.collider.local_scale.y *= self.tuning.crouch_collider_scale;
            self.collider.local_position = self.tuning.crouch_pivot();
        }
        self.probe.set_top_length(self.tuning.crawl_top_probe_length);
        self.crawl_probe_generation = self.probe.generation();
    }

    // --- Update ---

    fn update_state(&mut self) {
        match self.state {
            AvatarState::Idle => {
                if self.input.horizontal_sign() != 0.0 {
                    self.set_state(AvatarState::Walk);
                }
            }
            AvatarState::Walk => self.update_walk(),
            AvatarState::Jump => self.update_jump(),
            AvatarState::Hop => self.update_hop(),
            AvatarState::Dash => self.update_dash(),
            AvatarState::Crouch => {
                if self.input.horizontal_sign() != 0.0 {
                    self.set_state(AvatarState::Crawl);
                }
            }
            AvatarState::Crawl => self.update_crawl(),
        }
    }

    /// Horizontal control shared by the ground states. Returns the input sign.
    fn steer(&mut self) -> f32 {
        let sign = self.input.horizontal_sign();
        self.body
            .set_velocity(Some(sign * self.tuning.move_speed), None);
        sign
    }

    fn update_walk(&mut self) {
        let sign = self.input.horizontal_sign();
        let contacts = self.probe.contacts();
        let leading_right = sign > 0.0;

        if sign != 0.0 {
            if self.tuning.crawl_enabled
                && self.is_grounded()
                && contacts.leading_ledge(leading_right)
            {
                self.set_state(AvatarState::Crawl);
                return;
            }
            if self.tuning.hop_enabled && contacts.leading_step(leading_right) {
                self.set_state(AvatarState::Hop);
                return;
            }
        }

        if self.steer() == 0.0 {
            self.set_state(AvatarState::Idle);
        }
    }

    fn update_jump(&mut self) {
        if self.probe.contacts().bottom && self.is_grounded() {
            if self.input.horizontal_sign() != 0.0 {
                self.set_state(AvatarState::Walk);
            } else {
                self.set_state(AvatarState::Idle);
            }
            return;
        }
        self.steer();
    }

    fn update_hop(&mut self) {
        let contacts = self.probe.contacts();

        if contacts.bottom && self.is_grounded() {
            self.controls_enabled = true;
            let sign = self.input.horizontal_sign();
            if sign == 0.0 {
                self.body.velocity = Vec2::ZERO;
                self.set_state(AvatarState::Idle);
            } else if self.tuning.hop_enabled && contacts.leading_step(sign > 0.0) {
                self.set_state(AvatarState::Hop);
            } else {
                self.set_state(AvatarState::Walk);
            }
            return;
        }

        // Keep the take-off speed in the air unless the upper body is pressed on a wall.
        if !contacts.side_top_blocked() {
            self.body.set_velocity(Some(self.stored_velocity.x), None);
        }
    }

    fn update_dash(&mut self) {
        if !self.timers.is_over_or_null(DASH_DURATION) {
            return;
        }
        self.dash_charges.spend();
        self.body.velocity = Vec2::ZERO;
        self.body.gravity_scale = self.gravity_scale_default;
        self.timers
            .create_timer(DASH_RECOVERY, self.tuning.dash_recovery_duration);
        self.set_state(AvatarState::Idle);
    }

    fn update_crawl(&mut self) {
        // Only trust a reading taken with the stretched top probe.
        let fresh = self.probe.generation() > self.crawl_probe_generation;
        if fresh && !self.probe.contacts().top {
            if let Some(standing) = self.stored_collider.take() {
                self.collider = standing;
            }
            self.probe.reset_top_length();
            self.set_state(AvatarState::Walk);
            return;
        }

        if self.steer() == 0.0 {
            self.set_state(AvatarState::Crouch);
        }
    }
}
