//! Avatar domain: unit tests for the motion state machine and its collaborators.

use std::path::Path;

use bevy::prelude::*;

use super::{
    AvatarController, AvatarInput, AvatarState, AvatarTuning, DEFAULT_FIXED_STEP, DashAim,
    FrameClock, InputButton, InputFrame, InputSource, MAX_STEPS_PER_FRAME, TuningError,
    load_tuning_or_default, run_frame,
};
use crate::probe::{Aabb, StaticGeometry};
use crate::timers::{DASH_DURATION, DASH_RECOVERY};

/// Frame length that keeps timer arithmetic exact.
const FRAME: f32 = 0.25;
const ON_FLOOR: Vec2 = Vec2::new(0.0, 1.0);
const IN_AIR: Vec2 = Vec2::new(0.0, 10.0);

fn tuning() -> AvatarTuning {
    AvatarTuning {
        dash_duration: 0.5,
        dash_recovery_duration: 1.0,
        ..AvatarTuning::default()
    }
}

fn floor() -> StaticGeometry {
    StaticGeometry::new().with_box(1, Aabb::new(Vec2::new(-50.0, -1.0), Vec2::new(50.0, 0.0)))
}

/// Floor plus a block starting just right of the avatar's spawn.
fn floor_with_block(min: Vec2, max: Vec2) -> StaticGeometry {
    floor().with_box(2, Aabb::new(min, max))
}

struct Rig {
    avatar: AvatarController,
    world: StaticGeometry,
    clips: Vec<&'static str>,
}

impl Rig {
    fn new(tuning: AvatarTuning, position: Vec2, world: StaticGeometry) -> Self {
        Self {
            avatar: AvatarController::new(tuning, position),
            world,
            clips: Vec::new(),
        }
    }

    /// One fixed step followed by one frame.
    fn frame(&mut self, input: InputFrame) {
        self.avatar.on_fixed_tick(&self.world);
        self.avatar.on_tick(&input, FRAME, &mut self.clips);
    }

    fn idle(&mut self) {
        self.frame(InputFrame::default());
    }

    fn walk_right(&mut self) {
        self.frame(InputFrame::moving(1.0));
    }

    fn land_at(&mut self, position: Vec2) {
        let body = self.avatar.body_mut();
        body.position = position;
        body.velocity.y = 0.0;
    }

    fn last_clip(&self) -> Option<&'static str> {
        self.clips.last().copied()
    }
}

// --- States ---

#[test]
fn test_state_names_and_clips() {
    let names: Vec<&str> = AvatarState::ALL.iter().map(|state| state.name()).collect();
    assert_eq!(names, ["Idle", "Walk", "Jump", "Hop", "Dash", "Crouch", "Crawl"]);

    for state in AvatarState::ALL {
        assert_eq!(state.clip(), state.name());
        assert_eq!(state.to_string(), state.name());
        assert_eq!(
            state.blocks_actions(),
            matches!(
                state,
                AvatarState::Hop | AvatarState::Crouch | AvatarState::Crawl | AvatarState::Dash
            )
        );
    }
}

// --- Spawn ---

#[test]
fn test_spawn_state() {
    let tuning = tuning();
    let avatar = AvatarController::new(tuning.clone(), ON_FLOOR);

    assert_eq!(avatar.state(), AvatarState::Idle);
    assert_eq!(avatar.current_state_name(), "Idle");
    assert!(avatar.entry_pending());
    assert_eq!(avatar.dash_charges().remaining(), tuning.max_dash_charges);
    assert!(avatar.dash_charges().is_full());
    assert_eq!(avatar.body().gravity_scale, tuning.gravity_scale);
    assert_eq!(avatar.gravity_scale_default(), tuning.gravity_scale);
    assert!(avatar.facing_right());
    assert_eq!(avatar.visual_scale(), Vec2::ONE);
    assert!(avatar.controls_enabled());
    assert!(avatar.timers().is_empty());
}

#[test]
fn test_first_frame_plays_idle() {
    let mut rig = Rig::new(tuning(), ON_FLOOR, floor());
    rig.idle();

    assert_eq!(rig.clips, vec!["Idle"]);
    assert!(!rig.avatar.entry_pending());

    rig.idle();
    assert_eq!(rig.clips, vec!["Idle"]);
}

// --- Grounding ---

#[test]
fn test_grounded_needs_contact_and_rest() {
    let mut rig = Rig::new(tuning(), ON_FLOOR, floor());
    assert!(!rig.avatar.is_grounded());

    rig.avatar.on_fixed_tick(&rig.world);
    assert!(rig.avatar.contacts().bottom);
    assert!(rig.avatar.is_grounded());

    rig.avatar.body_mut().velocity.y = 0.0005;
    assert!(rig.avatar.is_grounded());

    rig.avatar.body_mut().velocity.y = 0.01;
    assert!(!rig.avatar.is_grounded());

    let mut airborne = Rig::new(tuning(), IN_AIR, floor());
    airborne.avatar.on_fixed_tick(&airborne.world);
    assert!(!airborne.avatar.is_grounded());
}

// --- Idle / Walk ---

#[test]
fn test_idle_walk_idle_round_trip() {
    let tuning = tuning();
    let move_speed = tuning.move_speed;
    let mut rig = Rig::new(tuning, ON_FLOOR, floor());

    rig.idle();
    rig.walk_right();
    assert_eq!(rig.avatar.state(), AvatarState::Walk);
    assert!(rig.avatar.entry_pending());

    rig.walk_right();
    assert_eq!(rig.last_clip(), Some("Walk"));

    rig.walk_right();
    assert_eq!(rig.avatar.body().velocity.x, move_speed);

    rig.idle();
    assert_eq!(rig.avatar.state(), AvatarState::Idle);

    rig.idle();
    assert_eq!(rig.avatar.state(), AvatarState::Idle);
    assert_eq!(rig.avatar.body().velocity.x, 0.0);
    assert_eq!(rig.clips, vec!["Idle", "Walk", "Idle"]);
}

#[test]
fn test_walk_left_uses_negative_speed() {
    let mut rig = Rig::new(tuning(), ON_FLOOR, floor());
    let left = InputFrame::moving(-0.3);

    rig.idle();
    rig.frame(left);
    rig.frame(left);
    rig.frame(left);

    assert_eq!(rig.avatar.body().velocity.x, -5.0);
    assert!(!rig.avatar.facing_right());
}

// --- Facing ---

#[test]
fn test_facing_flips_once_per_disagreement() {
    let mut rig = Rig::new(tuning(), ON_FLOOR, floor());
    rig.idle();

    let mut flips = 0;
    let mut last = rig.avatar.visual_scale().x;
    for vx in [-1.0, -2.0, -0.5, 0.0, 0.0005, 3.0, 4.0, -1.0] {
        rig.avatar.body_mut().velocity.x = vx;
        rig.idle();
        let scale = rig.avatar.visual_scale().x;
        if scale != last {
            flips += 1;
        }
        last = scale;
        assert_eq!(rig.avatar.facing_right(), scale > 0.0);
    }

    assert_eq!(flips, 3);
    assert!(!rig.avatar.facing_right());
    assert_eq!(rig.avatar.visual_scale().x, -1.0);
}

// --- Jump ---

#[test]
fn test_jump_from_ground() {
    let tuning = tuning();
    let expected_vy = tuning.jump_force * tuning.force_step / tuning.mass;
    let mut rig = Rig::new(tuning, ON_FLOOR, floor());

    rig.idle();
    rig.frame(InputFrame::default().with_jump());

    assert_eq!(rig.avatar.state(), AvatarState::Jump);
    assert_eq!(rig.last_clip(), Some("Jump"));
    assert_eq!(rig.avatar.body().velocity.y, expected_vy);

    // Air control while rising.
    rig.walk_right();
    assert_eq!(rig.avatar.state(), AvatarState::Jump);
    assert_eq!(rig.avatar.body().velocity.x, 5.0);

    rig.land_at(ON_FLOOR);
    rig.walk_right();
    assert_eq!(rig.avatar.state(), AvatarState::Walk);
}

#[test]
fn test_jump_landing_without_input_goes_idle() {
    let mut rig = Rig::new(tuning(), ON_FLOOR, floor());
    rig.idle();
    rig.frame(InputFrame::default().with_jump());

    rig.land_at(ON_FLOOR);
    rig.idle();
    assert_eq!(rig.avatar.state(), AvatarState::Idle);
}

#[test]
fn test_jump_rejected_in_air() {
    let mut rig = Rig::new(tuning(), IN_AIR, floor());
    rig.idle();
    rig.frame(InputFrame::default().with_jump());

    assert_eq!(rig.avatar.state(), AvatarState::Idle);
    assert_eq!(rig.avatar.body().velocity.y, 0.0);
}

// --- Dash ---

#[test]
fn test_dash_spends_one_charge_and_waits_for_recovery() {
    let tuning = tuning();
    let dash_speed = tuning.dash_force * tuning.force_step / tuning.mass;
    let mut rig = Rig::new(tuning, IN_AIR, floor());

    rig.idle();
    rig.frame(InputFrame::default().with_dash());
    assert_eq!(rig.avatar.state(), AvatarState::Dash);
    assert_eq!(rig.last_clip(), Some("Dash"));
    assert_eq!(rig.avatar.body().gravity_scale, 0.0);
    assert_eq!(rig.avatar.body().velocity, Vec2::new(dash_speed, 0.0));
    assert!(rig.avatar.timers().exists(DASH_DURATION));
    assert_eq!(rig.avatar.dash_charges().remaining(), 1);

    rig.idle();
    assert_eq!(rig.avatar.state(), AvatarState::Dash);

    rig.idle();
    assert_eq!(rig.avatar.state(), AvatarState::Idle);
    assert_eq!(rig.avatar.dash_charges().remaining(), 0);
    assert_eq!(rig.avatar.body().velocity, Vec2::ZERO);
    assert_eq!(rig.avatar.body().gravity_scale, 1.0);
    assert!(rig.avatar.timers().exists(DASH_RECOVERY));

    // Landing refills, but recovery still blocks.
    rig.land_at(ON_FLOOR);
    rig.idle();
    assert_eq!(rig.avatar.dash_charges().remaining(), 1);

    rig.frame(InputFrame::default().with_dash());
    assert_eq!(rig.avatar.state(), AvatarState::Idle);
    assert!(rig.avatar.timers().exists(DASH_RECOVERY));

    rig.idle();
    assert!(rig.avatar.timers().is_over_or_null(DASH_RECOVERY));

    rig.frame(InputFrame::default().with_dash());
    assert_eq!(rig.avatar.state(), AvatarState::Dash);
}

#[test]
fn test_dash_rejected_without_charges() {
    let mut rig = Rig::new(tuning(), IN_AIR, floor());
    rig.idle();
    rig.avatar.dash_charges_mut().set_remaining(0);

    rig.frame(InputFrame::default().with_dash());
    assert_eq!(rig.avatar.state(), AvatarState::Idle);
}

#[test]
fn test_no_refill_during_dash() {
    let mut rig = Rig::new(tuning(), ON_FLOOR, floor());
    rig.idle();
    rig.frame(InputFrame::default().with_dash());
    assert_eq!(rig.avatar.state(), AvatarState::Dash);

    rig.avatar.dash_charges_mut().set_remaining(0);
    rig.idle();
    assert_eq!(rig.avatar.state(), AvatarState::Dash);
    assert!(rig.avatar.is_grounded());
    assert_eq!(rig.avatar.dash_charges().remaining(), 0);

    rig.idle();
    assert_eq!(rig.avatar.state(), AvatarState::Idle);
    assert_eq!(rig.avatar.dash_charges().remaining(), 0);

    rig.idle();
    assert_eq!(rig.avatar.dash_charges().remaining(), 1);
}

#[test]
fn test_nothing_preempts_dash() {
    let mut rig = Rig::new(tuning(), ON_FLOOR, floor());
    rig.idle();
    rig.frame(InputFrame::default().with_dash());

    rig.frame(InputFrame::moving(-1.0).with_jump().with_dash());
    assert_eq!(rig.avatar.state(), AvatarState::Dash);
    assert!(rig.avatar.body().velocity.x > 0.0);
}

#[test]
fn test_dash_follows_aim() {
    let mut rig = Rig::new(tuning(), IN_AIR, floor());
    rig.idle();

    let input = InputFrame::moving(1.0).with_aim(Vec2::Y).with_dash();
    rig.frame(input);

    let velocity = rig.avatar.body().velocity;
    assert_eq!(velocity.x, 0.0);
    assert!(velocity.y > 0.0);
}

#[test]
fn test_dash_follows_movement_axes() {
    let tuning = AvatarTuning {
        dash_aim: DashAim::Movement,
        ..tuning()
    };
    let mut rig = Rig::new(tuning, IN_AIR, floor());
    rig.idle();

    let input = InputFrame::default()
        .with_movement(Vec2::new(0.0, -1.0))
        .with_aim(Vec2::X)
        .with_dash();
    rig.frame(input);

    let velocity = rig.avatar.body().velocity;
    assert_eq!(velocity.x, 0.0);
    assert!(velocity.y < 0.0);
}

#[test]
fn test_dash_falls_back_to_facing() {
    let mut rig = Rig::new(tuning(), IN_AIR, floor());
    rig.idle();
    rig.avatar.body_mut().velocity.x = -1.0;
    rig.idle();
    assert!(!rig.avatar.facing_right());

    rig.frame(InputFrame::default().with_dash());
    let velocity = rig.avatar.body().velocity;
    assert!(velocity.x < 0.0);
    assert_eq!(velocity.y, 0.0);
}

// --- Hop ---

#[test]
fn test_hop_over_step() {
    let tuning = tuning();
    let hop_vy = tuning.hop_force * tuning.force_step / tuning.mass;
    let world = floor_with_block(Vec2::new(0.55, 0.0), Vec2::new(3.0, 0.4));
    let mut rig = Rig::new(tuning, ON_FLOOR, world);

    rig.idle();
    rig.walk_right();
    rig.walk_right();
    rig.walk_right();
    assert!(rig.avatar.contacts().right_bottom);
    assert!(!rig.avatar.contacts().right_top);
    assert_eq!(rig.avatar.state(), AvatarState::Hop);

    rig.walk_right();
    assert_eq!(rig.last_clip(), Some("Hop"));
    assert_eq!(rig.avatar.body().velocity, Vec2::new(5.0, hop_vy));
    assert!(!rig.avatar.controls_enabled());

    // Controls stay locked in the air and the take-off speed is held.
    rig.avatar.body_mut().velocity.x = 0.0;
    rig.frame(InputFrame::moving(1.0).with_jump());
    assert_eq!(rig.avatar.state(), AvatarState::Hop);
    assert_eq!(rig.avatar.body().velocity.x, 5.0);

    rig.land_at(Vec2::new(1.5, 1.4));
    rig.walk_right();
    assert!(rig.avatar.controls_enabled());
    assert_eq!(rig.avatar.state(), AvatarState::Walk);
}

#[test]
fn test_hop_landing_without_input_stops() {
    let world = floor_with_block(Vec2::new(0.55, 0.0), Vec2::new(3.0, 0.4));
    let mut rig = Rig::new(tuning(), ON_FLOOR, world);

    rig.idle();
    rig.walk_right();
    rig.walk_right();
    rig.walk_right();
    rig.walk_right();
    assert_eq!(rig.avatar.state(), AvatarState::Hop);

    rig.land_at(Vec2::new(1.5, 1.4));
    rig.idle();
    assert_eq!(rig.avatar.state(), AvatarState::Idle);
    assert_eq!(rig.avatar.body().velocity, Vec2::ZERO);
}

#[test]
fn test_hop_disabled_keeps_walking() {
    let tuning = AvatarTuning {
        hop_enabled: false,
        ..tuning()
    };
    let world = floor_with_block(Vec2::new(0.55, 0.0), Vec2::new(3.0, 0.4));
    let mut rig = Rig::new(tuning, ON_FLOOR, world);

    rig.idle();
    for _ in 0..4 {
        rig.walk_right();
    }
    assert_eq!(rig.avatar.state(), AvatarState::Walk);
    assert_eq!(rig.avatar.body().velocity.x, 5.0);
}

#[test]
fn test_hop_lands_on_second_step_rehops() {
    let tuning = tuning();
    let hop_vy = tuning.hop_force * tuning.force_step / tuning.mass;
    let world = floor_with_block(Vec2::new(0.55, 0.0), Vec2::new(3.0, 0.4))
        .with_box(3, Aabb::new(Vec2::new(2.05, 0.4), Vec2::new(5.0, 0.8)));
    let mut rig = Rig::new(tuning, ON_FLOOR, world);

    rig.idle();
    for _ in 0..4 {
        rig.walk_right();
    }
    assert_eq!(rig.avatar.state(), AvatarState::Hop);

    // Landing on the first step with the second one right ahead.
    rig.land_at(Vec2::new(1.5, 1.4));
    rig.walk_right();
    assert!(rig.avatar.contacts().right_bottom);
    assert!(!rig.avatar.contacts().right_top);
    assert_eq!(rig.avatar.state(), AvatarState::Hop);
    assert!(rig.avatar.entry_pending());
    assert!(rig.avatar.controls_enabled());

    rig.walk_right();
    let hops = rig.clips.iter().filter(|&&clip| clip == "Hop").count();
    assert_eq!(hops, 2);
    assert_eq!(rig.avatar.body().velocity, Vec2::new(5.0, hop_vy));
    assert!(!rig.avatar.controls_enabled());
}

#[test]
fn test_hop_keeps_physics_vx_when_head_blocked() {
    let world = floor_with_block(Vec2::new(0.55, 0.0), Vec2::new(3.0, 0.4))
        .with_box(3, Aabb::new(Vec2::new(4.0, 2.0), Vec2::new(5.0, 4.0)));
    let mut rig = Rig::new(tuning(), ON_FLOOR, world);

    rig.idle();
    for _ in 0..4 {
        rig.walk_right();
    }
    assert_eq!(rig.avatar.state(), AvatarState::Hop);

    // Mid-air with the upper body against the block.
    rig.avatar.body_mut().position = Vec2::new(3.4, 1.5);
    rig.avatar.body_mut().velocity.x = 1.25;
    rig.walk_right();
    assert!(rig.avatar.contacts().right_top);
    assert!(!rig.avatar.is_grounded());
    assert_eq!(rig.avatar.state(), AvatarState::Hop);
    assert_eq!(rig.avatar.body().velocity.x, 1.25);

    // Clear of the block the take-off speed comes back.
    rig.avatar.body_mut().position = Vec2::new(3.4, 4.5);
    rig.walk_right();
    assert!(!rig.avatar.contacts().right_top);
    assert_eq!(rig.avatar.body().velocity.x, 5.0);
}

#[test]
fn test_walk_left_into_step_hops() {
    let tuning = tuning();
    let hop_vy = tuning.hop_force * tuning.force_step / tuning.mass;
    let world = floor_with_block(Vec2::new(-3.0, 0.0), Vec2::new(-0.55, 0.4));
    let mut rig = Rig::new(tuning, ON_FLOOR, world);
    let left = InputFrame::moving(-1.0);

    rig.idle();
    rig.frame(left);
    rig.frame(left);
    rig.frame(left);
    assert!(rig.avatar.contacts().left_bottom);
    assert!(!rig.avatar.contacts().left_top);
    assert_eq!(rig.avatar.state(), AvatarState::Hop);

    rig.frame(left);
    assert_eq!(rig.avatar.body().velocity, Vec2::new(-5.0, hop_vy));
    assert!(!rig.avatar.facing_right());
}

// --- Crouch / Crawl ---

#[test]
fn test_walk_left_under_overhang_crawls() {
    let world = floor_with_block(Vec2::new(-5.0, 1.2), Vec2::new(-0.55, 3.0));
    let mut rig = Rig::new(tuning(), ON_FLOOR, world);
    let left = InputFrame::moving(-1.0);

    rig.idle();
    rig.frame(left);
    rig.frame(left);
    rig.frame(left);
    assert!(rig.avatar.contacts().left_top);
    assert!(!rig.avatar.contacts().left_bottom);
    assert_eq!(rig.avatar.state(), AvatarState::Crawl);

    rig.frame(left);
    assert_eq!(rig.last_clip(), Some("Crawl"));
    assert_eq!(rig.avatar.collider_pose().local_scale.y, 0.5);

    rig.avatar.body_mut().position = Vec2::new(-2.0, 1.0);
    rig.frame(left);
    assert!(rig.avatar.contacts().top);
    assert_eq!(rig.avatar.state(), AvatarState::Crawl);
    assert_eq!(rig.avatar.body().velocity.x, -5.0);
}

fn crawl_tuning() -> AvatarTuning {
    AvatarTuning {
        crouch_collider_scale: 0.37,
        crouch_pivot: [0.13, -0.61],
        ..tuning()
    }
}

fn overhang() -> StaticGeometry {
    floor_with_block(Vec2::new(0.55, 1.2), Vec2::new(5.0, 3.0))
}

#[test]
fn test_crawl_restores_collider_exactly() {
    let tuning = crawl_tuning();
    let crawl_top = tuning.crawl_top_probe_length;
    let mut rig = Rig::new(tuning, ON_FLOOR, overhang());
    let standing = rig.avatar.collider_pose();

    rig.idle();
    rig.walk_right();
    rig.walk_right();
    rig.walk_right();
    assert_eq!(rig.avatar.state(), AvatarState::Crawl);

    rig.walk_right();
    assert_eq!(rig.last_clip(), Some("Crawl"));
    let crawling = rig.avatar.collider_pose();
    assert_eq!(crawling.local_scale.y, 0.37);
    assert_eq!(crawling.local_position, Vec2::new(0.13, -0.61));
    assert_eq!(rig.avatar.probe().lengths().top, crawl_top);

    // No fresh probe reading yet: the stale clear-top flag is ignored.
    rig.avatar
        .on_tick(&InputFrame::moving(1.0), FRAME, &mut rig.clips);
    assert_eq!(rig.avatar.state(), AvatarState::Crawl);

    // Under the overhang the stretched top probe sees the ceiling.
    rig.avatar.body_mut().position = Vec2::new(2.0, 1.0);
    rig.walk_right();
    assert!(rig.avatar.contacts().top);
    assert_eq!(rig.avatar.state(), AvatarState::Crawl);
    assert_eq!(rig.avatar.body().velocity.x, 5.0);

    // Jump is ignored while crawling.
    rig.frame(InputFrame::moving(1.0).with_jump());
    assert_eq!(rig.avatar.state(), AvatarState::Crawl);

    rig.avatar.body_mut().position = Vec2::new(8.0, 1.0);
    rig.walk_right();
    assert_eq!(rig.avatar.state(), AvatarState::Walk);

    let restored = rig.avatar.collider_pose();
    assert_eq!(restored, standing);
    assert_eq!(
        restored.local_scale.y.to_bits(),
        standing.local_scale.y.to_bits()
    );
    assert_eq!(
        restored.local_position.x.to_bits(),
        standing.local_position.x.to_bits()
    );
    assert_eq!(rig.avatar.probe().lengths().top, 1.0);
}

#[test]
fn test_crouch_and_crawl_again_without_double_shrink() {
    let mut rig = Rig::new(crawl_tuning(), ON_FLOOR, overhang());

    rig.idle();
    for _ in 0..4 {
        rig.walk_right();
    }
    rig.avatar.body_mut().position = Vec2::new(2.0, 1.0);
    rig.walk_right();
    assert_eq!(rig.avatar.state(), AvatarState::Crawl);

    rig.idle();
    assert_eq!(rig.avatar.state(), AvatarState::Crouch);
    assert_eq!(rig.avatar.body().velocity.x, 0.0);

    rig.idle();
    assert_eq!(rig.last_clip(), Some("Crouch"));
    rig.frame(InputFrame::default().with_dash());
    assert_eq!(rig.avatar.state(), AvatarState::Crouch);

    rig.walk_right();
    assert_eq!(rig.avatar.state(), AvatarState::Crawl);
    rig.walk_right();
    assert_eq!(rig.avatar.collider_pose().local_scale.y, 0.37);

    rig.avatar.body_mut().position = Vec2::new(8.0, 1.0);
    rig.walk_right();
    assert_eq!(rig.avatar.state(), AvatarState::Walk);
    assert_eq!(rig.avatar.collider_pose().local_scale, Vec2::ONE);
}

#[test]
fn test_crawl_disabled_keeps_walking() {
    let tuning = AvatarTuning {
        crawl_enabled: false,
        ..crawl_tuning()
    };
    let mut rig = Rig::new(tuning, ON_FLOOR, overhang());

    rig.idle();
    for _ in 0..4 {
        rig.walk_right();
    }
    assert_eq!(rig.avatar.state(), AvatarState::Walk);
}

// --- Frame driver ---

#[test]
fn test_frame_clock_accumulates() {
    let mut clock = FrameClock::new(0.125);
    assert_eq!(clock.advance(0.25), 2);
    assert_eq!(clock.advance(0.0625), 0);
    assert_eq!(clock.accumulator(), 0.0625);
    assert_eq!(clock.advance(0.0625), 1);
    assert_eq!(clock.accumulator(), 0.0);
    assert_eq!(clock.advance(0.0), 0);
    assert_eq!(clock.advance(f32::NAN), 0);
    assert_eq!(clock.advance(f32::INFINITY), 0);

    let mut broken = FrameClock::new(0.0);
    assert_eq!(broken.advance(1.0), 0);
}

#[test]
fn test_frame_clock_drops_long_stalls() {
    let mut clock = FrameClock::new(0.125);
    assert_eq!(clock.advance(3600.0), 2);
    assert_eq!(clock.accumulator(), 0.0);
    assert_eq!(clock.advance(1.0e6), 2);

    let mut physics = FrameClock::new(DEFAULT_FIXED_STEP);
    assert_eq!(physics.advance(1.0e6), 12);
    assert!(physics.accumulator() < physics.fixed_step());

    let mut tiny = FrameClock::new(1.0e-6);
    assert_eq!(tiny.advance(1.0), MAX_STEPS_PER_FRAME);
    assert!(tiny.accumulator() <= tiny.fixed_step());
}

#[test]
fn test_run_frame_runs_fixed_steps_first() {
    let world = floor();
    let mut avatar = AvatarController::new(tuning(), ON_FLOOR);
    let mut clock = FrameClock::new(0.125);
    let mut clips: Vec<&'static str> = Vec::new();

    let steps = run_frame(
        &mut avatar,
        &mut clock,
        &InputFrame::default(),
        0.25,
        &world,
        &mut clips,
    );

    assert_eq!(steps, 2);
    assert_eq!(avatar.probe().generation(), 2);
    assert!(avatar.is_grounded());
    assert_eq!(clips, vec!["Idle"]);
}

// --- Input ---

#[test]
fn test_keyboard_mapping() {
    let mut keyboard = ButtonInput::<KeyCode>::default();
    keyboard.press(KeyCode::KeyD);
    keyboard.press(KeyCode::KeyS);
    keyboard.press(KeyCode::ArrowUp);
    keyboard.press(KeyCode::Space);
    keyboard.press(KeyCode::KeyE);

    let input = AvatarInput::from_keyboard(&keyboard).frame;
    assert_eq!(input.movement, Vec2::new(1.0, -1.0));
    assert_eq!(input.aim, Vec2::new(0.0, 1.0));
    assert!(input.jump_pressed);
    assert!(input.jump_held);
    assert!(!input.dash_pressed);
    assert!(!input.dash_held);
    assert!(input.analyze_pressed);
    assert!(input.analyze_held);

    // Still down on the next frame: held, no longer pressed.
    keyboard.clear();
    let held = AvatarInput::from_keyboard(&keyboard);
    assert!(!held.button_down(InputButton::Jump));
    assert!(held.button_held(InputButton::Jump));
    assert!(!held.button_down(InputButton::Analyze));
    assert!(held.button_held(InputButton::Analyze));
    assert!(!held.button_held(InputButton::Dash));

    keyboard.release(KeyCode::Space);
    let released = AvatarInput::from_keyboard(&keyboard);
    assert!(!released.button_held(InputButton::Jump));
}

#[test]
fn test_opposite_keys_cancel() {
    let mut keyboard = ButtonInput::<KeyCode>::default();
    keyboard.press(KeyCode::KeyA);
    keyboard.press(KeyCode::KeyD);
    keyboard.press(KeyCode::ShiftLeft);

    let input = AvatarInput::from_keyboard(&keyboard).frame;
    assert_eq!(input.movement.x, 0.0);
    assert_eq!(input.horizontal_sign(), 0.0);
    assert!(input.dash_pressed);
}

#[test]
fn test_sample_clamps_axes() {
    let raw = InputFrame::default().with_movement(Vec2::new(3.0, -7.0));
    let sampled = InputFrame::sample(&raw);
    assert_eq!(sampled.movement, Vec2::new(1.0, -1.0));
}

// --- Tuning ---

#[test]
fn test_bundled_tuning_parses() {
    let tuning = AvatarTuning::from_ron_str(include_str!("../../assets/data/avatar.ron"))
        .expect("bundled tuning should parse");

    assert!(tuning.validate().is_empty());
    assert_eq!(
        tuning,
        AvatarTuning {
            draw_debug_rays: true,
            ..AvatarTuning::default()
        }
    );
}

#[test]
fn test_partial_tuning_uses_defaults() {
    let tuning = AvatarTuning::from_ron_str("(move_speed: 7.5, dash_aim: Movement)")
        .expect("partial tuning should parse");

    assert_eq!(tuning.move_speed, 7.5);
    assert_eq!(tuning.dash_aim, DashAim::Movement);
    assert_eq!(tuning.jump_force, 600.0);
    assert_eq!(tuning.max_dash_charges, 1);
}

#[test]
fn test_malformed_tuning_is_parse_error() {
    let result = AvatarTuning::from_ron_str("(move_speed: \"fast\")");
    assert!(matches!(result, Err(TuningError::Parse { .. })));
}

#[test]
fn test_validation_reports_every_bad_field() {
    let tuning = AvatarTuning {
        mass: 0.0,
        crouch_collider_scale: 1.5,
        dash_duration: -1.0,
        ..AvatarTuning::default()
    };

    let fields: Vec<&str> = tuning
        .validate()
        .iter()
        .filter_map(|e| match e {
            TuningError::Invalid { field, .. } => Some(*field),
            _ => None,
        })
        .collect();

    assert_eq!(fields.len(), 3);
    assert!(fields.contains(&"mass"));
    assert!(fields.contains(&"crouch_collider_scale"));
    assert!(fields.contains(&"dash_duration"));
}

#[test]
fn test_missing_tuning_file_falls_back() {
    let path = Path::new("assets/data/does_not_exist.ron");
    assert!(matches!(
        AvatarTuning::load(path),
        Err(TuningError::Io { .. })
    ));
    assert_eq!(load_tuning_or_default(path), AvatarTuning::default());
}
