//! Avatar domain: the motion state machine and its ECS wiring.
//!
//! The controller itself is plain data driven through [`AvatarController::on_tick`]
//! and [`AvatarController::on_fixed_tick`]; the systems here only move values
//! between it and the physics, input and animation plugins.

mod animation;
mod body;
mod charges;
mod components;
mod controller;
mod frame;
mod input;
mod spawn;
mod state;
pub(crate) mod systems;
mod tuning;

#[cfg(test)]
mod tests;

use bevy::prelude::*;

pub use animation::AnimationSink;
pub use body::{Body, ColliderPose, is_epsilon_zero};
pub use charges::DashCharges;
pub use components::{
    AvatarCollider, AvatarParts, AvatarVisual, CurrentClip, GameLayer, Ground, PlayClip, Wall,
};
pub use controller::AvatarController;
pub use frame::{DEFAULT_FIXED_STEP, FrameClock, FrameHooks, MAX_FRAME_DELTA, MAX_STEPS_PER_FRAME, run_frame};
pub use input::{InputAxis, InputButton, InputFrame, InputSource};
pub use spawn::SPAWN_POSITION;
pub use state::AvatarState;
pub use systems::{AvatarInput, SpatialRaycaster};
pub use tuning::{
    AvatarTuning, DEFAULT_TUNING_PATH, DashAim, TuningError, load_tuning_or_default,
};

use systems::{apply_avatar_pose, drive_avatars, play_clips, read_input, refresh_contacts};

/// System sets so other plugins can order against the avatar pass.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum AvatarSet {
    /// Input sampling, state machine and pose write-back.
    Drive,
}

pub struct AvatarPlugin;

impl Plugin for AvatarPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<PlayClip>()
            .init_resource::<AvatarInput>()
            .add_systems(Startup, (spawn::load_tuning, spawn::spawn_avatar).chain())
            .add_systems(FixedUpdate, refresh_contacts)
            .add_systems(
                Update,
                (read_input, drive_avatars, apply_avatar_pose, play_clips)
                    .chain()
                    .in_set(AvatarSet::Drive),
            );

        #[cfg(feature = "dev-tools")]
        app.add_systems(Update, systems::draw_probe_rays.after(AvatarSet::Drive));
    }
}
