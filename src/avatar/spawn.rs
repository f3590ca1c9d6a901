//! Avatar domain: tuning load and avatar spawning at startup.

use std::path::Path;

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::analysis::Analyzer;
use crate::avatar::{
    AvatarCollider, AvatarController, AvatarParts, AvatarTuning, AvatarVisual, CurrentClip,
    DEFAULT_TUNING_PATH, GameLayer, load_tuning_or_default,
};

/// Where the avatar's body origin starts, in world units.
pub const SPAWN_POSITION: Vec2 = Vec2::new(-4.0, 1.0);

pub(crate) fn load_tuning(mut commands: Commands) {
    let tuning = load_tuning_or_default(Path::new(DEFAULT_TUNING_PATH));
    commands.insert_resource(tuning);
}

pub(crate) fn spawn_avatar(mut commands: Commands, tuning: Res<AvatarTuning>) {
    let size = tuning.collider_size();

    let root = commands
        .spawn((
            (
                AvatarController::new(tuning.clone(), SPAWN_POSITION),
                Analyzer::new(tuning.analyzer),
                CurrentClip::default(),
                Transform::from_translation(SPAWN_POSITION.extend(0.0)),
                Visibility::default(),
            ),
            // Physics
            (
                RigidBody::Dynamic,
                LockedAxes::ROTATION_LOCKED,
                LinearVelocity::default(),
                GravityScale(tuning.gravity_scale),
                Mass(tuning.mass),
                Friction::new(0.0),
            ),
        ))
        .id();

    let collider = commands
        .spawn((
            AvatarCollider,
            Collider::rectangle(size.x, size.y),
            CollisionLayers::new(
                GameLayer::Avatar,
                [GameLayer::Ground, GameLayer::Wall, GameLayer::Sensor],
            ),
            Transform::default(),
        ))
        .id();

    let visual = commands
        .spawn((
            AvatarVisual,
            Sprite {
                color: Color::srgb(0.9, 0.9, 0.9),
                custom_size: Some(size),
                ..default()
            },
            Transform::from_xyz(0.0, 0.0, 1.0),
        ))
        .id();

    commands
        .entity(root)
        .add_children(&[collider, visual])
        .insert(AvatarParts { collider, visual });

    info!(
        "Spawned avatar at {:?} with {} dash charge(s)",
        SPAWN_POSITION, tuning.max_dash_charges
    );
}
