//! Avatar domain: ECS components, physics layers and messages.

use avian2d::prelude::*;
use bevy::ecs::message::Message;
use bevy::prelude::*;

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Ground surfaces (floors, platforms, steps)
    Ground,
    /// Wall surfaces and overhangs
    Wall,
    /// Avatar bodies
    Avatar,
    /// Sensors (signs, triggers) - should not block movement
    Sensor,
}

/// Child entities built at spawn.
#[derive(Component, Debug, Clone, Copy)]
pub struct AvatarParts {
    pub collider: Entity,
    pub visual: Entity,
}

/// Marker for the child carrying the avatar's collider
#[derive(Component, Debug)]
pub struct AvatarCollider;

/// Marker for the child carrying the avatar's sprite
#[derive(Component, Debug)]
pub struct AvatarVisual;

/// Last clip requested for this avatar.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CurrentClip(pub Option<&'static str>);

/// Marker for ground colliders
#[derive(Component, Debug)]
pub struct Ground;

/// Marker for wall colliders
#[derive(Component, Debug)]
pub struct Wall;

/// Requests playback of a named animation clip on an avatar.
#[derive(Debug, Clone, Copy)]
pub struct PlayClip {
    pub entity: Entity,
    pub clip: &'static str,
}

impl Message for PlayClip {}
