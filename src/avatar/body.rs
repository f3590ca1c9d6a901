//! Avatar domain: rigid-body state and collider pose the controller drives.

use bevy::math::Vec2;

use crate::probe::Aabb;

const EPSILON: f32 = 0.001;

pub fn is_epsilon_zero(value: f32) -> bool {
    value > -EPSILON && value < EPSILON
}

/// Kinematic state shared with the physics host. The host writes back position and
/// velocity after each physics step; the controller writes velocity and gravity
/// scale every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub gravity_scale: f32,
    pub mass: f32,
}

impl Body {
    pub fn new(position: Vec2, gravity_scale: f32, mass: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            gravity_scale,
            mass,
        }
    }

    /// Set either velocity axis, leaving `None` axes as they are.
    pub fn set_velocity(&mut self, x: Option<f32>, y: Option<f32>) {
        if let Some(x) = x {
            self.velocity.x = x;
        }
        if let Some(y) = y {
            self.velocity.y = y;
        }
    }

    /// Apply `force` for one physics step of `step` seconds.
    pub fn apply_force(&mut self, force: Vec2, step: f32) {
        if self.mass > 0.0 {
            self.velocity += force * step / self.mass;
        }
    }
}

/// Local placement of the avatar's collider relative to the body origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderPose {
    pub local_position: Vec2,
    pub local_scale: Vec2,
}

impl Default for ColliderPose {
    fn default() -> Self {
        Self {
            local_position: Vec2::ZERO,
            local_scale: Vec2::ONE,
        }
    }
}

impl ColliderPose {
    /// World bounds of a collider of `size` (unscaled) placed at `origin`.
    pub fn bounds(&self, origin: Vec2, size: Vec2) -> Aabb {
        Aabb::from_center_half_extents(origin + self.local_position, size * 0.5 * self.local_scale)
    }
}
