//! Probe domain: six-ray contact classification around an avatar's bounding box.
//!
//! The probe polls every fixed step instead of reacting to collision events, so a
//! contact is never missed but is seen one step late. Each refresh overwrites the
//! whole [`ContactSet`]; no flag survives from an earlier step.

mod geometry;


use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

pub use geometry::{Aabb, StaticGeometry};

/// Distance between the box surface and a ray origin, so rays never start inside
/// the avatar's own collider.
pub const PROBE_SKIN: f32 = 0.01;
/// How far ray origins are pulled in from the box corners along the surface.
pub const CORNER_INSET: f32 = 0.05;

const MIN_DIRECTION_LENGTH: f32 = 1e-6;

/// Opaque identity of whatever collider a ray hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(pub u64);

/// Physics collaborator: a single ray query.
pub trait Raycaster {
    /// Returns the closest collider hit within `max_distance` along `direction`.
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<ColliderHandle>;
}

/// Cast a ray, treating a zero or non-finite direction and a non-positive reach as
/// a miss without consulting `caster`.
pub fn cast_ray(
    caster: &impl Raycaster,
    origin: Vec2,
    direction: Vec2,
    max_distance: f32,
) -> Option<ColliderHandle> {
    if !direction.is_finite()
        || direction.length() < MIN_DIRECTION_LENGTH
        || max_distance.is_nan()
        || max_distance <= 0.0
        || !origin.is_finite()
    {
        return None;
    }
    caster.raycast(origin, direction.normalize(), max_distance)
}

/// Which zones around the box touched something on the last refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactSet {
    pub bottom: bool,
    pub top: bool,
    pub left_bottom: bool,
    pub left_top: bool,
    pub right_bottom: bool,
    pub right_top: bool,
}

impl ContactSet {
    pub fn any(&self) -> bool {
        self.bottom
            || self.top
            || self.left_bottom
            || self.left_top
            || self.right_bottom
            || self.right_top
    }

    /// Crawl-height obstruction ahead: the leading upper ray hits, the lower one does not.
    pub fn leading_ledge(&self, facing_right: bool) -> bool {
        if facing_right {
            self.right_top && !self.right_bottom
        } else {
            self.left_top && !self.left_bottom
        }
    }

    /// Low step ahead: the leading lower ray hits, the upper one does not.
    pub fn leading_step(&self, facing_right: bool) -> bool {
        if facing_right {
            self.right_bottom && !self.right_top
        } else {
            self.left_bottom && !self.left_top
        }
    }

    /// Either upper side ray hits.
    pub fn side_top_blocked(&self) -> bool {
        self.left_top || self.right_top
    }
}

/// Base ray reach per direction, in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeDistances {
    pub bottom: f32,
    pub top: f32,
    pub left: f32,
    pub right: f32,
}

impl Default for ProbeDistances {
    fn default() -> Self {
        Self {
            bottom: 0.1,
            top: 0.1,
            left: 0.1,
            right: 0.1,
        }
    }
}

/// Multipliers applied to [`ProbeDistances`]. All 1.0 unless a state stretches one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeLengths {
    pub bottom: f32,
    pub top: f32,
    pub left: f32,
    pub right: f32,
}

impl Default for ProbeLengths {
    fn default() -> Self {
        Self {
            bottom: 1.0,
            top: 1.0,
            left: 1.0,
            right: 1.0,
        }
    }
}

/// A ray cast during the last refresh, kept for debug drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeRay {
    pub origin: Vec2,
    pub direction: Vec2,
    pub distance: f32,
    pub hit: bool,
}

impl ProbeRay {
    pub fn end(&self) -> Vec2 {
        self.origin + self.direction.normalize_or_zero() * self.distance
    }
}

#[derive(Debug, Clone)]
pub struct CollisionProbe {
    distances: ProbeDistances,
    lengths: ProbeLengths,
    contacts: ContactSet,
    generation: u64,
    draw_debug_rays: bool,
    debug_rays: Vec<ProbeRay>,
}

impl CollisionProbe {
    pub fn new(distances: ProbeDistances, draw_debug_rays: bool) -> Self {
        Self {
            distances,
            lengths: ProbeLengths::default(),
            contacts: ContactSet::default(),
            generation: 0,
            draw_debug_rays,
            debug_rays: Vec::new(),
        }
    }

    pub fn contacts(&self) -> ContactSet {
        self.contacts
    }

    pub fn lengths(&self) -> ProbeLengths {
        self.lengths
    }

    /// Number of refreshes so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn set_top_length(&mut self, length: f32) {
        self.lengths.top = length;
    }

    pub fn reset_top_length(&mut self) {
        self.lengths.top = ProbeLengths::default().top;
    }

    pub fn debug_rays(&self) -> &[ProbeRay] {
        &self.debug_rays
    }

    pub fn draws_debug_rays(&self) -> bool {
        self.draw_debug_rays
    }

    /// Re-cast all six zones from `bounds` and replace the stored contacts.
    pub fn refresh(&mut self, bounds: Aabb, caster: &impl Raycaster) -> ContactSet {
        self.debug_rays.clear();

        let bottom_reach = self.distances.bottom * self.lengths.bottom;
        let top_reach = self.distances.top * self.lengths.top;
        let left_reach = self.distances.left * self.lengths.left;
        let right_reach = self.distances.right * self.lengths.right;

        let (min, max) = (bounds.min, bounds.max);
        let left_x = min.x + CORNER_INSET;
        let right_x = max.x - CORNER_INSET;
        let low_y = min.y + CORNER_INSET;
        let high_y = max.y - CORNER_INSET;

        let bottom_left = self.cast(caster, Vec2::new(left_x, min.y - PROBE_SKIN), Vec2::NEG_Y, bottom_reach);
        let bottom_right = self.cast(caster, Vec2::new(right_x, min.y - PROBE_SKIN), Vec2::NEG_Y, bottom_reach);
        let top_left = self.cast(caster, Vec2::new(left_x, max.y + PROBE_SKIN), Vec2::Y, top_reach);
        let top_right = self.cast(caster, Vec2::new(right_x, max.y + PROBE_SKIN), Vec2::Y, top_reach);
        let left_bottom = self.cast(caster, Vec2::new(min.x - PROBE_SKIN, low_y), Vec2::NEG_X, left_reach);
        let left_top = self.cast(caster, Vec2::new(min.x - PROBE_SKIN, high_y), Vec2::NEG_X, left_reach);
        let right_bottom = self.cast(caster, Vec2::new(max.x + PROBE_SKIN, low_y), Vec2::X, right_reach);
        let right_top = self.cast(caster, Vec2::new(max.x + PROBE_SKIN, high_y), Vec2::X, right_reach);

        self.contacts = ContactSet {
            bottom: bottom_left || bottom_right,
            top: top_left || top_right,
            left_bottom,
            left_top,
            right_bottom,
            right_top,
        };
        self.generation += 1;
        self.contacts
    }

    fn cast(&mut self, caster: &impl Raycaster, origin: Vec2, direction: Vec2, distance: f32) -> bool {
        let hit = cast_ray(caster, origin, direction, distance).is_some();
        if self.draw_debug_rays {
            self.debug_rays.push(ProbeRay {
                origin,
                direction,
                distance,
                hit,
            });
        }
        hit
    }
}
