//! Probe domain: axis-aligned boxes and a standalone raycaster over static boxes.

use bevy::math::Vec2;

use super::{ColliderHandle, Raycaster};

const PARALLEL_EPSILON: f32 = 1e-8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Slab test. Returns the distance along `dir` (unit length) to the first
    /// point inside the box, or 0.0 when `origin` already is inside.
    pub fn ray_distance(&self, origin: Vec2, dir: Vec2) -> Option<f32> {
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        for axis in 0..2 {
            let (o, d, lo, hi) = (origin[axis], dir[axis], self.min[axis], self.max[axis]);
            if d.abs() < PARALLEL_EPSILON {
                // Parallel to this slab: either always inside it or never
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let t1 = (lo - o) * inv;
            let t2 = (hi - o) * inv;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
        }

        if t_max < 0.0 || t_min > t_max {
            return None;
        }
        Some(t_min.max(0.0))
    }
}

/// Raycaster over a fixed list of boxes, for hosts without a physics engine.
#[derive(Debug, Clone, Default)]
pub struct StaticGeometry {
    solids: Vec<(ColliderHandle, Aabb)>,
}

impl StaticGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_box(mut self, handle: u64, aabb: Aabb) -> Self {
        self.add_box(handle, aabb);
        self
    }

    pub fn add_box(&mut self, handle: u64, aabb: Aabb) {
        self.solids.push((ColliderHandle(handle), aabb));
    }
}

impl Raycaster for StaticGeometry {
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<ColliderHandle> {
        let dir = direction.normalize_or_zero();
        if dir == Vec2::ZERO {
            return None;
        }

        self.solids
            .iter()
            .filter_map(|(handle, aabb)| {
                aabb.ray_distance(origin, dir)
                    .filter(|t| *t <= max_distance)
                    .map(|t| (*handle, t))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(handle, _)| handle)
    }
}
