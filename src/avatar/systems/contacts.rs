//! Avatar domain: fixed-step contact probing against the physics world.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::avatar::{AvatarController, GameLayer};
use crate::probe::{ColliderHandle, Raycaster};

/// [`Raycaster`] backed by avian's spatial query, limited to a set of layers.
pub struct SpatialRaycaster<'a, 'w, 's> {
    spatial_query: &'a SpatialQuery<'w, 's>,
    filter: SpatialQueryFilter,
}

impl<'a, 'w, 's> SpatialRaycaster<'a, 'w, 's> {
    pub fn new(spatial_query: &'a SpatialQuery<'w, 's>, mask: impl Into<LayerMask>) -> Self {
        Self {
            spatial_query,
            filter: SpatialQueryFilter::from_mask(mask),
        }
    }

    /// Only the layers an avatar stands on or runs into.
    pub fn terrain(spatial_query: &'a SpatialQuery<'w, 's>) -> Self {
        Self::new(spatial_query, [GameLayer::Ground, GameLayer::Wall])
    }
}

impl Raycaster for SpatialRaycaster<'_, '_, '_> {
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<ColliderHandle> {
        let direction = Dir2::new(direction).ok()?;
        self.spatial_query
            .cast_ray(origin, direction, max_distance, true, &self.filter)
            .map(|hit| ColliderHandle(hit.entity.to_bits()))
    }
}

pub(crate) fn refresh_contacts(
    spatial_query: SpatialQuery,
    mut avatars: Query<(&mut AvatarController, &Transform, &LinearVelocity)>,
) {
    let caster = SpatialRaycaster::terrain(&spatial_query);

    for (mut controller, transform, velocity) in &mut avatars {
        let was_grounded = controller.is_grounded();
        {
            let body = controller.body_mut();
            body.position = transform.translation.truncate();
            body.velocity = velocity.0;
        }
        controller.on_fixed_tick(&caster);

        let grounded = controller.is_grounded();
        if grounded != was_grounded {
            debug!(
                "Avatar grounded={}, dash_charges={}",
                grounded,
                controller.dash_charges().remaining()
            );
        }
    }
}
