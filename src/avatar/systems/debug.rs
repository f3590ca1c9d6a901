//! Avatar domain: probe ray gizmos for dev builds.

use bevy::prelude::*;

use crate::avatar::AvatarController;

pub(crate) fn draw_probe_rays(mut gizmos: Gizmos, avatars: Query<&AvatarController>) {
    let hit_color = Color::srgb(0.9, 0.3, 0.2);
    let miss_color = Color::srgb(0.3, 0.8, 0.4);

    for controller in &avatars {
        let probe = controller.probe();
        if !probe.draws_debug_rays() {
            continue;
        }
        for ray in probe.debug_rays() {
            let color = if ray.hit { hit_color } else { miss_color };
            gizmos.line_2d(ray.origin, ray.end(), color);
        }
    }
}
