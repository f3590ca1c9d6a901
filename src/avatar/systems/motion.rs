//! Avatar domain: per-frame controller drive and pose write-back.

use avian2d::prelude::*;
use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::avatar::{
    AvatarCollider, AvatarController, AvatarInput, AvatarParts, AvatarVisual, PlayClip,
};

/// Run one variable-rate step per avatar, then hand velocity and gravity back to physics.
pub(crate) fn drive_avatars(
    time: Res<Time>,
    input: Res<AvatarInput>,
    mut clips: MessageWriter<PlayClip>,
    mut avatars: Query<(
        Entity,
        &mut AvatarController,
        &Transform,
        &mut LinearVelocity,
        &mut GravityScale,
    )>,
) {
    let dt = time.delta_secs();
    let mut requested: Vec<&'static str> = Vec::new();

    for (entity, mut controller, transform, mut velocity, mut gravity) in &mut avatars {
        {
            let body = controller.body_mut();
            body.position = transform.translation.truncate();
            body.velocity = velocity.0;
        }

        requested.clear();
        controller.on_tick(input.as_ref(), dt, &mut requested);
        for &clip in &requested {
            clips.write(PlayClip { entity, clip });
        }

        let body = controller.body();
        velocity.0 = body.velocity;
        gravity.0 = body.gravity_scale;
    }
}

/// Mirror the collider pose and facing onto the child entities.
pub(crate) fn apply_avatar_pose(
    avatars: Query<(&AvatarController, &AvatarParts)>,
    mut colliders: Query<&mut Transform, (With<AvatarCollider>, Without<AvatarVisual>)>,
    mut visuals: Query<&mut Transform, (With<AvatarVisual>, Without<AvatarCollider>)>,
) {
    for (controller, parts) in &avatars {
        let pose = controller.collider_pose();

        if let Ok(mut transform) = colliders.get_mut(parts.collider) {
            transform.translation = pose.local_position.extend(transform.translation.z);
            transform.scale = pose.local_scale.extend(1.0);
        }

        if let Ok(mut transform) = visuals.get_mut(parts.visual) {
            let scale = controller.visual_scale() * pose.local_scale;
            transform.translation = pose.local_position.extend(transform.translation.z);
            transform.scale = scale.extend(1.0);
        }
    }
}
