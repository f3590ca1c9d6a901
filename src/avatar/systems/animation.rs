//! Avatar domain: clip requests turned into the current clip per avatar.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::avatar::{CurrentClip, PlayClip};

pub(crate) fn play_clips(mut requests: MessageReader<PlayClip>, mut clips: Query<&mut CurrentClip>) {
    for request in requests.read() {
        let Ok(mut current) = clips.get_mut(request.entity) else {
            warn!("Clip '{}' requested for missing avatar {:?}", request.clip, request.entity);
            continue;
        };
        debug!("Avatar {:?} plays '{}'", request.entity, request.clip);
        current.0 = Some(request.clip);
    }
}
