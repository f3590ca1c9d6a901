//! Avatar domain: system modules wiring the controller into the ECS.

pub(crate) mod animation;
pub(crate) mod contacts;
#[cfg(feature = "dev-tools")]
pub(crate) mod debug;
pub(crate) mod input;
pub(crate) mod motion;

pub(crate) use animation::play_clips;
pub(crate) use contacts::refresh_contacts;
pub use contacts::SpatialRaycaster;
#[cfg(feature = "dev-tools")]
pub(crate) use debug::draw_probe_rays;
pub use input::AvatarInput;
pub(crate) use input::read_input;
pub(crate) use motion::{apply_avatar_pose, drive_avatars};
