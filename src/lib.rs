//! Movement and state core for a 2D platformer avatar.

pub mod analysis;
pub mod avatar;
#[cfg(feature = "dev-tools")]
pub mod level;
pub mod probe;
pub mod timers;
