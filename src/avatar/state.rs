//! Avatar domain: the behaviour states an avatar moves between.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AvatarState {
    /// Standing still.
    #[default]
    Idle,
    /// Moving along the ground at move speed.
    Walk,
    /// Airborne after a standing jump, with full horizontal control.
    Jump,
    /// Control-locked micro-jump used to mount a low step.
    Hop,
    /// Fixed-duration, gravity-free burst.
    Dash,
    /// Stationary under a low ceiling.
    Crouch,
    /// Moving under a low ceiling with a shrunken collider.
    Crawl,
}

impl AvatarState {
    pub const ALL: [AvatarState; 7] = [
        AvatarState::Idle,
        AvatarState::Walk,
        AvatarState::Jump,
        AvatarState::Hop,
        AvatarState::Dash,
        AvatarState::Crouch,
        AvatarState::Crawl,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            AvatarState::Idle => "Idle",
            AvatarState::Walk => "Walk",
            AvatarState::Jump => "Jump",
            AvatarState::Hop => "Hop",
            AvatarState::Dash => "Dash",
            AvatarState::Crouch => "Crouch",
            AvatarState::Crawl => "Crawl",
        }
    }

    /// Animation clip played on entry. Clips share the state names.
    pub const fn clip(self) -> &'static str {
        self.name()
    }

    /// States in which jump and dash input are ignored.
    pub const fn blocks_actions(self) -> bool {
        matches!(
            self,
            AvatarState::Hop | AvatarState::Crouch | AvatarState::Crawl | AvatarState::Dash
        )
    }
}

impl fmt::Display for AvatarState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
