//! Avatar domain: keyboard sampling into the input collaborator.

use bevy::prelude::*;

use crate::avatar::{InputAxis, InputButton, InputFrame, InputSource};

/// Input for the current frame, rebuilt from the keyboard every `Update`.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct AvatarInput {
    pub frame: InputFrame,
}

impl AvatarInput {
    /// WASD moves, arrow keys aim, Space jumps, Left Shift dashes, E analyzes.
    pub fn from_keyboard(keyboard: &ButtonInput<KeyCode>) -> Self {
        let axis = |negative: KeyCode, positive: KeyCode| {
            let mut value = 0.0;
            if keyboard.pressed(negative) {
                value -= 1.0;
            }
            if keyboard.pressed(positive) {
                value += 1.0;
            }
            value
        };

        Self {
            frame: InputFrame {
                movement: Vec2::new(
                    axis(KeyCode::KeyA, KeyCode::KeyD),
                    axis(KeyCode::KeyS, KeyCode::KeyW),
                ),
                aim: Vec2::new(
                    axis(KeyCode::ArrowLeft, KeyCode::ArrowRight),
                    axis(KeyCode::ArrowDown, KeyCode::ArrowUp),
                ),
                jump_pressed: keyboard.just_pressed(KeyCode::Space),
                dash_pressed: keyboard.just_pressed(KeyCode::ShiftLeft),
                analyze_pressed: keyboard.just_pressed(KeyCode::KeyE),
                jump_held: keyboard.pressed(KeyCode::Space),
                dash_held: keyboard.pressed(KeyCode::ShiftLeft),
                analyze_held: keyboard.pressed(KeyCode::KeyE),
            },
        }
    }
}

impl InputSource for AvatarInput {
    fn axis(&self, axis: InputAxis) -> f32 {
        self.frame.axis(axis)
    }

    fn button_down(&self, button: InputButton) -> bool {
        self.frame.button_down(button)
    }

    fn button_held(&self, button: InputButton) -> bool {
        self.frame.button_held(button)
    }
}

pub(crate) fn read_input(keyboard: Res<ButtonInput<KeyCode>>, mut input: ResMut<AvatarInput>) {
    *input = AvatarInput::from_keyboard(&keyboard);
}
