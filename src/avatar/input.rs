//! Avatar domain: the input collaborator and the per-frame input snapshot.

use bevy::math::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAxis {
    Horizontal,
    Vertical,
    HorizontalDirection,
    VerticalDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputButton {
    Jump,
    Dash,
    Analyze,
}

/// Normalized input values, polled once per frame.
pub trait InputSource {
    /// Axis value in `[-1, 1]`.
    fn axis(&self, axis: InputAxis) -> f32;
    /// True only on the frame the button went down.
    fn button_down(&self, button: InputButton) -> bool;
    /// True while the button is held.
    fn button_held(&self, button: InputButton) -> bool;
}

/// Snapshot of everything the avatar reads from input in one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    /// Horizontal / Vertical axes.
    pub movement: Vec2,
    /// HorizontalDirection / VerticalDirection axes.
    pub aim: Vec2,
    /// Went down this frame.
    pub jump_pressed: bool,
    pub dash_pressed: bool,
    pub analyze_pressed: bool,
    /// Down this frame, whether or not it was pressed earlier.
    pub jump_held: bool,
    pub dash_held: bool,
    pub analyze_held: bool,
}

impl InputFrame {
    pub fn sample(source: &impl InputSource) -> Self {
        let axis = |a| source.axis(a).clamp(-1.0, 1.0);
        Self {
            movement: Vec2::new(axis(InputAxis::Horizontal), axis(InputAxis::Vertical)),
            aim: Vec2::new(
                axis(InputAxis::HorizontalDirection),
                axis(InputAxis::VerticalDirection),
            ),
            jump_pressed: source.button_down(InputButton::Jump),
            dash_pressed: source.button_down(InputButton::Dash),
            analyze_pressed: source.button_down(InputButton::Analyze),
            jump_held: source.button_held(InputButton::Jump),
            dash_held: source.button_held(InputButton::Dash),
            analyze_held: source.button_held(InputButton::Analyze),
        }
    }

    pub fn moving(x: f32) -> Self {
        Self {
            movement: Vec2::new(x, 0.0),
            ..Self::default()
        }
    }

    pub fn with_movement(mut self, movement: Vec2) -> Self {
        self.movement = movement;
        self
    }

    pub fn with_aim(mut self, aim: Vec2) -> Self {
        self.aim = aim;
        self
    }

    /// Jump pressed this frame, which also counts as held.
    pub fn with_jump(mut self) -> Self {
        self.jump_pressed = true;
        self.jump_held = true;
        self
    }

    pub fn with_dash(mut self) -> Self {
        self.dash_pressed = true;
        self.dash_held = true;
        self
    }

    /// Analyze held down since an earlier frame.
    pub fn with_analyze(mut self) -> Self {
        self.analyze_held = true;
        self
    }

    /// Horizontal movement collapsed to -1, 0 or 1.
    pub fn horizontal_sign(&self) -> f32 {
        axis_sign(self.movement.x)
    }
}

impl InputSource for InputFrame {
    fn axis(&self, axis: InputAxis) -> f32 {
        match axis {
            InputAxis::Horizontal => self.movement.x,
            InputAxis::Vertical => self.movement.y,
            InputAxis::HorizontalDirection => self.aim.x,
            InputAxis::VerticalDirection => self.aim.y,
        }
    }

    fn button_down(&self, button: InputButton) -> bool {
        match button {
            InputButton::Jump => self.jump_pressed,
            InputButton::Dash => self.dash_pressed,
            InputButton::Analyze => self.analyze_pressed,
        }
    }

    fn button_held(&self, button: InputButton) -> bool {
        match button {
            InputButton::Jump => self.jump_held,
            InputButton::Dash => self.dash_held,
            InputButton::Analyze => self.analyze_held,
        }
    }
}

fn axis_sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
