//! Analysis domain: hold the Analyze button while aiming at something to read it.
//!
//! Holding time only accumulates while the aim ray keeps landing on the same
//! analyzable collider. Releasing the button, missing, or hitting anything else
//! starts the count over.

mod systems;


use bevy::ecs::message::Message;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::avatar::{AvatarSet, InputAxis, InputButton, InputSource};
use crate::probe::{ColliderHandle, Raycaster, cast_ray};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerTuning {
    /// Reach of the aim ray, in world units.
    pub ray_distance: f32,
    /// Seconds the button must stay held on one target.
    pub analysis_duration: f32,
}

impl Default for AnalyzerTuning {
    fn default() -> Self {
        Self {
            ray_distance: 3.0,
            analysis_duration: 1.0,
        }
    }
}

#[derive(Component, Debug, Clone)]
pub struct Analyzer {
    tuning: AnalyzerTuning,
    held_time: f32,
    target: Option<ColliderHandle>,
}

impl Analyzer {
    pub fn new(tuning: AnalyzerTuning) -> Self {
        Self {
            tuning,
            held_time: 0.0,
            target: None,
        }
    }

    pub fn tuning(&self) -> AnalyzerTuning {
        self.tuning
    }

    pub fn held_time(&self) -> f32 {
        self.held_time
    }

    /// Collider currently being held on, if any.
    pub fn target(&self) -> Option<ColliderHandle> {
        self.target
    }

    /// Advance by one frame. Returns the target once it has been held on for longer
    /// than the analysis duration.
    pub fn update(
        &mut self,
        input: &impl InputSource,
        origin: Vec2,
        dt: f32,
        caster: &impl Raycaster,
        is_analyzable: impl Fn(ColliderHandle) -> bool,
    ) -> Option<ColliderHandle> {
        if !input.button_held(InputButton::Analyze) {
            self.reset();
            return None;
        }

        let aim = Vec2::new(
            input.axis(InputAxis::HorizontalDirection),
            input.axis(InputAxis::VerticalDirection),
        );
        let hit = cast_ray(caster, origin, aim, self.tuning.ray_distance)
            .filter(|&handle| is_analyzable(handle));
        let Some(hit) = hit else {
            self.reset();
            return None;
        };

        if self.target != Some(hit) {
            self.held_time = 0.0;
            self.target = Some(hit);
        }
        self.held_time += dt;

        if self.held_time > self.tuning.analysis_duration {
            self.reset();
            return Some(hit);
        }
        None
    }

    pub fn reset(&mut self) {
        self.held_time = 0.0;
        self.target = None;
    }
}

/// Something that can be read with an [`Analyzer`].
#[derive(Component, Debug, Clone)]
pub struct Analyzable {
    pub message: String,
}

impl Analyzable {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Fired when an analyzer finishes reading a target
#[derive(Debug, Clone)]
pub struct AnalysisCompleted {
    pub analyzer: Entity,
    pub target: Entity,
    pub message: String,
}

impl Message for AnalysisCompleted {}

pub struct AnalysisPlugin;

impl Plugin for AnalysisPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<AnalysisCompleted>().add_systems(
            Update,
            (systems::run_analyzers, systems::log_analyses)
                .chain()
                .after(AvatarSet::Drive),
        );
    }
}
