//! Avatar domain: data-driven tuning loaded from RON at startup.

use std::fs;
use std::path::Path;

use bevy::prelude::*;
use ron::Options;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::AnalyzerTuning;
use crate::probe::ProbeDistances;

pub const DEFAULT_TUNING_PATH: &str = "assets/data/avatar.ron";

/// Which input axes pick the dash direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DashAim {
    /// HorizontalDirection / VerticalDirection.
    #[default]
    Aim,
    /// Horizontal / Vertical.
    Movement,
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarTuning {
    pub move_speed: f32,
    pub jump_force: f32,
    pub hop_force: f32,
    pub dash_force: f32,
    pub dash_duration: f32,
    pub dash_recovery_duration: f32,
    pub max_dash_charges: u32,
    /// Height factor applied to the collider while crawling.
    pub crouch_collider_scale: f32,
    /// Collider local position while crawling.
    pub crouch_pivot: [f32; 2],
    /// Unscaled collider width and height.
    pub collider_size: [f32; 2],
    pub probe_distances: ProbeDistances,
    /// Top probe multiplier while crawling, so the ceiling is seen before standing up.
    pub crawl_top_probe_length: f32,
    pub draw_debug_rays: bool,
    pub gravity_scale: f32,
    pub mass: f32,
    /// Seconds a force acts for when turned into a velocity change.
    pub force_step: f32,
    pub hop_enabled: bool,
    pub crawl_enabled: bool,
    pub dash_aim: DashAim,
    pub analyzer: AnalyzerTuning,
}

impl Default for AvatarTuning {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            jump_force: 600.0,
            hop_force: 525.0,
            dash_force: 850.0,
            dash_duration: 0.3,
            dash_recovery_duration: 0.1,
            max_dash_charges: 1,
            crouch_collider_scale: 0.5,
            crouch_pivot: [0.0, -0.5],
            collider_size: [1.0, 2.0],
            probe_distances: ProbeDistances::default(),
            crawl_top_probe_length: 11.0,
            draw_debug_rays: false,
            gravity_scale: 1.0,
            mass: 2.0,
            force_step: 0.02,
            hop_enabled: true,
            crawl_enabled: true,
            dash_aim: DashAim::Aim,
            analyzer: AnalyzerTuning::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid tuning field '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Create RON options with extensions enabled for more flexible parsing.
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

impl AvatarTuning {
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let file_name = path.display().to_string();
        let contents = fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: file_name.clone(),
            source,
        })?;
        Self::parse(&file_name, &contents)
    }

    pub fn from_ron_str(contents: &str) -> Result<Self, TuningError> {
        Self::parse("<inline>", contents)
    }

    fn parse(file_name: &str, contents: &str) -> Result<Self, TuningError> {
        ron_options()
            .from_str(contents)
            .map_err(|source| TuningError::Parse {
                path: file_name.to_string(),
                source,
            })
    }

    /// Check value ranges. Returns every problem found, empty when valid.
    pub fn validate(&self) -> Vec<TuningError> {
        let mut errors = Vec::new();

        macro_rules! check {
            ($cond:expr, $field:literal, $reason:expr) => {
                if !$cond {
                    errors.push(TuningError::Invalid {
                        field: $field,
                        reason: $reason.to_string(),
                    });
                }
            };
        }

        check!(self.move_speed >= 0.0, "move_speed", "must not be negative");
        check!(self.jump_force.is_finite(), "jump_force", "must be finite");
        check!(self.hop_force.is_finite(), "hop_force", "must be finite");
        check!(self.dash_force.is_finite(), "dash_force", "must be finite");
        check!(self.dash_duration > 0.0, "dash_duration", "must be positive");
        check!(
            self.dash_recovery_duration >= 0.0,
            "dash_recovery_duration",
            "must not be negative"
        );
        check!(
            self.crouch_collider_scale > 0.0 && self.crouch_collider_scale <= 1.0,
            "crouch_collider_scale",
            format!("must be in (0, 1], got {}", self.crouch_collider_scale)
        );
        check!(
            self.collider_size[0] > 0.0 && self.collider_size[1] > 0.0,
            "collider_size",
            "both extents must be positive"
        );
        let d = self.probe_distances;
        check!(
            d.bottom >= 0.0 && d.top >= 0.0 && d.left >= 0.0 && d.right >= 0.0,
            "probe_distances",
            "must not be negative"
        );
        check!(
            self.crawl_top_probe_length >= 1.0,
            "crawl_top_probe_length",
            "must be at least 1.0"
        );
        check!(self.gravity_scale.is_finite(), "gravity_scale", "must be finite");
        check!(self.mass > 0.0, "mass", "must be positive");
        check!(self.force_step > 0.0, "force_step", "must be positive");
        check!(
            self.analyzer.ray_distance >= 0.0,
            "analyzer.ray_distance",
            "must not be negative"
        );
        check!(
            self.analyzer.analysis_duration >= 0.0,
            "analyzer.analysis_duration",
            "must not be negative"
        );

        errors
    }

    pub fn collider_size(&self) -> Vec2 {
        Vec2::from(self.collider_size)
    }

    pub fn crouch_pivot(&self) -> Vec2 {
        Vec2::from(self.crouch_pivot)
    }
}

/// Load tuning from `path`, falling back to defaults on any load or validation error.
pub fn load_tuning_or_default(path: &Path) -> AvatarTuning {
    let tuning = match AvatarTuning::load(path) {
        Ok(tuning) => tuning,
        Err(e) => {
            warn!("{}; using default avatar tuning", e);
            return AvatarTuning::default();
        }
    };

    let errors = tuning.validate();
    if !errors.is_empty() {
        for error in &errors {
            warn!("{}", error);
        }
        warn!(
            "{} invalid field(s) in {}; using default avatar tuning",
            errors.len(),
            path.display()
        );
        return AvatarTuning::default();
    }

    info!(
        "Loaded avatar tuning from {}: move_speed={}, max_dash_charges={}",
        path.display(),
        tuning.move_speed,
        tuning.max_dash_charges
    );
    tuning
}
