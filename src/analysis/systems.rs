//! Analysis domain: aim-ray analysis against the physics world.

use avian2d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::analysis::{Analyzable, AnalysisCompleted, Analyzer};
use crate::avatar::{AvatarInput, GameLayer, SpatialRaycaster};
use crate::probe::ColliderHandle;

pub(crate) fn run_analyzers(
    time: Res<Time>,
    input: Res<AvatarInput>,
    spatial_query: SpatialQuery,
    analyzables: Query<&Analyzable>,
    mut analyzers: Query<(Entity, &mut Analyzer, &Transform)>,
    mut completed: MessageWriter<AnalysisCompleted>,
) {
    let caster = SpatialRaycaster::new(
        &spatial_query,
        [GameLayer::Ground, GameLayer::Wall, GameLayer::Sensor],
    );
    let dt = time.delta_secs();
    let is_analyzable = |handle: ColliderHandle| analyzables.contains(Entity::from_bits(handle.0));

    for (entity, mut analyzer, transform) in &mut analyzers {
        let origin = transform.translation.truncate();
        let Some(handle) = analyzer.update(input.as_ref(), origin, dt, &caster, is_analyzable)
        else {
            continue;
        };

        let target = Entity::from_bits(handle.0);
        if let Ok(analyzable) = analyzables.get(target) {
            completed.write(AnalysisCompleted {
                analyzer: entity,
                target,
                message: analyzable.message.clone(),
            });
        }
    }
}

pub(crate) fn log_analyses(mut completed: MessageReader<AnalysisCompleted>) {
    for analysis in completed.read() {
        info!(
            "Analysis of {:?} complete: {}",
            analysis.target, analysis.message
        );
    }
}
