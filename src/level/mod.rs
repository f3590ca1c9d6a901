//! Level domain: a hand-built test room for dev builds.
//!
//! Units are meters. The room holds one of everything the avatar reacts to: flat
//! floor, a low step to hop, an overhang to crawl under and a readable sign.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::analysis::Analyzable;
use crate::avatar::{GameLayer, Ground, Wall};

/// World units to pixels for the dev camera.
const PIXELS_PER_UNIT: f32 = 48.0;

pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_camera, spawn_test_room));
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scale: 1.0 / PIXELS_PER_UNIT,
            ..OrthographicProjection::default_2d()
        }),
        Transform::from_xyz(0.0, 3.0, 0.0),
    ));
}

fn spawn_test_room(mut commands: Commands) {
    let wall_color = Color::srgb(0.3, 0.3, 0.4);
    let ground_color = Color::srgb(0.4, 0.5, 0.4);
    let step_color = Color::srgb(0.5, 0.4, 0.3);

    let ground_layers = CollisionLayers::new(GameLayer::Ground, [GameLayer::Avatar]);
    let wall_layers = CollisionLayers::new(GameLayer::Wall, [GameLayer::Avatar]);

    // Floor, top surface at y = 0
    commands.spawn((
        Ground,
        block(ground_color, Vec2::new(0.0, -0.5), Vec2::new(24.0, 1.0)),
        ground_layers,
    ));

    // Side walls
    for x in [-12.5, 12.5] {
        commands.spawn((
            Wall,
            block(wall_color, Vec2::new(x, 4.0), Vec2::new(1.0, 10.0)),
            wall_layers,
        ));
    }

    // Step low enough to hop
    commands.spawn((
        Ground,
        block(step_color, Vec2::new(1.5, 0.3), Vec2::new(3.0, 0.6)),
        ground_layers,
    ));

    // Overhang, underside at y = 1.2
    commands.spawn((
        Wall,
        block(wall_color, Vec2::new(7.0, 1.7), Vec2::new(4.0, 1.0)),
        wall_layers,
    ));

    // Readable sign
    commands.spawn((
        Analyzable::new("Hold E and aim with the arrow keys to read signs."),
        Sprite {
            color: Color::srgb(0.8, 0.7, 0.3),
            custom_size: Some(Vec2::new(0.6, 1.2)),
            ..default()
        },
        Transform::from_xyz(-8.0, 0.6, -1.0),
        RigidBody::Static,
        Collider::rectangle(0.6, 1.2),
        Sensor,
        CollisionLayers::new(GameLayer::Sensor, [GameLayer::Avatar]),
    ));
}

fn block(color: Color, center: Vec2, size: Vec2) -> impl Bundle {
    (
        Sprite {
            color,
            custom_size: Some(size),
            ..default()
        },
        Transform::from_translation(center.extend(0.0)),
        RigidBody::Static,
        Collider::rectangle(size.x, size.y),
    )
}
