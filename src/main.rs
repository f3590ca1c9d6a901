use avian2d::prelude::*;
use bevy::prelude::*;

use avatar_motion::analysis::AnalysisPlugin;
use avatar_motion::avatar::{AvatarPlugin, DEFAULT_FIXED_STEP};

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Avatar Motion".to_string(),
            resolution: (1280, 720).into(),
            resizable: true,
            ..default()
        }),
        ..default()
    }))
    .add_plugins(PhysicsPlugins::default())
    .insert_resource(Gravity(Vec2::NEG_Y * 9.81))
    .insert_resource(Time::<Fixed>::from_seconds(DEFAULT_FIXED_STEP as f64))
    .add_plugins((AvatarPlugin, AnalysisPlugin));

    #[cfg(feature = "dev-tools")]
    app.add_plugins(avatar_motion::level::LevelPlugin);

    app.run();
}
