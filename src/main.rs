//! Reach of Judgement - Entry Point
//!
//! Controls:
//! - WASD: Move
//! - Mouse: Look around
//! - Shift: Sprint
//! - C / Ctrl: Crouch
//! - Space: Jump (double-tap to roll)
//! - Left click: Melee, or shoot while aiming
//! - Right click: Aim the bow
//! - Q: Crossbow quick shot
//! - F: Throw a vial
//! - E: Toggle bow
//! - Escape: Pause/Unpause
//! - R: Restart after death

use bevy::prelude::*;
use bevy_kira_audio::AudioPlugin;
use bevy_rapier3d::prelude::*;

fn main() {
    App::new()
        // Bevy default plugins; kira replaces bevy's own audio
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Reach of Judgement".to_string(),
                        resolution: (1280.0, 720.0).into(),
                        ..default()
                    }),
                    ..default()
                })
                .disable::<bevy::audio::AudioPlugin>(),
        )
        .add_plugins(AudioPlugin)

        // Physics, in centimetres
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().with_length_unit(100.0))

        // Our game plugin
        .add_plugins(reach_of_judgement::JudgementPlugin)

        .run();
}
