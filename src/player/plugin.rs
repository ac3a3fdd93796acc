//! Player plugin - input, camera, combat state and command dispatch.

use bevy::prelude::*;

use super::movement;
use super::systems;
use crate::combat::CombatSet;

/// Player plugin - handles player input, combat ticking and camera.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        // Cursor capture
        movement::setup_movement_systems(app);

        app.add_systems(
            Update,
            (movement::mouse_look, movement::player_input)
                .chain()
                .in_set(CombatSet::Input),
        )
        .add_systems(
            Update,
            (systems::tick_player, systems::player_melee)
                .chain()
                .in_set(CombatSet::Think),
        )
        .add_systems(
            Update,
            systems::dispatch_player_commands.in_set(CombatSet::Feedback),
        );
    }
}
