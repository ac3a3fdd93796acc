//! Enemy plugin - registers all enemy systems.

use bevy::prelude::*;

use super::systems;
use crate::combat::CombatSet;

/// Enemy plugin - handles AI decisions, steering and command dispatch.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (systems::tick_enemies, systems::steer_agents)
                .chain()
                .in_set(CombatSet::Think),
        )
        .add_systems(
            Update,
            (systems::dispatch_enemy_commands, systems::despawn_corpses)
                .chain()
                .in_set(CombatSet::Feedback),
        );
    }
}
