//! Combat plugin - damage routing and body integration.

use bevy::prelude::*;

use super::systems;

/// Combat plugin - owns the [`systems::CombatSet`] ordering every actor plugin slots into.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        systems::setup_combat_systems(app);
    }
}
