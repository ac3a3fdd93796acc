//! Projectile plugin.

use bevy::prelude::*;

use super::systems;
use crate::combat::CombatSet;

/// Arrows, bolts, the boss's axe and chain, and thrown vials.
pub struct ProjectilePlugin;

impl Plugin for ProjectilePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                systems::fly_arrows,
                systems::follow_anchors,
                systems::fly_axes,
                systems::update_chains,
                systems::fly_vials,
            )
                .chain()
                .in_set(CombatSet::Think),
        );
    }
}
