//! Enemy-related components.

use bevy::prelude::*;

/// Marker component for all enemies.
#[derive(Component)]
pub struct Enemy;

/// Equipment the boss carries as child entities and can lose.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gear {
    Shield,
    Axe,
}

/// Timer for the ragdoll pose before despawn.
#[derive(Component)]
pub struct Corpse(pub Timer);

impl Default for Corpse {
    fn default() -> Self {
        Self(Timer::from_seconds(4.0, TimerMode::Once))
    }
}
