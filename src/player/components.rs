//! Player-related components.

use bevy::prelude::*;

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Camera pivot that follows the player and carries the look pitch.
#[derive(Component, Default)]
pub struct PlayerCamera {
    /// Current pitch angle in radians (looking up/down)
    pub pitch: f32,
}

/// Marker for the camera used for screen-space aiming.
#[derive(Component)]
pub struct MainCamera;

