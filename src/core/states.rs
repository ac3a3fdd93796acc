//! Game state definitions that control the overall flow of the session.
//!
//! Combat, AI and projectiles only run in `InGame`; pausing freezes every
//! actor clock because their schedulers advance from gameplay systems.

use bevy::prelude::*;

/// Main game states.
///
/// - Start in `Loading` while the arena config is read
/// - `InGame` once the arena has been spawned
/// - `Paused` freezes gameplay but keeps the world visible
/// - `GameOver` when the player dies; restarting respawns the arena
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Initial state - loading data files
    #[default]
    Loading,
    /// Active gameplay
    InGame,
    /// Game is paused (overlay on gameplay)
    Paused,
    /// Player has died
    GameOver,
}
