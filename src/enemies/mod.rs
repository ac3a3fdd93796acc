//! Enemies module - grunt and boss AI, perception and spawning.

mod brain;
mod components;
mod elite;
mod grunt;
pub mod perception;
mod plugin;
mod spawning;
mod systems;

pub use brain::{AiFrame, AiPhase, Behavior, EnemyBrain, EnemyCommand, EnemyTimer, Profile};
pub use components::*;
pub use elite::EliteState;
pub use plugin::EnemyPlugin;
pub use spawning::{spawn_elite, spawn_grunt, BodySize};
