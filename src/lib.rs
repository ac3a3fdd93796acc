//! Reach of Judgement - third-person arena combat against a shielded boss and its grunts.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, cross-actor events, timers, arena config
//! - **Combat**: Resource pools, damage routing, movement bodies
//! - **Player**: Combat state machine, input, camera, judgement zone
//! - **Enemies**: Grunt and elite brains, perception
//! - **Projectiles**: Arrows, bolts, thrown axe, chain, vials
//! - **Arena**: Floor, lights, actor spawning and restart
//! - **Effects**: Sound and light for effect cues

pub mod arena;
pub mod combat;
pub mod core;
pub mod effects;
pub mod enemies;
pub mod player;
pub mod projectiles;
pub mod tuning;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct JudgementPlugin;

impl Plugin for JudgementPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Combat set ordering and damage routing
            .add_plugins(combat::CombatPlugin)

            // Actors
            .add_plugins(player::PlayerPlugin)
            .add_plugins(enemies::EnemyPlugin)
            .add_plugins(projectiles::ProjectilePlugin)

            // Arena setup and game flow
            .add_plugins(arena::ArenaPlugin)

            // Presentation
            .add_plugins(effects::EffectsPlugin);
    }
}
