//! Core game module - states, events, config, timers and smoothing.
//!
//! This module provides the foundation that all other game systems build upon.

mod config;
mod events;
mod plugin;
mod scheduler;
mod states;
mod tween;

pub use config::{ArenaConfig, ConfigError, GameRng};
pub use events::*;
pub use plugin::CorePlugin;
pub use scheduler::{Scheduler, TimerHandle};
pub use states::*;
pub use tween::*;
