//! Arena and session configuration loaded from an external RON file.
//!
//! Combat tuning lives in [`crate::tuning`]; this file only covers what
//! changes between sessions: spawn layout, camera and mouse feel, and the
//! random seed.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use std::fs;
use thiserror::Error;

/// Errors that can occur when loading the arena config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    Parse { path: String, details: String },
}

/// Arena layout and input feel, loaded from assets/data/arena.ron.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub mouse_sensitivity: f32,
    pub invert_y: bool,
    /// Camera boom length behind the player
    pub camera_distance: f32,
    pub camera_height: f32,
    pub floor_half_extent: f32,
    pub player_spawn: (f32, f32, f32),
    pub boss_spawn: (f32, f32, f32),
    pub grunt_spawns: Vec<(f32, f32, f32)>,
    /// Fixed seed for reproducible sessions
    pub rng_seed: Option<u64>,
    /// Play effect cues as sounds
    pub play_sounds: bool,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 2.0,
            invert_y: false,
            camera_distance: 400.0,
            camera_height: 150.0,
            floor_half_extent: 4000.0,
            player_spawn: (0.0, 100.0, 0.0),
            boss_spawn: (0.0, 100.0, -900.0),
            grunt_spawns: vec![(-400.0, 100.0, -500.0), (400.0, 100.0, -500.0)],
            rng_seed: None,
            play_sounds: true,
        }
    }
}

impl ArenaConfig {
    pub const PATH: &'static str = "assets/data/arena.ron";

    pub fn parse(path: &str, contents: &str) -> Result<Self, ConfigError> {
        ron::from_str(contents).map_err(|e| ConfigError::Parse {
            path: path.to_string(),
            details: e.to_string(),
        })
    }

    pub fn read(path: &str) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::parse(path, &contents)
    }

    /// Load the arena config, falling back to defaults on any error.
    pub fn load() -> Self {
        match Self::read(Self::PATH) {
            Ok(config) => {
                info!("Loaded arena config from {}", Self::PATH);
                config
            }
            Err(e @ ConfigError::Read { .. }) => {
                warn!("{}. Using defaults.", e);
                Self::default()
            }
            Err(e) => {
                error!("{}. Using defaults.", e);
                Self::default()
            }
        }
    }

    pub fn player_spawn(&self) -> Vec3 {
        Vec3::from(self.player_spawn)
    }

    pub fn boss_spawn(&self) -> Vec3 {
        Vec3::from(self.boss_spawn)
    }

    pub fn grunt_spawns(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.grunt_spawns.iter().copied().map(Vec3::from)
    }
}

/// Session-wide random source for AI choices and spawn scatter.
#[derive(Resource)]
pub struct GameRng(pub StdRng);

impl GameRng {
    pub fn from_config(config: &ArenaConfig) -> Self {
        match config.rng_seed {
            Some(seed) => Self(StdRng::seed_from_u64(seed)),
            None => Self(StdRng::from_entropy()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = ArenaConfig::parse("test.ron", "(invert_y: true, rng_seed: Some(7))")
            .expect("valid config");
        assert!(config.invert_y);
        assert_eq!(config.rng_seed, Some(7));
        assert_eq!(config.camera_distance, ArenaConfig::default().camera_distance);
        assert_eq!(config.grunt_spawns.len(), 2);
    }

    #[test]
    fn spawn_lists_parse_as_tuples() {
        let config = ArenaConfig::parse(
            "test.ron",
            "(boss_spawn: (1.0, 2.0, 3.0), grunt_spawns: [])",
        )
        .expect("valid config");
        assert_eq!(config.boss_spawn(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(config.grunt_spawns().count(), 0);
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let err = ArenaConfig::parse("broken.ron", "(invert_y: maybe)").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.ron"));
    }

    #[test]
    fn missing_file_reports_read_error() {
        let err = ArenaConfig::read("does/not/exist.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
