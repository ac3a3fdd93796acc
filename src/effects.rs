//! Effect cues - sounds through kira and short light flashes.

use bevy::prelude::*;
use bevy_kira_audio::{Audio, AudioControl};

use crate::combat::CombatSet;
use crate::core::{ArenaConfig, Cue, EffectEvent};

/// Brief point light left behind by a spark or glyph.
#[derive(Component, Debug)]
pub struct Flash {
    timer: Timer,
    intensity: f32,
}

impl Flash {
    pub fn for_cue(cue: Cue) -> Option<(Self, PointLight)> {
        let (seconds, color, intensity) = match cue {
            Cue::HitSpark => (0.1, Color::srgb(1.0, 0.8, 0.4), 2.0e6),
            Cue::HealingGlyph => (1.0, Color::srgb(0.4, 1.0, 0.6), 4.0e6),
            Cue::Stomp => (0.3, Color::srgb(1.0, 0.5, 0.2), 8.0e6),
            _ => return None,
        };
        let light = PointLight {
            color,
            intensity,
            range: 600.0,
            ..default()
        };
        let flash = Self {
            timer: Timer::from_seconds(seconds, TimerMode::Once),
            intensity,
        };
        Some((flash, light))
    }
}

pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (play_cues, fade_flashes).chain().after(CombatSet::Feedback),
        );
    }
}

fn play_cues(
    mut commands: Commands,
    mut effects: EventReader<EffectEvent>,
    config: Option<Res<ArenaConfig>>,
    asset_server: Res<AssetServer>,
    audio: Option<Res<Audio>>,
) {
    let play_sounds = config.is_some_and(|config| config.play_sounds);

    for effect in effects.read() {
        debug!("{:?} at {:?}", effect.cue, effect.location);

        if let (true, Some(audio), Some(path)) = (play_sounds, audio.as_ref(), effect.cue.sound_path()) {
            audio.play(asset_server.load(path));
        }

        if let Some((flash, light)) = Flash::for_cue(effect.cue) {
            commands.spawn((flash, light, Transform::from_translation(effect.location)));
        }
    }
}

fn fade_flashes(
    mut commands: Commands,
    time: Res<Time>,
    mut flash_query: Query<(Entity, &mut Flash, &mut PointLight)>,
) {
    for (entity, mut flash, mut light) in flash_query.iter_mut() {
        flash.timer.tick(time.delta());
        if flash.timer.finished() {
            commands.entity(entity).despawn_recursive();
            continue;
        }
        light.intensity = flash.intensity * flash.timer.fraction_remaining();
    }
}
