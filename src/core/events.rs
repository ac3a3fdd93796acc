//! Global events used for cross-actor communication.
//!
//! Actors never write each other's state. Damage, healing and physical
//! shoves travel as events and are applied by the receiving side; visual
//! and audio effects are fire-and-forget cues.

use bevy::prelude::*;

/// How a hit lands on its receiver.
///
/// Kicks use a fixed stun instead of one derived from the damage amount,
/// and halt the receiver's movement on contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DamageKind {
    #[default]
    Standard,
    Kick,
}

/// Apply damage to an entity.
///
/// Sent by melee swings, projectiles, enemy attacks and the judgement zone.
/// The damage systems route it to whichever combatant owns `target`.
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageEvent {
    /// Entity receiving damage
    pub target: Entity,
    /// Base damage amount
    pub amount: f32,
    /// Combatant responsible for the hit, if any
    pub instigator: Option<Entity>,
    /// The thing that touched the target (weapon owner, arrow, axe)
    pub causer: Entity,
    pub kind: DamageKind,
}

/// Sent when a combatant dies. Fires exactly once per combatant.
#[derive(Event, Debug, Clone, Copy)]
pub struct DeathEvent {
    /// Entity that died
    pub entity: Entity,
    /// Entity that killed them (if any)
    pub killed_by: Option<Entity>,
}

/// Restore health to a living combatant.
#[derive(Event, Debug, Clone, Copy)]
pub struct HealEvent {
    pub target: Entity,
    pub amount: f32,
}

/// Instantaneous launch applied to a movement body.
#[derive(Event, Debug, Clone, Copy)]
pub struct ImpulseEvent {
    pub target: Entity,
    pub impulse: Vec3,
    /// Replace the current velocity instead of adding to it.
    pub override_velocity: bool,
}

/// Named presentation cues. Playback is up to whoever listens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Footstep,
    Heartbeat,
    Jump,
    Roll,
    MeleeSwing,
    MeleeHit,
    BowDraw,
    BowRelease,
    CrossbowFire,
    ArrowRestock,
    BoltRestock,
    VialRestock,
    VialThrow,
    GlassShatter,
    HealingGlyph,
    TakeDamage,
    Fall,
    Death,
    Ragdoll,
    AxeSwing,
    AxeThrow,
    ShieldBlock,
    ShieldDetach,
    Summon,
    Stomp,
    ChainThrow,
    HitSpark,
}

/// Spawn a visual or sound at a location. Nothing is returned.
#[derive(Event, Debug, Clone, Copy)]
pub struct EffectEvent {
    pub cue: Cue,
    pub location: Vec3,
}

impl EffectEvent {
    pub fn new(cue: Cue, location: Vec3) -> Self {
        Self { cue, location }
    }
}

impl Cue {
    /// Sound file under `assets/` for cues that are heard. Purely visual cues return `None`.
    pub fn sound_path(self) -> Option<&'static str> {
        let path = match self {
            Cue::Footstep => "sounds/footstep.ogg",
            Cue::Heartbeat => "sounds/heartbeat.ogg",
            Cue::Jump => "sounds/jump.ogg",
            Cue::Roll => "sounds/roll.ogg",
            Cue::MeleeSwing => "sounds/melee_swing.ogg",
            Cue::MeleeHit => "sounds/melee_hit.ogg",
            Cue::BowDraw => "sounds/bow_draw.ogg",
            Cue::BowRelease => "sounds/bow_release.ogg",
            Cue::CrossbowFire => "sounds/crossbow_fire.ogg",
            Cue::ArrowRestock | Cue::BoltRestock | Cue::VialRestock => "sounds/restock.ogg",
            Cue::VialThrow => "sounds/vial_throw.ogg",
            Cue::GlassShatter => "sounds/glass_shatter.ogg",
            Cue::TakeDamage => "sounds/take_damage.ogg",
            Cue::Fall => "sounds/fall.ogg",
            Cue::Death => "sounds/death.ogg",
            Cue::AxeSwing => "sounds/axe_swing.ogg",
            Cue::AxeThrow => "sounds/axe_throw.ogg",
            Cue::ShieldBlock => "sounds/shield_block.ogg",
            Cue::ShieldDetach => "sounds/shield_detach.ogg",
            Cue::Summon => "sounds/summon.ogg",
            Cue::Stomp => "sounds/stomp.ogg",
            Cue::ChainThrow => "sounds/chain_throw.ogg",
            Cue::HealingGlyph | Cue::Ragdoll | Cue::HitSpark => return None,
        };
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visual_cues_are_silent() {
        assert_eq!(Cue::HitSpark.sound_path(), None);
        assert_eq!(Cue::Ragdoll.sound_path(), None);
        assert_eq!(Cue::Stomp.sound_path(), Some("sounds/stomp.ogg"));
    }

    #[test]
    fn restock_cues_share_a_sound() {
        assert_eq!(Cue::ArrowRestock.sound_path(), Cue::VialRestock.sound_path());
    }
}
