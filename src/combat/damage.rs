//! The damage-application contract every combatant implements.

use bevy::prelude::*;

use crate::core::{DamageEvent, DamageKind};
use crate::tuning::player;

/// An incoming hit as seen by its receiver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub amount: f32,
    pub kind: DamageKind,
    pub instigator: Option<Entity>,
    pub causer: Entity,
    /// Where the instigator stood when the hit landed
    pub origin: Option<Vec3>,
}

impl Hit {
    pub fn new(amount: f32, kind: DamageKind, causer: Entity) -> Self {
        Self {
            amount,
            kind,
            instigator: None,
            causer,
            origin: None,
        }
    }

    pub fn from_instigator(mut self, instigator: Entity, origin: Vec3) -> Self {
        self.instigator = Some(instigator);
        self.origin = Some(origin);
        self
    }
}

impl From<&DamageEvent> for Hit {
    fn from(event: &DamageEvent) -> Self {
        Self {
            amount: event.amount,
            kind: event.kind,
            instigator: event.instigator,
            causer: event.causer,
            origin: None,
        }
    }
}

/// What a receiver did with a hit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DamageOutcome {
    /// Health actually removed
    pub applied: f32,
    /// This hit killed the receiver
    pub died: bool,
    /// Health the instigator earns back from landing the hit
    pub lifesteal: f32,
}

/// Receiver side of `ApplyDamage`.
pub trait Damageable {
    fn take_damage(&mut self, hit: &Hit) -> DamageOutcome;

    fn heal(&mut self, amount: f32) -> f32;

    fn is_dead(&self) -> bool;
}

/// Player stun length for a hit.
pub fn player_stun(hit: &Hit) -> f32 {
    match hit.kind {
        DamageKind::Kick => player::KICK_STUN,
        DamageKind::Standard => {
            (hit.amount / player::STUN_DAMAGE_DIVISOR).clamp(player::STUN_MIN, player::STUN_MAX)
        }
    }
}
