//! Combat module - resource pools, attacks, damage and movement bodies.

mod attack;
mod body;
mod components;
mod damage;
mod plugin;
mod status;
mod systems;

pub use attack::{can_connect, flat_direction, AttackInstance, AttackKind};
pub use body::{MovementBody, NavAgent, Socket, Sockets};
pub use components::*;
pub use damage::{player_stun, DamageOutcome, Damageable, Hit};
pub use plugin::CombatPlugin;
pub use status::{Blind, CombatStatus, LineOfSight, PlayerSnapshot, RapierSight};
pub use systems::CombatSet;
