//! A single swing, shot or stomp and the targets it already struck.

use bevy::prelude::*;
use bevy::utils::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackKind {
    Melee,
    Ranged,
    Kick,
    Stomp,
    Throw,
}

/// One attack from trigger to animation end.
///
/// Each instance owns the set of targets it has hit, so a target standing
/// in the hit volume for several frames is struck exactly once, and two
/// overlapping attacks never share bookkeeping.
#[derive(Debug, Clone)]
pub struct AttackInstance {
    pub kind: AttackKind,
    pub damage: f32,
    pub windup: f32,
    pub active: f32,
    pub cooldown: f32,
    already_hit: HashSet<Entity>,
}

impl AttackInstance {
    pub fn new(kind: AttackKind, damage: f32) -> Self {
        Self {
            kind,
            damage,
            windup: 0.0,
            active: 0.0,
            cooldown: 0.0,
            already_hit: HashSet::default(),
        }
    }

    pub fn with_timing(mut self, windup: f32, active: f32, cooldown: f32) -> Self {
        self.windup = windup;
        self.active = active;
        self.cooldown = cooldown;
        self
    }

    /// Record a hit on `target`. Returns false if this instance already hit it.
    pub fn register_hit(&mut self, target: Entity) -> bool {
        self.already_hit.insert(target)
    }

    pub fn has_hit(&self, target: Entity) -> bool {
        self.already_hit.contains(&target)
    }

    pub fn hit_count(&self) -> usize {
        self.already_hit.len()
    }

    /// Keep only candidates this instance has not struck yet, recording them.
    pub fn strike(&mut self, candidates: impl IntoIterator<Item = Entity>) -> Vec<Entity> {
        candidates
            .into_iter()
            .filter(|target| self.register_hit(*target))
            .collect()
    }
}

/// Horizontal direction from `from` to `to`, zero if they overlap.
pub fn flat_direction(from: Vec3, to: Vec3) -> Vec3 {
    Vec3::new(to.x - from.x, 0.0, to.z - from.z).normalize_or_zero()
}

/// Whether `target` is within `range` and in the attacker's frontal half-space.
pub fn can_connect(origin: Vec3, forward: Vec3, target: Vec3, range: f32) -> bool {
    let facing = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
    facing.dot(flat_direction(origin, target)) > 0.0 && origin.distance(target) <= range
}
