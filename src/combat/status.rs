//! Read-only views one actor gets of another.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

/// What enemies are allowed to know about their target.
pub trait CombatStatus {
    fn entity(&self) -> Entity;

    fn position(&self) -> Vec3;

    /// Horizontal speed.
    fn speed(&self) -> f32;

    fn is_attacking(&self) -> bool;

    fn is_aiming(&self) -> bool;

    fn is_quick_attacking(&self) -> bool;

    fn is_dead(&self) -> bool;

    /// Any action an enemy with a shield would want to block.
    fn is_threatening(&self) -> bool {
        self.is_attacking() || self.is_aiming() || self.is_quick_attacking()
    }
}

/// Per-frame copy of the player's combat status.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSnapshot {
    pub entity: Entity,
    pub position: Vec3,
    pub speed: f32,
    pub attacking: bool,
    pub aiming: bool,
    pub quick_attacking: bool,
    pub dead: bool,
}

impl CombatStatus for PlayerSnapshot {
    fn entity(&self) -> Entity {
        self.entity
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn is_attacking(&self) -> bool {
        self.attacking
    }

    fn is_aiming(&self) -> bool {
        self.aiming
    }

    fn is_quick_attacking(&self) -> bool {
        self.quick_attacking
    }

    fn is_dead(&self) -> bool {
        self.dead
    }
}

/// Ray queries used for perception.
pub trait LineOfSight {
    /// First entity a ray hits, ignoring `exclude`.
    fn first_hit(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: Entity,
    ) -> Option<Entity>;
}

/// Line of sight backed by the rapier query pipeline.
pub struct RapierSight<'a> {
    context: &'a RapierContext,
}

impl<'a> RapierSight<'a> {
    pub fn new(context: &'a RapierContext) -> Self {
        Self { context }
    }
}

impl LineOfSight for RapierSight<'_> {
    fn first_hit(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: Entity,
    ) -> Option<Entity> {
        self.context
            .cast_ray(
                origin,
                direction,
                max_distance,
                true,
                QueryFilter::default().exclude_collider(exclude),
            )
            .map(|(entity, _)| entity)
    }
}

/// Sees nothing. Used when no physics context exists.
pub struct Blind;

impl LineOfSight for Blind {
    fn first_hit(&self, _: Vec3, _: Vec3, _: f32, _: Entity) -> Option<Entity> {
        None
    }
}
