//! Arrows and crossbow bolts.

use bevy::prelude::*;

use crate::tuning::projectile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrowKind {
    Arrow,
    Bolt,
}

/// Everything needed to put an arrow in the air.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowLaunch {
    pub owner: Entity,
    pub origin: Vec3,
    /// Unit direction of flight
    pub direction: Vec3,
    pub speed: f32,
    /// Falls back to the default arrow damage when unset
    pub damage: Option<f32>,
    pub scale: f32,
    pub kind: ArrowKind,
}

/// A flying or stuck arrow. Its damage can be collected exactly once.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Arrow {
    pub owner: Entity,
    pub kind: ArrowKind,
    damage: f32,
    velocity: Vec3,
    collided: bool,
    /// Seconds in flight, or seconds stuck after impact
    age: f32,
}

impl Arrow {
    pub fn new(launch: &ArrowLaunch) -> Self {
        Self {
            owner: launch.owner,
            kind: launch.kind,
            damage: launch.damage.unwrap_or(projectile::ARROW_DEFAULT_DAMAGE),
            velocity: launch.direction.normalize_or_zero() * launch.speed,
            collided: false,
            age: 0.0,
        }
    }

    pub fn damage(&self) -> f32 {
        self.damage
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn has_collided(&self) -> bool {
        self.collided
    }

    /// Age the arrow and return this frame's displacement.
    pub fn tick(&mut self, dt: f32) -> Vec3 {
        self.age += dt;
        if self.collided {
            Vec3::ZERO
        } else {
            self.velocity * dt
        }
    }

    pub fn is_expired(&self) -> bool {
        let lifetime = if self.collided {
            projectile::ARROW_STUCK_LIFETIME
        } else {
            projectile::ARROW_LIFETIME
        };
        self.age >= lifetime
    }

    /// Whether touching `entity` should end the flight.
    pub fn is_valid_hit(&self, entity: Entity) -> bool {
        !self.collided && entity != self.owner
    }

    /// Stop flying and hand over the stored damage. Later calls return zero.
    pub fn strike(&mut self) -> f32 {
        if !self.collided {
            self.collided = true;
            self.velocity = Vec3::ZERO;
            self.age = 0.0;
        }
        std::mem::take(&mut self.damage)
    }
}

/// Keeps a stuck arrow attached to whatever it hit.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct StuckTo {
    /// `None` for static world geometry
    pub target: Option<Entity>,
    /// Offset in the target's local space, or a world point when static
    pub offset: Vec3,
}

impl StuckTo {
    /// Where the arrow sits given the target's current transform.
    pub fn world_position(&self, target: Option<&Transform>) -> Vec3 {
        match target {
            Some(transform) => transform.transform_point(self.offset),
            None => self.offset,
        }
    }
}
