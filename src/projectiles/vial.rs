//! Thrown healing vial prop.

use bevy::prelude::*;

use crate::tuning::projectile;

/// What happened when the vial touched something.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VialImpact {
    Shattered,
    /// Too soft to break; the vial comes to rest
    Landed,
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct VialProp {
    pub owner: Entity,
    velocity: Vec3,
    age: f32,
    resting: bool,
}

impl VialProp {
    pub fn new(owner: Entity, velocity: Vec3) -> Self {
        Self {
            owner,
            velocity,
            age: 0.0,
            resting: false,
        }
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn is_resting(&self) -> bool {
        self.resting
    }

    /// Ballistic step. Returns this frame's displacement.
    pub fn tick(&mut self, dt: f32) -> Vec3 {
        self.age += dt;
        if self.resting {
            return Vec3::ZERO;
        }
        self.velocity.y -= projectile::VIAL_GRAVITY * dt;
        self.velocity * dt
    }

    pub fn impact(&mut self) -> VialImpact {
        if self.velocity.length() > projectile::VIAL_SHATTER_IMPULSE {
            VialImpact::Shattered
        } else {
            self.resting = true;
            self.velocity = Vec3::ZERO;
            VialImpact::Landed
        }
    }

    pub fn is_expired(&self) -> bool {
        self.age >= projectile::VIAL_LIFETIME
    }
}
