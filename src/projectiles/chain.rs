//! The boss's chain: a tether from its hand that reels the player in.

use bevy::prelude::*;

use crate::tuning::projectile;

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Chain {
    pub owner: Entity,
    pub target: Entity,
    length: f32,
    age: f32,
    pulled: bool,
}

impl Chain {
    pub fn new(owner: Entity, target: Entity) -> Self {
        Self {
            owner,
            target,
            length: 0.0,
            age: 0.0,
            pulled: false,
        }
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn has_pulled(&self) -> bool {
        self.pulled
    }

    /// Grow toward a target `distance` away. True on the frame the chain
    /// first reaches it.
    pub fn extend(&mut self, distance: f32, dt: f32) -> bool {
        self.age += dt;
        let reach = distance.min(projectile::CHAIN_MAX_LENGTH);
        self.length = (self.length + projectile::CHAIN_SPEED * dt).min(reach);

        let reached = !self.pulled
            && distance <= projectile::CHAIN_MAX_LENGTH
            && self.length >= distance;
        if reached {
            self.pulled = true;
        }
        reached
    }

    pub fn is_expired(&self) -> bool {
        self.age >= projectile::CHAIN_LIFETIME
    }

    /// Launch applied to the target: toward the hand at full pull force.
    pub fn pull(hand: Vec3, target: Vec3) -> Vec3 {
        (hand - target).normalize_or_zero() * projectile::CHAIN_PULL_FORCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulls_once_on_reaching_the_target() {
        let mut chain = Chain::new(Entity::from_raw(1), Entity::from_raw(2));
        let mut pulls = 0;
        for _ in 0..30 {
            if chain.extend(600.0, 0.05) {
                pulls += 1;
            }
        }
        assert_eq!(pulls, 1);
        assert_eq!(chain.length(), 600.0);
        assert!(chain.has_pulled());
    }

    #[test]
    fn never_reaches_beyond_max_length() {
        let mut chain = Chain::new(Entity::from_raw(1), Entity::from_raw(2));
        for _ in 0..20 {
            assert!(!chain.extend(1500.0, 0.05));
        }
        assert_eq!(chain.length(), 1200.0);
    }

    #[test]
    fn expires_after_its_lifetime() {
        let mut chain = Chain::new(Entity::from_raw(1), Entity::from_raw(2));
        chain.extend(600.0, 1.5);
        assert!(!chain.is_expired());
        chain.extend(600.0, 0.5);
        assert!(chain.is_expired());
    }

    #[test]
    fn pull_points_at_the_hand() {
        let impulse = Chain::pull(Vec3::ZERO, Vec3::new(0.0, 0.0, -500.0));
        assert_eq!(impulse, Vec3::new(0.0, 0.0, 1000.0));
    }
}
