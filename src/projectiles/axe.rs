//! The boss's thrown axe: a circular arc out to the target and back.

use bevy::prelude::*;

use crate::tuning::projectile;

#[derive(Component, Debug, Clone, PartialEq)]
pub struct ThrownAxe {
    pub owner: Entity,
    centre: Vec3,
    radius: f32,
    age: f32,
    has_hit: bool,
}

impl ThrownAxe {
    /// Orbit centred halfway between `from` and `target`.
    pub fn new(owner: Entity, from: Vec3, target: Vec3) -> Self {
        Self {
            owner,
            centre: from.lerp(target, 0.5),
            radius: from.distance(target) / 2.0,
            age: 0.0,
            has_hit: false,
        }
    }

    pub fn centre(&self) -> Vec3 {
        self.centre
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn has_hit(&self) -> bool {
        self.has_hit
    }

    /// Advance the axe around its orbit. Returns the new position.
    pub fn step(&mut self, position: Vec3, dt: f32) -> Vec3 {
        self.age += dt;
        let angle = projectile::AXE_ORBIT_DEGREES.to_radians() * dt;
        let rotated = Quat::from_rotation_y(angle) * (position - self.centre);
        let flat = Vec3::new(rotated.x, 0.0, rotated.z).normalize_or_zero() * self.radius;
        self.centre + flat + Vec3::Y * rotated.y
    }

    /// True the first time the axe comes within reach of the target.
    pub fn try_hit(&mut self, position: Vec3, target: Vec3) -> bool {
        if self.has_hit || position.distance(target) > projectile::AXE_HIT_RADIUS {
            return false;
        }
        self.has_hit = true;
        true
    }

    /// Caught by the thrower, timed out, or the thrower is gone.
    pub fn is_finished(&self, position: Vec3, owner: Option<Vec3>) -> bool {
        if self.age >= projectile::AXE_TIMEOUT {
            return true;
        }
        match owner {
            Some(owner) => {
                self.age >= projectile::AXE_MIN_FLIGHT
                    && owner.distance(position) <= projectile::AXE_RETURN_RADIUS
            }
            None => true,
        }
    }

    /// Visual spin about the axe's own axis, in radians for this frame.
    pub fn spin(dt: f32) -> f32 {
        projectile::AXE_SPIN_DEGREES.to_radians() * dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn arcs_to_the_target_and_back() {
        let boss = Vec3::ZERO;
        let target = Vec3::new(0.0, 0.0, -1000.0);
        let mut axe = ThrownAxe::new(Entity::from_raw(1), boss, target);
        assert_eq!(axe.centre(), Vec3::new(0.0, 0.0, -500.0));
        assert_eq!(axe.radius(), 500.0);

        let mut position = boss;
        let mut hits = 0;
        let mut finished_at = None;
        for frame in 1..=180 {
            position = axe.step(position, DT);
            assert!((position.distance(axe.centre()) - 500.0).abs() < 0.5);
            if axe.try_hit(position, target) {
                hits += 1;
            }
            if axe.is_finished(position, Some(boss)) {
                finished_at = Some(frame as f32 * DT);
                break;
            }
        }

        assert_eq!(hits, 1);
        let finished_at = finished_at.expect("axe comes back");
        assert!(finished_at > 0.9 && finished_at < 1.3, "{finished_at}");
    }

    #[test]
    fn times_out_without_a_thrower() {
        let axe = ThrownAxe::new(Entity::from_raw(1), Vec3::ZERO, Vec3::X * 800.0);
        assert!(axe.is_finished(Vec3::ZERO, None));

        let mut lost = ThrownAxe::new(Entity::from_raw(1), Vec3::ZERO, Vec3::X * 800.0);
        let far_owner = Some(Vec3::new(5000.0, 0.0, 0.0));
        let mut position = Vec3::ZERO;
        for _ in 0..179 {
            position = lost.step(position, DT);
            assert!(!lost.is_finished(position, far_owner));
        }
        lost.step(position, DT * 2.0);
        assert!(lost.is_finished(position, far_owner));
    }
}
