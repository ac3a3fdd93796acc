//! Screen-space target selection for the bow and crossbow.

use bevy::prelude::*;
use rand::{Rng, RngCore};

/// An enemy projected onto the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTarget {
    pub entity: Entity,
    /// Viewport position in pixels
    pub screen: Vec2,
    /// Point to aim at in world space
    pub world: Vec3,
    /// Distance from the shooter
    pub distance: f32,
}

/// Closest target whose screen position lies inside the square box of
/// `half_extent` pixels around `centre`.
pub fn pick_screen_target(
    targets: &[ScreenTarget],
    centre: Vec2,
    half_extent: f32,
) -> Option<&ScreenTarget> {
    targets
        .iter()
        .filter(|target| {
            let offset = (target.screen - centre).abs();
            offset.x <= half_extent && offset.y <= half_extent
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// Where a shot should go, in order of preference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AimPoint {
    /// An enemy picked from the screen box
    Target(Vec3),
    /// Whatever the screen-centre ray hit
    Surface(Vec3),
    /// Nothing hit, fire straight ahead
    Forward(Vec3),
}

impl AimPoint {
    pub fn resolve(target: Option<Vec3>, surface: Option<Vec3>, forward: Vec3) -> Self {
        match (target, surface) {
            (Some(point), _) => Self::Target(point),
            (None, Some(point)) => Self::Surface(point),
            (None, None) => Self::Forward(forward),
        }
    }

    /// Unit launch direction from `origin`.
    pub fn direction(&self, origin: Vec3) -> Vec3 {
        let direction = match *self {
            Self::Target(point) | Self::Surface(point) => point - origin,
            Self::Forward(forward) => forward,
        };
        direction.try_normalize().unwrap_or(Vec3::NEG_Z)
    }
}

/// Perturb a unit direction by up to `error` on each axis.
pub fn with_aim_error(direction: Vec3, error: f32, rng: &mut dyn RngCore) -> Vec3 {
    if error <= 0.0 {
        return direction;
    }
    let jitter = Vec3::new(
        rng.gen_range(-error..=error),
        rng.gen_range(-error..=error),
        rng.gen_range(-error..=error),
    );
    (direction + jitter).try_normalize().unwrap_or(direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn target(id: u32, screen: Vec2, distance: f32) -> ScreenTarget {
        ScreenTarget {
            entity: Entity::from_raw(id),
            screen,
            world: Vec3::new(0.0, 0.0, -distance),
            distance,
        }
    }

    #[test]
    fn picks_nearest_inside_the_box() {
        let centre = Vec2::new(640.0, 360.0);
        let targets = [
            target(1, Vec2::new(660.0, 350.0), 900.0),
            target(2, Vec2::new(630.0, 380.0), 400.0),
            target(3, Vec2::new(900.0, 360.0), 100.0),
        ];
        let picked = pick_screen_target(&targets, centre, 50.5).expect("target in box");
        assert_eq!(picked.entity, Entity::from_raw(2));
    }

    #[test]
    fn wide_box_reaches_off_centre_targets() {
        let centre = Vec2::new(640.0, 360.0);
        let targets = [target(3, Vec2::new(900.0, 360.0), 100.0)];
        assert!(pick_screen_target(&targets, centre, 50.5).is_none());
        assert!(pick_screen_target(&targets, centre, 800.5).is_some());
    }

    #[test]
    fn aim_falls_back_in_order() {
        let origin = Vec3::ZERO;
        let enemy = Vec3::new(100.0, 0.0, 0.0);
        let wall = Vec3::new(0.0, 0.0, -50.0);

        let aim = AimPoint::resolve(Some(enemy), Some(wall), Vec3::Y);
        assert_eq!(aim.direction(origin), Vec3::X);

        let aim = AimPoint::resolve(None, Some(wall), Vec3::Y);
        assert_eq!(aim.direction(origin), Vec3::NEG_Z);

        let aim = AimPoint::resolve(None, None, Vec3::Y);
        assert_eq!(aim, AimPoint::Forward(Vec3::Y));
        assert_eq!(aim.direction(origin), Vec3::Y);
    }

    #[test]
    fn aim_error_stays_close() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let shot = with_aim_error(Vec3::NEG_Z, 0.1, &mut rng);
            assert!((shot.length() - 1.0).abs() < 1.0e-4);
            assert!(shot.dot(Vec3::NEG_Z) > 0.95);
        }
        assert_eq!(with_aim_error(Vec3::X, 0.0, &mut rng), Vec3::X);
    }
}
