//! Ray fan sight checks.

use bevy::prelude::*;

use crate::combat::LineOfSight;
use crate::tuning::perception;

/// Cast `rays` evenly spaced horizontal rays across the field of view,
/// centred on `forward`. True if any of them hits `player` first.
pub fn sweep(
    sight: &dyn LineOfSight,
    eyes: Vec3,
    forward: Vec3,
    me: Entity,
    player: Entity,
    rays: usize,
) -> bool {
    let forward = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
    if forward == Vec3::ZERO || rays == 0 {
        return false;
    }

    let fov = perception::FOV_DEGREES.to_radians();
    let step = if rays > 1 {
        fov / (rays - 1) as f32
    } else {
        0.0
    };
    let start = if rays > 1 { -fov / 2.0 } else { 0.0 };

    (0..rays).any(|i| {
        let direction = Quat::from_rotation_y(start + step * i as f32) * forward;
        sight.first_hit(eyes, direction, perception::SIGHT_LENGTH, me) == Some(player)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reports the player for rays pointing within a narrow cone of it.
    struct Beacon {
        player: Entity,
        at: Vec3,
        hits: std::cell::Cell<usize>,
    }

    impl LineOfSight for Beacon {
        fn first_hit(&self, origin: Vec3, direction: Vec3, max: f32, _: Entity) -> Option<Entity> {
            self.hits.set(self.hits.get() + 1);
            let to = self.at - origin;
            (to.normalize_or_zero().dot(direction) > 0.999 && to.length() <= max)
                .then_some(self.player)
        }
    }

    fn beacon(at: Vec3) -> Beacon {
        Beacon {
            player: Entity::from_raw(9),
            at,
            hits: std::cell::Cell::new(0),
        }
    }

    #[test]
    fn sees_inside_the_cone_only() {
        let me = Entity::from_raw(1);
        let ahead = beacon(Vec3::new(300.0, 0.0, -1000.0));
        assert!(sweep(&ahead, Vec3::ZERO, Vec3::NEG_Z, me, ahead.player, 500));

        let wide = beacon(Vec3::new(1000.0, 0.0, -200.0));
        assert!(!sweep(&wide, Vec3::ZERO, Vec3::NEG_Z, me, wide.player, 500));
        assert_eq!(wide.hits.get(), 500);
    }

    #[test]
    fn too_far_is_unseen() {
        let me = Entity::from_raw(1);
        let far = beacon(Vec3::new(0.0, 0.0, -6000.0));
        assert!(!sweep(&far, Vec3::ZERO, Vec3::NEG_Z, me, far.player, 100));
    }

    #[test]
    fn stops_at_first_sighting() {
        let me = Entity::from_raw(1);
        let edge = beacon(Vec3::new(1000.0, 0.0, -1000.0));
        assert!(sweep(&edge, Vec3::ZERO, Vec3::NEG_Z, me, edge.player, 1000));
        assert_eq!(edge.hits.get(), 1);
    }
}
