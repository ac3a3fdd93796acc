//! Movement, socket and navigation components.
//!
//! Combat logic talks to these instead of the physics backend directly.
//! `integrate_bodies` turns a [`MovementBody`] into a character-controller
//! translation; `steer_agents` turns a [`NavAgent`] goal into walk input.

use bevy::prelude::*;
use bevy::utils::HashMap;

use crate::tuning::{GRAVITY, GROUND_FRICTION};

/// Character movement state driven by combat logic.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct MovementBody {
    /// Horizontal input direction, unit length or zero
    pub input: Vec3,
    pub max_walk_speed: f32,
    pub grounded: bool,
    enabled: bool,
    momentum: Vec3,
    vertical: f32,
    velocity: Vec3,
}

impl MovementBody {
    pub fn new(max_walk_speed: f32) -> Self {
        Self {
            input: Vec3::ZERO,
            max_walk_speed,
            grounded: true,
            enabled: true,
            momentum: Vec3::ZERO,
            vertical: 0.0,
            velocity: Vec3::ZERO,
        }
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Horizontal speed.
    pub fn speed(&self) -> f32 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z).length()
    }

    pub fn is_falling(&self) -> bool {
        !self.grounded
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.input = Vec3::ZERO;
    }

    pub fn enable_walking(&mut self) {
        self.enabled = true;
    }

    /// Halt all horizontal motion immediately.
    pub fn stop(&mut self) {
        self.input = Vec3::ZERO;
        self.momentum = Vec3::ZERO;
        self.velocity = Vec3::new(0.0, self.vertical, 0.0);
    }

    /// Apply an instantaneous launch. With `override_velocity` the launch
    /// replaces the current motion instead of adding to it.
    pub fn launch(&mut self, impulse: Vec3, override_velocity: bool) {
        let horizontal = Vec3::new(impulse.x, 0.0, impulse.z);
        if override_velocity {
            self.momentum = horizontal;
            self.vertical = impulse.y;
        } else {
            self.momentum += horizontal;
            self.vertical += impulse.y;
        }
        if impulse.y > 0.0 {
            self.grounded = false;
        }
    }

    /// Take the ground contact reported by the character controller.
    /// A body still rising from a launch stays airborne.
    pub fn sync_ground(&mut self, touching: bool) {
        self.grounded = touching && self.vertical <= 0.0;
    }

    /// Advance one step and return the translation to apply.
    pub fn integrate(&mut self, dt: f32) -> Vec3 {
        let walk = if self.enabled {
            self.input * self.max_walk_speed
        } else {
            Vec3::ZERO
        };

        if self.grounded {
            if self.vertical < 0.0 {
                self.vertical = 0.0;
            }
            self.momentum *= (-GROUND_FRICTION * dt).exp();
        } else {
            self.vertical -= GRAVITY * dt;
        }

        self.velocity = walk + self.momentum + Vec3::Y * self.vertical;
        self.velocity * dt
    }
}

impl Default for MovementBody {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Named attachment points on a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Socket {
    RightHand,
    LeftHand,
    Neck,
    Eyes,
    ArrowAnchor,
}

/// Local offsets of the sockets a character exposes.
#[derive(Component, Debug, Clone, Default)]
pub struct Sockets(HashMap<Socket, Vec3>);

impl Sockets {
    pub fn with(mut self, socket: Socket, offset: Vec3) -> Self {
        self.0.insert(socket, offset);
        self
    }

    pub fn local(&self, socket: Socket) -> Option<Vec3> {
        self.0.get(&socket).copied()
    }

    pub fn world(&self, socket: Socket, transform: &Transform) -> Option<Vec3> {
        self.local(socket).map(|offset| transform.transform_point(offset))
    }

    /// Socket position, or the character origin if it has no such socket.
    pub fn world_or_origin(&self, socket: Socket, transform: &Transform) -> Vec3 {
        self.world(socket, transform).unwrap_or(transform.translation)
    }
}

/// Pathing request for an AI body.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct NavAgent {
    goal: Option<Entity>,
    acceptance: f32,
    /// Entity to keep facing while standing still
    pub look_at: Option<Entity>,
}

impl NavAgent {
    pub fn move_to(&mut self, target: Entity, acceptance: f32) {
        self.goal = Some(target);
        self.acceptance = acceptance;
    }

    pub fn stop(&mut self) {
        self.goal = None;
    }

    pub fn goal(&self) -> Option<Entity> {
        self.goal
    }

    pub fn acceptance(&self) -> f32 {
        self.acceptance
    }

    pub fn is_moving(&self) -> bool {
        self.goal.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_at_max_speed_when_enabled() {
        let mut body = MovementBody::new(500.0);
        body.input = Vec3::X;
        let step = body.integrate(0.1);
        assert_eq!(step, Vec3::new(50.0, 0.0, 0.0));
        assert_eq!(body.speed(), 500.0);

        body.disable();
        body.input = Vec3::X;
        body.integrate(0.1);
        assert_eq!(body.speed(), 0.0);
    }

    #[test]
    fn launch_leaves_ground_and_falls_back() {
        let mut body = MovementBody::new(500.0);
        body.launch(Vec3::new(0.0, 650.0, 0.0), false);
        assert!(body.is_falling());

        let rise = body.integrate(0.1);
        assert!(rise.y > 0.0);

        for _ in 0..20 {
            body.integrate(0.1);
        }
        assert!(body.velocity().y < 0.0);
    }

    #[test]
    fn rising_body_ignores_stale_ground_contact() {
        let mut body = MovementBody::new(500.0);
        body.launch(Vec3::Y * 650.0, false);
        body.sync_ground(true);
        assert!(body.is_falling());

        body.launch(Vec3::NEG_Y * 1000.0, false);
        body.sync_ground(true);
        assert!(body.grounded);
    }

    #[test]
    fn override_launch_replaces_momentum() {
        let mut body = MovementBody::new(0.0);
        body.launch(Vec3::new(100.0, 0.0, 0.0), false);
        body.launch(Vec3::new(0.0, 0.0, 300.0), true);
        body.grounded = false;
        body.integrate(0.0);
        assert_eq!(body.speed(), 300.0);
    }

    #[test]
    fn sockets_follow_the_transform() {
        let sockets = Sockets::default().with(Socket::RightHand, Vec3::new(10.0, 0.0, 0.0));
        let transform = Transform::from_xyz(0.0, 5.0, 0.0);
        assert_eq!(
            sockets.world(Socket::RightHand, &transform),
            Some(Vec3::new(10.0, 5.0, 0.0))
        );
        assert_eq!(sockets.world(Socket::Neck, &transform), None);
        assert_eq!(
            sockets.world_or_origin(Socket::Neck, &transform),
            transform.translation
        );
    }

    #[test]
    fn nav_agent_stop_keeps_look_target() {
        let player = Entity::from_raw(3);
        let mut agent = NavAgent::default();
        agent.look_at = Some(player);
        agent.move_to(player, 5.0);
        assert_eq!(agent.goal(), Some(player));
        agent.stop();
        assert!(!agent.is_moving());
        assert_eq!(agent.look_at, Some(player));
    }
}
