//! Enemy spawning.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::brain::EnemyBrain;
use super::components::{Enemy, Gear};
use crate::arena::{ActorMeshes, ArenaEntity};
use crate::combat::{MovementBody, NavAgent, Socket, Sockets};

/// Capsule dimensions shared by an archetype's collider and mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySize {
    pub half_height: f32,
    pub radius: f32,
}

impl BodySize {
    pub const GRUNT: BodySize = BodySize {
        half_height: 55.0,
        radius: 35.0,
    };

    pub const ELITE: BodySize = BodySize {
        half_height: 90.0,
        radius: 60.0,
    };

    pub fn collider(&self) -> Collider {
        Collider::capsule_y(self.half_height, self.radius)
    }

    pub fn mesh(&self) -> Capsule3d {
        Capsule3d::new(self.radius, self.half_height * 2.0)
    }

    /// Height of the capsule centre above the feet.
    pub fn standing_offset(&self) -> f32 {
        self.half_height + self.radius
    }

    fn sockets(&self) -> Sockets {
        let top = self.half_height;
        let reach = self.radius + 10.0;
        Sockets::default()
            .with(Socket::RightHand, Vec3::new(reach, top * 0.2, -self.radius))
            .with(Socket::LeftHand, Vec3::new(-reach, top * 0.2, -self.radius))
            .with(Socket::Neck, Vec3::new(0.0, top * 0.8, 0.0))
            .with(Socket::Eyes, Vec3::new(0.0, top, -self.radius * 0.5))
            .with(Socket::ArrowAnchor, Vec3::new(0.0, top * 0.4, 0.0))
    }
}

fn spawn_enemy(
    commands: &mut Commands,
    brain: EnemyBrain,
    size: BodySize,
    position: Vec3,
) -> Entity {
    let walk_speed = brain.profile().walk_speed;
    commands
        .spawn((
            Enemy,
            brain,
            NavAgent::default(),
            MovementBody::new(walk_speed),
            size.sockets(),
            Transform::from_translation(position),
            Visibility::default(),
            RigidBody::KinematicPositionBased,
            size.collider(),
            KinematicCharacterController {
                offset: CharacterLength::Absolute(1.0),
                snap_to_ground: Some(CharacterLength::Absolute(20.0)),
                ..default()
            },
            ArenaEntity,
        ))
        .id()
}

/// Spawn a melee grunt standing at `position`.
pub fn spawn_grunt(commands: &mut Commands, meshes: Option<&ActorMeshes>, position: Vec3) -> Entity {
    let grunt = spawn_enemy(commands, EnemyBrain::grunt(), BodySize::GRUNT, position);
    if let Some(meshes) = meshes {
        commands.entity(grunt).insert(meshes.grunt.bundle());
    }
    debug!("Spawned grunt at {:?}", position);
    grunt
}

/// Spawn the boss with its shield and axe.
pub fn spawn_elite(commands: &mut Commands, meshes: Option<&ActorMeshes>, position: Vec3) -> Entity {
    let size = BodySize::ELITE;
    let elite = spawn_enemy(commands, EnemyBrain::elite(), size, position);

    if let Some(meshes) = meshes {
        let sockets = size.sockets();
        let shield_at = sockets.local(Socket::LeftHand).unwrap_or_default();
        let axe_at = sockets.local(Socket::RightHand).unwrap_or_default();
        commands
            .entity(elite)
            .insert(meshes.elite.bundle())
            .with_children(|parent| {
                parent.spawn((
                    Gear::Shield,
                    meshes.shield.bundle(),
                    Transform::from_translation(shield_at),
                ));
                parent.spawn((
                    Gear::Axe,
                    meshes.axe.bundle(),
                    Transform::from_translation(axe_at),
                ));
            });
    }

    info!("Spawned the elite at {:?}", position);
    elite
}
