//! Projectile spawning.

use bevy::prelude::*;

use super::arrow::{Arrow, ArrowLaunch};
use super::axe::ThrownAxe;
use super::chain::Chain;
use super::vial::VialProp;
use crate::arena::{ActorMeshes, ArenaEntity};

pub fn spawn_arrow(commands: &mut Commands, meshes: Option<&ActorMeshes>, launch: ArrowLaunch) -> Entity {
    let transform = Transform::from_translation(launch.origin)
        .looking_to(launch.direction, Vec3::Y)
        .with_scale(Vec3::splat(launch.scale));

    let mut arrow = commands.spawn((Arrow::new(&launch), transform, Visibility::default(), ArenaEntity));
    if let Some(meshes) = meshes {
        arrow.insert(meshes.arrow.bundle());
    }
    arrow.id()
}

pub fn spawn_vial(
    commands: &mut Commands,
    meshes: Option<&ActorMeshes>,
    owner: Entity,
    origin: Vec3,
    velocity: Vec3,
) -> Entity {
    let mut vial = commands.spawn((
        VialProp::new(owner, velocity),
        Transform::from_translation(origin),
        Visibility::default(),
        ArenaEntity,
    ));
    if let Some(meshes) = meshes {
        vial.insert(meshes.vial.bundle());
    }
    vial.id()
}

/// Throw an axe from `origin` on an arc through `target`.
pub fn spawn_axe(
    commands: &mut Commands,
    meshes: Option<&ActorMeshes>,
    owner: Entity,
    origin: Vec3,
    target: Vec3,
) -> Entity {
    let mut axe = commands.spawn((
        ThrownAxe::new(owner, origin, target),
        Transform::from_translation(origin),
        Visibility::default(),
        ArenaEntity,
    ));
    if let Some(meshes) = meshes {
        axe.insert(meshes.axe.bundle());
    }
    debug!("Axe thrown toward {:?}", target);
    axe.id()
}

pub fn spawn_chain(
    commands: &mut Commands,
    meshes: Option<&ActorMeshes>,
    owner: Entity,
    target: Entity,
    origin: Vec3,
) -> Entity {
    let mut chain = commands.spawn((
        Chain::new(owner, target),
        Transform::from_translation(origin),
        Visibility::default(),
        ArenaEntity,
    ));
    if let Some(meshes) = meshes {
        chain.insert(meshes.chain.bundle());
    }
    chain.id()
}
