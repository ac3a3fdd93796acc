//! Player tick, melee hit detection and command dispatch.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::aim::{pick_screen_target, with_aim_error, AimPoint, ScreenTarget};
use super::combat::{PlayerCombat, PlayerCommand, PlayerFrame, ShotSpec};
use super::components::*;
use crate::arena::ActorMeshes;
use crate::combat::{flat_direction, MovementBody, Socket, Sockets};
use crate::core::{DamageEvent, DamageKind, DeathEvent, EffectEvent, GameRng};
use crate::enemies::EnemyBrain;
use crate::projectiles::{spawn_arrow, spawn_vial, Arrow, ArrowKind, ArrowLaunch};
use crate::tuning::{player, projectile};

/// Advance the player's combat state by one frame.
pub fn tick_player(
    time: Res<Time>,
    mut player_query: Query<(&Transform, &mut PlayerCombat, &mut MovementBody), With<Player>>,
    enemy_query: Query<(&Transform, &EnemyBrain), Without<Player>>,
) {
    let Ok((transform, mut combat, mut body)) = player_query.get_single_mut() else {
        return;
    };

    let boss_distance = enemy_query
        .iter()
        .find(|(_, brain)| brain.is_elite() && !brain.is_dead())
        .map(|(boss, _)| boss.translation.distance(transform.translation));

    combat.tick(PlayerFrame {
        dt: time.delta_secs(),
        body: &mut body,
        forward: transform.forward().as_vec3(),
        boss_distance,
    });
}

/// Sphere overlap in front of the player while a swing is active.
pub fn player_melee(
    rapier_context: Query<&RapierContext>,
    mut player_query: Query<(Entity, &Transform, &mut PlayerCombat), With<Player>>,
    enemy_query: Query<(), With<EnemyBrain>>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    let Ok((player_entity, transform, mut combat)) = player_query.get_single_mut() else {
        return;
    };
    let Some((centre, radius)) = combat.melee_sphere(transform.translation, transform.forward().as_vec3())
    else {
        return;
    };
    let Ok(context) = rapier_context.get_single() else {
        warn!("No physics context, melee check skipped");
        return;
    };

    let mut overlapping = Vec::new();
    context.intersections_with_shape(
        centre,
        Quat::IDENTITY,
        &Collider::ball(radius),
        QueryFilter::default().exclude_collider(player_entity),
        |hit_entity| {
            if enemy_query.get(hit_entity).is_ok() {
                overlapping.push(hit_entity);
            }
            true // Continue checking other entities
        },
    );

    for (target, amount) in combat.melee_sweep(overlapping) {
        damage_events.send(DamageEvent {
            target,
            amount,
            instigator: Some(player_entity),
            causer: player_entity,
            kind: DamageKind::Standard,
        });
    }
}

/// Carry out the world-facing work the player's state machine queued.
#[allow(clippy::too_many_arguments)]
pub fn dispatch_player_commands(
    mut commands: Commands,
    meshes: Option<Res<ActorMeshes>>,
    mut rng: ResMut<GameRng>,
    rapier_context: Query<&RapierContext>,
    mut player_query: Query<(Entity, &mut Transform, &Sockets, &mut PlayerCombat), With<Player>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    enemy_query: Query<(Entity, &Transform, &Sockets, &EnemyBrain), Without<Player>>,
    arrow_query: Query<(Entity, &Arrow)>,
    mut effects: EventWriter<EffectEvent>,
    mut deaths: EventWriter<DeathEvent>,
) {
    let Ok((player_entity, mut transform, sockets, mut combat)) = player_query.get_single_mut()
    else {
        return;
    };
    let pending = combat.drain_commands();
    if pending.is_empty() {
        return;
    }

    let candidates: Vec<(Entity, Vec3)> = enemy_query
        .iter()
        .filter(|(_, _, _, brain)| !brain.is_dead())
        .map(|(entity, enemy_transform, enemy_sockets, _)| {
            (entity, enemy_sockets.world_or_origin(Socket::Neck, enemy_transform))
        })
        .collect();
    let view = camera_query.get_single().ok();

    for command in pending {
        match command {
            PlayerCommand::Cue(cue) => {
                effects.send(EffectEvent::new(cue, transform.translation));
            }
            PlayerCommand::Face(direction) => face(&mut transform, direction),
            PlayerCommand::QuickAim => {
                let spec = ShotSpec::crossbow();
                let Some((camera, camera_transform)) = view else {
                    warn!("No camera, crossbow keeps its heading");
                    continue;
                };
                let targets =
                    project_targets(camera, camera_transform, transform.translation, &candidates);
                let centre = crosshair(camera, spec.crosshair_lift);
                if let Some(target) = centre
                    .and_then(|centre| pick_screen_target(&targets, centre, spec.screen_box))
                {
                    let direction = flat_direction(transform.translation, target.world);
                    face(&mut transform, direction);
                }
            }
            PlayerCommand::Fire(spec) => {
                let origin = sockets.world_or_origin(Socket::RightHand, &transform);
                let forward = transform.forward().as_vec3();
                let aim = match view {
                    Some((camera, camera_transform)) => {
                        let targets = project_targets(
                            camera,
                            camera_transform,
                            transform.translation,
                            &candidates,
                        );
                        let picked = crosshair(camera, spec.crosshair_lift)
                            .and_then(|centre| pick_screen_target(&targets, centre, spec.screen_box))
                            .map(|target| target.world);
                        let look = camera_transform.forward().as_vec3();
                        let surface = rapier_context.get_single().ok().and_then(|context| {
                            context
                                .cast_ray(
                                    camera_transform.translation(),
                                    look,
                                    player::AIM_TRACE_LENGTH,
                                    true,
                                    QueryFilter::default().exclude_collider(player_entity),
                                )
                                .map(|(_, toi)| camera_transform.translation() + look * toi)
                        });
                        AimPoint::resolve(picked, surface, look)
                    }
                    None => AimPoint::Forward(forward),
                };

                let direction = with_aim_error(aim.direction(origin), spec.aim_error, &mut rng.0);
                spawn_arrow(
                    &mut commands,
                    meshes.as_deref(),
                    ArrowLaunch {
                        owner: player_entity,
                        origin,
                        direction,
                        speed: spec.speed,
                        damage: Some(spec.damage),
                        scale: spec.scale,
                        kind: spec.kind,
                    },
                );
                debug!("Fired {:?} toward {:?}", spec.kind, aim);
            }
            PlayerCommand::RecallBolt => {
                for (entity, arrow) in &arrow_query {
                    if arrow.owner == player_entity
                        && arrow.kind == ArrowKind::Bolt
                        && !arrow.has_collided()
                    {
                        commands.entity(entity).despawn_recursive();
                    }
                }
            }
            PlayerCommand::ThrowVial => {
                let origin = sockets.world_or_origin(Socket::RightHand, &transform);
                let lob = (transform.forward().as_vec3() + Vec3::Y * 0.3).normalize_or_zero();
                spawn_vial(
                    &mut commands,
                    meshes.as_deref(),
                    player_entity,
                    origin,
                    lob * projectile::VIAL_LAUNCH_SPEED,
                );
            }
            PlayerCommand::Died => {
                deaths.send(DeathEvent {
                    entity: player_entity,
                    killed_by: None,
                });
            }
        }
    }
}

fn face(transform: &mut Transform, direction: Vec3) {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    if flat.length_squared() > f32::EPSILON {
        transform.look_to(flat, Vec3::Y);
    }
}

/// Crosshair position in viewport pixels, lifted `lift` pixels up.
fn crosshair(camera: &Camera, lift: f32) -> Option<Vec2> {
    camera
        .logical_viewport_size()
        .map(|size| size / 2.0 - Vec2::Y * lift)
}

fn project_targets(
    camera: &Camera,
    camera_transform: &GlobalTransform,
    shooter: Vec3,
    candidates: &[(Entity, Vec3)],
) -> Vec<ScreenTarget> {
    let look = camera_transform.forward().as_vec3();
    candidates
        .iter()
        .filter(|(_, world)| look.dot(*world - camera_transform.translation()) > 0.0)
        .filter_map(|&(entity, world)| {
            let screen = camera.world_to_viewport(camera_transform, world).ok()?;
            Some(ScreenTarget {
                entity,
                screen,
                world,
                distance: shooter.distance(world),
            })
        })
        .collect()
}
