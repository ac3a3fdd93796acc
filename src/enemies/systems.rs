//! Enemy AI systems.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::brain::{AiFrame, EnemyBrain, EnemyCommand};
use super::components::{Corpse, Enemy, Gear};
use super::spawning::{spawn_grunt, BodySize};
use crate::arena::{ActorMeshes, ArenaEntity};
use crate::combat::{
    flat_direction, Blind, CombatStatus, LineOfSight, MovementBody, NavAgent, PlayerSnapshot,
    RapierSight, Socket, Sockets,
};
use crate::core::{DamageEvent, EffectEvent, GameRng, HealEvent, ImpulseEvent};
use crate::player::{Player, PlayerCombat};
use crate::projectiles::{spawn_axe, spawn_chain};

/// Run every enemy's decision logic for this frame.
pub fn tick_enemies(
    time: Res<Time>,
    mut rng: ResMut<GameRng>,
    rapier_context: Query<&RapierContext>,
    player_query: Query<(Entity, &Transform, &PlayerCombat, &MovementBody), With<Player>>,
    mut enemy_query: Query<
        (
            Entity,
            &Transform,
            &Sockets,
            &mut EnemyBrain,
            &mut NavAgent,
            &mut MovementBody,
        ),
        Without<Player>,
    >,
) {
    let snapshot: Option<PlayerSnapshot> =
        player_query
            .get_single()
            .ok()
            .map(|(entity, transform, combat, body)| {
                combat.snapshot(entity, transform.translation, body.speed())
            });

    let rapier_sight = rapier_context.get_single().ok().map(RapierSight::new);
    let sight: &dyn LineOfSight = match &rapier_sight {
        Some(sight) => sight,
        None => &Blind,
    };

    let dt = time.delta_secs();
    for (entity, transform, sockets, mut brain, mut nav, mut body) in enemy_query.iter_mut() {
        brain.tick(AiFrame {
            dt,
            me: entity,
            position: transform.translation,
            forward: transform.forward().as_vec3(),
            eyes: sockets.world_or_origin(Socket::Eyes, transform),
            player: snapshot.as_ref().map(|player| player as &dyn CombatStatus),
            sight,
            nav: &mut nav,
            body: &mut body,
            rng: &mut rng.0,
        });
    }
}

/// Turn navigation goals into movement input and keep enemies facing
/// whoever they are focused on.
pub fn steer_agents(
    target_query: Query<&Transform, With<Player>>,
    mut agent_query: Query<
        (&mut Transform, &NavAgent, &mut MovementBody, &EnemyBrain),
        Without<Player>,
    >,
) {
    for (mut transform, nav, mut body, brain) in agent_query.iter_mut() {
        body.input = Vec3::ZERO;
        if brain.is_dead() {
            continue;
        }

        if let Some(goal) = nav.goal().and_then(|goal| target_query.get(goal).ok()) {
            let to_goal = goal.translation - transform.translation;
            let flat = Vec3::new(to_goal.x, 0.0, to_goal.z);
            if flat.length() > nav.acceptance() {
                body.input = flat.normalize_or_zero();
            }
        }

        if brain.is_stunned() {
            continue;
        }
        if let Some(focus) = nav.look_at.and_then(|focus| target_query.get(focus).ok()) {
            let facing = flat_direction(transform.translation, focus.translation);
            if facing != Vec3::ZERO {
                transform.look_to(facing, Vec3::Y);
            }
        }
    }
}

/// Carry out the world-facing work enemy brains queued this frame.
#[allow(clippy::too_many_arguments)]
pub fn dispatch_enemy_commands(
    mut commands: Commands,
    meshes: Option<Res<ActorMeshes>>,
    player_query: Query<(Entity, &Transform), With<Player>>,
    mut enemy_query: Query<(Entity, &Transform, &Sockets, &mut EnemyBrain), Without<Player>>,
    gear_query: Query<(Entity, &Gear, &Parent)>,
    mut damage_events: EventWriter<DamageEvent>,
    mut impulse_events: EventWriter<ImpulseEvent>,
    mut heal_events: EventWriter<HealEvent>,
    mut effects: EventWriter<EffectEvent>,
) {
    let player = player_query.get_single().ok();

    for (entity, transform, sockets, mut brain) in enemy_query.iter_mut() {
        for command in brain.drain_commands() {
            match command {
                EnemyCommand::Strike {
                    target,
                    amount,
                    kind,
                } => {
                    damage_events.send(DamageEvent {
                        target,
                        amount,
                        instigator: Some(entity),
                        causer: entity,
                        kind,
                    });
                }
                EnemyCommand::Launch {
                    target,
                    impulse,
                    override_velocity,
                } => {
                    impulse_events.send(ImpulseEvent {
                        target,
                        impulse,
                        override_velocity,
                    });
                }
                EnemyCommand::HealPlayer(amount) => {
                    if let Some((player_entity, _)) = player {
                        heal_events.send(HealEvent {
                            target: player_entity,
                            amount,
                        });
                    }
                }
                EnemyCommand::Cue(cue) => {
                    effects.send(EffectEvent::new(cue, transform.translation));
                }
                EnemyCommand::ThrowAxe { target } => {
                    let Some((_, player_transform)) = player.filter(|(player, _)| *player == target)
                    else {
                        continue;
                    };
                    spawn_axe(
                        &mut commands,
                        meshes.as_deref(),
                        entity,
                        sockets.world_or_origin(Socket::RightHand, transform),
                        player_transform.translation,
                    );
                }
                EnemyCommand::ThrowChain { target } => {
                    spawn_chain(
                        &mut commands,
                        meshes.as_deref(),
                        entity,
                        target,
                        sockets.world_or_origin(Socket::LeftHand, transform),
                    );
                }
                EnemyCommand::Summon { position } => {
                    let feet = position.y - BodySize::ELITE.standing_offset();
                    let at = Vec3::new(position.x, feet + BodySize::GRUNT.standing_offset(), position.z);
                    spawn_grunt(&mut commands, meshes.as_deref(), at);
                }
                EnemyCommand::DetachShield => drop_gear(&mut commands, &gear_query, entity, Gear::Shield),
                EnemyCommand::DetachAxe => drop_gear(&mut commands, &gear_query, entity, Gear::Axe),
                EnemyCommand::Ragdoll => {
                    commands
                        .entity(entity)
                        .insert((ColliderDisabled, Corpse::default()));
                    effects.send(EffectEvent::new(
                        crate::core::Cue::Ragdoll,
                        transform.translation,
                    ));
                }
            }
        }
    }
}

/// Let a piece of gear fall away from its owner as a physics prop.
fn drop_gear(
    commands: &mut Commands,
    gear_query: &Query<(Entity, &Gear, &Parent)>,
    owner: Entity,
    wanted: Gear,
) {
    for (gear_entity, gear, parent) in gear_query.iter() {
        if parent.get() != owner || *gear != wanted {
            continue;
        }
        commands.entity(gear_entity).remove_parent_in_place().insert((
            RigidBody::Dynamic,
            Collider::cuboid(20.0, 30.0, 5.0),
            Corpse::default(),
            ArenaEntity,
        ));
        debug!("{:?} dropped {:?}", owner, wanted);
    }
}

/// Despawn ragdolls and dropped gear once their timer runs out.
pub fn despawn_corpses(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Corpse, Option<&Enemy>)>,
) {
    for (entity, mut corpse, enemy) in query.iter_mut() {
        corpse.0.tick(time.delta());

        if corpse.0.finished() {
            if enemy.is_some() {
                debug!("Removing enemy corpse {:?}", entity);
            }
            commands.entity(entity).despawn_recursive();
        }
    }
}
