//! Projectile flight, impact and cleanup systems.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::arrow::{Arrow, ArrowKind, StuckTo};
use super::axe::ThrownAxe;
use super::chain::Chain;
use super::vial::{VialImpact, VialProp};
use crate::combat::{Socket, Sockets};
use crate::core::{Cue, DamageEvent, DamageKind, EffectEvent, ImpulseEvent};
use crate::enemies::EnemyBrain;
use crate::player::{Player, PlayerCombat};
use crate::tuning::projectile;

fn land_bolt(player_query: &mut Query<&mut PlayerCombat>, arrow: &Arrow) {
    if arrow.kind != ArrowKind::Bolt {
        return;
    }
    if let Ok(mut combat) = player_query.get_mut(arrow.owner) {
        combat.bolt_landed();
    }
}

/// Move flying arrows and resolve their first impact.
#[allow(clippy::too_many_arguments)]
pub fn fly_arrows(
    mut commands: Commands,
    time: Res<Time>,
    rapier_context: Query<&RapierContext>,
    mut arrow_query: Query<(Entity, &mut Transform, &mut Arrow), Without<StuckTo>>,
    target_query: Query<(&Transform, Option<&Sockets>), Without<Arrow>>,
    combatant_query: Query<(), Or<(With<EnemyBrain>, With<PlayerCombat>)>>,
    mut player_query: Query<&mut PlayerCombat>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    let context = rapier_context.get_single().ok();
    let dt = time.delta_secs();

    for (entity, mut transform, mut arrow) in arrow_query.iter_mut() {
        let step = arrow.tick(dt);
        if arrow.is_expired() {
            land_bolt(&mut player_query, &arrow);
            commands.entity(entity).despawn_recursive();
            continue;
        }
        if step == Vec3::ZERO {
            continue;
        }

        let hit = context.and_then(|context| {
            context.cast_ray_and_get_normal(
                transform.translation,
                step.normalize(),
                step.length(),
                true,
                QueryFilter::default()
                    .exclude_collider(arrow.owner)
                    .exclude_sensors(),
            )
        });
        let Some((hit_entity, intersection)) = hit.filter(|(hit, _)| arrow.is_valid_hit(*hit))
        else {
            transform.translation += step;
            continue;
        };

        let amount = arrow.strike();
        if amount > 0.0 && combatant_query.contains(hit_entity) {
            damage_events.send(DamageEvent {
                target: hit_entity,
                amount,
                instigator: Some(arrow.owner),
                causer: entity,
                kind: DamageKind::Standard,
            });
        }

        let surface = intersection.point - intersection.normal * projectile::ARROW_SURFACE_DEPTH;
        let stuck = match target_query.get(hit_entity) {
            Ok((target, sockets)) => StuckTo {
                target: Some(hit_entity),
                offset: sockets
                    .and_then(|sockets| sockets.local(Socket::ArrowAnchor))
                    .unwrap_or_else(|| target.compute_affine().inverse().transform_point3(surface)),
            },
            Err(_) => StuckTo {
                target: None,
                offset: surface,
            },
        };
        transform.translation = stuck.world_position(target_query.get(hit_entity).ok().map(|(t, _)| t));
        commands.entity(entity).insert(stuck);
        land_bolt(&mut player_query, &arrow);
        debug!("{:?} stuck in {:?}", arrow.kind, hit_entity);
    }
}

/// Keep stuck arrows on their anchor and clear them out when they age.
pub fn follow_anchors(
    mut commands: Commands,
    time: Res<Time>,
    mut arrow_query: Query<(Entity, &mut Transform, &mut Arrow, &StuckTo)>,
    target_query: Query<&Transform, Without<Arrow>>,
) {
    for (entity, mut transform, mut arrow, stuck) in arrow_query.iter_mut() {
        arrow.tick(time.delta_secs());
        if arrow.is_expired() {
            commands.entity(entity).despawn_recursive();
            continue;
        }

        match stuck.target {
            Some(target) => match target_query.get(target) {
                Ok(target) => transform.translation = stuck.world_position(Some(target)),
                Err(_) => commands.entity(entity).despawn_recursive(),
            },
            None => transform.translation = stuck.world_position(None),
        }
    }
}

/// Orbit thrown axes and apply their single hit.
pub fn fly_axes(
    mut commands: Commands,
    time: Res<Time>,
    mut axe_query: Query<(Entity, &mut Transform, &mut ThrownAxe)>,
    owner_query: Query<&Transform, (With<EnemyBrain>, Without<ThrownAxe>)>,
    player_query: Query<(Entity, &Transform), (With<Player>, Without<ThrownAxe>)>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    let dt = time.delta_secs();
    let player = player_query.get_single().ok();

    for (entity, mut transform, mut axe) in axe_query.iter_mut() {
        let position = axe.step(transform.translation, dt);
        transform.translation = position;
        transform.rotate_local_x(ThrownAxe::spin(dt));

        if let Some((player_entity, player_transform)) = player {
            if axe.try_hit(position, player_transform.translation) {
                damage_events.send(DamageEvent {
                    target: player_entity,
                    amount: projectile::AXE_DAMAGE,
                    instigator: Some(axe.owner),
                    causer: entity,
                    kind: DamageKind::Kick,
                });
            }
        }

        let owner = owner_query.get(axe.owner).ok().map(|owner| owner.translation);
        if axe.is_finished(position, owner) {
            commands.entity(entity).despawn_recursive();
        }
    }
}

/// Stretch chains from the thrower's hand and pull on first contact.
pub fn update_chains(
    mut commands: Commands,
    time: Res<Time>,
    mut chain_query: Query<(Entity, &mut Transform, &mut Chain)>,
    actor_query: Query<(&Transform, Option<&Sockets>), Without<Chain>>,
    mut impulse_events: EventWriter<ImpulseEvent>,
) {
    for (entity, mut transform, mut chain) in chain_query.iter_mut() {
        let (Ok((owner, sockets)), Ok((target, _))) =
            (actor_query.get(chain.owner), actor_query.get(chain.target))
        else {
            commands.entity(entity).despawn_recursive();
            continue;
        };

        let hand = sockets.map_or(owner.translation, |sockets| {
            sockets.world_or_origin(Socket::LeftHand, owner)
        });
        let to_target = target.translation - hand;

        if chain.extend(to_target.length(), time.delta_secs()) {
            impulse_events.send(ImpulseEvent {
                target: chain.target,
                impulse: Chain::pull(hand, target.translation),
                override_velocity: true,
            });
            debug!("Chain caught {:?}", chain.target);
        }
        if chain.is_expired() {
            commands.entity(entity).despawn_recursive();
            continue;
        }

        // Unit-length mesh stretched along the chain
        let direction = to_target.normalize_or_zero();
        transform.translation = hand + direction * chain.length() / 2.0;
        if direction != Vec3::ZERO {
            transform.look_to(direction, Vec3::Y);
        }
        transform.scale = Vec3::new(1.0, 1.0, chain.length().max(1.0));
    }
}

/// Ballistic vial flight, shattering and expiry.
pub fn fly_vials(
    mut commands: Commands,
    time: Res<Time>,
    rapier_context: Query<&RapierContext>,
    mut vial_query: Query<(Entity, &mut Transform, &mut VialProp)>,
    mut player_query: Query<&mut PlayerCombat>,
    mut effects: EventWriter<EffectEvent>,
) {
    let context = rapier_context.get_single().ok();

    for (entity, mut transform, mut vial) in vial_query.iter_mut() {
        let step = vial.tick(time.delta_secs());
        if vial.is_expired() {
            if let Ok(mut combat) = player_query.get_mut(vial.owner) {
                combat.vial_expired();
            }
            commands.entity(entity).despawn_recursive();
            continue;
        }
        if step == Vec3::ZERO {
            continue;
        }

        let direction = step.normalize();
        let hit = context.and_then(|context| {
            context.cast_ray(
                transform.translation,
                direction,
                step.length(),
                true,
                QueryFilter::default()
                    .exclude_collider(vial.owner)
                    .exclude_sensors(),
            )
        });
        let Some((_, toi)) = hit else {
            transform.translation += step;
            continue;
        };

        transform.translation += direction * toi;
        if vial.impact() == VialImpact::Shattered {
            if let Ok(mut combat) = player_query.get_mut(vial.owner) {
                combat.vial_shattered();
            }
            effects.send(EffectEvent::new(Cue::GlassShatter, transform.translation));
            effects.send(EffectEvent::new(Cue::HealingGlyph, transform.translation));
            commands.entity(entity).despawn_recursive();
        }
    }
}
