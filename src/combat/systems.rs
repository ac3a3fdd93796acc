//! Combat routing - damage, healing, launches and body integration.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::body::MovementBody;
use super::damage::{Damageable, Hit};
use crate::core::{DamageEvent, DeathEvent, GameState, HealEvent, ImpulseEvent};
use crate::enemies::EnemyBrain;
use crate::player::PlayerCombat;

/// System set ordering for combat.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CombatSet {
    /// Read devices into player state
    Input,
    /// Advance actor clocks and decide what to do
    Think,
    /// Apply damage, heals and launches; move bodies
    Resolve,
    /// Turn queued commands into world changes
    Feedback,
}

/// Configure combat systems.
pub fn setup_combat_systems(app: &mut App) {
    app.configure_sets(
        Update,
        (
            CombatSet::Input,
            CombatSet::Think,
            CombatSet::Resolve,
            CombatSet::Feedback,
        )
            .chain()
            .run_if(in_state(GameState::InGame)),
    )
    .add_systems(
        Update,
        (route_damage, route_heals, route_impulses, integrate_bodies)
            .chain()
            .in_set(CombatSet::Resolve),
    );
}

/// Hand each damage event to the combatant that owns its target.
pub fn route_damage(
    mut damage_events: EventReader<DamageEvent>,
    mut combatant_query: Query<(Option<&mut EnemyBrain>, Option<&mut PlayerCombat>)>,
    transform_query: Query<&Transform>,
    mut death_events: EventWriter<DeathEvent>,
    mut heal_events: EventWriter<HealEvent>,
) {
    for event in damage_events.read() {
        let mut hit = Hit::from(event);
        if let Some(instigator) = event.instigator {
            if let Ok(transform) = transform_query.get(instigator) {
                hit = hit.from_instigator(instigator, transform.translation);
            }
        }

        let outcome = match combatant_query.get_mut(event.target) {
            Ok((Some(mut brain), _)) => brain.take_damage(&hit),
            Ok((None, Some(mut player))) => player.take_damage(&hit),
            _ => continue,
        };

        if outcome.died {
            info!("{:?} killed by {:?}", event.target, event.instigator);
            death_events.send(DeathEvent {
                entity: event.target,
                killed_by: event.instigator,
            });
        }
        if let Some(instigator) = event.instigator {
            if outcome.lifesteal > 0.0 {
                heal_events.send(HealEvent {
                    target: instigator,
                    amount: outcome.lifesteal,
                });
            }
        }
    }
}

pub fn route_heals(
    mut heal_events: EventReader<HealEvent>,
    mut combatant_query: Query<(Option<&mut EnemyBrain>, Option<&mut PlayerCombat>)>,
) {
    for event in heal_events.read() {
        let healed = match combatant_query.get_mut(event.target) {
            Ok((Some(mut brain), _)) => brain.heal(event.amount),
            Ok((None, Some(mut player))) => player.heal(event.amount),
            _ => continue,
        };
        if healed > 0.0 {
            debug!("{:?} healed {:.1}", event.target, healed);
        }
    }
}

pub fn route_impulses(
    mut impulse_events: EventReader<ImpulseEvent>,
    mut body_query: Query<&mut MovementBody>,
) {
    for event in impulse_events.read() {
        if let Ok(mut body) = body_query.get_mut(event.target) {
            body.launch(event.impulse, event.override_velocity);
        }
    }
}

/// Feed each body's motion to its character controller.
pub fn integrate_bodies(
    time: Res<Time>,
    mut body_query: Query<(
        &mut MovementBody,
        &mut KinematicCharacterController,
        Option<&KinematicCharacterControllerOutput>,
    )>,
) {
    let dt = time.delta_secs();
    for (mut body, mut controller, output) in body_query.iter_mut() {
        if let Some(output) = output {
            body.sync_ground(output.grounded);
        }
        controller.translation = Some(body.integrate(dt));
    }
}
