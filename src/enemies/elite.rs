//! The shielded boss.
//!
//! Builds on the grunt's chase-and-swing loop with a shield that blocks
//! threatening players, a point-blank kick, a thrown axe, a chain pull,
//! grunt summoning and a stomp that punishes players who keep hitting it.
//! Below half health the shield comes off for good and the boss runs
//! faster and further.

use bevy::prelude::*;
use rand::{Rng, RngCore};

use super::brain::{Combatant, EnemyCommand, EnemyTimer, Senses};
use super::perception;
use crate::combat::{can_connect, flat_direction, DamageOutcome, Hit, NavAgent};
use crate::core::{Cue, DamageKind};
use crate::tuning::elite;

/// Action flags and cooldown latches specific to the boss.
#[derive(Debug, Clone, PartialEq)]
pub struct EliteState {
    blocking: bool,
    can_block: bool,
    kicking: bool,
    can_kick: bool,
    summoning: bool,
    can_summon: bool,
    throwing_axe: bool,
    can_throw_axe: bool,
    using_chain: bool,
    can_use_chain: bool,
    stomping: bool,
    can_stomp: bool,
    shield_detached: bool,
}

impl Default for EliteState {
    fn default() -> Self {
        Self {
            blocking: false,
            can_block: true,
            kicking: false,
            can_kick: true,
            summoning: false,
            can_summon: true,
            throwing_axe: false,
            can_throw_axe: true,
            using_chain: false,
            can_use_chain: true,
            stomping: false,
            can_stomp: true,
            shield_detached: false,
        }
    }
}

impl EliteState {
    pub fn is_blocking(&self) -> bool {
        self.blocking
    }

    pub fn is_kicking(&self) -> bool {
        self.kicking
    }

    pub fn is_summoning(&self) -> bool {
        self.summoning
    }

    pub fn is_throwing_axe(&self) -> bool {
        self.throwing_axe
    }

    pub fn is_using_chain(&self) -> bool {
        self.using_chain
    }

    pub fn is_stomping(&self) -> bool {
        self.stomping
    }

    pub fn is_shield_detached(&self) -> bool {
        self.shield_detached
    }

    fn is_busy(&self) -> bool {
        self.kicking || self.summoning || self.throwing_axe || self.using_chain
    }
}

pub(super) fn think(
    core: &mut Combatant,
    state: &mut EliteState,
    senses: &Senses,
    nav: &mut NavAgent,
    rng: &mut dyn RngCore,
) {
    let player = senses.player;
    let target = player.entity();
    let distance = senses.distance;

    if core.stunned {
        core.halt(nav);
        return;
    }

    if player.is_threatening() {
        core.timers
            .cancel_where(|timer| *timer == EnemyTimer::BlockDrop);
        if !state.blocking
            && state.can_block
            && !state.shield_detached
            && distance <= elite::BLOCK_DETECTION
            && !state.throwing_axe
            && !state.summoning
        {
            raise_shield(core, state, senses);
        }
    } else if state.blocking && !core.timers.is_scheduled(&EnemyTimer::BlockDrop) {
        core.timers
            .schedule(elite::BLOCK_DROP_DELAY, EnemyTimer::BlockDrop);
    }

    let (run_stop, run_speed) = if state.shield_detached {
        (elite::ENRAGED_RUN_STOP, elite::ENRAGED_RUN_SPEED)
    } else {
        (elite::RUN_STOP, elite::RUN_SPEED)
    };
    core.walk_speed = if distance > elite::RUN_START && distance <= run_stop {
        run_speed
    } else {
        elite::WALK_SPEED
    };

    if !core.found_player
        && (distance <= elite::DETECTION_RADIUS
            || perception::sweep(
                senses.sight,
                senses.eyes,
                core.forward,
                senses.me,
                target,
                core.profile.sight_rays,
            ))
    {
        core.found_player = true;
        info!("The elite has noticed the player");
    }

    if core.attacking || state.is_busy() {
        core.halt(nav);
    }

    if core.found_player
        && !state.blocking
        && !core.attacking
        && !state.is_busy()
        && distance > elite::RANGED_MIN_DISTANCE
    {
        let roll: u32 = rng.gen_range(0..=100);
        if roll < elite::AXE_CHANCE
            && state.can_throw_axe
            && distance >= elite::AXE_CANCEL_DISTANCE
        {
            lower_shield(core, state);
            throw_axe(core, state);
        } else if state.can_summon && distance > elite::SUMMON_MIN_DISTANCE {
            lower_shield(core, state);
            summon(core, state, rng);
        }
    }

    if core.found_player
        && !state.blocking
        && !core.attacking
        && !state.is_busy()
        && state.can_use_chain
        && distance > core.profile.attack_range
        && distance <= elite::CHAIN_MAX_DISTANCE
    {
        throw_chain(core, state);
    }

    if distance < elite::AXE_CANCEL_DISTANCE {
        state.throwing_axe = false;
    }

    if !core.found_player {
        return;
    }
    if distance > core.profile.stop_radius {
        if core.attacking || state.is_busy() {
            core.halt(nav);
        } else {
            core.chase(nav, target);
        }
        return;
    }

    core.halt(nav);
    if distance > core.profile.attack_range || !core.can_attack || core.attacking {
        return;
    }
    if distance <= core.profile.attack_range - elite::KICK_REACH_MARGIN && state.can_kick {
        lower_shield(core, state);
        kick(core, state, target, player.position());
    } else if !state.kicking {
        lower_shield(core, state);
        if core.start_attack() {
            core.cue(Cue::AxeSwing);
        }
    }
}

pub(super) fn take_damage(core: &mut Combatant, state: &mut EliteState, hit: &Hit) -> DamageOutcome {
    if core.is_dead() || state.stomping {
        return DamageOutcome::default();
    }

    let lifesteal = if state.blocking {
        0.0
    } else {
        elite::HIT_LIFESTEAL
    };
    state.throwing_axe = false;

    let mut amount = hit.amount;
    if state.blocking {
        amount *= elite::BLOCK_DAMAGE_SCALE;
        core.cue(Cue::ShieldBlock);
        if let (Some(instigator), Some(origin)) = (hit.instigator, hit.origin) {
            if flat_direction(core.position, origin).dot(core.forward) > 0.0 {
                kick(core, state, instigator, origin);
            }
        }
    } else {
        core.cue(Cue::TakeDamage);
    }

    let change = core.absorb(amount);
    let outcome = DamageOutcome {
        applied: change.applied,
        died: change.died,
        lifesteal,
    };

    if !state.shield_detached && core.health.fraction() <= elite::SHIELD_DETACH_FRACTION {
        detach_shield(core, state);
    }

    if change.died {
        info!("The elite has fallen");
        core.commands.push(EnemyCommand::DetachAxe);
        core.die();
        return outcome;
    }

    interrupt(core, state);
    core.enter_stun(elite::STUN);
    core.timers
        .reschedule(elite::STOMP_DELAY, EnemyTimer::Stomp);
    outcome
}

pub(super) fn on_timer(
    core: &mut Combatant,
    state: &mut EliteState,
    timer: EnemyTimer,
    target: Option<(Entity, Vec3)>,
) {
    match timer {
        EnemyTimer::KickCooldown => state.can_kick = true,
        EnemyTimer::KickFinish => {
            state.kicking = false;
            core.can_attack = true;
        }
        EnemyTimer::SummonSpawn { offset } => {
            core.commands.push(EnemyCommand::Summon {
                position: core.position + offset,
            });
        }
        EnemyTimer::SummonCooldown => state.can_summon = true,
        EnemyTimer::SummonFinish => state.summoning = false,
        EnemyTimer::AxeRelease => {
            if let (true, Some((entity, _))) = (state.throwing_axe, target) {
                core.commands.push(EnemyCommand::ThrowAxe { target: entity });
                core.cue(Cue::AxeThrow);
            }
        }
        EnemyTimer::AxeThrowEnd => state.throwing_axe = false,
        EnemyTimer::AxeCooldown => state.can_throw_axe = true,
        EnemyTimer::ChainLaunch => {
            if let (true, Some((entity, _))) = (state.using_chain, target) {
                core.commands.push(EnemyCommand::ThrowChain { target: entity });
                core.cue(Cue::ChainThrow);
            }
        }
        EnemyTimer::ChainEnd => state.using_chain = false,
        EnemyTimer::ChainCooldown => state.can_use_chain = true,
        EnemyTimer::BlockEnd | EnemyTimer::BlockDrop => lower_shield(core, state),
        EnemyTimer::BlockCooldown => state.can_block = !state.shield_detached,
        EnemyTimer::Stomp => stomp(core, state, target),
        EnemyTimer::StompEnd => state.stomping = false,
        EnemyTimer::StompCooldown => state.can_stomp = true,
        _ => {}
    }
}

fn raise_shield(core: &mut Combatant, state: &mut EliteState, senses: &Senses) {
    if senses.distance <= core.profile.attack_range {
        let away = flat_direction(core.position, senses.player.position());
        let impulse =
            (away + Vec3::Y * elite::BLOCK_PUSH_LIFT).normalize_or_zero() * elite::BLOCK_PUSH_FORCE;
        core.commands.push(EnemyCommand::Launch {
            target: senses.player.entity(),
            impulse,
            override_velocity: true,
        });
    }
    state.blocking = true;
    state.can_block = false;
    core.timers
        .reschedule(elite::BLOCK_DURATION, EnemyTimer::BlockEnd);
    debug!("Elite raised its shield");
}

fn lower_shield(core: &mut Combatant, state: &mut EliteState) {
    if !state.blocking {
        return;
    }
    state.blocking = false;
    core.timers
        .cancel_where(|timer| matches!(timer, EnemyTimer::BlockEnd | EnemyTimer::BlockDrop));
    core.timers
        .reschedule(elite::BLOCK_COOLDOWN, EnemyTimer::BlockCooldown);
}

fn detach_shield(core: &mut Combatant, state: &mut EliteState) {
    state.shield_detached = true;
    state.blocking = false;
    state.can_block = false;
    core.timers.cancel_where(|timer| {
        matches!(
            timer,
            EnemyTimer::BlockEnd | EnemyTimer::BlockDrop | EnemyTimer::BlockCooldown
        )
    });
    core.cue(Cue::ShieldDetach);
    core.commands.push(EnemyCommand::DetachShield);
    info!("The elite's shield broke away");
}

/// Drop every in-flight action. Cooldowns keep running.
fn interrupt(core: &mut Combatant, state: &mut EliteState) {
    core.timers.cancel_where(EnemyTimer::interrupted_by_stun);
    core.attacking = false;
    core.attack = None;
    state.kicking = false;
    state.summoning = false;
    state.throwing_axe = false;
    state.using_chain = false;
}

/// Instant shove with a fixed stun. Lands at most once per kick.
fn kick(core: &mut Combatant, state: &mut EliteState, target: Entity, at: Vec3) {
    if !core.can_attack || core.is_dead() || core.stunned || core.attacking {
        return;
    }
    state.kicking = true;
    state.can_kick = false;
    core.can_attack = false;

    if can_connect(core.position, core.forward, at, core.profile.attack_range) {
        core.commands.push(EnemyCommand::Strike {
            target,
            amount: elite::KICK_DAMAGE,
            kind: DamageKind::Kick,
        });
    }
    core.timers
        .reschedule(elite::KICK_COOLDOWN, EnemyTimer::KickCooldown);
    core.timers
        .reschedule(elite::KICK_ANIMATION, EnemyTimer::KickFinish);
}

fn throw_axe(core: &mut Combatant, state: &mut EliteState) {
    state.throwing_axe = true;
    state.can_throw_axe = false;
    core.timers.schedule(elite::AXE_RELEASE, EnemyTimer::AxeRelease);
    core.timers
        .schedule(elite::AXE_THROW_END, EnemyTimer::AxeThrowEnd);
    core.timers
        .reschedule(elite::AXE_COOLDOWN, EnemyTimer::AxeCooldown);
    debug!("Elite winding up an axe throw");
}

fn summon(core: &mut Combatant, state: &mut EliteState, rng: &mut dyn RngCore) {
    if state.summoning || core.attacking {
        return;
    }
    state.summoning = true;
    state.can_summon = false;
    core.cue(Cue::Summon);

    for i in 0..elite::SUMMON_COUNT {
        let offset = Vec3::new(
            rng.gen_range(-elite::SUMMON_SPREAD..=elite::SUMMON_SPREAD),
            0.0,
            rng.gen_range(-elite::SUMMON_SPREAD..=elite::SUMMON_SPREAD),
        );
        core.timers.schedule(
            elite::SUMMON_WINDUP + elite::SUMMON_STAGGER * i as f32,
            EnemyTimer::SummonSpawn { offset },
        );
    }
    core.timers
        .reschedule(elite::SUMMON_COOLDOWN, EnemyTimer::SummonCooldown);
    core.timers
        .reschedule(elite::SUMMON_ANIMATION, EnemyTimer::SummonFinish);
    info!("Elite is summoning {} grunts", elite::SUMMON_COUNT);
}

fn throw_chain(core: &mut Combatant, state: &mut EliteState) {
    state.using_chain = true;
    state.can_use_chain = false;
    core.timers
        .schedule(elite::CHAIN_LAUNCH, EnemyTimer::ChainLaunch);
    core.timers.schedule(elite::CHAIN_IN_USE, EnemyTimer::ChainEnd);
    core.timers
        .reschedule(elite::CHAIN_COOLDOWN, EnemyTimer::ChainCooldown);
}

fn stomp(core: &mut Combatant, state: &mut EliteState, target: Option<(Entity, Vec3)>) {
    if state.stomping || !state.can_stomp || core.is_dead() {
        return;
    }
    state.can_stomp = false;
    core.cue(Cue::Stomp);

    if let Some((entity, at)) = target {
        if core.position.distance(at) <= elite::STOMP_RADIUS {
            state.stomping = true;
            core.commands.push(EnemyCommand::Strike {
                target: entity,
                amount: elite::STOMP_DAMAGE,
                kind: DamageKind::Kick,
            });
        }
    }
    core.timers
        .reschedule(elite::STOMP_DURATION, EnemyTimer::StompEnd);
    core.timers
        .reschedule(elite::STOMP_COOLDOWN, EnemyTimer::StompCooldown);
}

#[cfg(test)]
mod tests {
    use super::super::brain::testing::*;
    use super::super::brain::{AiPhase, Behavior, EnemyBrain, EnemyCommand, EnemyTimer};
    use super::EliteState;
    use crate::combat::{Blind, Damageable};
    use crate::core::DamageKind;
    use bevy::prelude::*;

    fn state(rig: &mut Rig) -> &mut EliteState {
        match &mut rig.brain.behavior {
            Behavior::Elite(state) => state,
            Behavior::Grunt => unreachable!("rig holds an elite"),
        }
    }

    fn count(commands: &[EnemyCommand], wanted: impl Fn(&EnemyCommand) -> bool) -> usize {
        commands.iter().filter(|command| wanted(command)).count()
    }

    #[test]
    fn shield_breaks_once_below_half() {
        let mut brain = EnemyBrain::elite();
        brain.take_damage(&hit(1600.0));
        assert_eq!(brain.health().fraction(), 0.6);
        assert!(!brain.elite_state().is_some_and(|s| s.is_shield_detached()));

        brain.take_damage(&hit(600.0));
        assert!(brain.elite_state().is_some_and(|s| s.is_shield_detached()));
        brain.take_damage(&hit(100.0));

        let commands = brain.drain_commands();
        assert_eq!(
            count(&commands, |c| *c == EnemyCommand::DetachShield),
            1
        );
    }

    #[test]
    fn threatening_player_meets_the_shield() {
        let mut rig = Rig::new(EnemyBrain::elite());
        let mut player = snapshot(Vec3::new(0.0, 0.0, -200.0));
        player.attacking = true;

        rig.step(Some(&player), &Blind);
        assert!(state(&mut rig).is_blocking());
        let launch = rig.brain.drain_commands().into_iter().find_map(|c| match c {
            EnemyCommand::Launch {
                impulse,
                override_velocity,
                ..
            } => Some((impulse, override_velocity)),
            _ => None,
        });
        let (impulse, override_velocity) = launch.expect("close player is shoved");
        assert!(override_velocity);
        assert!(impulse.z < 0.0 && impulse.y > 0.0);
        assert!((impulse.length() - 1000.0).abs() < 0.1);

        let outcome = rig.brain.take_damage(&hit(100.0));
        assert!((outcome.applied - 10.0).abs() < 1.0e-4);
        assert_eq!(outcome.lifesteal, 0.0);
        assert_eq!(rig.strikes(), vec![(5.0, DamageKind::Kick)]);
    }

    #[test]
    fn shield_drops_after_the_threat_passes() {
        let mut rig = Rig::new(EnemyBrain::elite());
        let mut player = snapshot(Vec3::new(0.0, 0.0, -200.0));
        player.attacking = true;
        rig.step(Some(&player), &Blind);

        player.attacking = false;
        rig.run(1.4, Some(&player), &Blind);
        assert!(state(&mut rig).is_blocking());
        rig.run(0.2, Some(&player), &Blind);
        assert!(!state(&mut rig).is_blocking());
        assert!(!state(&mut rig).can_block);

        rig.run(2.1, Some(&player), &Blind);
        assert!(state(&mut rig).can_block);
    }

    #[test]
    fn kicks_then_swings_up_close() {
        let mut rig = Rig::new(EnemyBrain::elite());
        let player = snapshot(Vec3::new(0.0, 0.0, -100.0));

        rig.step(Some(&player), &Blind);
        assert_eq!(rig.strikes(), vec![(5.0, DamageKind::Kick)]);
        assert_eq!(rig.brain.phase(), AiPhase::Attacking);

        rig.run(0.5, Some(&player), &Blind);
        assert!(rig.brain.is_attacking());
        assert!(rig
            .brain
            .drain_commands()
            .contains(&EnemyCommand::Cue(crate::core::Cue::AxeSwing)));

        rig.run(1.0, Some(&player), &Blind);
        assert_eq!(rig.strikes(), vec![(90.0, DamageKind::Standard)]);
    }

    #[test]
    fn stun_interrupts_the_swing_and_triggers_a_stomp() {
        let mut rig = Rig::new(EnemyBrain::elite());
        let player = snapshot(Vec3::new(0.0, 0.0, -100.0));
        rig.step(Some(&player), &Blind);
        rig.run(0.5, Some(&player), &Blind);
        assert!(rig.brain.is_attacking());
        rig.brain.drain_commands();

        let outcome = rig.brain.take_damage(&hit(100.0));
        assert_eq!(outcome.lifesteal, 5.0);
        assert!(rig.brain.is_stunned());
        assert!(!rig.brain.is_attacking());
        assert!(!rig.brain.timers().is_scheduled(&EnemyTimer::AttackStrike));
        assert!(rig.brain.timers().is_scheduled(&EnemyTimer::KickCooldown));

        rig.run(0.4, Some(&player), &Blind);
        assert_eq!(rig.strikes(), vec![(10.0, DamageKind::Kick)]);
        assert!(state(&mut rig).is_stomping());
        assert_eq!(rig.brain.take_damage(&hit(100.0)).applied, 0.0);

        rig.run(1.1, Some(&player), &Blind);
        assert!(!state(&mut rig).is_stomping());
        assert!(!rig.brain.is_stunned());
    }

    #[test]
    fn summons_three_grunts_from_afar() {
        let mut rig = Rig::new(EnemyBrain::elite());
        state(&mut rig).can_throw_axe = false;
        let player = snapshot(Vec3::new(0.0, 0.0, -1000.0));

        rig.step(Some(&player), &Blind);
        assert!(state(&mut rig).is_summoning());
        rig.run(3.1, Some(&player), &Blind);

        let spawns: Vec<Vec3> = rig
            .brain
            .drain_commands()
            .into_iter()
            .filter_map(|c| match c {
                EnemyCommand::Summon { position } => Some(position),
                _ => None,
            })
            .collect();
        assert_eq!(spawns.len(), 3);
        assert!(spawns
            .iter()
            .all(|p| p.x.abs() <= 500.0 && p.z.abs() <= 500.0 && p.y == 0.0));
    }

    #[test]
    fn stun_cancels_a_pending_summon() {
        let mut rig = Rig::new(EnemyBrain::elite());
        state(&mut rig).can_throw_axe = false;
        let player = snapshot(Vec3::new(0.0, 0.0, -1000.0));
        rig.step(Some(&player), &Blind);
        assert!(state(&mut rig).is_summoning());

        rig.brain.take_damage(&hit(10.0));
        assert!(!state(&mut rig).is_summoning());
        rig.run(4.0, Some(&player), &Blind);
        let commands = rig.brain.drain_commands();
        assert_eq!(
            count(&commands, |c| matches!(c, EnemyCommand::Summon { .. })),
            0
        );
    }

    #[test]
    fn throws_one_axe_per_cooldown() {
        let mut rig = Rig::new(EnemyBrain::elite());
        state(&mut rig).can_summon = false;
        state(&mut rig).can_use_chain = false;
        let player = snapshot(Vec3::new(0.0, 0.0, -1000.0));

        rig.run(2.5, Some(&player), &Blind);
        let commands = rig.brain.drain_commands();
        assert_eq!(
            count(&commands, |c| matches!(c, EnemyCommand::ThrowAxe { .. })),
            1
        );
    }

    #[test]
    fn chain_reaches_for_mid_range_players() {
        let mut rig = Rig::new(EnemyBrain::elite());
        let player = snapshot(Vec3::new(0.0, 0.0, -300.0));
        rig.step(Some(&player), &Blind);
        assert!(state(&mut rig).is_using_chain());
        assert!(!rig.nav.is_moving());

        rig.run(0.6, Some(&player), &Blind);
        let commands = rig.brain.drain_commands();
        assert_eq!(
            count(&commands, |c| matches!(c, EnemyCommand::ThrowChain { .. })),
            1
        );
    }

    #[test]
    fn runs_faster_once_enraged() {
        let mut rig = Rig::new(EnemyBrain::elite());
        state(&mut rig).can_use_chain = false;
        let near = snapshot(Vec3::new(0.0, 0.0, -300.0));
        rig.step(Some(&near), &Blind);
        assert_eq!(rig.body.max_walk_speed, 300.0);

        let far = snapshot(Vec3::new(0.0, 0.0, -800.0));
        state(&mut rig).can_summon = false;
        state(&mut rig).can_throw_axe = false;
        rig.step(Some(&far), &Blind);
        assert_eq!(rig.body.max_walk_speed, 250.0);

        state(&mut rig).shield_detached = true;
        rig.step(Some(&far), &Blind);
        assert_eq!(rig.body.max_walk_speed, 400.0);
    }

    #[test]
    fn death_detaches_the_axe_and_rewards_later() {
        let mut rig = Rig::new(EnemyBrain::elite());
        let player = snapshot(Vec3::new(0.0, 0.0, -3000.0));

        let outcome = rig.brain.take_damage(&hit(5000.0));
        assert!(outcome.died);
        let commands = rig.brain.drain_commands();
        assert!(commands.contains(&EnemyCommand::DetachAxe));

        rig.run(3.0, Some(&player), &Blind);
        assert!(rig.brain.drain_commands().is_empty());
        rig.run(0.6, Some(&player), &Blind);
        let commands = rig.brain.drain_commands();
        assert!(commands.contains(&EnemyCommand::Ragdoll));
        assert!(commands.contains(&EnemyCommand::HealPlayer(15.0)));
    }
}
