//! The player's combat state machine.
//!
//! [`PlayerCombat`] owns every pool, flag and timer of the player. Input
//! systems call its action methods, `tick_player` advances it once per
//! frame, and whatever it needs from the world (projectiles, facing,
//! cues) is queued as [`PlayerCommand`]s for the dispatch system.

use bevy::prelude::*;
use thiserror::Error;

use super::zone::JudgementZone;
use crate::combat::{
    flat_direction, player_stun, AmmoKind, AttackInstance, AttackKind, DamageOutcome, Damageable,
    Health, Hit, Inventory, MovementBody, PlayerSnapshot, Stamina,
};
use crate::core::{Cue, DamageKind, DisplayHealth, Scheduler};
use crate::projectiles::ArrowKind;
use crate::tuning::{player, REFERENCE_FRAME};

/// Coarse state, as an animation layer would read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerState {
    Neutral,
    Attacking,
    Rolling,
    Jumping,
    Aiming,
    Crouching,
    QuickAttack,
    DamageStun,
    SmashingVial,
    Dead,
}

/// Why an action request was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionBlocked {
    #[error("player is dead")]
    Dead,
    #[error("player is stunned")]
    Stunned,
    #[error("busy {0}")]
    Busy(&'static str),
    #[error("out of stamina")]
    Exhausted,
    #[error("out of ammunition")]
    OutOfAmmo,
    #[error("still on cooldown")]
    Cooldown,
    #[error("cannot do that in the air")]
    Airborne,
    #[error("must be on the ground")]
    NotGrounded,
    #[error("still getting up")]
    NotRecovered,
}

/// The mutually exclusive part of the player's state.
#[derive(Debug, Clone)]
enum Action {
    Idle,
    Attacking { elapsed: f32, swing: AttackInstance },
    Rolling { elapsed: f32, direction: Vec3 },
    Aiming { charge: f32 },
    QuickAttack { falling: bool },
    SmashingVial,
    Stunned,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerTimer {
    ExitStun,
    GetUp,
    ShotEnd,
    ShotReady,
    QuickAttackFire,
    QuickAttackFall,
    QuickAttackEnd,
    VialThrow,
    VialSmashEnd,
    Ragdoll,
}

impl PlayerTimer {
    /// Timers that belong to an action a stun or death interrupts.
    fn is_action(self) -> bool {
        matches!(
            self,
            Self::ShotEnd
                | Self::QuickAttackFire
                | Self::QuickAttackFall
                | Self::QuickAttackEnd
                | Self::VialThrow
                | Self::VialSmashEnd
        )
    }
}

/// Everything the dispatcher needs to aim and launch a projectile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotSpec {
    pub kind: ArrowKind,
    pub damage: f32,
    pub speed: f32,
    pub scale: f32,
    /// Half extent, in pixels, of the target search box
    pub screen_box: f32,
    /// Box centre offset above the crosshair, in pixels
    pub crosshair_lift: f32,
    /// Random per-axis error added to the direction
    pub aim_error: f32,
}

impl ShotSpec {
    pub fn bow() -> Self {
        Self {
            kind: ArrowKind::Arrow,
            damage: player::ARROW_DAMAGE,
            speed: player::ARROW_SPEED,
            scale: 1.0,
            screen_box: player::BOW_SCREEN_BOX,
            crosshair_lift: 0.0,
            aim_error: 0.0,
        }
    }

    pub fn crossbow() -> Self {
        Self {
            kind: ArrowKind::Bolt,
            damage: player::BOLT_DAMAGE,
            speed: player::ARROW_SPEED,
            scale: player::BOLT_SCALE,
            screen_box: player::QUICK_ATTACK_SCREEN_BOX,
            crosshair_lift: player::QUICK_ATTACK_CROSSHAIR_LIFT,
            aim_error: player::QUICK_ATTACK_AIM_ERROR,
        }
    }
}

/// Work the player asks the world to do.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    Cue(Cue),
    /// Turn to face a horizontal direction
    Face(Vec3),
    /// Turn toward the best target inside the crossbow search box
    QuickAim,
    Fire(ShotSpec),
    /// Take back a bolt still in flight
    RecallBolt,
    ThrowVial,
    Died,
}

/// An enemy as the player's auto-facing sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub entity: Entity,
    pub position: Vec3,
    pub alive: bool,
}

/// Per-frame inputs for [`PlayerCombat::tick`].
pub struct PlayerFrame<'a> {
    pub dt: f32,
    pub body: &'a mut MovementBody,
    pub forward: Vec3,
    /// Distance to the living boss, if there is one
    pub boss_distance: Option<f32>,
}

#[derive(Component, Debug)]
pub struct PlayerCombat {
    health: Health,
    display: DisplayHealth,
    pub stamina: Stamina,
    pub inventory: Inventory,
    action: Action,
    jumping: bool,
    crouching: bool,
    sprinting: bool,
    got_up: bool,
    got_kicked: bool,
    halt: bool,
    shooting: bool,
    bow_equipped: bool,
    can_shoot: bool,
    can_throw_vial: bool,
    bolt_in_flight: bool,
    attack_cooldown: f32,
    last_attack: Option<f32>,
    last_jump_press: Option<f32>,
    last_roll_end: Option<f32>,
    move_input: Vec3,
    zone: JudgementZone,
    footstep_timer: f32,
    heartbeat_timer: f32,
    timers: Scheduler<PlayerTimer>,
    commands: Vec<PlayerCommand>,
}

impl Default for PlayerCombat {
    fn default() -> Self {
        Self {
            health: Health::new(player::MAX_HEALTH),
            display: DisplayHealth::eased(player::MAX_HEALTH),
            stamina: Stamina::default(),
            inventory: Inventory::default(),
            action: Action::Idle,
            jumping: false,
            crouching: false,
            sprinting: false,
            got_up: true,
            got_kicked: false,
            halt: false,
            shooting: false,
            bow_equipped: false,
            can_shoot: true,
            can_throw_vial: true,
            bolt_in_flight: false,
            attack_cooldown: player::ATTACK_COOLDOWN,
            last_attack: None,
            last_jump_press: None,
            last_roll_end: None,
            move_input: Vec3::ZERO,
            zone: JudgementZone::default(),
            footstep_timer: 0.0,
            heartbeat_timer: 0.0,
            timers: Scheduler::new(),
            commands: Vec::new(),
        }
    }
}

impl PlayerCombat {
    pub fn state(&self) -> PlayerState {
        match self.action {
            Action::Dead => PlayerState::Dead,
            Action::Stunned => PlayerState::DamageStun,
            Action::Attacking { .. } => PlayerState::Attacking,
            Action::Rolling { .. } => PlayerState::Rolling,
            Action::Aiming { .. } => PlayerState::Aiming,
            Action::QuickAttack { .. } => PlayerState::QuickAttack,
            Action::SmashingVial => PlayerState::SmashingVial,
            Action::Idle if self.jumping => PlayerState::Jumping,
            Action::Idle if self.crouching => PlayerState::Crouching,
            Action::Idle => PlayerState::Neutral,
        }
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn display_health(&self) -> f32 {
        self.display.value
    }

    pub fn is_dead(&self) -> bool {
        matches!(self.action, Action::Dead)
    }

    pub fn is_stunned(&self) -> bool {
        matches!(self.action, Action::Stunned)
    }

    pub fn is_attacking(&self) -> bool {
        matches!(self.action, Action::Attacking { .. })
    }

    pub fn is_rolling(&self) -> bool {
        matches!(self.action, Action::Rolling { .. })
    }

    pub fn is_aiming(&self) -> bool {
        matches!(self.action, Action::Aiming { .. })
    }

    /// Crossbow windup in progress, not counting the fall-back phase.
    pub fn is_quick_attacking(&self) -> bool {
        matches!(self.action, Action::QuickAttack { falling: false })
    }

    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    pub fn is_crouching(&self) -> bool {
        self.crouching
    }

    pub fn is_sprinting(&self) -> bool {
        self.sprinting
    }

    pub fn has_got_up(&self) -> bool {
        self.got_up
    }

    pub fn is_shooting(&self) -> bool {
        self.shooting
    }

    pub fn is_bow_equipped(&self) -> bool {
        self.bow_equipped
    }

    pub fn can_throw_vial(&self) -> bool {
        self.can_throw_vial
    }

    pub fn aim_charge(&self) -> f32 {
        match self.action {
            Action::Aiming { charge } => charge,
            _ => 0.0,
        }
    }

    pub fn time_in_zone(&self) -> f32 {
        self.zone.time_in_zone()
    }

    /// Mouse look is frozen while the crossbow turns the player.
    pub fn camera_locked(&self) -> bool {
        matches!(self.action, Action::QuickAttack { .. } | Action::Dead)
    }

    pub fn timers(&self) -> &Scheduler<PlayerTimer> {
        &self.timers
    }

    pub fn snapshot(&self, entity: Entity, position: Vec3, speed: f32) -> PlayerSnapshot {
        PlayerSnapshot {
            entity,
            position,
            speed,
            attacking: self.is_attacking(),
            aiming: self.is_aiming(),
            quick_attacking: self.is_quick_attacking(),
            dead: self.is_dead(),
        }
    }

    pub fn drain_commands(&mut self) -> Vec<PlayerCommand> {
        std::mem::take(&mut self.commands)
    }

    fn cue(&mut self, cue: Cue) {
        self.commands.push(PlayerCommand::Cue(cue));
    }

    fn guard_alive(&self) -> Result<(), ActionBlocked> {
        match self.action {
            Action::Dead => Err(ActionBlocked::Dead),
            Action::Stunned => Err(ActionBlocked::Stunned),
            _ => Ok(()),
        }
    }

    /// Refuse anything that would overlap another exclusive action.
    fn guard_exclusive(&self) -> Result<(), ActionBlocked> {
        self.guard_alive()?;
        match self.action {
            Action::Attacking { .. } => Err(ActionBlocked::Busy("attacking")),
            Action::Rolling { .. } => Err(ActionBlocked::Busy("rolling")),
            Action::QuickAttack { .. } => Err(ActionBlocked::Busy("firing the crossbow")),
            Action::SmashingVial => Err(ActionBlocked::Busy("smashing a vial")),
            _ => Ok(()),
        }
    }

    /// Walk input in world space. Ignored while an action drives movement.
    pub fn steer(&mut self, body: &mut MovementBody, direction: Vec3) {
        self.move_input = Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero();
        if self.is_attacking() || self.is_rolling() {
            return;
        }
        body.input = self.move_input;
    }

    pub fn set_sprinting(&mut self, sprinting: bool) {
        if sprinting == self.sprinting {
            return;
        }
        if sprinting && self.stamina.current() < player::SPRINT_COST_PER_FRAME {
            return;
        }
        self.sprinting = sprinting;
        self.stamina.pause();
    }

    pub fn set_crouching(&mut self, crouching: bool) -> Result<(), ActionBlocked> {
        self.guard_alive()?;
        self.crouching = crouching;
        Ok(())
    }

    /// Jump key. Rolls on a double tap or when already airborne.
    pub fn jump_pressed(
        &mut self,
        body: &mut MovementBody,
        forward: Vec3,
    ) -> Result<PlayerState, ActionBlocked> {
        let now = self.timers.now();

        if body.is_falling() {
            self.roll(body, forward)?;
            return Ok(PlayerState::Rolling);
        }

        let double_tap = self
            .last_jump_press
            .is_some_and(|last| now - last <= player::ROLL_DOUBLE_TAP);
        if double_tap {
            self.last_jump_press = None;
            self.roll(body, forward)?;
            return Ok(PlayerState::Rolling);
        }

        self.last_jump_press = Some(now);
        self.jump(body, forward)?;
        Ok(PlayerState::Jumping)
    }

    pub fn jump(&mut self, body: &mut MovementBody, forward: Vec3) -> Result<(), ActionBlocked> {
        self.guard_exclusive()?;
        if !body.grounded {
            return Err(ActionBlocked::NotGrounded);
        }
        if !self.stamina.has_any() {
            return Err(ActionBlocked::Exhausted);
        }

        self.stamina.consume(player::JUMP_COST);
        self.jumping = true;

        let forward = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
        let impulse = forward * (body.speed() / player::JUMP_FORWARD_DIVISOR)
            + Vec3::Y * player::JUMP_VERTICAL_FORCE;
        body.launch(impulse, false);
        self.cue(Cue::Jump);
        Ok(())
    }

    pub fn roll(&mut self, body: &mut MovementBody, forward: Vec3) -> Result<(), ActionBlocked> {
        self.guard_exclusive()?;
        if !self.stamina.has_any() {
            return Err(ActionBlocked::Exhausted);
        }
        let now = self.timers.now();
        if self
            .last_roll_end
            .is_some_and(|end| now - end < player::ROLL_COOLDOWN)
        {
            return Err(ActionBlocked::Cooldown);
        }

        self.stamina.consume(player::ROLL_COST);
        self.stop_aiming();
        self.crouching = false;
        self.jumping = false;

        let heading = if self.move_input != Vec3::ZERO {
            self.move_input
        } else {
            Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero()
        };
        let direction = (heading * player::ROLL_HORIZONTAL_WEIGHT
            + Vec3::Y * player::ROLL_VERTICAL_WEIGHT)
            .normalize_or_zero()
            * player::ROLL_SPEED;

        self.action = Action::Rolling {
            elapsed: 0.0,
            direction,
        };
        body.input = heading;
        self.cue(Cue::Roll);
        Ok(())
    }

    fn stop_rolling(&mut self, body: &mut MovementBody) {
        self.action = Action::Idle;
        self.last_roll_end = Some(self.timers.now());
        body.input = self.move_input;
    }

    /// Attack key: shoots when the bow is drawn, swings otherwise.
    pub fn attack_pressed(
        &mut self,
        position: Vec3,
        targets: &[Target],
    ) -> Result<PlayerState, ActionBlocked> {
        if self.is_aiming() {
            self.shoot()?;
            return Ok(PlayerState::Aiming);
        }
        self.start_attack(position, targets)?;
        Ok(PlayerState::Attacking)
    }

    pub fn start_attack(&mut self, position: Vec3, targets: &[Target]) -> Result<(), ActionBlocked> {
        self.guard_exclusive()?;
        if self.is_aiming() {
            return Err(ActionBlocked::Busy("aiming"));
        }
        if !self.got_up {
            return Err(ActionBlocked::NotRecovered);
        }
        let now = self.timers.now();
        let recovery = player::ATTACK_DURATION + self.attack_cooldown + player::ATTACK_GRACE;
        if self.last_attack.is_some_and(|last| now - last < recovery) {
            return Err(ActionBlocked::Cooldown);
        }

        self.last_attack = Some(now);
        let swing = AttackInstance::new(AttackKind::Melee, player::MELEE_DAMAGE).with_timing(
            0.0,
            player::ATTACK_DURATION * player::ATTACK_CREEP_FRACTION,
            self.attack_cooldown,
        );
        self.action = Action::Attacking {
            elapsed: 0.0,
            swing,
        };

        let nearest = targets
            .iter()
            .filter(|target| target.alive)
            .min_by(|a, b| {
                position
                    .distance_squared(a.position)
                    .total_cmp(&position.distance_squared(b.position))
            });
        if let Some(target) = nearest {
            let facing = flat_direction(position, target.position);
            if facing != Vec3::ZERO {
                self.commands.push(PlayerCommand::Face(facing));
            }
        }

        self.cue(Cue::MeleeSwing);
        Ok(())
    }

    /// Hit sphere `(centre, radius)` while the swing is in its active window.
    pub fn melee_sphere(&self, position: Vec3, forward: Vec3) -> Option<(Vec3, f32)> {
        match &self.action {
            Action::Attacking { elapsed, swing } if *elapsed <= swing.active => {
                let forward = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
                let centre = position + forward * (player::MELEE_RANGE / 2.0);
                Some((centre, player::MELEE_RANGE))
            }
            _ => None,
        }
    }

    /// Register the actors currently inside the hit sphere. Returns the
    /// ones this swing has not struck yet, with the damage to apply.
    pub fn melee_sweep(&mut self, candidates: impl IntoIterator<Item = Entity>) -> Vec<(Entity, f32)> {
        let Action::Attacking { swing, .. } = &mut self.action else {
            return Vec::new();
        };
        let damage = swing.damage;
        let hits = swing.strike(candidates);
        for _ in &hits {
            self.inventory.feed_from_melee();
            self.cue(Cue::MeleeHit);
        }
        hits.into_iter().map(|entity| (entity, damage)).collect()
    }

    pub fn start_aiming(&mut self, body: &MovementBody) -> Result<(), ActionBlocked> {
        self.guard_exclusive()?;
        if self.is_aiming() {
            return Ok(());
        }
        if body.is_falling() {
            return Err(ActionBlocked::Busy("falling"));
        }
        if self.inventory.arrows.is_empty() {
            return Err(ActionBlocked::OutOfAmmo);
        }
        self.action = Action::Aiming { charge: 0.0 };
        self.bow_equipped = true;
        self.cue(Cue::BowDraw);
        Ok(())
    }

    /// Lower the bow. Also holsters a bow kept drawn after a shot.
    pub fn stop_aiming(&mut self) {
        if self.is_aiming() {
            self.action = Action::Idle;
        }
        self.bow_equipped = false;
    }

    /// Draw or holster the bow without aiming.
    pub fn toggle_bow(&mut self) -> Result<bool, ActionBlocked> {
        self.guard_exclusive()?;
        if self.is_aiming() {
            return Err(ActionBlocked::Busy("aiming"));
        }
        self.bow_equipped = !self.bow_equipped;
        Ok(self.bow_equipped)
    }

    pub fn shoot(&mut self) -> Result<(), ActionBlocked> {
        self.guard_alive()?;
        if self.aim_charge() < player::AIM_LOCK_CHARGE {
            return Err(ActionBlocked::Busy("drawing the bow"));
        }
        if !self.can_shoot {
            return Err(ActionBlocked::Cooldown);
        }
        if !self.inventory.arrows.take() {
            return Err(ActionBlocked::OutOfAmmo);
        }

        self.can_shoot = false;
        self.shooting = true;
        self.attack_cooldown = player::ATTACK_COOLDOWN_AFTER_SHOT;
        self.timers.schedule(player::SHOT_ANIMATION, PlayerTimer::ShotEnd);
        self.timers.schedule(player::SHOT_COOLDOWN, PlayerTimer::ShotReady);
        self.commands.push(PlayerCommand::Fire(ShotSpec::bow()));
        self.cue(Cue::BowRelease);
        // Every arrow needs a fresh draw; the bow stays in hand
        self.action = Action::Idle;
        Ok(())
    }

    pub fn start_quick_attack(&mut self, body: &mut MovementBody) -> Result<(), ActionBlocked> {
        self.guard_exclusive()?;
        if self.inventory.bolts.is_empty() {
            return Err(ActionBlocked::OutOfAmmo);
        }
        if body.is_falling() {
            return Err(ActionBlocked::Airborne);
        }
        if self.jumping {
            return Err(ActionBlocked::Busy("jumping"));
        }

        self.stop_aiming();
        self.action = Action::QuickAttack { falling: false };
        body.stop();
        self.timers
            .schedule(player::QUICK_ATTACK_FIRE, PlayerTimer::QuickAttackFire);
        self.timers
            .schedule(player::QUICK_ATTACK_FALL, PlayerTimer::QuickAttackFall);
        self.timers
            .schedule(player::QUICK_ATTACK_END, PlayerTimer::QuickAttackEnd);
        self.commands.push(PlayerCommand::QuickAim);
        Ok(())
    }

    /// The bolt in flight hit something or expired.
    pub fn bolt_landed(&mut self) {
        self.bolt_in_flight = false;
    }

    pub fn use_vial(&mut self, body: &mut MovementBody) -> Result<(), ActionBlocked> {
        self.guard_exclusive()?;
        if body.is_falling() {
            return Err(ActionBlocked::Airborne);
        }
        if !self.can_throw_vial {
            return Err(ActionBlocked::Cooldown);
        }
        if self.inventory.vials.is_empty() {
            return Err(ActionBlocked::OutOfAmmo);
        }

        self.stop_aiming();
        self.action = Action::SmashingVial;
        self.can_throw_vial = false;
        body.stop();
        self.timers.schedule(player::VIAL_THROW, PlayerTimer::VialThrow);
        self.timers
            .schedule(player::VIAL_SMASH_END, PlayerTimer::VialSmashEnd);
        Ok(())
    }

    /// The thrown vial shattered on something.
    pub fn vial_shattered(&mut self) {
        self.can_throw_vial = true;
        self.inventory.vials.reset_progress();
        self.stamina.restore(player::VIAL_STAMINA);
    }

    /// The thrown vial came to rest without breaking.
    pub fn vial_expired(&mut self) {
        self.can_throw_vial = true;
    }

    fn enter_stun(&mut self, duration: f32) {
        if self.is_aiming() {
            self.bow_equipped = false;
        }
        let vial_pending = self.timers.is_scheduled(&PlayerTimer::VialThrow);
        self.timers.cancel_where(|timer| timer.is_action());

        if vial_pending {
            self.can_throw_vial = true;
        }
        self.shooting = false;
        if self.bolt_in_flight {
            self.bolt_in_flight = false;
            self.inventory.bolts.refund();
            self.commands.push(PlayerCommand::RecallBolt);
        }

        self.action = Action::Stunned;
        self.timers.reschedule(duration, PlayerTimer::ExitStun);
    }

    fn exit_stun(&mut self) {
        if !self.is_stunned() {
            return;
        }
        self.action = Action::Idle;
        if self.got_kicked {
            self.got_kicked = false;
            self.got_up = false;
            self.timers.schedule(player::GET_UP_DELAY, PlayerTimer::GetUp);
        }
    }

    fn die(&mut self) {
        self.timers.clear();
        self.action = Action::Dead;
        self.jumping = false;
        self.sprinting = false;
        self.crouching = false;
        self.shooting = false;
        self.halt = true;
        self.timers.schedule(player::RAGDOLL_DELAY, PlayerTimer::Ragdoll);
        self.cue(Cue::Death);
        info!("Player died");
    }

    /// Walk speed for the current state.
    pub fn walk_speed(&self) -> f32 {
        match self.action {
            Action::Rolling { .. } => player::ROLL_SPEED,
            Action::Aiming { charge } if charge < player::AIM_LOCK_CHARGE => 0.0,
            Action::Aiming { .. } => player::AIM_RELAXED_SPEED,
            Action::Attacking { .. } => player::ATTACK_CREEP_SPEED,
            _ if self.stamina.is_depleted() => player::EXHAUSTED_SPEED,
            _ if self.sprinting && !self.crouching => player::SPRINT_SPEED,
            _ if self.crouching => player::CROUCH_SPEED,
            _ => player::WALK_SPEED,
        }
    }

    fn movement_allowed(&self) -> bool {
        self.got_up
            && !matches!(
                self.action,
                Action::Stunned | Action::QuickAttack { .. } | Action::SmashingVial | Action::Dead
            )
    }

    pub fn tick(&mut self, frame: PlayerFrame) {
        let PlayerFrame {
            dt,
            body,
            forward,
            boss_distance,
        } = frame;

        self.display.update(dt);

        if !self.is_dead() {
            self.update_heartbeat(dt);
            self.update_stamina(dt, body);
            for kind in self.inventory.tick(dt) {
                self.cue(match kind {
                    AmmoKind::Arrow => Cue::ArrowRestock,
                    AmmoKind::Bolt => Cue::BoltRestock,
                    AmmoKind::Vial => Cue::VialRestock,
                });
            }
            self.update_action(dt, body, forward);
            if self.jumping && body.grounded {
                self.jumping = false;
            }
            self.update_zone(dt, boss_distance);
            self.update_footsteps(dt, body);
        }

        self.timers.advance(dt);
        while let Some(timer) = self.timers.pop_due() {
            self.on_timer(timer, body, forward);
        }

        self.sync_body(body);
    }

    fn update_heartbeat(&mut self, dt: f32) {
        if self.display.value > self.health.maximum() * player::HEARTBEAT_THRESHOLD {
            self.heartbeat_timer = 0.0;
            return;
        }
        self.heartbeat_timer += dt;
        if self.heartbeat_timer >= player::HEARTBEAT_INTERVAL {
            self.heartbeat_timer = 0.0;
            self.cue(Cue::Heartbeat);
        }
    }

    fn update_stamina(&mut self, dt: f32, body: &MovementBody) {
        let report = self.stamina.tick(dt);
        if report.depleted {
            debug!("Stamina depleted");
        }

        if self.sprinting && !self.is_rolling() && body.input != Vec3::ZERO {
            let cost = player::SPRINT_COST_PER_FRAME * dt / REFERENCE_FRAME;
            self.stamina.consume(cost);
            if self.stamina.current() < player::SPRINT_COST_PER_FRAME {
                self.sprinting = false;
            }
        }
    }

    fn update_action(&mut self, dt: f32, body: &mut MovementBody, forward: Vec3) {
        let forward = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
        match &mut self.action {
            Action::Attacking { elapsed, swing } => {
                *elapsed += dt;
                let creeping = *elapsed < swing.active;
                let finished = *elapsed >= player::ATTACK_DURATION;
                body.input = if creeping { forward } else { Vec3::ZERO };
                if finished {
                    self.action = Action::Idle;
                    body.input = self.move_input;
                }
            }
            Action::Rolling { elapsed, direction } => {
                *elapsed += dt;
                body.input = Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero();
                if *elapsed >= player::ROLL_DURATION {
                    self.stop_rolling(body);
                }
            }
            Action::Aiming { charge } => {
                *charge += player::AIM_CHARGE_PER_FRAME * dt / REFERENCE_FRAME;
            }
            _ => {}
        }
    }

    fn update_zone(&mut self, dt: f32, boss_distance: Option<f32>) {
        let penalty = self.zone.apply(boss_distance, dt);
        if !penalty.active {
            return;
        }

        self.stamina.pause();
        self.stamina.drain(penalty.drain);
        if penalty.empty_stamina {
            self.stamina.empty();
        }

        let change = self.health.take_damage(penalty.damage);
        self.display.set_target(self.health.current());
        if change.died {
            self.die();
            self.commands.push(PlayerCommand::Died);
        }
    }

    fn update_footsteps(&mut self, dt: f32, body: &MovementBody) {
        let speed = body.speed();
        let moving = body.grounded && speed > 0.0;
        if !moving || self.is_attacking() || self.is_rolling() || self.jumping {
            self.footstep_timer = 0.0;
            return;
        }
        self.footstep_timer += dt;
        let interval = (player::FOOTSTEP_BASE / speed).clamp(0.0, 1.0) + player::FOOTSTEP_PAD;
        if self.footstep_timer >= interval {
            self.footstep_timer = 0.0;
            self.cue(Cue::Footstep);
        }
    }

    fn on_timer(&mut self, timer: PlayerTimer, body: &mut MovementBody, forward: Vec3) {
        match timer {
            PlayerTimer::ExitStun => self.exit_stun(),
            PlayerTimer::GetUp => self.got_up = true,
            PlayerTimer::ShotEnd => self.shooting = false,
            PlayerTimer::ShotReady => self.can_shoot = true,
            PlayerTimer::QuickAttackFire => {
                if self.can_shoot && self.inventory.bolts.take() {
                    self.bolt_in_flight = true;
                    self.commands.push(PlayerCommand::Fire(ShotSpec::crossbow()));
                    self.cue(Cue::CrossbowFire);
                    let back = -Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
                    body.launch(back * player::BOLT_KNOCKBACK, false);
                }
            }
            PlayerTimer::QuickAttackFall => {
                if let Action::QuickAttack { falling } = &mut self.action {
                    *falling = true;
                }
            }
            PlayerTimer::QuickAttackEnd => {
                if matches!(self.action, Action::QuickAttack { .. }) {
                    self.action = Action::Idle;
                }
            }
            PlayerTimer::VialThrow => {
                if self.inventory.vials.take() {
                    self.commands.push(PlayerCommand::ThrowVial);
                    self.cue(Cue::VialThrow);
                } else {
                    self.can_throw_vial = true;
                }
            }
            PlayerTimer::VialSmashEnd => {
                if matches!(self.action, Action::SmashingVial) {
                    self.action = Action::Idle;
                }
                self.heal(player::VIAL_HEAL);
            }
            PlayerTimer::Ragdoll => self.cue(Cue::Ragdoll),
        }
    }

    fn sync_body(&mut self, body: &mut MovementBody) {
        body.max_walk_speed = self.walk_speed();
        if self.halt {
            self.halt = false;
            body.stop();
        }
        let allowed = self.movement_allowed();
        if allowed && !body.is_enabled() {
            body.enable_walking();
        } else if !allowed && body.is_enabled() {
            body.disable();
        }
    }
}

impl Damageable for PlayerCombat {
    fn take_damage(&mut self, hit: &Hit) -> DamageOutcome {
        if self.is_dead() || self.jumping || self.is_rolling() {
            return DamageOutcome::default();
        }

        let change = self.health.take_damage(hit.amount);
        self.display.set_target(self.health.current());
        self.cue(Cue::TakeDamage);

        let mut outcome = DamageOutcome {
            applied: change.applied,
            died: change.died,
            lifesteal: 0.0,
        };

        if change.died {
            self.die();
            return outcome;
        }

        if hit.kind == DamageKind::Kick {
            self.halt = true;
        }
        if !self.is_stunned() {
            if hit.kind == DamageKind::Kick {
                self.got_kicked = true;
            }
            self.enter_stun(player_stun(hit));
        }
        outcome
    }

    fn heal(&mut self, amount: f32) -> f32 {
        let healed = self.health.heal(amount);
        self.display.set_target(self.health.current());
        healed
    }

    fn is_dead(&self) -> bool {
        self.health.is_dead()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::stamina;

    const DT: f32 = 1.0 / 60.0;

    fn tick(player: &mut PlayerCombat, body: &mut MovementBody, seconds: f32) {
        let frames = (seconds / DT).round() as usize;
        for _ in 0..frames {
            player.tick(PlayerFrame {
                dt: DT,
                body,
                forward: Vec3::NEG_Z,
                boss_distance: None,
            });
        }
    }

    fn ready() -> (PlayerCombat, MovementBody) {
        let mut player = PlayerCombat::default();
        let mut body = MovementBody::new(player::WALK_SPEED);
        tick(&mut player, &mut body, 0.1);
        (player, body)
    }

    fn standard(amount: f32) -> Hit {
        Hit::new(amount, DamageKind::Standard, Entity::from_raw(99))
    }

    fn kick(amount: f32) -> Hit {
        Hit::new(amount, DamageKind::Kick, Entity::from_raw(99))
    }

    fn exclusive_flags(player: &PlayerCombat) -> usize {
        [
            player.is_attacking(),
            player.is_rolling(),
            player.is_aiming(),
            player.is_stunned(),
        ]
        .into_iter()
        .filter(|flag| *flag)
        .count()
    }

    #[test]
    fn roll_with_low_stamina() {
        let (mut player, mut body) = ready();
        player.stamina.consume(player.stamina.current() - 20.0);
        assert_eq!(player.stamina.current(), 20.0);

        player.roll(&mut body, Vec3::NEG_Z).expect("roll allowed");
        assert_eq!(player.stamina.current(), 5.0);
        assert_eq!(player.state(), PlayerState::Rolling);

        tick(&mut player, &mut body, 0.1);
        assert_eq!(body.max_walk_speed, player::ROLL_SPEED);
        assert!(player.is_rolling());

        tick(&mut player, &mut body, 0.75);
        assert_eq!(player.state(), PlayerState::Neutral);
        assert_eq!(body.max_walk_speed, player::WALK_SPEED);
    }

    #[test]
    fn roll_needs_stamina() {
        let (mut player, mut body) = ready();
        player.stamina.consume(stamina::MAX);
        assert_eq!(
            player.roll(&mut body, Vec3::NEG_Z),
            Err(ActionBlocked::Exhausted)
        );
    }

    #[test]
    fn double_tap_rolls() {
        let (mut player, mut body) = ready();
        assert_eq!(
            player.jump_pressed(&mut body, Vec3::NEG_Z),
            Ok(PlayerState::Jumping)
        );
        assert!(player.is_jumping());
        // Still airborne, so the second press rolls.
        assert_eq!(
            player.jump_pressed(&mut body, Vec3::NEG_Z),
            Ok(PlayerState::Rolling)
        );
    }

    #[test]
    fn jump_costs_stamina_and_launches() {
        let (mut player, mut body) = ready();
        let before = player.stamina.current();
        player.jump(&mut body, Vec3::NEG_Z).expect("jump allowed");
        assert_eq!(player.stamina.current(), before - player::JUMP_COST);
        assert!(body.is_falling());
        assert!(player.stamina.is_paused());

        assert_eq!(
            player.jump(&mut body, Vec3::NEG_Z),
            Err(ActionBlocked::NotGrounded)
        );
    }

    #[test]
    fn attack_faces_nearest_living_enemy() {
        let (mut player, _) = ready();
        let near_dead = Target {
            entity: Entity::from_raw(1),
            position: Vec3::new(10.0, 0.0, 0.0),
            alive: false,
        };
        let near = Target {
            entity: Entity::from_raw(2),
            position: Vec3::new(0.0, 0.0, 50.0),
            alive: true,
        };
        let far = Target {
            entity: Entity::from_raw(3),
            position: Vec3::new(0.0, 0.0, -500.0),
            alive: true,
        };

        player
            .start_attack(Vec3::ZERO, &[near_dead, far, near])
            .expect("attack allowed");
        let commands = player.drain_commands();
        assert!(commands.contains(&PlayerCommand::Face(Vec3::Z)));
        assert!(commands.contains(&PlayerCommand::Cue(Cue::MeleeSwing)));
    }

    #[test]
    fn attack_respects_cooldown_and_exclusion() {
        let (mut player, mut body) = ready();
        player.start_attack(Vec3::ZERO, &[]).expect("first swing");
        assert_eq!(
            player.start_attack(Vec3::ZERO, &[]),
            Err(ActionBlocked::Busy("attacking"))
        );
        assert_eq!(
            player.roll(&mut body, Vec3::NEG_Z),
            Err(ActionBlocked::Busy("attacking"))
        );

        tick(&mut player, &mut body, 0.8);
        assert!(!player.is_attacking());
        assert_eq!(
            player.start_attack(Vec3::ZERO, &[]),
            Err(ActionBlocked::Cooldown)
        );

        tick(&mut player, &mut body, 0.4);
        assert!(player.start_attack(Vec3::ZERO, &[]).is_ok());
    }

    #[test]
    fn swing_hits_each_enemy_once() {
        let (mut player, mut body) = ready();
        let grunt = Entity::from_raw(5);
        player.start_attack(Vec3::ZERO, &[]).expect("swing");

        assert!(player.melee_sphere(Vec3::ZERO, Vec3::NEG_Z).is_some());
        assert_eq!(player.melee_sweep([grunt]), vec![(grunt, player::MELEE_DAMAGE)]);
        tick(&mut player, &mut body, DT);
        assert!(player.melee_sweep([grunt]).is_empty());

        tick(&mut player, &mut body, 0.3);
        assert!(player.melee_sphere(Vec3::ZERO, Vec3::NEG_Z).is_none());
    }

    #[test]
    fn melee_hit_speeds_up_restock() {
        let (mut player, _) = ready();
        let before = player.inventory.arrows.elapsed();
        player.start_attack(Vec3::ZERO, &[]).expect("swing");
        player.melee_sweep([Entity::from_raw(5)]);
        assert!(player.inventory.arrows.elapsed() >= before + 15.0 / 4.0);
    }

    #[test]
    fn aiming_locks_then_relaxes_walk_speed() {
        let (mut player, mut body) = ready();
        player.start_aiming(&body).expect("aim");
        tick(&mut player, &mut body, DT);
        assert_eq!(body.max_walk_speed, 0.0);
        assert!(player.is_bow_equipped());

        tick(&mut player, &mut body, 0.6);
        assert!(player.aim_charge() >= player::AIM_LOCK_CHARGE);
        assert_eq!(body.max_walk_speed, player::AIM_RELAXED_SPEED);

        player.stop_aiming();
        assert!(!player.is_bow_equipped());
        assert_eq!(player.toggle_bow(), Ok(true));
    }

    #[test]
    fn shooting_spends_arrows_and_cools_down() {
        let (mut player, mut body) = ready();
        player.start_aiming(&body).expect("aim");
        assert_eq!(
            player.shoot(),
            Err(ActionBlocked::Busy("drawing the bow"))
        );
        tick(&mut player, &mut body, 0.6);

        assert_eq!(
            player.attack_pressed(Vec3::ZERO, &[]),
            Ok(PlayerState::Aiming)
        );
        assert_eq!(player.inventory.arrows.count(), 1);
        assert!(player
            .drain_commands()
            .contains(&PlayerCommand::Fire(ShotSpec::bow())));
        assert!(!player.is_aiming());
        assert!(player.is_bow_equipped());
        assert_eq!(player.aim_charge(), 0.0);

        // A second arrow needs a fresh draw
        assert_eq!(
            player.shoot(),
            Err(ActionBlocked::Busy("drawing the bow"))
        );
        player.start_aiming(&body).expect("aim again");
        tick(&mut player, &mut body, 0.1);
        assert_eq!(
            player.shoot(),
            Err(ActionBlocked::Busy("drawing the bow"))
        );
        tick(&mut player, &mut body, 0.55);
        player.shoot().expect("second arrow");
        assert_eq!(player.inventory.arrows.count(), 0);

        assert_eq!(player.start_aiming(&body), Err(ActionBlocked::OutOfAmmo));
        assert!(!player.is_aiming());
    }

    #[test]
    fn cannot_aim_while_falling() {
        let (mut player, mut body) = ready();
        body.grounded = false;
        assert_eq!(
            player.start_aiming(&body),
            Err(ActionBlocked::Busy("falling"))
        );
        assert!(!player.is_aiming());
        assert!(!player.is_bow_equipped());
    }

    #[test]
    fn rolling_cancels_the_aim() {
        let (mut player, mut body) = ready();
        player.start_aiming(&body).expect("aim");
        player.set_crouching(true).expect("crouch");

        player.roll(&mut body, Vec3::NEG_Z).expect("roll");
        assert!(player.is_rolling());
        assert!(!player.is_aiming());
        assert!(!player.is_bow_equipped());
        assert!(!player.is_crouching());
    }

    #[test]
    fn damage_cancels_actions_and_schedules_one_exit() {
        let (mut player, mut body) = ready();
        player.start_aiming(&body).expect("aim");
        player.take_damage(&standard(10.0));

        assert!(player.is_stunned());
        assert!(!player.is_aiming());
        assert_eq!(exclusive_flags(&player), 1);
        assert!(player.timers().is_scheduled(&PlayerTimer::ExitStun));

        player.take_damage(&standard(10.0));
        assert_eq!(player.timers().len(), 1);
        assert_eq!(player.health().current(), 80.0);

        // 10 damage stuns for 0.5 seconds.
        tick(&mut player, &mut body, 0.45);
        assert!(player.is_stunned());
        assert!(!body.is_enabled());
        tick(&mut player, &mut body, 0.1);
        assert_eq!(player.state(), PlayerState::Neutral);
        assert!(body.is_enabled());
    }

    #[test]
    fn kicks_delay_getting_up() {
        let (mut player, mut body) = ready();
        player.take_damage(&kick(5.0));
        assert!(player.is_stunned());

        tick(&mut player, &mut body, 1.3);
        assert!(!player.is_stunned());
        assert!(!player.has_got_up());
        assert!(!body.is_enabled());
        assert_eq!(
            player.start_attack(Vec3::ZERO, &[]),
            Err(ActionBlocked::NotRecovered)
        );

        tick(&mut player, &mut body, 0.1);
        assert!(player.has_got_up());
        assert!(body.is_enabled());
    }

    #[test]
    fn rolling_and_jumping_ignore_damage() {
        let (mut player, mut body) = ready();
        player.roll(&mut body, Vec3::NEG_Z).expect("roll");
        assert_eq!(player.take_damage(&standard(50.0)), DamageOutcome::default());
        assert_eq!(player.health().current(), player::MAX_HEALTH);
    }

    #[test]
    fn death_happens_once() {
        let (mut player, mut body) = ready();
        let outcome = player.take_damage(&standard(150.0));
        assert!(outcome.died);
        assert_eq!(player.state(), PlayerState::Dead);

        let again = player.take_damage(&standard(10.0));
        assert_eq!(again, DamageOutcome::default());
        assert_eq!(player.heal(50.0), 0.0);

        player.drain_commands();
        tick(&mut player, &mut body, 2.1);
        assert!(player
            .drain_commands()
            .contains(&PlayerCommand::Cue(Cue::Ragdoll)));
        assert!(!body.is_enabled());
    }

    #[test]
    fn quick_attack_fires_after_windup() {
        let (mut player, mut body) = ready();
        player.start_quick_attack(&mut body).expect("quick attack");
        assert!(player.is_quick_attacking());
        assert!(player.camera_locked());
        assert!(player.drain_commands().contains(&PlayerCommand::QuickAim));

        tick(&mut player, &mut body, 0.45);
        assert_eq!(player.inventory.bolts.count(), 1);
        assert!(player
            .drain_commands()
            .contains(&PlayerCommand::Fire(ShotSpec::crossbow())));

        tick(&mut player, &mut body, 0.2);
        assert!(!player.is_quick_attacking());
        assert_eq!(player.state(), PlayerState::QuickAttack);

        tick(&mut player, &mut body, 0.1);
        assert_eq!(player.state(), PlayerState::Neutral);
        assert!(body.is_enabled());
    }

    #[test]
    fn stun_recalls_bolt_in_flight() {
        let (mut player, mut body) = ready();
        player.start_quick_attack(&mut body).expect("quick attack");
        tick(&mut player, &mut body, 0.45);
        assert_eq!(player.inventory.bolts.count(), 1);
        player.drain_commands();

        player.take_damage(&standard(10.0));
        assert_eq!(player.inventory.bolts.count(), 2);
        assert!(player.drain_commands().contains(&PlayerCommand::RecallBolt));
    }

    #[test]
    fn stun_before_release_keeps_the_bolt() {
        let (mut player, mut body) = ready();
        player.start_quick_attack(&mut body).expect("quick attack");
        tick(&mut player, &mut body, 0.2);
        player.take_damage(&standard(10.0));
        tick(&mut player, &mut body, 1.0);
        assert_eq!(player.inventory.bolts.count(), 2);
        assert!(!player
            .drain_commands()
            .contains(&PlayerCommand::Fire(ShotSpec::crossbow())));
    }

    #[test]
    fn vial_heals_and_waits_for_impact() {
        let (mut player, mut body) = ready();
        player.take_damage(&standard(50.0));
        tick(&mut player, &mut body, 1.1);

        player.use_vial(&mut body).expect("vial");
        assert_eq!(player.state(), PlayerState::SmashingVial);
        assert_eq!(player.use_vial(&mut body), Err(ActionBlocked::Busy("smashing a vial")));

        tick(&mut player, &mut body, 0.35);
        assert_eq!(player.state(), PlayerState::Neutral);
        assert_eq!(player.health().current(), 80.0);
        assert_eq!(player.inventory.vials.count(), 1);
        assert!(player.drain_commands().contains(&PlayerCommand::ThrowVial));
        assert_eq!(player.use_vial(&mut body), Err(ActionBlocked::Cooldown));

        player.stamina.consume(100.0);
        let stamina_before = player.stamina.current();
        player.vial_shattered();
        assert!(player.can_throw_vial());
        assert_eq!(player.stamina.current(), stamina_before + player::VIAL_STAMINA);
    }

    #[test]
    fn stun_during_smash_returns_the_gate() {
        let (mut player, mut body) = ready();
        player.use_vial(&mut body).expect("vial");
        player.take_damage(&standard(5.0));
        assert!(player.can_throw_vial());
        tick(&mut player, &mut body, 1.0);
        assert_eq!(player.inventory.vials.count(), 2);
    }

    #[test]
    fn exhaustion_slows_walking() {
        let (mut player, mut body) = ready();
        player.stamina.consume(stamina::MAX);
        tick(&mut player, &mut body, DT);
        assert!(player.stamina.is_depleted());
        assert_eq!(body.max_walk_speed, player::EXHAUSTED_SPEED);

        tick(&mut player, &mut body, 2.1);
        assert!(!player.stamina.is_depleted());
        assert_eq!(body.max_walk_speed, player::WALK_SPEED);
    }

    #[test]
    fn sprinting_drains_until_empty() {
        let (mut player, mut body) = ready();
        player.stamina.consume(stamina::MAX - 5.0);
        player.set_sprinting(true);
        player.steer(&mut body, Vec3::NEG_Z);
        tick(&mut player, &mut body, DT);
        assert_eq!(body.max_walk_speed, player::SPRINT_SPEED);

        tick(&mut player, &mut body, 0.5);
        assert!(!player.is_sprinting());
    }

    #[test]
    fn zone_damage_can_kill() {
        let (mut player, mut body) = ready();
        for _ in 0..6000 {
            player.tick(PlayerFrame {
                dt: DT,
                body: &mut body,
                forward: Vec3::NEG_Z,
                boss_distance: Some(2000.0),
            });
            if player.is_dead() {
                break;
            }
        }
        assert!(player.is_dead());
        assert!(player.drain_commands().contains(&PlayerCommand::Died));
    }

    #[test]
    fn exclusive_actions_never_overlap() {
        let (mut player, mut body) = ready();
        let targets = [];
        for step in 0..600 {
            let _ = match step % 9 {
                0 => player.start_attack(Vec3::ZERO, &targets),
                1 => player.roll(&mut body, Vec3::NEG_Z),
                2 => player.start_aiming(&body),
                3 => player.shoot(),
                4 => player.start_quick_attack(&mut body),
                5 => {
                    player.take_damage(&standard(1.0));
                    player.heal(1.0);
                    Ok(())
                }
                6 => player.use_vial(&mut body),
                7 => {
                    player.stop_aiming();
                    Ok(())
                }
                _ => player.jump_pressed(&mut body, Vec3::NEG_Z).map(|_| ()),
            };
            assert!(exclusive_flags(&player) <= 1);
            tick(&mut player, &mut body, DT);
            body.grounded = true;
            assert!(exclusive_flags(&player) <= 1);
        }
    }
}
