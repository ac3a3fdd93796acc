//! The AI combatant: one core shared by every archetype plus a behavior
//! policy selected per archetype.
//!
//! [`EnemyBrain`] is a plain component. `tick_enemies` feeds it a
//! [`AiFrame`] each frame and drains the [`EnemyCommand`]s it queued.

use bevy::prelude::*;
use rand::RngCore;

use super::elite::{self, EliteState};
use super::grunt;
use crate::combat::{
    can_connect, AttackInstance, AttackKind, CombatStatus, DamageOutcome, Damageable, Health,
    Hit, LineOfSight, MovementBody, NavAgent,
};
use crate::core::{Cue, DamageKind, DisplayHealth, Scheduler};
use crate::tuning::{elite as elite_tuning, grunt as grunt_tuning};

/// Fixed numbers that differ between archetypes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profile {
    pub max_health: f32,
    pub attack_range: f32,
    pub attack_damage: f32,
    pub attack_windup: f32,
    pub attack_cooldown: f32,
    pub attack_animation: f32,
    pub stop_radius: f32,
    pub acceptance: f32,
    pub sight_rays: usize,
    pub walk_speed: f32,
    pub hit_lifesteal: f32,
    pub death_lifesteal: f32,
    /// Delay from death to ragdoll and the player's reward
    pub ragdoll_delay: f32,
}

impl Profile {
    pub const GRUNT: Profile = Profile {
        max_health: grunt_tuning::MAX_HEALTH,
        attack_range: grunt_tuning::ATTACK_RANGE,
        attack_damage: grunt_tuning::ATTACK_DAMAGE,
        attack_windup: grunt_tuning::ATTACK_WINDUP,
        attack_cooldown: grunt_tuning::ATTACK_COOLDOWN,
        attack_animation: grunt_tuning::ATTACK_ANIMATION,
        stop_radius: grunt_tuning::STOP_RADIUS,
        acceptance: grunt_tuning::ACCEPTANCE_RADIUS,
        sight_rays: grunt_tuning::SIGHT_RAYS,
        walk_speed: grunt_tuning::WALK_SPEED,
        hit_lifesteal: grunt_tuning::HIT_LIFESTEAL,
        death_lifesteal: grunt_tuning::DEATH_LIFESTEAL,
        ragdoll_delay: grunt_tuning::RAGDOLL_DELAY,
    };

    pub const ELITE: Profile = Profile {
        max_health: elite_tuning::MAX_HEALTH,
        attack_range: elite_tuning::ATTACK_RANGE,
        attack_damage: elite_tuning::ATTACK_DAMAGE,
        attack_windup: elite_tuning::ATTACK_WINDUP,
        attack_cooldown: elite_tuning::ATTACK_COOLDOWN,
        attack_animation: elite_tuning::ATTACK_ANIMATION,
        stop_radius: elite_tuning::STOP_RADIUS,
        acceptance: elite_tuning::ACCEPTANCE_RADIUS,
        sight_rays: elite_tuning::SIGHT_RAYS,
        walk_speed: elite_tuning::WALK_SPEED,
        hit_lifesteal: elite_tuning::HIT_LIFESTEAL,
        death_lifesteal: elite_tuning::DEATH_LIFESTEAL,
        ragdoll_delay: elite_tuning::DEATH_DELAY,
    };
}

/// Archetype policy.
#[derive(Debug, Clone)]
pub enum Behavior {
    Grunt,
    Elite(EliteState),
}

impl Behavior {
    pub fn profile(&self) -> Profile {
        match self {
            Behavior::Grunt => Profile::GRUNT,
            Behavior::Elite(_) => Profile::ELITE,
        }
    }
}

/// Coarse AI state, as an animation layer would read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AiPhase {
    Seeking,
    Moving,
    Attacking,
    Stunned,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyTimer {
    AttackStrike,
    AttackCooldown,
    AttackFinish,
    ExitStun,
    Ragdoll,
    KickCooldown,
    KickFinish,
    SummonSpawn { offset: Vec3 },
    SummonCooldown,
    SummonFinish,
    AxeRelease,
    AxeThrowEnd,
    AxeCooldown,
    ChainLaunch,
    ChainEnd,
    ChainCooldown,
    BlockEnd,
    BlockDrop,
    BlockCooldown,
    Stomp,
    StompEnd,
    StompCooldown,
}

impl EnemyTimer {
    /// Timers belonging to an action a stun interrupts. Cooldowns and
    /// the stomp survive.
    pub fn interrupted_by_stun(&self) -> bool {
        matches!(
            self,
            Self::AttackStrike
                | Self::AttackFinish
                | Self::KickFinish
                | Self::SummonSpawn { .. }
                | Self::SummonFinish
                | Self::AxeRelease
                | Self::AxeThrowEnd
                | Self::ChainLaunch
                | Self::ChainEnd
        )
    }
}

/// Work an AI asks the world to do.
#[derive(Debug, Clone, PartialEq)]
pub enum EnemyCommand {
    Strike {
        target: Entity,
        amount: f32,
        kind: DamageKind,
    },
    Launch {
        target: Entity,
        impulse: Vec3,
        override_velocity: bool,
    },
    HealPlayer(f32),
    Cue(Cue),
    ThrowAxe { target: Entity },
    ThrowChain { target: Entity },
    Summon { position: Vec3 },
    DetachShield,
    DetachAxe,
    Ragdoll,
}

/// Per-frame inputs for [`EnemyBrain::tick`].
pub struct AiFrame<'a> {
    pub dt: f32,
    pub me: Entity,
    pub position: Vec3,
    pub forward: Vec3,
    /// Origin of the perception sweep
    pub eyes: Vec3,
    pub player: Option<&'a dyn CombatStatus>,
    pub sight: &'a dyn LineOfSight,
    pub nav: &'a mut NavAgent,
    pub body: &'a mut MovementBody,
    pub rng: &'a mut dyn RngCore,
}

/// What a behavior policy sees of the player this frame.
pub(super) struct Senses<'a> {
    pub me: Entity,
    pub eyes: Vec3,
    pub distance: f32,
    pub player: &'a dyn CombatStatus,
    pub sight: &'a dyn LineOfSight,
}

/// State shared by every archetype.
#[derive(Debug)]
pub(super) struct Combatant {
    pub profile: Profile,
    pub health: Health,
    pub display: DisplayHealth,
    pub found_player: bool,
    pub stunned: bool,
    pub can_attack: bool,
    pub attacking: bool,
    pub attack: Option<AttackInstance>,
    pub moving: bool,
    pub bar_visible: bool,
    pub walk_speed: f32,
    /// Last seen player
    pub target: Option<Entity>,
    pub position: Vec3,
    pub forward: Vec3,
    pub timers: Scheduler<EnemyTimer>,
    pub commands: Vec<EnemyCommand>,
}

impl Combatant {
    fn new(profile: Profile) -> Self {
        Self {
            profile,
            health: Health::new(profile.max_health),
            display: DisplayHealth::stepped(profile.max_health),
            found_player: false,
            stunned: false,
            can_attack: true,
            attacking: false,
            attack: None,
            moving: false,
            bar_visible: false,
            walk_speed: profile.walk_speed,
            target: None,
            position: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            timers: Scheduler::new(),
            commands: Vec::new(),
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health.is_dead()
    }

    pub fn cue(&mut self, cue: Cue) {
        self.commands.push(EnemyCommand::Cue(cue));
    }

    pub fn chase(&mut self, nav: &mut NavAgent, target: Entity) {
        nav.move_to(target, self.profile.acceptance);
        self.moving = true;
    }

    pub fn halt(&mut self, nav: &mut NavAgent) {
        nav.stop();
        self.moving = false;
    }

    /// Windup, strike, cooldown, animation end.
    pub fn start_attack(&mut self) -> bool {
        if !self.can_attack || self.is_dead() || self.stunned || self.attacking {
            return false;
        }
        self.can_attack = false;
        self.attacking = true;
        self.attack = Some(
            AttackInstance::new(AttackKind::Melee, self.profile.attack_damage).with_timing(
                self.profile.attack_windup,
                0.0,
                self.profile.attack_cooldown,
            ),
        );
        self.timers
            .reschedule(self.profile.attack_windup, EnemyTimer::AttackStrike);
        self.timers
            .reschedule(self.profile.attack_cooldown, EnemyTimer::AttackCooldown);
        self.timers
            .reschedule(self.profile.attack_animation, EnemyTimer::AttackFinish);
        true
    }

    /// Land the pending swing if the target is still in reach and in front.
    fn strike(&mut self, target: Option<(Entity, Vec3)>) {
        let Some((entity, position)) = target else {
            return;
        };
        if self.is_dead() {
            return;
        }
        let range = self.profile.attack_range;
        let origin = self.position;
        let forward = self.forward;
        let Some(attack) = self.attack.as_mut() else {
            return;
        };
        if can_connect(origin, forward, position, range) && attack.register_hit(entity) {
            let amount = attack.damage;
            self.commands.push(EnemyCommand::Strike {
                target: entity,
                amount,
                kind: DamageKind::Standard,
            });
        }
    }

    pub fn cancel_attack(&mut self) {
        self.timers.cancel_where(|timer| {
            matches!(
                timer,
                EnemyTimer::AttackStrike | EnemyTimer::AttackCooldown | EnemyTimer::AttackFinish
            )
        });
        self.attacking = false;
        self.attack = None;
    }

    /// Apply health loss and the shared cues. Returns the health change.
    pub fn absorb(&mut self, amount: f32) -> crate::combat::HealthChange {
        let change = self.health.take_damage(amount);
        self.display.set_target(self.health.current());
        self.cue(Cue::HitSpark);
        change
    }

    pub fn enter_stun(&mut self, duration: f32) {
        self.stunned = true;
        self.timers.reschedule(duration, EnemyTimer::ExitStun);
    }

    pub fn die(&mut self) {
        self.attacking = false;
        self.attack = None;
        self.stunned = false;
        self.moving = false;
        self.timers.clear();
        self.timers
            .schedule(self.profile.ragdoll_delay, EnemyTimer::Ragdoll);
    }

    /// Handle a timer every archetype shares. Returns false for others.
    fn on_shared_timer(&mut self, timer: EnemyTimer, target: Option<(Entity, Vec3)>) -> bool {
        match timer {
            EnemyTimer::AttackStrike => self.strike(target),
            EnemyTimer::AttackCooldown => {
                self.can_attack = true;
                self.cancel_attack();
            }
            EnemyTimer::AttackFinish => self.attacking = false,
            EnemyTimer::ExitStun => {
                self.stunned = false;
                self.can_attack = true;
            }
            EnemyTimer::Ragdoll => {
                self.commands.push(EnemyCommand::Ragdoll);
                self.commands
                    .push(EnemyCommand::HealPlayer(self.profile.death_lifesteal));
                self.cue(Cue::Death);
            }
            _ => return false,
        }
        true
    }
}

#[derive(Component, Debug)]
pub struct EnemyBrain {
    pub(super) core: Combatant,
    pub(super) behavior: Behavior,
}

impl EnemyBrain {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            core: Combatant::new(behavior.profile()),
            behavior,
        }
    }

    pub fn grunt() -> Self {
        Self::new(Behavior::Grunt)
    }

    pub fn elite() -> Self {
        Self::new(Behavior::Elite(EliteState::default()))
    }

    pub fn profile(&self) -> Profile {
        self.core.profile
    }

    pub fn health(&self) -> &Health {
        &self.core.health
    }

    pub fn display_health(&self) -> f32 {
        self.core.display.value
    }

    pub fn is_health_bar_visible(&self) -> bool {
        self.core.bar_visible
    }

    pub fn is_elite(&self) -> bool {
        matches!(self.behavior, Behavior::Elite(_))
    }

    pub fn elite_state(&self) -> Option<&EliteState> {
        match &self.behavior {
            Behavior::Elite(state) => Some(state),
            Behavior::Grunt => None,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.core.is_dead()
    }

    pub fn is_stunned(&self) -> bool {
        self.core.stunned
    }

    pub fn is_attacking(&self) -> bool {
        self.core.attacking
    }

    pub fn can_attack(&self) -> bool {
        self.core.can_attack
    }

    pub fn has_found_player(&self) -> bool {
        self.core.found_player
    }

    /// Low enough that the next hit will finish it.
    pub fn is_pending_kill(&self) -> bool {
        self.core.health.current() <= grunt_tuning::PENDING_KILL
    }

    pub fn phase(&self) -> AiPhase {
        let kicking = self
            .elite_state()
            .is_some_and(|state| state.is_kicking());
        if self.core.is_dead() {
            AiPhase::Dead
        } else if self.core.stunned {
            AiPhase::Stunned
        } else if self.core.attacking || kicking {
            AiPhase::Attacking
        } else if self.core.moving {
            AiPhase::Moving
        } else {
            AiPhase::Seeking
        }
    }

    pub fn timers(&self) -> &Scheduler<EnemyTimer> {
        &self.core.timers
    }

    pub fn drain_commands(&mut self) -> Vec<EnemyCommand> {
        std::mem::take(&mut self.core.commands)
    }

    pub fn tick(&mut self, frame: AiFrame) {
        let AiFrame {
            dt,
            me,
            position,
            forward,
            eyes,
            player,
            sight,
            nav,
            body,
            rng,
        } = frame;

        let core = &mut self.core;
        core.position = position;
        let flat = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
        if flat != Vec3::ZERO {
            core.forward = flat;
        }
        core.display.update(dt);

        if core.is_dead() {
            if !core.display.is_lerping() {
                core.bar_visible = false;
            }
            core.halt(nav);
            body.disable();
            self.run_timers(dt, None);
            return;
        }

        if core.health.current() < core.health.maximum() {
            core.bar_visible = true;
        }

        let Some(player) = player.filter(|player| !player.is_dead()) else {
            core.halt(nav);
            self.run_timers(dt, None);
            return;
        };

        core.target = Some(player.entity());
        nav.look_at = Some(player.entity());
        let senses = Senses {
            me,
            eyes,
            distance: position.distance(player.position()),
            player,
            sight,
        };

        match &mut self.behavior {
            Behavior::Grunt => grunt::think(core, &senses, nav),
            Behavior::Elite(state) => elite::think(core, state, &senses, nav, rng),
        }

        body.max_walk_speed = self.core.walk_speed;
        self.run_timers(dt, Some((player.entity(), player.position())));
    }

    /// Advance the local clock, then run whatever came due.
    fn run_timers(&mut self, dt: f32, target: Option<(Entity, Vec3)>) {
        self.core.timers.advance(dt);
        while let Some(timer) = self.core.timers.pop_due() {
            if self.core.on_shared_timer(timer, target) {
                continue;
            }
            if let Behavior::Elite(state) = &mut self.behavior {
                elite::on_timer(&mut self.core, state, timer, target);
            }
        }
    }
}

impl Damageable for EnemyBrain {
    fn take_damage(&mut self, hit: &Hit) -> DamageOutcome {
        match &mut self.behavior {
            Behavior::Grunt => grunt::take_damage(&mut self.core, hit),
            Behavior::Elite(state) => elite::take_damage(&mut self.core, state, hit),
        }
    }

    fn heal(&mut self, amount: f32) -> f32 {
        let healed = self.core.health.heal(amount);
        self.core.display.set_target(self.core.health.current());
        healed
    }

    fn is_dead(&self) -> bool {
        self.core.is_dead()
    }
}

#[cfg(test)]
pub(super) mod testing {
    //! Fakes shared by the archetype tests.

    use super::*;
    use crate::combat::PlayerSnapshot;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    pub const DT: f32 = 1.0 / 60.0;

    pub fn me() -> Entity {
        Entity::from_raw(1)
    }

    pub fn player_entity() -> Entity {
        Entity::from_raw(2)
    }

    pub fn snapshot(position: Vec3) -> PlayerSnapshot {
        PlayerSnapshot {
            entity: player_entity(),
            position,
            speed: 0.0,
            attacking: false,
            aiming: false,
            quick_attacking: false,
            dead: false,
        }
    }

    /// Sees the player whenever a ray points straight at it.
    pub struct ClearView {
        pub player: Entity,
        pub at: Vec3,
    }

    impl LineOfSight for ClearView {
        fn first_hit(&self, origin: Vec3, direction: Vec3, max: f32, _: Entity) -> Option<Entity> {
            let to = self.at - origin;
            let aligned = to.normalize_or_zero().dot(direction) > 0.9999;
            (aligned && to.length() <= max).then_some(self.player)
        }
    }

    /// An enemy at the origin facing -Z with everything it needs to tick.
    pub struct Rig {
        pub brain: EnemyBrain,
        pub nav: NavAgent,
        pub body: MovementBody,
        pub rng: StdRng,
    }

    impl Rig {
        pub fn new(brain: EnemyBrain) -> Self {
            let walk = brain.profile().walk_speed;
            Self {
                brain,
                nav: NavAgent::default(),
                body: MovementBody::new(walk),
                rng: StdRng::seed_from_u64(5),
            }
        }

        pub fn step(&mut self, player: Option<&PlayerSnapshot>, sight: &dyn LineOfSight) {
            self.brain.tick(AiFrame {
                dt: DT,
                me: me(),
                position: Vec3::ZERO,
                forward: Vec3::NEG_Z,
                eyes: Vec3::ZERO,
                player: player.map(|p| p as &dyn CombatStatus),
                sight,
                nav: &mut self.nav,
                body: &mut self.body,
                rng: &mut self.rng,
            });
        }

        pub fn run(&mut self, seconds: f32, player: Option<&PlayerSnapshot>, sight: &dyn LineOfSight) {
            let frames = (seconds / DT).round() as usize;
            for _ in 0..frames {
                self.step(player, sight);
            }
        }

        pub fn strikes(&mut self) -> Vec<(f32, DamageKind)> {
            self.brain
                .drain_commands()
                .into_iter()
                .filter_map(|command| match command {
                    EnemyCommand::Strike { amount, kind, .. } => Some((amount, kind)),
                    _ => None,
                })
                .collect()
        }
    }

    pub fn hit(amount: f32) -> Hit {
        Hit::new(amount, DamageKind::Standard, player_entity())
            .from_instigator(player_entity(), Vec3::new(0.0, 0.0, -100.0))
    }
}
