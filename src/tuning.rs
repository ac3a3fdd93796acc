//! Gameplay tuning constants.
//!
//! Units are centimetres, seconds and degrees. The values are the tuned
//! literals of the game and are not meant to be changed at runtime.

/// One reference frame. Per-frame quantities are expressed relative to it.
pub const REFERENCE_FRAME: f32 = 1.0 / 60.0;

pub const GRAVITY: f32 = 980.0;
/// Exponential decay rate of launch momentum while grounded.
pub const GROUND_FRICTION: f32 = 8.0;

pub mod player {
    pub const MAX_HEALTH: f32 = 100.0;
    pub const DISPLAY_HEALTH_SPEED: f32 = 5.0;
    pub const DISPLAY_HEALTH_SNAP: f32 = 0.1;

    pub const WALK_SPEED: f32 = 500.0;
    pub const SPRINT_SPEED: f32 = 800.0;
    pub const CROUCH_SPEED: f32 = 250.0;
    pub const ROLL_SPEED: f32 = 700.0;
    pub const EXHAUSTED_SPEED: f32 = 125.0;
    pub const AIM_RELAXED_SPEED: f32 = 250.0;

    pub const JUMP_COST: f32 = 20.0;
    pub const JUMP_VERTICAL_FORCE: f32 = 650.0;
    pub const JUMP_FORWARD_DIVISOR: f32 = 4.0;

    pub const ROLL_COST: f32 = 15.0;
    pub const ROLL_DURATION: f32 = 0.8;
    pub const ROLL_DOUBLE_TAP: f32 = 0.3;
    pub const ROLL_COOLDOWN: f32 = 0.2;
    pub const ROLL_HORIZONTAL_WEIGHT: f32 = 1100.0;
    pub const ROLL_VERTICAL_WEIGHT: f32 = 200.0;

    /// Stamina spent per reference frame while sprinting.
    pub const SPRINT_COST_PER_FRAME: f32 = 0.5;

    pub const ATTACK_DURATION: f32 = 0.7;
    pub const ATTACK_COOLDOWN: f32 = 0.3;
    pub const ATTACK_COOLDOWN_AFTER_SHOT: f32 = 0.5;
    pub const ATTACK_GRACE: f32 = 0.1;
    pub const ATTACK_CREEP_SPEED: f32 = 100.0;
    pub const ATTACK_CREEP_FRACTION: f32 = 0.3;
    pub const MELEE_RANGE: f32 = 140.0;
    pub const MELEE_DAMAGE: f32 = 80.0;

    /// Aim charge gained per reference frame.
    pub const AIM_CHARGE_PER_FRAME: f32 = 0.15;
    pub const AIM_LOCK_CHARGE: f32 = 5.0;

    pub const ARROW_DAMAGE: f32 = 100.0;
    pub const ARROW_SPEED: f32 = 2500.0;
    pub const SHOT_ANIMATION: f32 = 0.15;
    pub const SHOT_COOLDOWN: f32 = 0.5;
    pub const BOW_SCREEN_BOX: f32 = 50.5;
    pub const AIM_TRACE_LENGTH: f32 = 50_000.0;

    pub const QUICK_ATTACK_SCREEN_BOX: f32 = 800.5;
    pub const QUICK_ATTACK_CROSSHAIR_LIFT: f32 = 118.0;
    pub const QUICK_ATTACK_AIM_ERROR: f32 = 0.1;
    pub const QUICK_ATTACK_FIRE: f32 = 0.4;
    pub const QUICK_ATTACK_FALL: f32 = 0.6;
    pub const QUICK_ATTACK_END: f32 = 0.7;
    pub const BOLT_DAMAGE: f32 = 50.0;
    pub const BOLT_SCALE: f32 = 0.3;
    pub const BOLT_KNOCKBACK: f32 = 300.0;

    pub const STUN_DAMAGE_DIVISOR: f32 = 20.0;
    pub const STUN_MIN: f32 = 0.2;
    pub const STUN_MAX: f32 = 1.0;
    pub const KICK_STUN: f32 = 1.26;
    pub const GET_UP_DELAY: f32 = 0.05;
    pub const RAGDOLL_DELAY: f32 = 2.0;

    pub const VIAL_THROW: f32 = 0.2;
    pub const VIAL_SMASH_END: f32 = 0.3;
    pub const VIAL_HEAL: f32 = 30.0;
    pub const VIAL_STAMINA: f32 = 30.0;

    pub const FOOTSTEP_BASE: f32 = 100.0;
    pub const FOOTSTEP_PAD: f32 = 0.2;
    pub const HEARTBEAT_THRESHOLD: f32 = 0.8;
    pub const HEARTBEAT_INTERVAL: f32 = 0.7;
}

pub mod stamina {
    pub const MAX: f32 = 400.0;
    pub const BASE_REGEN: f32 = 10.0;
    pub const MAX_REGEN: f32 = 60.0;
    pub const REGEN_ACCELERATION: f32 = 0.8;
    pub const PAUSE_COOLDOWN: f32 = 1.5;
    pub const DEPLETION_DELAY: f32 = 2.0;
    pub const RECOVERED_VALUE: f32 = 1.0;
}

pub mod inventory {
    pub const ARROWS: u32 = 2;
    pub const MAX_ARROWS: u32 = 3;
    pub const ARROW_GOAL: f32 = 15.0;

    pub const BOLTS: u32 = 2;
    pub const MAX_BOLTS: u32 = 2;
    pub const BOLT_GOAL: f32 = 5.0;

    pub const VIALS: u32 = 2;
    pub const MAX_VIALS: u32 = 3;
    pub const VIAL_GOAL: f32 = 25.0;

    pub const MELEE_ARROW_DIVISOR: f32 = 4.0;
    pub const MELEE_BOLT_DIVISOR: f32 = 4.0;
    pub const MELEE_VIAL_DIVISOR: f32 = 8.0;
}

/// Reach of Judgement: escalating punishment for straying from the boss.
pub mod zone {
    pub const OUTER: f32 = 1000.0;
    pub const MIDDLE: f32 = 1200.0;
    pub const INNER: f32 = 1600.0;

    pub const OUTER_DAMAGE: f32 = 0.2;
    pub const OUTER_DAMAGE_GROWTH: f32 = 0.1;
    pub const OUTER_DRAIN: f32 = 0.2;
    pub const OUTER_DRAIN_GROWTH: f32 = 0.05;

    pub const MIDDLE_DAMAGE: f32 = 1.0;
    pub const MIDDLE_DAMAGE_GROWTH: f32 = 0.15;
    pub const MIDDLE_DRAIN: f32 = 1.0;
    pub const MIDDLE_DRAIN_GROWTH: f32 = 0.1;

    pub const INNER_DAMAGE: f32 = 10.0;
    pub const INNER_DAMAGE_GROWTH: f32 = 0.2;
}

pub mod grunt {
    pub const MAX_HEALTH: f32 = 100.0;
    pub const ATTACK_RANGE: f32 = 100.0;
    pub const ATTACK_DAMAGE: f32 = 45.0;
    pub const ATTACK_WINDUP: f32 = 0.1;
    pub const ATTACK_COOLDOWN: f32 = 2.0;
    pub const ATTACK_ANIMATION: f32 = 1.0;
    pub const STUN: f32 = 1.0;
    pub const KICK_STUN: f32 = 2.0;
    pub const DETECTION_RADIUS: f32 = 1600.0;
    pub const DETECTION_SPEED: f32 = 300.0;
    pub const STOP_RADIUS: f32 = 100.0;
    pub const ACCEPTANCE_RADIUS: f32 = 5.0;
    pub const SIGHT_RAYS: usize = 1000;
    pub const WALK_SPEED: f32 = 500.0;
    pub const PENDING_KILL: f32 = 15.0;
    pub const RAGDOLL_DELAY: f32 = 0.5;
    pub const HIT_LIFESTEAL: f32 = 1.0;
    pub const DEATH_LIFESTEAL: f32 = 15.0;

    pub const DISPLAY_LERP: f32 = 0.02;
    pub const DISPLAY_LERP_SLOW: f32 = 0.01;
    pub const DISPLAY_SLOW_GAP: f32 = 50.0;
    pub const DISPLAY_SNAP: f32 = 5.0;
    pub const DISPLAY_SNAP_FINE: f32 = 0.1;
    pub const DISPLAY_FINE_GAP: f32 = 75.0;
}

pub mod elite {
    pub const MAX_HEALTH: f32 = 4000.0;
    pub const ATTACK_RANGE: f32 = 250.0;
    pub const ATTACK_DAMAGE: f32 = 90.0;
    pub const ATTACK_WINDUP: f32 = 1.0;
    pub const ATTACK_COOLDOWN: f32 = 2.0;
    pub const ATTACK_ANIMATION: f32 = 1.0;

    pub const KICK_COOLDOWN: f32 = 6.0;
    pub const KICK_ANIMATION: f32 = 0.4;
    pub const KICK_DAMAGE: f32 = 5.0;
    pub const KICK_REACH_MARGIN: f32 = 20.0;

    pub const SUMMON_WINDUP: f32 = 3.0;
    pub const SUMMON_COOLDOWN: f32 = 8.0;
    pub const SUMMON_ANIMATION: f32 = 3.0;
    pub const SUMMON_COUNT: usize = 3;
    pub const SUMMON_SPREAD: f32 = 500.0;
    pub const SUMMON_STAGGER: f32 = 0.01;
    pub const SUMMON_MIN_DISTANCE: f32 = 650.0;

    pub const AXE_COOLDOWN: f32 = 6.0;
    pub const AXE_RELEASE: f32 = 1.0;
    pub const AXE_THROW_END: f32 = 2.0;
    pub const AXE_CANCEL_DISTANCE: f32 = 600.0;
    /// Percent chance, rolled on 0..=100, of preferring the axe each tick.
    pub const AXE_CHANCE: u32 = 50;
    pub const RANGED_MIN_DISTANCE: f32 = 350.0;

    pub const CHAIN_LAUNCH: f32 = 0.5;
    pub const CHAIN_IN_USE: f32 = 2.5;
    pub const CHAIN_COOLDOWN: f32 = 8.0;
    pub const CHAIN_MAX_DISTANCE: f32 = 1200.0;

    pub const BLOCK_DURATION: f32 = 5.0;
    pub const BLOCK_COOLDOWN: f32 = 2.0;
    pub const BLOCK_DETECTION: f32 = 1200.0;
    pub const BLOCK_DROP_DELAY: f32 = 1.5;
    pub const BLOCK_PUSH_FORCE: f32 = 1000.0;
    pub const BLOCK_PUSH_LIFT: f32 = 0.5;
    pub const BLOCK_DAMAGE_SCALE: f32 = 0.1;

    pub const STUN: f32 = 0.7;
    pub const STOMP_DELAY: f32 = 0.35;
    pub const STOMP_RADIUS: f32 = 250.0;
    pub const STOMP_DAMAGE: f32 = 10.0;
    pub const STOMP_DURATION: f32 = 1.0;
    pub const STOMP_COOLDOWN: f32 = 5.0;

    pub const SHIELD_DETACH_FRACTION: f32 = 0.5;

    pub const DETECTION_RADIUS: f32 = 2000.0;
    pub const STOP_RADIUS: f32 = 150.0;
    pub const SIGHT_RAYS: usize = 500;
    pub const WALK_SPEED: f32 = 250.0;
    pub const RUN_SPEED: f32 = 300.0;
    pub const ENRAGED_RUN_SPEED: f32 = 400.0;
    pub const RUN_START: f32 = 150.0;
    pub const RUN_STOP: f32 = 400.0;
    pub const ENRAGED_RUN_STOP: f32 = 900.0;
    pub const ACCEPTANCE_RADIUS: f32 = 5.0;

    pub const HIT_LIFESTEAL: f32 = 5.0;
    pub const DEATH_LIFESTEAL: f32 = 15.0;
    pub const DEATH_DELAY: f32 = 3.5;
}

pub mod perception {
    pub const FOV_DEGREES: f32 = 90.0;
    pub const SIGHT_LENGTH: f32 = 5000.0;
    pub const EYE_HEIGHT: f32 = 70.0;
}

pub mod projectile {
    pub const ARROW_DEFAULT_DAMAGE: f32 = 70.0;
    pub const ARROW_SURFACE_DEPTH: f32 = 5.0;
    pub const ARROW_LIFETIME: f32 = 10.0;
    pub const ARROW_STUCK_LIFETIME: f32 = 20.0;

    pub const AXE_ORBIT_DEGREES: f32 = 300.0;
    pub const AXE_SPIN_DEGREES: f32 = 2160.0;
    pub const AXE_DAMAGE: f32 = 50.0;
    pub const AXE_HIT_RADIUS: f32 = 150.0;
    pub const AXE_RETURN_RADIUS: f32 = 300.0;
    pub const AXE_MIN_FLIGHT: f32 = 0.5;
    pub const AXE_TIMEOUT: f32 = 3.0;

    pub const CHAIN_SPEED: f32 = 3000.0;
    pub const CHAIN_MAX_LENGTH: f32 = 1200.0;
    pub const CHAIN_LIFETIME: f32 = 2.0;
    pub const CHAIN_PULL_FORCE: f32 = 1000.0;

    pub const VIAL_LAUNCH_SPEED: f32 = 600.0;
    pub const VIAL_GRAVITY: f32 = 980.0;
    pub const VIAL_LIFETIME: f32 = 5.0;
    pub const VIAL_SHATTER_IMPULSE: f32 = 50.0;
}
