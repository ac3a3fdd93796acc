//! Player module - combat state machine, input, camera and judgement zone.

mod aim;
mod combat;
mod components;
mod movement;
mod plugin;
mod systems;
mod zone;

pub use aim::{pick_screen_target, with_aim_error, AimPoint, ScreenTarget};
pub use combat::{
    ActionBlocked, PlayerCombat, PlayerCommand, PlayerFrame, PlayerState, PlayerTimer, ShotSpec,
    Target,
};
pub use components::*;
pub use movement::spawn_player;
pub use plugin::PlayerPlugin;
pub use zone::{JudgementZone, ZonePenalty};
