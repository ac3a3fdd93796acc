//! Projectiles module - arrows, bolts, the thrown axe, the chain and vials.

mod arrow;
mod axe;
mod chain;
mod plugin;
mod spawning;
mod systems;
mod vial;

pub use arrow::{Arrow, ArrowKind, ArrowLaunch, StuckTo};
pub use axe::ThrownAxe;
pub use chain::Chain;
pub use plugin::ProjectilePlugin;
pub use spawning::{spawn_arrow, spawn_axe, spawn_chain, spawn_vial};
pub use vial::{VialImpact, VialProp};
