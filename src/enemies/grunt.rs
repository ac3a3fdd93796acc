//! Melee grunt: find the player, walk up, swing.

use bevy::prelude::*;

use super::brain::{Combatant, Senses};
use super::perception;
use crate::combat::{DamageOutcome, Hit, NavAgent};
use crate::core::{Cue, DamageKind};
use crate::tuning::grunt;

pub(super) fn think(core: &mut Combatant, senses: &Senses, nav: &mut NavAgent) {
    let player = senses.player;

    if !core.found_player {
        let noisy =
            senses.distance <= grunt::DETECTION_RADIUS && player.speed() > grunt::DETECTION_SPEED;
        if noisy
            || perception::sweep(
                senses.sight,
                senses.eyes,
                core.forward,
                senses.me,
                player.entity(),
                core.profile.sight_rays,
            )
        {
            core.found_player = true;
            debug!("Grunt {:?} found the player", senses.me);
        }
    }

    if core.stunned {
        core.halt(nav);
        return;
    }
    if !core.found_player {
        return;
    }

    if senses.distance > core.profile.stop_radius {
        if !core.attacking {
            core.chase(nav, player.entity());
        }
    } else {
        core.halt(nav);
        if senses.distance <= core.profile.attack_range {
            core.start_attack();
        }
    }
}

pub(super) fn take_damage(core: &mut Combatant, hit: &Hit) -> DamageOutcome {
    if core.is_dead() {
        return DamageOutcome::default();
    }

    let change = core.absorb(hit.amount);
    core.cue(Cue::TakeDamage);
    let outcome = DamageOutcome {
        applied: change.applied,
        died: change.died,
        lifesteal: core.profile.hit_lifesteal,
    };

    if change.died {
        info!("Grunt died");
        core.die();
        return outcome;
    }

    if core.attacking {
        core.cancel_attack();
    }
    let stun = match hit.kind {
        DamageKind::Kick => grunt::KICK_STUN,
        DamageKind::Standard => grunt::STUN,
    };
    core.enter_stun(stun);
    outcome
}
