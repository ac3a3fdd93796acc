//! Resource pools shared by every combatant.

use crate::tuning::{inventory, stamina};

/// Health with a one-way death latch.
#[derive(Debug, Clone, PartialEq)]
pub struct Health {
    current: f32,
    maximum: f32,
    dead: bool,
}

/// Result of applying damage to a [`Health`] pool.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HealthChange {
    /// Health actually removed
    pub applied: f32,
    /// True only on the hit that crossed zero
    pub died: bool,
}

impl Health {
    pub fn new(maximum: f32) -> Self {
        Self {
            current: maximum,
            maximum,
            dead: false,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn maximum(&self) -> f32 {
        self.maximum
    }

    pub fn fraction(&self) -> f32 {
        if self.maximum > 0.0 {
            self.current / self.maximum
        } else {
            0.0
        }
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Remove health, clamped at zero. Damage after death is ignored.
    pub fn take_damage(&mut self, amount: f32) -> HealthChange {
        if self.dead || amount <= 0.0 {
            return HealthChange::default();
        }

        let before = self.current;
        self.current = (self.current - amount).clamp(0.0, self.maximum);
        let died = self.current <= 0.0;
        self.dead = died;

        HealthChange {
            applied: before - self.current,
            died,
        }
    }

    /// Restore health, clamped at max. Returns the amount actually healed.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if self.dead || amount <= 0.0 {
            return 0.0;
        }
        let before = self.current;
        self.current = (self.current + amount).min(self.maximum);
        self.current - before
    }
}

/// Stamina with accelerating regeneration, a pause cooldown and a
/// depletion sub-state.
#[derive(Debug, Clone, PartialEq)]
pub struct Stamina {
    current: f32,
    maximum: f32,
    regen_rate: f32,
    paused: bool,
    pause_timer: f32,
    depleted: bool,
    depletion_timer: f32,
}

/// What happened during one [`Stamina::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StaminaTick {
    pub depleted: bool,
    pub recovered: bool,
}

impl Default for Stamina {
    fn default() -> Self {
        Self::new(stamina::MAX)
    }
}

impl Stamina {
    pub fn new(maximum: f32) -> Self {
        Self {
            current: maximum,
            maximum,
            regen_rate: stamina::BASE_REGEN,
            paused: false,
            pause_timer: 0.0,
            depleted: false,
            depletion_timer: 0.0,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn maximum(&self) -> f32 {
        self.maximum
    }

    pub fn regen_rate(&self) -> f32 {
        self.regen_rate
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_depleted(&self) -> bool {
        self.depleted
    }

    /// Enough stamina to start an action. Nothing counts until depletion ends.
    pub fn has_any(&self) -> bool {
        !self.depleted && self.current > 0.0
    }

    /// Stop regenerating for the pause cooldown and reset the accelerator.
    pub fn pause(&mut self) {
        self.paused = true;
        self.pause_timer = 0.0;
        self.regen_rate = stamina::BASE_REGEN;
    }

    /// Spend stamina, never going below zero. Always pauses regeneration.
    pub fn consume(&mut self, amount: f32) {
        self.current = (self.current - amount.max(0.0)).max(0.0);
        self.pause();
    }

    /// Drain without pausing, used by environmental effects.
    pub fn drain(&mut self, amount: f32) {
        self.current = (self.current - amount.max(0.0)).max(0.0);
    }

    pub fn empty(&mut self) {
        self.current = 0.0;
    }

    pub fn restore(&mut self, amount: f32) {
        self.current = (self.current + amount.max(0.0)).min(self.maximum);
    }

    pub fn tick(&mut self, dt: f32) -> StaminaTick {
        let mut report = StaminaTick::default();

        if self.paused {
            self.pause_timer += dt;
            if self.pause_timer >= stamina::PAUSE_COOLDOWN {
                self.paused = false;
                self.pause_timer = 0.0;
            }
        }

        if self.current <= 0.0 && !self.depleted {
            self.pause();
            self.current = 0.0;
            self.depleted = true;
            self.depletion_timer = 0.0;
            report.depleted = true;
        }

        if self.depleted {
            self.depletion_timer += dt;
            if self.depletion_timer >= stamina::DEPLETION_DELAY {
                self.current = stamina::RECOVERED_VALUE;
                self.depleted = false;
                self.depletion_timer = 0.0;
                report.recovered = true;
            }
        } else if !self.paused {
            self.regen_rate =
                (self.regen_rate + stamina::REGEN_ACCELERATION * dt).min(stamina::MAX_REGEN);
            self.current = (self.current + self.regen_rate * dt).min(self.maximum);
        }

        report
    }
}

/// A regenerating ammunition count.
#[derive(Debug, Clone, PartialEq)]
pub struct AmmoCounter {
    count: u32,
    maximum: u32,
    elapsed: f32,
    goal: f32,
}

impl AmmoCounter {
    pub fn new(count: u32, maximum: u32, goal: f32) -> Self {
        Self {
            count: count.min(maximum),
            maximum,
            elapsed: 0.0,
            goal,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn maximum(&self) -> u32 {
        self.maximum
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn goal(&self) -> f32 {
        self.goal
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count >= self.maximum
    }

    /// Use one unit. Resets the regeneration counter.
    pub fn take(&mut self) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count -= 1;
        self.elapsed = 0.0;
        true
    }

    /// Give back one unit that was taken but never used.
    pub fn refund(&mut self) {
        self.count = (self.count + 1).min(self.maximum);
    }

    /// Add progress toward the next unit without waiting for it.
    pub fn boost(&mut self, seconds: f32) {
        if !self.is_full() {
            self.elapsed += seconds.max(0.0);
        }
    }

    pub fn reset_progress(&mut self) {
        self.elapsed = 0.0;
    }

    /// Returns true when a unit was regenerated this tick.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.is_full() {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed > self.goal {
            self.count += 1;
            self.elapsed = 0.0;
            return true;
        }
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmmoKind {
    Arrow,
    Bolt,
    Vial,
}

/// Arrows, crossbow bolts and healing vials.
#[derive(Debug, Clone, PartialEq)]
pub struct Inventory {
    pub arrows: AmmoCounter,
    pub bolts: AmmoCounter,
    pub vials: AmmoCounter,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            arrows: AmmoCounter::new(
                inventory::ARROWS,
                inventory::MAX_ARROWS,
                inventory::ARROW_GOAL,
            ),
            bolts: AmmoCounter::new(inventory::BOLTS, inventory::MAX_BOLTS, inventory::BOLT_GOAL),
            vials: AmmoCounter::new(inventory::VIALS, inventory::MAX_VIALS, inventory::VIAL_GOAL),
        }
    }
}

impl Inventory {
    pub fn get(&self, kind: AmmoKind) -> &AmmoCounter {
        match kind {
            AmmoKind::Arrow => &self.arrows,
            AmmoKind::Bolt => &self.bolts,
            AmmoKind::Vial => &self.vials,
        }
    }

    pub fn get_mut(&mut self, kind: AmmoKind) -> &mut AmmoCounter {
        match kind {
            AmmoKind::Arrow => &mut self.arrows,
            AmmoKind::Bolt => &mut self.bolts,
            AmmoKind::Vial => &mut self.vials,
        }
    }

    /// Advance every counter, returning the kinds that restocked.
    pub fn tick(&mut self, dt: f32) -> Vec<AmmoKind> {
        [AmmoKind::Arrow, AmmoKind::Bolt, AmmoKind::Vial]
            .into_iter()
            .filter(|kind| self.get_mut(*kind).advance(dt))
            .collect()
    }

    /// A landed melee hit speeds up every restock.
    pub fn feed_from_melee(&mut self) {
        let arrow_goal = self.arrows.goal();
        let bolt_goal = self.bolts.goal();
        let vial_goal = self.vials.goal();
        self.arrows.boost(arrow_goal / inventory::MELEE_ARROW_DIVISOR);
        self.bolts.boost(bolt_goal / inventory::MELEE_BOLT_DIVISOR);
        self.vials.boost(vial_goal / inventory::MELEE_VIAL_DIVISOR);
    }
}
