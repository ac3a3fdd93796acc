//! Reach of Judgement: damage and stamina drain for straying from the boss.

use crate::tuning::zone;

/// Time spent beyond the boss's reach and what it costs this frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JudgementZone {
    time_in_zone: f32,
}

/// Penalty for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZonePenalty {
    pub damage: f32,
    pub drain: f32,
    pub empty_stamina: bool,
    /// At least one ring applied, so stamina regen pauses
    pub active: bool,
}

impl JudgementZone {
    pub fn time_in_zone(&self) -> f32 {
        self.time_in_zone
    }

    /// Penalty for standing `distance` away from the boss this frame.
    /// Rings stack: past the inner ring all three apply.
    pub fn apply(&mut self, distance: Option<f32>, dt: f32) -> ZonePenalty {
        let Some(distance) = distance else {
            self.time_in_zone = 0.0;
            return ZonePenalty::default();
        };

        if distance < zone::OUTER {
            self.time_in_zone = 0.0;
            return ZonePenalty::default();
        }

        let mut penalty = ZonePenalty {
            active: true,
            ..Default::default()
        };

        // Each ring advances the clock before pricing its own share
        self.time_in_zone += dt;
        let t = self.time_in_zone;
        penalty.damage += zone::OUTER_DAMAGE * (1.0 + t * zone::OUTER_DAMAGE_GROWTH) * dt;
        penalty.drain += (zone::OUTER_DRAIN + t * zone::OUTER_DRAIN_GROWTH) * dt;

        if distance >= zone::MIDDLE {
            self.time_in_zone += dt;
            let t = self.time_in_zone;
            penalty.damage += zone::MIDDLE_DAMAGE * (1.0 + t * zone::MIDDLE_DAMAGE_GROWTH) * dt;
            penalty.drain += (zone::MIDDLE_DRAIN + t * zone::MIDDLE_DRAIN_GROWTH) * dt;
        }

        if distance >= zone::INNER {
            self.time_in_zone += dt;
            let t = self.time_in_zone;
            penalty.damage += zone::INNER_DAMAGE * (1.0 + t * zone::INNER_DAMAGE_GROWTH) * dt;
            penalty.empty_stamina = true;
        }

        penalty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_to_the_boss_is_safe() {
        let mut reach = JudgementZone::default();
        assert_eq!(reach.apply(Some(500.0), 1.0), ZonePenalty::default());
        assert_eq!(reach.apply(None, 1.0), ZonePenalty::default());
    }

    #[test]
    fn outer_ring_counts_the_current_frame() {
        let mut reach = JudgementZone::default();
        let penalty = reach.apply(Some(1000.0), 1.0);
        assert!(penalty.active);
        // t is already 1 when the first frame is priced
        assert!((penalty.damage - 0.22).abs() < 1.0e-6);
        assert!((penalty.drain - 0.25).abs() < 1.0e-6);
        assert!(!penalty.empty_stamina);
        assert_eq!(reach.time_in_zone(), 1.0);
    }

    #[test]
    fn penalty_escalates_with_time() {
        let mut reach = JudgementZone::default();
        let first = reach.apply(Some(1300.0), 0.5);
        let mut later = first;
        for _ in 0..20 {
            later = reach.apply(Some(1300.0), 0.5);
        }
        assert!(later.damage > first.damage);
        assert!(later.drain > first.drain);
    }

    #[test]
    fn inner_ring_empties_stamina() {
        let mut reach = JudgementZone::default();
        let penalty = reach.apply(Some(1700.0), 0.1);
        assert!(penalty.empty_stamina);
        assert!(penalty.damage > 1.0);
        assert!((reach.time_in_zone() - 0.3).abs() < 1.0e-6);
    }

    #[test]
    fn middle_ring_prices_with_its_own_tick() {
        let mut reach = JudgementZone::default();
        let penalty = reach.apply(Some(1300.0), 1.0);
        // outer at t = 1, middle at t = 2
        let expected_damage = 0.2 * 1.1 + 1.0 * 1.3;
        let expected_drain = 0.25 + 1.2;
        assert!((penalty.damage - expected_damage).abs() < 1.0e-5);
        assert!((penalty.drain - expected_drain).abs() < 1.0e-5);
        assert_eq!(reach.time_in_zone(), 2.0);
    }

    #[test]
    fn returning_inside_resets_the_clock() {
        let mut reach = JudgementZone::default();
        reach.apply(Some(1250.0), 2.0);
        assert!(reach.time_in_zone() > 0.0);
        reach.apply(Some(999.0), 0.1);
        assert_eq!(reach.time_in_zone(), 0.0);
    }
}
