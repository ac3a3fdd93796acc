//! Value tweening for health bars.
//!
//! Health changes instantly; the number a health bar shows catches up over
//! a few frames. The player bar eases with a speed-based interp-to while
//! enemy bars step a fixed fraction per reference frame and snap once close.

use crate::tuning::{grunt, player, REFERENCE_FRAME};

/// Move `current` toward `target` by `speed * dt` of the remaining gap.
pub fn interp_to(current: f32, target: f32, dt: f32, speed: f32) -> f32 {
    if speed <= 0.0 {
        return target;
    }
    let gap = target - current;
    if gap * gap < 1.0e-8 {
        return target;
    }
    current + gap * (dt * speed).clamp(0.0, 1.0)
}

/// Convert a per-reference-frame lerp fraction into the fraction for `dt`.
pub fn frame_fraction(per_frame: f32, dt: f32) -> f32 {
    1.0 - (1.0 - per_frame).powf(dt / REFERENCE_FRAME)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Smoothing {
    /// Interp-to at a fixed speed, snapping inside `snap`.
    Eased { speed: f32, snap: f32 },
    /// Gap-dependent fraction per frame, gap-dependent snap tolerance.
    Stepped,
}

/// The lagging health value shown to the player.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayHealth {
    pub value: f32,
    pub target: f32,
    smoothing: Smoothing,
}

impl DisplayHealth {
    pub fn new(value: f32, smoothing: Smoothing) -> Self {
        Self {
            value,
            target: value,
            smoothing,
        }
    }

    pub fn eased(value: f32) -> Self {
        Self::new(
            value,
            Smoothing::Eased {
                speed: player::DISPLAY_HEALTH_SPEED,
                snap: player::DISPLAY_HEALTH_SNAP,
            },
        )
    }

    pub fn stepped(value: f32) -> Self {
        Self::new(value, Smoothing::Stepped)
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Still catching up with the real value.
    pub fn is_lerping(&self) -> bool {
        self.value != self.target
    }

    pub fn update(&mut self, dt: f32) {
        if !self.is_lerping() {
            return;
        }

        match self.smoothing {
            Smoothing::Eased { speed, snap } => {
                self.value = interp_to(self.value, self.target, dt, speed);
                if (self.value - self.target).abs() < snap {
                    self.value = self.target;
                }
            }
            Smoothing::Stepped => {
                let gap = (self.target - self.value).abs();
                let per_frame = if gap > grunt::DISPLAY_SLOW_GAP {
                    grunt::DISPLAY_LERP_SLOW
                } else {
                    grunt::DISPLAY_LERP
                };
                let tolerance = if gap > grunt::DISPLAY_FINE_GAP {
                    grunt::DISPLAY_SNAP_FINE
                } else {
                    grunt::DISPLAY_SNAP
                };

                let t = frame_fraction(per_frame, dt);
                self.value += (self.target - self.value) * t;
                if (self.value - self.target).abs() <= tolerance {
                    self.value = self.target;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interp_to_moves_a_fraction_of_the_gap() {
        assert_eq!(interp_to(0.0, 100.0, 0.1, 5.0), 50.0);
        assert_eq!(interp_to(0.0, 100.0, 1.0, 5.0), 100.0);
        assert_eq!(interp_to(3.0, 100.0, 0.1, 0.0), 100.0);
    }

    #[test]
    fn frame_fraction_matches_at_reference_rate() {
        let t = frame_fraction(0.02, REFERENCE_FRAME);
        assert!((t - 0.02).abs() < 1.0e-5);
    }

    #[test]
    fn eased_display_converges_and_snaps() {
        let mut display = DisplayHealth::eased(100.0);
        display.set_target(40.0);
        assert!(display.is_lerping());

        for _ in 0..200 {
            display.update(1.0 / 60.0);
        }
        assert_eq!(display.value, 40.0);
        assert!(!display.is_lerping());
    }

    #[test]
    fn stepped_display_uses_coarse_snap_for_small_gaps() {
        let mut display = DisplayHealth::stepped(100.0);
        display.set_target(96.0);
        display.update(REFERENCE_FRAME);
        // Gap of 4 is already inside the coarse tolerance.
        assert_eq!(display.value, 96.0);
    }

    #[test]
    fn stepped_display_eventually_settles_on_large_gaps() {
        let mut display = DisplayHealth::stepped(100.0);
        display.set_target(0.0);
        display.update(REFERENCE_FRAME);
        assert!(display.value < 100.0 && display.value > 98.0);

        for _ in 0..2000 {
            display.update(REFERENCE_FRAME);
        }
        assert_eq!(display.value, 0.0);
    }
}
