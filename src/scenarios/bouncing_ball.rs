//! Bouncing ball scenario: fall, lossy impact, one rebound.
//!
//! Progress runs over `[0, 3)`: fall on `[0, 1)`, rebound up on `[1, 2)`,
//! rebound down on `[2, 3)`. The impact charges a lump energy loss
//! `m·g·(h₀ − h_r)` that is fixed for the remainder of the bounce; it is
//! never recomputed incrementally.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::phase::{Phase, PhaseSegment, PhaseTable};
use crate::scenarios::{non_negative_or, positive_or, DEFAULT_GRAVITY};

/// Parameters for the bouncing ball scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BallParams {
    /// Ball mass (kg).
    #[validate(range(min = 0.001, max = 100.0))]
    pub mass: f64,
    /// Drop height (m).
    #[validate(range(min = 0.01, max = 100.0))]
    pub initial_height: f64,
    /// Rebound apex height (m); clamped to the drop height.
    #[validate(range(min = 0.0, max = 100.0))]
    pub rebound_height: f64,
    /// Gravitational acceleration (m/s²).
    #[validate(range(min = 0.1, max = 100.0))]
    pub gravity: f64,
    /// Progress advanced per simulated second.
    #[validate(range(min = 0.01, max = 100.0))]
    pub speed_factor: f64,
}

impl Default for BallParams {
    fn default() -> Self {
        Self {
            mass: 0.05,
            initial_height: 2.0,
            rebound_height: 1.8,
            gravity: DEFAULT_GRAVITY,
            speed_factor: 0.9,
        }
    }
}

impl BallParams {
    /// Classroom tennis-ball preset.
    #[must_use]
    pub fn classroom() -> Self {
        Self::default()
    }

    /// A nearly dead ball that keeps little of its energy.
    #[must_use]
    pub fn dead_ball() -> Self {
        Self {
            rebound_height: 0.4,
            ..Default::default()
        }
    }

    /// Energy charged at impact: `m·g·(h₀ − h_r)` (J).
    #[must_use]
    pub fn impact_loss(&self) -> f64 {
        (self.mass * self.gravity * (self.initial_height - self.rebound_height)).max(0.0)
    }

    /// Speed leaving the ground after impact: `sqrt(2·g·h_r)` (m/s).
    #[must_use]
    pub fn rebound_speed(&self) -> f64 {
        (2.0 * self.gravity * self.rebound_height).sqrt()
    }

    /// Total energy budget: potential energy at the drop height (J).
    #[must_use]
    pub fn initial_energy(&self) -> f64 {
        self.mass * self.gravity * self.initial_height
    }

    /// Normalize magnitudes; the rebound can never exceed the drop height.
    #[must_use]
    pub fn clamped(self) -> Self {
        let d = Self::default();
        let initial_height = positive_or(self.initial_height, d.initial_height);
        Self {
            mass: positive_or(self.mass, d.mass),
            initial_height,
            rebound_height: non_negative_or(self.rebound_height, d.rebound_height)
                .min(initial_height),
            gravity: positive_or(self.gravity, d.gravity),
            speed_factor: positive_or(self.speed_factor, d.speed_factor),
        }
    }

    /// Fall, rebound-up (with the lump loss on entry), rebound-down.
    #[must_use]
    pub fn phase_table(&self) -> PhaseTable {
        PhaseTable::new(vec![
            PhaseSegment::new(Phase::Falling, 1.0, -1.0),
            PhaseSegment::with_entry_loss(Phase::ReboundUp, 2.0, 1.0, self.impact_loss()),
            PhaseSegment::new(Phase::ReboundDown, 3.0, -1.0),
        ])
    }

    /// Height above the ground for the segment containing `progress`.
    #[must_use]
    pub fn height_at(&self, phase: Phase, progress: f64) -> f64 {
        let p = progress.clamp(0.0, 3.0);
        let h = match phase {
            Phase::ReboundUp => self.rebound_height * (p - 1.0),
            Phase::ReboundDown => self.rebound_height * (3.0 - p),
            _ => self.initial_height * (1.0 - p),
        };
        h.max(0.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        BallParams::default().validate().unwrap();
    }

    #[test]
    fn test_impact_loss_textbook_numbers() {
        // 0.05 kg, 2.0 m -> 1.8 m: loss = 0.05 * 9.81 * 0.2 ≈ 0.0981 J
        let p = BallParams::default();
        assert!((p.impact_loss() - 0.0981).abs() < 1e-6);
    }

    #[test]
    fn test_rebound_speed_textbook_numbers() {
        // sqrt(2 * 9.81 * 1.8) ≈ 5.94 m/s
        let p = BallParams::default();
        assert!((p.rebound_speed() - 5.94).abs() < 0.01);
    }

    #[test]
    fn test_rebound_clamped_to_drop_height() {
        let p = BallParams {
            rebound_height: 5.0,
            ..Default::default()
        }
        .clamped();
        assert!((p.rebound_height - p.initial_height).abs() < f64::EPSILON);
        // And the lump loss degenerates to zero, not a negative credit
        assert!((p.impact_loss() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_height_profile_per_segment() {
        let p = BallParams::default();
        assert!((p.height_at(Phase::Falling, 0.0) - 2.0).abs() < 1e-12);
        assert!((p.height_at(Phase::Falling, 0.5) - 1.0).abs() < 1e-12);
        // Impact boundary belongs to the entering rebound segment
        assert!((p.height_at(Phase::ReboundUp, 1.0) - 0.0).abs() < f64::EPSILON);
        assert!((p.height_at(Phase::ReboundUp, 2.0) - 1.8).abs() < 1e-12);
        assert!((p.height_at(Phase::ReboundDown, 2.0) - 1.8).abs() < 1e-12);
        assert!((p.height_at(Phase::ReboundDown, 3.0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_height_never_negative() {
        let p = BallParams::default();
        for phase in [Phase::Falling, Phase::ReboundUp, Phase::ReboundDown] {
            for i in 0..=30 {
                let progress = f64::from(i) * 0.1;
                assert!(p.height_at(phase, progress) >= 0.0);
            }
        }
    }

    #[test]
    fn test_phase_table_shape() {
        let table = BallParams::default().phase_table();
        assert_eq!(table.len(), 3);
        assert!((table.upper_bound() - 3.0).abs() < f64::EPSILON);
        assert!((table.lump_loss_at(1.5) - 0.0981).abs() < 1e-6);
    }

    #[test]
    fn test_dead_ball_preset() {
        let p = BallParams::dead_ball();
        assert!(p.rebound_height < p.initial_height);
        assert!(p.impact_loss() > 0.5 * p.initial_energy());
    }
}
