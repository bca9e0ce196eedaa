//! Upward projectile scenario: launch, apex, return.
//!
//! Progress runs over `[0, 2)`: ascent on `[0, 1)`, descent on `[1, 2)`.
//! The apex can never exceed the ceiling implied by energy conservation,
//! `v₀² / (2·g)`, no matter what a slider requests. A requested apex below
//! the ceiling is honored by tracking only the vertical energy budget
//! `m·g·apex` (the rest of the launch speed is treated as horizontal).

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::phase::{Phase, PhaseSegment, PhaseTable};
use crate::scenarios::{positive_or, DEFAULT_GRAVITY};

/// Parameters for the upward projectile scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProjectileParams {
    /// Projectile mass (kg).
    #[validate(range(min = 0.001, max = 1000.0))]
    pub mass: f64,
    /// Launch speed (m/s).
    #[validate(range(min = 0.1, max = 1000.0))]
    pub initial_speed: f64,
    /// Requested apex height (m); `None` derives it from the launch speed.
    pub apex_height: Option<f64>,
    /// Gravitational acceleration (m/s²).
    #[validate(range(min = 0.1, max = 100.0))]
    pub gravity: f64,
    /// Progress advanced per simulated second.
    #[validate(range(min = 0.01, max = 100.0))]
    pub speed_factor: f64,
}

impl Default for ProjectileParams {
    fn default() -> Self {
        Self {
            mass: 0.5,
            initial_speed: 12.0,
            apex_height: None,
            gravity: DEFAULT_GRAVITY,
            speed_factor: 0.7,
        }
    }
}

impl ProjectileParams {
    /// Theoretical apex ceiling `v₀² / (2·g)` (m).
    #[must_use]
    pub fn ceiling(&self) -> f64 {
        self.initial_speed * self.initial_speed / (2.0 * self.gravity)
    }

    /// Effective apex height: requested value clamped to the ceiling.
    #[must_use]
    pub fn apex(&self) -> f64 {
        self.apex_height
            .map_or_else(|| self.ceiling(), |h| h.clamp(0.0, self.ceiling()))
    }

    /// Vertical energy budget `m·g·apex` (J).
    #[must_use]
    pub fn initial_energy(&self) -> f64 {
        self.mass * self.gravity * self.apex()
    }

    /// Normalize magnitudes; the apex invariant is re-established here.
    #[must_use]
    pub fn clamped(self) -> Self {
        let d = Self::default();
        let gravity = positive_or(self.gravity, d.gravity);
        let initial_speed = positive_or(self.initial_speed, d.initial_speed);
        let ceiling = initial_speed * initial_speed / (2.0 * gravity);
        Self {
            mass: positive_or(self.mass, d.mass),
            initial_speed,
            apex_height: self
                .apex_height
                .filter(|h| h.is_finite())
                .map(|h| h.clamp(0.0, ceiling)),
            gravity,
            speed_factor: positive_or(self.speed_factor, d.speed_factor),
        }
    }

    /// Ascent then descent, direction flipping at the apex.
    #[must_use]
    pub fn phase_table(&self) -> PhaseTable {
        PhaseTable::new(vec![
            PhaseSegment::new(Phase::Ascending, 1.0, 1.0),
            PhaseSegment::new(Phase::Descending, 2.0, -1.0),
        ])
    }

    /// Height above the launch point for the segment containing `progress`.
    #[must_use]
    pub fn height_at(&self, phase: Phase, progress: f64) -> f64 {
        let p = progress.clamp(0.0, 2.0);
        let h = match phase {
            Phase::Descending => self.apex() * (2.0 - p),
            _ => self.apex() * p,
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
        ProjectileParams::default().validate().unwrap();
    }

    #[test]
    fn test_ceiling() {
        // 12 m/s, g = 9.81: ceiling = 144 / 19.62 ≈ 7.339 m
        let p = ProjectileParams::default();
        assert!((p.ceiling() - 7.339).abs() < 0.01);
    }

    #[test]
    fn test_apex_defaults_to_ceiling() {
        let p = ProjectileParams::default();
        assert!((p.apex() - p.ceiling()).abs() < 1e-12);
    }

    #[test]
    fn test_requested_apex_clamped_to_ceiling() {
        let p = ProjectileParams {
            apex_height: Some(100.0),
            ..Default::default()
        }
        .clamped();
        assert!(p.apex() <= p.ceiling() + 1e-12);
    }

    #[test]
    fn test_requested_apex_below_ceiling_honored() {
        let p = ProjectileParams {
            apex_height: Some(3.0),
            ..Default::default()
        }
        .clamped();
        assert!((p.apex() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_clamp_order_independence() {
        // Whichever slider moved last, the invariant holds
        let a = ProjectileParams {
            apex_height: Some(50.0),
            initial_speed: 5.0,
            ..Default::default()
        }
        .clamped();
        let b = ProjectileParams {
            initial_speed: 5.0,
            apex_height: Some(50.0),
            ..Default::default()
        }
        .clamped();
        assert!(a.apex() <= a.ceiling() + 1e-9);
        assert!((a.apex() - b.apex()).abs() < 1e-12);
    }

    #[test]
    fn test_height_profile() {
        let p = ProjectileParams::default();
        let apex = p.apex();
        assert!((p.height_at(Phase::Ascending, 0.0) - 0.0).abs() < f64::EPSILON);
        // Apex boundary belongs to the entering descent segment
        assert!((p.height_at(Phase::Descending, 1.0) - apex).abs() < 1e-12);
        assert!((p.height_at(Phase::Descending, 2.0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_phase_table_direction_flip() {
        let table = ProjectileParams::default().phase_table();
        assert!((table.segment_for(0.5).direction - 1.0).abs() < f64::EPSILON);
        assert!((table.segment_for(1.5).direction - -1.0).abs() < f64::EPSILON);
    }
}
