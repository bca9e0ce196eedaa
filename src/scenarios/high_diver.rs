//! High diver scenario: free fall from a platform.
//!
//! The simplest closed-form scenario. Height decreases linearly in
//! `progress`; speed follows from the energy balance, so the impact speed is
//! exactly `sqrt(2·g·h)` at `progress = 1`.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::phase::{Phase, PhaseSegment, PhaseTable};
use crate::scenarios::{positive_or, DEFAULT_GRAVITY};

/// Parameters for the high diver scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DiverParams {
    /// Diver mass (kg).
    #[validate(range(min = 0.001, max = 1000.0))]
    pub mass: f64,
    /// Platform height above the water (m).
    #[validate(range(min = 0.01, max = 1000.0))]
    pub height: f64,
    /// Gravitational acceleration (m/s²).
    #[validate(range(min = 0.1, max = 100.0))]
    pub gravity: f64,
    /// Progress advanced per simulated second.
    #[validate(range(min = 0.01, max = 100.0))]
    pub speed_factor: f64,
}

impl Default for DiverParams {
    fn default() -> Self {
        Self {
            mass: 70.0,
            height: 11.4,
            gravity: DEFAULT_GRAVITY,
            speed_factor: 0.55,
        }
    }
}

impl DiverParams {
    /// Ten-meter olympic board preset.
    #[must_use]
    pub fn ten_meter_board() -> Self {
        Self {
            height: 10.0,
            ..Default::default()
        }
    }

    /// Theoretical impact speed `sqrt(2·g·h)` (m/s).
    #[must_use]
    pub fn impact_speed(&self) -> f64 {
        (2.0 * self.gravity * self.height).sqrt()
    }

    /// Total energy budget: potential energy at the platform (J).
    #[must_use]
    pub fn initial_energy(&self) -> f64 {
        self.mass * self.gravity * self.height
    }

    /// Normalize out-of-range magnitudes instead of rejecting them.
    #[must_use]
    pub fn clamped(self) -> Self {
        let d = Self::default();
        Self {
            mass: positive_or(self.mass, d.mass),
            height: positive_or(self.height, d.height),
            gravity: positive_or(self.gravity, d.gravity),
            speed_factor: positive_or(self.speed_factor, d.speed_factor),
        }
    }

    /// Single falling segment over `progress ∈ [0, 1)`.
    #[must_use]
    pub fn phase_table(&self) -> PhaseTable {
        PhaseTable::new(vec![PhaseSegment::new(Phase::Falling, 1.0, -1.0)])
    }

    /// Height above the water at `progress`.
    #[must_use]
    pub fn height_at(&self, progress: f64) -> f64 {
        self.height * (1.0 - progress.clamp(0.0, 1.0))
    }
}
