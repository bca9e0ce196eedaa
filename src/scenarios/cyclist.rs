//! Cyclist scenario: a freewheel descent against air resistance.
//!
//! A single sliding segment over `[0, 1)`. The drag fraction says how much
//! of the released potential energy is gone by the bottom of the hill; drag
//! grows with speed, so the default loss curve is quadratic in travel
//! (back-loaded) rather than linear.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::energy;
use crate::phase::{Phase, PhaseSegment, PhaseTable};
use crate::scenarios::{positive_or, DEFAULT_GRAVITY};

/// Parameters for the cyclist scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CyclistParams {
    /// Rider plus bicycle mass (kg).
    #[validate(range(min = 0.001, max = 1000.0))]
    pub mass: f64,
    /// Vertical drop of the descent (m).
    #[validate(range(min = 0.01, max = 1000.0))]
    pub descent_height: f64,
    /// Road distance of the descent (m).
    #[validate(range(min = 0.1, max = 100_000.0))]
    pub distance: f64,
    /// Fraction of the released energy lost to drag by the bottom, `[0, 1]`.
    #[validate(range(min = 0.0, max = 1.0))]
    pub drag_fraction: f64,
    /// Gravitational acceleration (m/s²).
    #[validate(range(min = 0.1, max = 100.0))]
    pub gravity: f64,
    /// Shape of the drag curve along the descent (2 = quadratic).
    #[validate(range(min = 1.0, max = 10.0))]
    pub resistance_exponent: f64,
    /// Progress advanced per simulated second.
    #[validate(range(min = 0.01, max = 100.0))]
    pub speed_factor: f64,
}

impl Default for CyclistParams {
    fn default() -> Self {
        Self {
            mass: 80.0,
            descent_height: 30.0,
            distance: 250.0,
            drag_fraction: 0.35,
            gravity: DEFAULT_GRAVITY,
            resistance_exponent: 2.0,
            speed_factor: 0.4,
        }
    }
}

impl CyclistParams {
    /// An upright rider catching a lot of wind.
    #[must_use]
    pub fn upright() -> Self {
        Self {
            drag_fraction: 0.55,
            ..Default::default()
        }
    }

    /// A tucked rider slipping through it.
    #[must_use]
    pub fn tucked() -> Self {
        Self {
            drag_fraction: 0.15,
            ..Default::default()
        }
    }

    /// Total drag spent over the whole descent (J).
    #[must_use]
    pub fn drag_budget(&self) -> f64 {
        self.drag_fraction * self.mass * self.gravity * self.descent_height
    }

    /// Speed at the bottom after drag (m/s).
    #[must_use]
    pub fn bottom_speed(&self) -> f64 {
        let ke = self.initial_energy() - self.drag_budget();
        energy::speed_from_kinetic(ke, self.mass)
    }

    /// Total energy budget: potential energy at the top (J).
    #[must_use]
    pub fn initial_energy(&self) -> f64 {
        self.mass * self.gravity * self.descent_height
    }

    /// Normalize magnitudes; the drag fraction lives in `[0, 1]`.
    #[must_use]
    pub fn clamped(self) -> Self {
        let d = Self::default();
        Self {
            mass: positive_or(self.mass, d.mass),
            descent_height: positive_or(self.descent_height, d.descent_height),
            distance: positive_or(self.distance, d.distance),
            drag_fraction: if self.drag_fraction.is_finite() {
                self.drag_fraction.clamp(0.0, 1.0)
            } else {
                d.drag_fraction
            },
            gravity: positive_or(self.gravity, d.gravity),
            resistance_exponent: if self.resistance_exponent.is_finite() {
                self.resistance_exponent.max(1.0)
            } else {
                d.resistance_exponent
            },
            speed_factor: positive_or(self.speed_factor, d.speed_factor),
        }
    }

    /// Single sliding segment over `[0, 1)`.
    #[must_use]
    pub fn phase_table(&self) -> PhaseTable {
        PhaseTable::new(vec![PhaseSegment::new(Phase::Sliding, 1.0, 1.0)])
    }

    /// Height above the bottom of the hill at `progress`.
    #[must_use]
    pub fn height_at(&self, progress: f64) -> f64 {
        self.descent_height * (1.0 - progress.clamp(0.0, 1.0))
    }

    /// Road distance covered at `progress`.
    #[must_use]
    pub fn horizontal_at(&self, progress: f64) -> f64 {
        self.distance * progress.clamp(0.0, 1.0)
    }

    /// Drag spent by the time the rider reaches `progress`.
    #[must_use]
    pub fn loss_at(&self, progress: f64) -> f64 {
        energy::continuous_loss(self.drag_budget(), progress, self.resistance_exponent)
    }
}
