//! Fairground coaster vehicle scenario: a descent with track friction.
//!
//! A single sliding segment over `[0, 1)`. The friction budget is whatever
//! potential energy does not end up as kinetic energy at the bottom:
//! `m·g·h − ½·m·v_f²`, spent progressively along the track according to the
//! resistance exponent. The target final speed is clamped to the
//! frictionless ceiling `sqrt(2·g·h)`.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::energy;
use crate::phase::{Phase, PhaseSegment, PhaseTable};
use crate::scenarios::{non_negative_or, positive_or, DEFAULT_GRAVITY};

/// Parameters for the coaster vehicle scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CoasterParams {
    /// Loaded vehicle mass (kg).
    #[validate(range(min = 0.001, max = 100_000.0))]
    pub mass: f64,
    /// Vertical drop of the track section (m).
    #[validate(range(min = 0.01, max = 1000.0))]
    pub drop_height: f64,
    /// Length of the track section (m).
    #[validate(range(min = 0.1, max = 10_000.0))]
    pub track_length: f64,
    /// Measured speed at the bottom of the drop (m/s).
    #[validate(range(min = 0.0, max = 1000.0))]
    pub final_speed: f64,
    /// Gravitational acceleration (m/s²).
    #[validate(range(min = 0.1, max = 100.0))]
    pub gravity: f64,
    /// Shape of the friction curve along the track (1 = linear).
    #[validate(range(min = 1.0, max = 10.0))]
    pub resistance_exponent: f64,
    /// Progress advanced per simulated second.
    #[validate(range(min = 0.01, max = 100.0))]
    pub speed_factor: f64,
}

impl Default for CoasterParams {
    fn default() -> Self {
        Self {
            mass: 400.0,
            drop_height: 18.0,
            track_length: 60.0,
            final_speed: 16.0,
            gravity: DEFAULT_GRAVITY,
            resistance_exponent: 1.0,
            speed_factor: 0.5,
        }
    }
}

impl CoasterParams {
    /// Frictionless speed ceiling at the bottom, `sqrt(2·g·h)` (m/s).
    #[must_use]
    pub fn speed_ceiling(&self) -> f64 {
        (2.0 * self.gravity * self.drop_height).sqrt()
    }

    /// Total friction spent over the whole drop (J).
    #[must_use]
    pub fn friction_budget(&self) -> f64 {
        let pe = self.mass * self.gravity * self.drop_height;
        let ke_final = 0.5 * self.mass * self.final_speed * self.final_speed;
        (pe - ke_final).max(0.0)
    }

    /// Total energy budget: potential energy at the top (J).
    #[must_use]
    pub fn initial_energy(&self) -> f64 {
        self.mass * self.gravity * self.drop_height
    }

    /// Normalize magnitudes; the final speed can never exceed the ceiling.
    #[must_use]
    pub fn clamped(self) -> Self {
        let d = Self::default();
        let gravity = positive_or(self.gravity, d.gravity);
        let drop_height = positive_or(self.drop_height, d.drop_height);
        let ceiling = (2.0 * gravity * drop_height).sqrt();
        Self {
            mass: positive_or(self.mass, d.mass),
            drop_height,
            track_length: positive_or(self.track_length, d.track_length),
            final_speed: non_negative_or(self.final_speed, d.final_speed).min(ceiling),
            gravity,
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

    /// Height above the bottom of the drop at `progress`.
    #[must_use]
    pub fn height_at(&self, progress: f64) -> f64 {
        self.drop_height * (1.0 - progress.clamp(0.0, 1.0))
    }

    /// Distance travelled along the track at `progress`.
    #[must_use]
    pub fn horizontal_at(&self, progress: f64) -> f64 {
        self.track_length * progress.clamp(0.0, 1.0)
    }

    /// Friction spent by the time the vehicle reaches `progress`.
    #[must_use]
    pub fn loss_at(&self, progress: f64) -> f64 {
        energy::continuous_loss(self.friction_budget(), progress, self.resistance_exponent)
    }
}
