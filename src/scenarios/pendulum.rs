//! Pendulum scenario: the one Euler-integrated model.
//!
//! Unlike the closed-form scenarios, the pendulum carries live state
//! `(angle, angular_velocity)` advanced by a semi-implicit Euler step:
//!
//! ```text
//! α = -(g/L)·sin(θ) − c·ω
//! ω += α·dt
//! θ += ω·dt        (updated ω, hence semi-implicit)
//! ```
//!
//! First-order, chosen for simplicity and bounded per-frame error. With
//! damping = 0 it is not exactly energy-conserving over very long runs, which
//! is acceptable for short classroom demos with a capped `dt`; the velocity
//! update going first keeps the discretization error bounded instead of
//! growing without limit.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::scenarios::{non_negative_or, positive_or, DEFAULT_GRAVITY};

/// Swing amplitude below which a damped pendulum counts as settled (rad).
pub const SETTLE_ANGLE: f64 = 5e-3;
/// Angular speed below which a damped pendulum counts as settled (rad/s).
pub const SETTLE_SPEED: f64 = 5e-3;

/// Parameters for the pendulum scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PendulumParams {
    /// String length (m).
    #[validate(range(min = 0.01, max = 100.0))]
    pub length: f64,
    /// Bob mass (kg).
    #[validate(range(min = 0.001, max = 100.0))]
    pub mass: f64,
    /// Gravitational acceleration (m/s²).
    #[validate(range(min = 0.1, max = 100.0))]
    pub gravity: f64,
    /// Damping coefficient (s⁻¹); 0 for an ideal pendulum.
    #[validate(range(min = 0.0, max = 100.0))]
    pub damping: f64,
    /// Release angle from vertical (rad), clamped to `[-π/2, π/2]`.
    pub initial_angle: f64,
    /// Release angular velocity (rad/s).
    pub initial_angular_velocity: f64,
}

impl Default for PendulumParams {
    fn default() -> Self {
        Self {
            length: 1.0,
            mass: 1.0,
            gravity: DEFAULT_GRAVITY,
            damping: 0.0,
            initial_angle: std::f64::consts::FRAC_PI_4,
            initial_angular_velocity: 0.0,
        }
    }
}

impl PendulumParams {
    /// Small-angle release (linearized regime, ~6°).
    #[must_use]
    pub fn small_angle() -> Self {
        Self {
            initial_angle: 0.1,
            ..Default::default()
        }
    }

    /// Large-angle release (nonlinear regime, 90°).
    #[must_use]
    pub fn large_angle() -> Self {
        Self {
            initial_angle: std::f64::consts::FRAC_PI_2,
            ..Default::default()
        }
    }

    /// Damped pendulum preset.
    #[must_use]
    pub fn damped(damping: f64) -> Self {
        Self {
            damping,
            ..Default::default()
        }
    }

    /// Theoretical period for small oscillations, `2π·sqrt(L/g)` (s).
    #[must_use]
    pub fn small_angle_period(&self) -> f64 {
        2.0 * std::f64::consts::PI * (self.length / self.gravity).sqrt()
    }

    /// Bob height above the lowest point at `angle`: `L·(1 − cos θ)` (m).
    #[must_use]
    pub fn height_of(&self, angle: f64) -> f64 {
        (self.length * (1.0 - angle.cos())).max(0.0)
    }

    /// Horizontal bob offset from the pivot at `angle` (m).
    #[must_use]
    pub fn horizontal_of(&self, angle: f64) -> f64 {
        self.length * angle.sin()
    }

    /// Kinetic energy of the bob at angular velocity `omega` (J).
    #[must_use]
    pub fn kinetic_of(&self, omega: f64) -> f64 {
        let v = self.length * omega;
        0.5 * self.mass * v * v
    }

    /// Total energy budget at release (J).
    #[must_use]
    pub fn initial_energy(&self) -> f64 {
        self.mass * self.gravity * self.height_of(self.initial_angle)
            + self.kinetic_of(self.initial_angular_velocity)
    }

    /// Normalize magnitudes; the release angle stays within a quarter turn.
    #[must_use]
    pub fn clamped(self) -> Self {
        let d = Self::default();
        Self {
            length: positive_or(self.length, d.length),
            mass: positive_or(self.mass, d.mass),
            gravity: positive_or(self.gravity, d.gravity),
            damping: non_negative_or(self.damping, d.damping),
            initial_angle: if self.initial_angle.is_finite() {
                self.initial_angle
                    .clamp(-std::f64::consts::FRAC_PI_2, std::f64::consts::FRAC_PI_2)
            } else {
                d.initial_angle
            },
            initial_angular_velocity: if self.initial_angular_velocity.is_finite() {
                self.initial_angular_velocity
            } else {
                d.initial_angular_velocity
            },
        }
    }

    /// One semi-implicit Euler step; returns the new `(angle, omega)`.
    #[must_use]
    pub fn euler_step(&self, angle: f64, omega: f64, dt: f64) -> (f64, f64) {
        let alpha = -(self.gravity / self.length) * angle.sin() - self.damping * omega;
        let omega = omega + alpha * dt;
        let angle = angle + omega * dt;
        (angle, omega)
    }

    /// Whether a damped swing at `(angle, omega)` counts as settled.
    ///
    /// Both the amplitude and the angular speed must be tiny; an undamped
    /// pendulum never settles.
    #[must_use]
    pub fn is_settled(&self, angle: f64, omega: f64) -> bool {
        self.damping > 0.0 && angle.abs() < SETTLE_ANGLE && omega.abs() < SETTLE_SPEED
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        PendulumParams::default().validate().unwrap();
    }

    #[test]
    fn test_small_angle_period() {
        // T = 2π·sqrt(1 / 9.81) ≈ 2.006 s
        let p = PendulumParams::default();
        assert!((p.small_angle_period() - 2.006).abs() < 0.01);
    }

    #[test]
    fn test_presets() {
        assert!((PendulumParams::small_angle().initial_angle - 0.1).abs() < f64::EPSILON);
        assert!(
            (PendulumParams::large_angle().initial_angle - std::f64::consts::FRAC_PI_2).abs()
                < f64::EPSILON
        );
        assert!((PendulumParams::damped(0.5).damping - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_height_of() {
        let p = PendulumParams::default();
        assert!((p.height_of(0.0) - 0.0).abs() < f64::EPSILON);
        // At 90°: h = L
        assert!((p.height_of(std::f64::consts::FRAC_PI_2) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_initial_energy_at_rest_release() {
        let p = PendulumParams::default();
        let expected = 1.0 * 9.81 * (1.0 - std::f64::consts::FRAC_PI_4.cos());
        assert!((p.initial_energy() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_euler_step_accelerates_toward_vertical() {
        let p = PendulumParams::default();
        let (_, omega) = p.euler_step(0.5, 0.0, 0.01);
        // Released right of vertical, so the bob accelerates to negative ω
        assert!(omega < 0.0);

        let (_, omega) = p.euler_step(-0.5, 0.0, 0.01);
        assert!(omega > 0.0);
    }

    #[test]
    fn test_euler_step_is_semi_implicit() {
        // The angle update must see the already-updated velocity
        let p = PendulumParams::default();
        let (angle, omega) = p.euler_step(0.5, 0.0, 0.01);
        assert!((angle - (0.5 + omega * 0.01)).abs() < 1e-15);
    }

    #[test]
    fn test_damping_reduces_speed() {
        let ideal = PendulumParams::default();
        let damped = PendulumParams::damped(2.0);
        let (_, w_ideal) = ideal.euler_step(0.0, 1.0, 0.01);
        let (_, w_damped) = damped.euler_step(0.0, 1.0, 0.01);
        assert!(w_damped < w_ideal);
    }

    #[test]
    fn test_energy_bounded_over_short_undamped_run() {
        // Semi-implicit Euler keeps the energy error bounded for demo runs
        let p = PendulumParams::default();
        let total = p.initial_energy();
        let mut angle = p.initial_angle;
        let mut omega = p.initial_angular_velocity;
        let dt = 1e-3;

        for _ in 0..5000 {
            let (a, w) = p.euler_step(angle, omega, dt);
            angle = a;
            omega = w;
            let e = p.mass * p.gravity * p.height_of(angle) + p.kinetic_of(omega);
            assert!(
                (e - total).abs() < 0.01 * total,
                "energy wandered: {e} vs {total}"
            );
        }
    }

    #[test]
    fn test_settled_requires_damping() {
        let ideal = PendulumParams::default();
        assert!(!ideal.is_settled(0.0, 0.0));

        let damped = PendulumParams::damped(0.5);
        assert!(damped.is_settled(1e-4, 1e-4));
        assert!(!damped.is_settled(0.3, 1e-4));
        assert!(!damped.is_settled(1e-4, 2.0));
    }

    #[test]
    fn test_clamped_release_angle() {
        let p = PendulumParams {
            initial_angle: 3.0,
            ..Default::default()
        }
        .clamped();
        assert!((p.initial_angle - std::f64::consts::FRAC_PI_2).abs() < f64::EPSILON);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// A damped pendulum released from rest always decays toward zero
        /// total energy, never gains it.
        #[test]
        fn prop_damped_energy_decays(angle0 in 0.05f64..1.5, damping in 0.1f64..2.0) {
            let p = PendulumParams {
                initial_angle: angle0,
                damping,
                ..Default::default()
            };
            let total = p.initial_energy();
            let mut angle = angle0;
            let mut omega = 0.0;
            for _ in 0..2000 {
                let (a, w) = p.euler_step(angle, omega, 1e-3);
                angle = a;
                omega = w;
            }
            let e = p.mass * p.gravity * p.height_of(angle) + p.kinetic_of(omega);
            prop_assert!(e <= total * 1.01);
        }
    }
}
