//! Energy accounting.
//!
//! Pure functions mapping a physical state to potential/kinetic/lost energy
//! and to normalized percentage shares for display. Callable both
//! mid-simulation and statically (parameter-change preview).
//!
//! # Invariants
//!
//! - `potential + kinetic + lost ≈ total` at every tick, where `total` is
//!   fixed at simulation start and `lost` is non-decreasing.
//! - Every quantity that could go negative from floating-point noise is
//!   clamped to zero before use, so degenerate inputs produce a flat zero
//!   reading rather than a NaN.

use serde::{Deserialize, Serialize};

/// Smallest mass used in any energy computation (kg).
///
/// A zero mass from a misbehaving caller is lifted to this floor instead of
/// dividing by zero.
pub const MIN_MASS: f64 = 1e-3;

/// Per-tick energy read-out, in joules plus percentage shares.
///
/// Percentages are relative to the scenario's original (pre-loss) total
/// energy and clamped to `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyBreakdown {
    /// Potential energy (J).
    pub potential: f64,
    /// Kinetic energy (J).
    pub kinetic: f64,
    /// Energy lost to dissipation and impacts so far (J).
    pub lost: f64,
    /// Original total energy, fixed at simulation start (J).
    pub total: f64,
    /// Potential share of the original total, in percent.
    pub potential_percent: f64,
    /// Kinetic share of the original total, in percent.
    pub kinetic_percent: f64,
    /// Lost share of the original total, in percent.
    pub lost_percent: f64,
}

impl EnergyBreakdown {
    /// Absolute closure error `|potential + kinetic + lost − total|`.
    ///
    /// Zero up to floating-point noise for a healthy simulation; tests use
    /// this to audit every tick.
    #[must_use]
    pub fn closure_error(&self) -> f64 {
        (self.potential + self.kinetic + self.lost - self.total).abs()
    }
}

/// Gravitational potential energy `m·g·h`, clamped at zero.
#[must_use]
pub fn potential(mass: f64, gravity: f64, height: f64) -> f64 {
    (mass * gravity * height).max(0.0)
}

/// Kinetic energy by balance: `total − potential − lost`, clamped at zero.
///
/// The closed-form scenarios never integrate velocity; the kinetic term is
/// whatever the budget leaves after potential and losses, which keeps the
/// closure invariant exact by construction.
#[must_use]
pub fn kinetic_remainder(total: f64, potential: f64, lost: f64) -> f64 {
    (total - potential - lost).max(0.0)
}

/// Speed from kinetic energy: `sqrt(2·E_k / m)`.
///
/// Negative kinetic energy (numerical noise) is clamped to zero before the
/// square root; a degenerate mass is lifted to [`MIN_MASS`].
#[must_use]
pub fn speed_from_kinetic(kinetic: f64, mass: f64) -> f64 {
    let mass = if mass > MIN_MASS { mass } else { MIN_MASS };
    (2.0 * kinetic.max(0.0) / mass).sqrt()
}

/// Percentage of `part` relative to `total`, clamped to `[0, 100]`.
///
/// A zero or negative total yields 0 rather than a division fault.
#[must_use]
pub fn percent_of(part: f64, total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    (part / total * 100.0).clamp(0.0, 100.0)
}

/// Continuous dissipation at a given point of travel.
///
/// `ratio` is how far through the lossy segment the body has travelled; it
/// is clamped to `[0, 1]` before exponentiation so a negative base can never
/// produce a NaN. `exponent` shapes the loss curve (1 = linear in travel).
#[must_use]
pub fn continuous_loss(budget: f64, ratio: f64, exponent: f64) -> f64 {
    let ratio = ratio.clamp(0.0, 1.0);
    let exponent = if exponent.is_finite() && exponent >= 1.0 {
        exponent
    } else {
        1.0
    };
    budget.max(0.0) * ratio.powf(exponent)
}

/// Assemble a full [`EnergyBreakdown`] from the three joule terms.
#[must_use]
pub fn breakdown(potential: f64, kinetic: f64, lost: f64, total: f64) -> EnergyBreakdown {
    EnergyBreakdown {
        potential,
        kinetic,
        lost,
        total,
        potential_percent: percent_of(potential, total),
        kinetic_percent: percent_of(kinetic, total),
        lost_percent: percent_of(lost, total),
    }
}
