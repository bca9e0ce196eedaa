//! # kinergy
//!
//! Real-time physics scenario engine with strict energy accounting.
//!
//! Six classroom scenarios (high diver, bouncing ball, upward projectile,
//! coaster vehicle, cyclist, pendulum) run on one generic engine: a
//! scenario contributes parameters, a phase table over normalized progress,
//! and position formulas; the engine owns time stepping, the energy ledger,
//! and the driver lifecycle. Every snapshot satisfies
//! `potential + kinetic + lost = total` against the budget fixed at start.
//!
//! ## Example
//!
//! ```rust
//! use kinergy::prelude::*;
//!
//! let mut driver = AnimationDriver::new(
//!     ScenarioParams::HighDiver(DiverParams::default()),
//!     ManualScheduler::new(),
//! );
//! driver.start();
//! driver.tick(0.0);
//! driver.tick(16.0);
//! let snap = driver.snapshot();
//! assert!(snap.energy.closure_error() < 1e-6);
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops,  // Numerical code choices are intentional
    clippy::imprecise_flops,
    clippy::too_many_lines,
    clippy::missing_const_for_fn,  // Many functions can't be const in stable Rust
    clippy::float_cmp  // Exact comparisons are deliberate at phase boundaries
)]

pub mod cli;
pub mod config;
pub mod energy;
pub mod engine;
pub mod error;
pub mod phase;
pub mod scenarios;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{RunConfig, RunConfigBuilder};
    pub use crate::energy::EnergyBreakdown;
    pub use crate::engine::{
        AnimationDriver, DriverState, ManualScheduler, SimulationSnapshot, TickClock,
    };
    pub use crate::error::{SimError, SimResult};
    pub use crate::phase::{Phase, PhaseTable};
    pub use crate::scenarios::{
        BallParams, CoasterParams, CyclistParams, DiverParams, ParamPatch, PendulumParams,
        ProjectileParams, ScenarioParams, Simulation,
    };
}
