//! Simulation engine: snapshot contract, tick clock, animation driver.
//!
//! The engine side owns everything that is not scenario physics: the capped
//! delta-time clock, the cooperative frame-driven driver lifecycle, and the
//! snapshot type that is the sole data crossing the boundary to rendering.

pub mod clock;
pub mod driver;

use serde::{Deserialize, Serialize};

pub use clock::{TickClock, MAX_DELTA_SECS};
pub use driver::{AnimationDriver, FrameHandle, FrameScheduler, ManualScheduler, TickObserver};

use crate::energy::EnergyBreakdown;
use crate::phase::Phase;

/// Lifecycle state of an [`AnimationDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverState {
    /// Fresh or reset; showing the static pre-run display.
    Idle,
    /// Ticks are being scheduled.
    Running,
    /// Suspended; state preserved exactly, resumable.
    Paused,
    /// Terminal condition reached; outputs frozen.
    Complete,
}

/// Body position within a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Height above the scenario's reference level (m).
    pub height: f64,
    /// Horizontal offset, for scenarios that have one (m).
    pub horizontal: Option<f64>,
}

/// Immutable output of one simulation tick.
///
/// The only data passed to the (external) rendering layer, and the only
/// thing the `on_tick` callback ever sees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    /// Active phase of motion.
    pub phase: Phase,
    /// Scenario-local progress scalar.
    pub progress: f64,
    /// Body position.
    pub position: Position,
    /// Signed velocity (m/s); sign is the direction of travel.
    pub velocity: f64,
    /// Energy read-out for bars and numeric displays.
    pub energy: EnergyBreakdown,
}
