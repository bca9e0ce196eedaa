//! Animation driver: lifecycle state machine around a [`Simulation`].
//!
//! The driver owns one frame request at a time. Starting schedules a frame,
//! each tick advances the model and reschedules, pausing or resetting
//! cancels the outstanding request. Frame scheduling itself is behind the
//! [`FrameScheduler`] trait so the same driver runs against a browser-style
//! callback scheduler or the synchronous [`ManualScheduler`] used by the
//! CLI and the tests.

use crate::engine::clock::TickClock;
use crate::engine::{DriverState, SimulationSnapshot};
use crate::scenarios::{ParamPatch, ScenarioParams, Simulation};

/// Opaque handle to a pending frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Source of animation frames.
///
/// `request_frame` promises at most one future tick per handle; cancelling
/// a handle guarantees its tick never fires. The driver acknowledges every
/// frame that does fire via `frame_fired`, so the scheduler's
/// outstanding-frame view always matches the driver's.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
    fn frame_fired(&mut self, handle: FrameHandle);
}

/// Synchronous scheduler for headless runs and tests.
///
/// Tracks the single pending handle; the caller decides when a "frame"
/// happens by invoking [`AnimationDriver::tick`] with a synthetic timestamp.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: Option<FrameHandle>,
    requested: u64,
    cancelled: u64,
    fired: u64,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently pending frame handle, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Total frames requested since construction.
    #[must_use]
    pub const fn requested(&self) -> u64 {
        self.requested
    }

    /// Total frames cancelled since construction.
    #[must_use]
    pub const fn cancelled(&self) -> u64 {
        self.cancelled
    }

    /// Total frames that fired since construction.
    #[must_use]
    pub const fn fired(&self) -> u64 {
        self.fired
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        self.requested += 1;
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
        self.cancelled += 1;
    }

    fn frame_fired(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
        self.fired += 1;
    }
}

/// Per-tick observer invoked with the fresh snapshot.
pub type TickObserver = Box<dyn FnMut(&SimulationSnapshot)>;

/// Drives a [`Simulation`] through idle / running / paused / complete.
pub struct AnimationDriver<S: FrameScheduler> {
    simulation: Simulation,
    scheduler: S,
    clock: TickClock,
    state: DriverState,
    pending: Option<FrameHandle>,
    on_tick: Option<TickObserver>,
}

impl<S: FrameScheduler> AnimationDriver<S> {
    /// Build a driver around clamped scenario parameters.
    pub fn new(params: ScenarioParams, scheduler: S) -> Self {
        Self {
            simulation: Simulation::new(params),
            scheduler,
            clock: TickClock::new(),
            state: DriverState::Idle,
            pending: None,
            on_tick: None,
        }
    }

    /// Register the per-tick observer, replacing any previous one.
    pub fn on_tick(&mut self, observer: TickObserver) {
        self.on_tick = Some(observer);
    }

    /// Snapshot of the initial (pre-run) state, without starting.
    ///
    /// Emits the snapshot to a registered observer, same as [`Self::reset`],
    /// so the static pre-run display renders through the one channel.
    pub fn initialize(&mut self) -> SimulationSnapshot {
        let snapshot = self.simulation.snapshot();
        if let Some(observer) = self.on_tick.as_mut() {
            observer(&snapshot);
        }
        snapshot
    }

    /// Begin (or resume) the run.
    ///
    /// Starting from `Complete` re-initializes the model and runs again.
    /// Starting while already `Running` is a no-op.
    pub fn start(&mut self) {
        match self.state {
            DriverState::Running => return,
            DriverState::Complete => self.simulation.reset(),
            DriverState::Idle | DriverState::Paused => {}
        }
        self.clock.rearm();
        self.state = DriverState::Running;
        self.schedule();
    }

    /// Advance one frame at the given host timestamp (ms).
    ///
    /// Ticks arriving while not `Running` are dropped; a frame cancelled by
    /// `pause` or `reset` that fires anyway has no effect. The fired frame
    /// is acknowledged to the scheduler before the model advances, so at
    /// every point the two agree on the single outstanding handle.
    pub fn tick(&mut self, now_ms: f64) {
        if self.state != DriverState::Running {
            return;
        }
        if let Some(handle) = self.pending.take() {
            self.scheduler.frame_fired(handle);
        }
        let dt = self.clock.delta(now_ms);
        self.simulation.advance(dt);
        let snapshot = self.simulation.snapshot();
        if let Some(observer) = self.on_tick.as_mut() {
            observer(&snapshot);
        }
        if self.simulation.is_complete() {
            self.state = DriverState::Complete;
        } else {
            self.schedule();
        }
    }

    /// Freeze the run, cancelling the outstanding frame.
    pub fn pause(&mut self) {
        if self.state != DriverState::Running {
            return;
        }
        self.cancel_pending();
        self.state = DriverState::Paused;
    }

    /// Return to the initial state and emit its snapshot to the observer.
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.simulation.reset();
        self.clock.rearm();
        self.state = DriverState::Idle;
        let snapshot = self.simulation.snapshot();
        if let Some(observer) = self.on_tick.as_mut() {
            observer(&snapshot);
        }
    }

    /// Apply a parameter patch with run-state-aware semantics.
    ///
    /// Idle and complete runs take the full patch immediately; a running or
    /// paused model applies dissipation coefficients live and stages the
    /// rest for the next reset. The fresh snapshot comes back either way so
    /// the caller can refresh the static display.
    pub fn update_parameters(&mut self, patch: &ParamPatch) -> SimulationSnapshot {
        let running = matches!(self.state, DriverState::Running | DriverState::Paused);
        let snapshot = self.simulation.update_parameters(patch, running);
        if !running {
            self.state = DriverState::Idle;
        }
        snapshot
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> DriverState {
        self.state
    }

    /// Snapshot of the current model state.
    #[must_use]
    pub fn snapshot(&self) -> SimulationSnapshot {
        self.simulation.snapshot()
    }

    /// The underlying simulation, read-only.
    #[must_use]
    pub const fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// The scheduler, for inspection in tests and the CLI loop.
    #[must_use]
    pub const fn scheduler(&self) -> &S {
        &self.scheduler
    }

    fn schedule(&mut self) {
        let handle = self.scheduler.request_frame();
        self.pending = Some(handle);
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }
}

impl<S: FrameScheduler + std::fmt::Debug> std::fmt::Debug for AnimationDriver<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationDriver")
            .field("state", &self.state)
            .field("pending", &self.pending)
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}
