//! Phase state machine for multi-stage motion.
//!
//! A scenario's motion is split into consecutive segments over `progress`
//! (fall, rebound-up, rebound-down, ...). Transitions are threshold-triggered
//! when `progress` crosses a segment's upper bound. A segment may carry a
//! lump energy loss that is applied exactly once on entry (an impact) and
//! stays fixed for the remainder of the run.
//!
//! # Boundary rule
//!
//! Segment lookup uses an exclusive upper bound: at `progress` exactly on a
//! boundary the *entering* segment's formulas apply, so the displayed
//! velocity never flashes the stale pre-transition value.

use serde::{Deserialize, Serialize};

/// Named stage of a scenario's motion.
///
/// The closed union over all scenarios; each scenario only ever visits a
/// small subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Body is falling under gravity.
    Falling,
    /// Body is rising after an impact.
    ReboundUp,
    /// Body is falling again after the rebound apex.
    ReboundDown,
    /// Body is rising away from the launch point.
    Ascending,
    /// Body is descending toward the landing point.
    Descending,
    /// Body is sliding or rolling along a track.
    Sliding,
    /// Pendulum bob is in free oscillation.
    Swinging,
    /// Damped pendulum has come to rest.
    Settled,
    /// Motion finished; outputs are frozen at the terminal snapshot.
    Complete,
}

impl Phase {
    /// Whether this phase ends the run.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Settled | Self::Complete)
    }

    /// Wire-format tag, matching the serde representation.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Falling => "falling",
            Self::ReboundUp => "rebound_up",
            Self::ReboundDown => "rebound_down",
            Self::Ascending => "ascending",
            Self::Descending => "descending",
            Self::Sliding => "sliding",
            Self::Swinging => "swinging",
            Self::Settled => "settled",
            Self::Complete => "complete",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One consecutive stretch of motion within a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseSegment {
    /// Phase tag active within this segment.
    pub phase: Phase,
    /// Exclusive upper `progress` bound of this segment.
    pub upper: f64,
    /// Sign of travel within the segment (+1 up/forward, -1 down).
    pub direction: f64,
    /// Lump energy loss (J) applied once on entering this segment.
    pub entry_loss: f64,
}

impl PhaseSegment {
    /// Create a loss-free segment.
    #[must_use]
    pub const fn new(phase: Phase, upper: f64, direction: f64) -> Self {
        Self {
            phase,
            upper,
            direction,
            entry_loss: 0.0,
        }
    }

    /// Create a segment that charges a lump loss on entry (an impact).
    #[must_use]
    pub const fn with_entry_loss(phase: Phase, upper: f64, direction: f64, loss: f64) -> Self {
        Self {
            phase,
            upper,
            direction,
            entry_loss: loss,
        }
    }
}

/// Ordered segment table governing one scenario's phase transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTable {
    segments: Vec<PhaseSegment>,
}

impl PhaseTable {
    /// Build a table from consecutive segments.
    ///
    /// Segments must have strictly increasing upper bounds; out-of-order
    /// tables are normalized by sorting, since a misconfigured table should
    /// degrade rather than corrupt the run.
    #[must_use]
    pub fn new(mut segments: Vec<PhaseSegment>) -> Self {
        segments.sort_by(|a, b| a.upper.total_cmp(&b.upper));
        Self { segments }
    }

    /// Index of the segment containing `progress`, or `None` once the
    /// terminal bound has been reached.
    #[must_use]
    pub fn segment_index(&self, progress: f64) -> Option<usize> {
        self.segments.iter().position(|s| progress < s.upper)
    }

    /// Segment used to render a snapshot at `progress`.
    ///
    /// Past the terminal bound this falls back to the last segment so the
    /// frozen terminal snapshot keeps using the final phase's formulas. An
    /// empty table yields a motionless terminal segment rather than a panic.
    #[must_use]
    pub fn segment_for(&self, progress: f64) -> &PhaseSegment {
        static EXHAUSTED: PhaseSegment = PhaseSegment {
            phase: Phase::Complete,
            upper: 0.0,
            direction: 0.0,
            entry_loss: 0.0,
        };
        self.segment_index(progress)
            .and_then(|idx| self.segments.get(idx))
            .or_else(|| self.segments.last())
            .unwrap_or(&EXHAUSTED)
    }

    /// Cumulative lump losses charged by every segment entered at or before
    /// the one containing `progress`.
    #[must_use]
    pub fn lump_loss_at(&self, progress: f64) -> f64 {
        let last = self
            .segment_index(progress)
            .unwrap_or(self.segments.len().saturating_sub(1));
        self.segments
            .iter()
            .take(last + 1)
            .map(|s| s.entry_loss)
            .sum()
    }

    /// Terminal `progress` bound of the whole scenario.
    #[must_use]
    pub fn upper_bound(&self) -> f64 {
        self.segments.last().map_or(0.0, |s| s.upper)
    }

    /// Whether `progress` has reached the terminal bound.
    #[must_use]
    pub fn is_terminal(&self, progress: f64) -> bool {
        progress >= self.upper_bound()
    }

    /// Number of segments in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the table has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    /// Bouncing-ball shaped table: fall, lossy rebound up, rebound down.
    fn bounce_table() -> PhaseTable {
        PhaseTable::new(vec![
            PhaseSegment::new(Phase::Falling, 1.0, -1.0),
            PhaseSegment::with_entry_loss(Phase::ReboundUp, 2.0, 1.0, 0.0981),
            PhaseSegment::new(Phase::ReboundDown, 3.0, -1.0),
        ])
    }

    #[test]
    fn test_segment_lookup() {
        let table = bounce_table();
        assert_eq!(table.segment_index(0.0), Some(0));
        assert_eq!(table.segment_index(0.999), Some(0));
        assert_eq!(table.segment_index(1.5), Some(1));
        assert_eq!(table.segment_index(2.7), Some(2));
        assert_eq!(table.segment_index(3.0), None);
    }

    #[test]
    fn test_boundary_uses_entering_segment() {
        let table = bounce_table();
        // Exactly at the impact boundary, the rebound segment governs
        let seg = table.segment_for(1.0);
        assert_eq!(seg.phase, Phase::ReboundUp);
        assert!((seg.direction - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_direction_flips_at_impact_and_apex() {
        let table = bounce_table();
        assert!((table.segment_for(0.5).direction - -1.0).abs() < f64::EPSILON);
        assert!((table.segment_for(1.5).direction - 1.0).abs() < f64::EPSILON);
        assert!((table.segment_for(2.5).direction - -1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lump_loss_applied_once_at_impact() {
        let table = bounce_table();
        assert!((table.lump_loss_at(0.5) - 0.0).abs() < f64::EPSILON);
        // Charged on entry to ReboundUp and unchanged thereafter
        assert!((table.lump_loss_at(1.0) - 0.0981).abs() < 1e-12);
        assert!((table.lump_loss_at(2.5) - 0.0981).abs() < 1e-12);
        assert!((table.lump_loss_at(10.0) - 0.0981).abs() < 1e-12);
    }

    #[test]
    fn test_terminal_bound() {
        let table = bounce_table();
        assert!((table.upper_bound() - 3.0).abs() < f64::EPSILON);
        assert!(!table.is_terminal(2.999));
        assert!(table.is_terminal(3.0));
    }

    #[test]
    fn test_terminal_snapshot_uses_last_segment() {
        let table = bounce_table();
        assert_eq!(table.segment_for(3.0).phase, Phase::ReboundDown);
    }

    #[test]
    fn test_out_of_order_segments_normalized() {
        let table = PhaseTable::new(vec![
            PhaseSegment::new(Phase::Descending, 2.0, -1.0),
            PhaseSegment::new(Phase::Ascending, 1.0, 1.0),
        ]);
        assert_eq!(table.segment_for(0.5).phase, Phase::Ascending);
        assert_eq!(table.segment_for(1.5).phase, Phase::Descending);
    }

    #[test]
    fn test_phase_terminal_tags() {
        assert!(Phase::Complete.is_terminal());
        assert!(Phase::Settled.is_terminal());
        assert!(!Phase::Falling.is_terminal());
        assert!(!Phase::Swinging.is_terminal());
    }

    #[test]
    fn test_empty_table() {
        let table = PhaseTable::new(Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert!((table.upper_bound() - 0.0).abs() < f64::EPSILON);
        assert!(table.is_terminal(0.0));
    }

    #[test]
    fn test_empty_table_lookup_is_total() {
        let table = PhaseTable::new(Vec::new());
        let segment = table.segment_for(0.5);
        assert_eq!(segment.phase, Phase::Complete);
        assert!((segment.direction - 0.0).abs() < f64::EPSILON);
        assert!((table.lump_loss_at(0.5) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_phase_serde_tag() {
        let json = serde_json::to_string(&Phase::ReboundUp).unwrap();
        assert_eq!(json, "\"rebound_up\"");
    }
}
