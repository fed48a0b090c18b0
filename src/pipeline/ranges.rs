//! Phase → pore-id range table.
//!
//! Phases are visited in ascending order and each one is handed the id
//! interval directly above the previous phase's. Pore index `i` (label
//! `i + 1`) belongs to the phase whose range satisfies `lower <= i < upper`;
//! every index at or above the final upper bound is a boundary pseudo-pore.

use crate::model::{PhaseId, PhasePair};

/// Id interval of one phase, in 0-based pore indices: `lower..upper`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseRange {
    pub phase: PhaseId,
    /// Exclusive lower bound in label space, inclusive in index space.
    pub lower: usize,
    /// Inclusive upper bound in label space, exclusive in index space.
    pub upper: usize,
}

impl PhaseRange {
    pub fn contains_index(&self, index: usize) -> bool {
        self.lower <= index && index < self.upper
    }

    pub fn contains_label(&self, label: u32) -> bool {
        label > 0 && self.contains_index(label as usize - 1)
    }

    pub fn len(&self) -> usize {
        self.upper - self.lower
    }

    pub fn is_empty(&self) -> bool {
        self.upper == self.lower
    }
}

/// Monotonic table of phase id ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseIdRanges {
    ranges: Vec<PhaseRange>,
}

impl PhaseIdRanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table for an image with exactly one phase: `[0, max_label]`.
    pub fn single(phase: PhaseId, max_label: usize) -> Self {
        Self { ranges: vec![PhaseRange { phase, lower: 0, upper: max_label }] }
    }

    /// Append the next phase, whose ids end at `upper`. Phases must arrive in
    /// ascending order and `upper` may not fall below the current bound.
    pub fn with_phase(mut self, phase: PhaseId, upper: usize) -> Self {
        let lower = self.upper_bound();
        debug_assert!(upper >= lower, "phase {phase} upper bound {upper} below {lower}");
        debug_assert!(
            self.ranges.last().is_none_or(|r| r.phase < phase),
            "phase {phase} visited out of order"
        );
        self.ranges.push(PhaseRange { phase, lower, upper: upper.max(lower) });
        self
    }

    /// Highest id assigned to a real phase so far; the offset for the next phase.
    pub fn upper_bound(&self) -> usize {
        self.ranges.last().map_or(0, |r| r.upper)
    }

    pub fn get(&self, phase: PhaseId) -> Option<&PhaseRange> {
        self.ranges.iter().find(|r| r.phase == phase)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhaseRange> {
        self.ranges.iter()
    }

    pub fn phases(&self) -> Vec<PhaseId> {
        self.ranges.iter().map(|r| r.phase).collect()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Phase owning pore `index`, or `None` for boundary pseudo-pores.
    pub fn phase_of(&self, index: usize) -> Option<PhaseId> {
        self.ranges.iter().find(|r| r.contains_index(index)).map(|r| r.phase)
    }

    pub fn is_boundary(&self, index: usize) -> bool {
        index >= self.upper_bound()
    }

    /// True when a throat's lower endpoint is in `pair.lo()` and its upper
    /// endpoint in `pair.hi()`. Relies on `conns[0] <= conns[1]`: since
    /// ranges ascend with phase number, no qualifying throat can be stored
    /// the other way round.
    pub fn connects(&self, pair: PhasePair, conns: [usize; 2]) -> bool {
        match (self.get(pair.lo()), self.get(pair.hi())) {
            (Some(lo), Some(hi)) => lo.contains_index(conns[0]) && hi.contains_index(conns[1]),
            _ => false,
        }
    }
}
