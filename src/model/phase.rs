//! Phase identifiers and unordered phase pairs.

use serde::{Deserialize, Serialize};

/// Integer material class of a voxel image. Always positive; 0 is background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PhaseId(pub u32);

impl std::fmt::Display for PhaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PhaseId {
    fn from(v: u32) -> Self { PhaseId(v) }
}

/// Unordered pair of distinct phases, stored with the smaller phase first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PhasePair {
    lo: PhaseId,
    hi: PhaseId,
}

impl PhasePair {
    /// Build a pair from two distinct phases in either order.
    /// Returns `None` when both sides name the same phase.
    pub fn new(a: PhaseId, b: PhaseId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { lo: a, hi: b }),
            std::cmp::Ordering::Greater => Some(Self { lo: b, hi: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn lo(&self) -> PhaseId { self.lo }

    pub fn hi(&self) -> PhaseId { self.hi }

    /// All pairs `(i, j)` with `i < j` drawn from `phases`, in ascending order.
    pub fn all(phases: &[PhaseId]) -> Vec<PhasePair> {
        let mut pairs = Vec::new();
        for (n, &a) in phases.iter().enumerate() {
            for &b in &phases[n + 1..] {
                if let Some(pair) = PhasePair::new(a, b) {
                    pairs.push(pair);
                }
            }
        }
        pairs.sort();
        pairs
    }
}

impl std::fmt::Display for PhasePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.lo, self.hi)
    }
}
