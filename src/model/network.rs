//! The attributed pore network.
//!
//! Column-oriented: every pore attribute is a `Vec` of length
//! `pore_count()`, every throat attribute one of length `throat_count()`.
//! Per-phase and per-pair attributes are keyed by `PhaseId` / `PhasePair`;
//! the flat `pore.phase1` style names only appear in [`crate::export`].

use std::collections::BTreeMap;

use super::{Face, PhaseId, PhasePair, RegionGraph};

/// Pore (node) attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pores {
    pub coords: Vec<[f64; 3]>,
    /// Globally unique region id; pore `i` has label `i + 1`.
    pub label: Vec<u32>,
    pub volume: Vec<f64>,
    pub inscribed_diameter: Vec<f64>,
    pub equivalent_diameter: Vec<f64>,
    /// Iso-surface area, present only when marching-cubes areas were requested.
    pub surface_area: Option<Vec<f64>>,
    pub boundary: Vec<bool>,
    pub phase: BTreeMap<PhaseId, Vec<bool>>,
    pub face: BTreeMap<Face, Vec<bool>>,
    /// Interfacial area per pore for each phase pair with at least one
    /// connecting throat, in physical units.
    pub interface_area: BTreeMap<PhasePair, Vec<f64>>,
}

/// Throat (edge) attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Throats {
    /// 0-based pore indices, `conns[t][0] <= conns[t][1]`.
    pub conns: Vec<[usize; 2]>,
    /// Contact area in voxel units.
    pub area: Vec<f64>,
    pub inscribed_diameter: Vec<f64>,
    pub boundary: Vec<bool>,
    /// Intra-phase throats.
    pub phase: BTreeMap<PhaseId, Vec<bool>>,
    /// Inter-phase throats, lower endpoint in `pair.lo()`.
    pub phase_pair: BTreeMap<PhasePair, Vec<bool>>,
}

/// Pore network with phase, boundary and interfacial attribution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoreNetwork {
    pub pores: Pores,
    pub throats: Throats,
}

impl PoreNetwork {
    /// Unattributed network from a raw region graph.
    pub fn from_region_graph(graph: RegionGraph) -> Self {
        let mut pores = Pores::default();
        for pore in graph.pores {
            pores.coords.push(pore.coords);
            pores.label.push(pore.label);
            pores.volume.push(pore.volume);
            pores.inscribed_diameter.push(pore.inscribed_diameter);
            pores.equivalent_diameter.push(pore.equivalent_diameter);
        }
        pores.boundary = vec![false; pores.label.len()];

        let mut throats = Throats::default();
        for throat in graph.throats {
            throats.conns.push(throat.conns);
            throats.area.push(throat.area);
            throats.inscribed_diameter.push(throat.inscribed_diameter);
        }
        throats.boundary = vec![false; throats.conns.len()];

        Self { pores, throats }
    }

    pub fn pore_count(&self) -> usize {
        self.pores.label.len()
    }

    pub fn throat_count(&self) -> usize {
        self.throats.conns.len()
    }

    /// Indices of pores flagged for `phase`.
    pub fn pores_in_phase(&self, phase: PhaseId) -> Vec<usize> {
        flagged(self.pores.phase.get(&phase))
    }

    /// Indices of pores flagged for `face`.
    pub fn pores_on_face(&self, face: Face) -> Vec<usize> {
        flagged(self.pores.face.get(&face))
    }

    /// Indices of throats connecting `pair.lo()` to `pair.hi()`.
    pub fn throats_between(&self, pair: PhasePair) -> Vec<usize> {
        flagged(self.throats.phase_pair.get(&pair))
    }

    pub fn interior_pores(&self) -> Vec<usize> {
        (0..self.pore_count()).filter(|&p| !self.pores.boundary[p]).collect()
    }

    pub fn boundary_pores(&self) -> Vec<usize> {
        (0..self.pore_count()).filter(|&p| self.pores.boundary[p]).collect()
    }

    pub fn interface_area(&self, pair: PhasePair) -> Option<&[f64]> {
        self.pores.interface_area.get(&pair).map(Vec::as_slice)
    }
}

fn flagged(mask: Option<&Vec<bool>>) -> Vec<usize> {
    mask.map(|m| m.iter().enumerate().filter(|(_, f)| **f).map(|(i, _)| i).collect())
        .unwrap_or_default()
}
