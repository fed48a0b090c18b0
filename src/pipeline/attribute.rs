//! Phase and boundary flags.
//!
//! Everything here is decided by id arithmetic against the phase range
//! table, never by looking at the image again.

use crate::model::{PhasePair, PoreNetwork};
use super::ranges::PhaseIdRanges;

/// Fill `pore.phase`, `throat.phase`, `throat.phase_pair` and both boundary
/// masks. Existing entries for the same keys are replaced.
pub fn attribute_phases(network: &mut PoreNetwork, ranges: &PhaseIdRanges) {
    let pore_count = network.pore_count();

    for range in ranges.iter() {
        let pores = (0..pore_count).map(|p| range.contains_index(p)).collect();
        network.pores.phase.insert(range.phase, pores);

        let throats = network
            .throats
            .conns
            .iter()
            .map(|&[a, b]| range.contains_index(a) && range.contains_index(b))
            .collect();
        network.throats.phase.insert(range.phase, throats);
    }

    network.pores.boundary = (0..pore_count).map(|p| ranges.is_boundary(p)).collect();
    network.throats.boundary = network
        .throats
        .conns
        .iter()
        .map(|&[_, b]| ranges.is_boundary(b))
        .collect();

    for pair in PhasePair::all(&ranges.phases()) {
        let flags = network
            .throats
            .conns
            .iter()
            .map(|&conns| ranges.connects(pair, conns))
            .collect();
        network.throats.phase_pair.insert(pair, flags);
    }
}
