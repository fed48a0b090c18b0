//! Per-pore interfacial area for every phase pair.
//!
//! For a pair `(i, j)` the qualifying throats are those whose lower endpoint
//! lies in phase `i` and upper endpoint in phase `j`. Their areas are summed
//! per lower endpoint over the span `min..=max` of lower endpoints, and per
//! upper endpoint over the span of upper endpoints; both spans are then
//! written into a pore-sized array and scaled to physical units.

use tracing::debug;

use crate::config::AggregationPolicy;
use crate::model::{PhasePair, PoreNetwork};
use super::ranges::PhaseIdRanges;

/// Dense sums of `values` binned by `ids`, over `min(ids)..=max(ids)`.
#[derive(Debug, Clone, PartialEq)]
struct SpanSum {
    start: usize,
    sums: Vec<f64>,
}

impl SpanSum {
    fn collect(ids: &[usize], values: &[f64]) -> Option<Self> {
        let start = *ids.iter().min()?;
        let end = *ids.iter().max()?;
        let mut sums = vec![0.0; end - start + 1];
        for (&id, &value) in ids.iter().zip(values) {
            sums[id - start] += value;
        }
        Some(Self { start, sums })
    }

    fn write_into(&self, out: &mut [f64], policy: AggregationPolicy) {
        let span = &mut out[self.start..self.start + self.sums.len()];
        match policy {
            AggregationPolicy::Overwrite => span.copy_from_slice(&self.sums),
            AggregationPolicy::Accumulate => {
                for (slot, &sum) in span.iter_mut().zip(&self.sums) {
                    *slot += sum;
                }
            }
        }
    }
}

/// Interfacial area of `pair` per pore, in the units of `throat.area`.
/// `None` when no throat connects the two phases.
pub fn pair_interface_area(
    network: &PoreNetwork,
    ranges: &PhaseIdRanges,
    pair: PhasePair,
    policy: AggregationPolicy,
) -> Option<Vec<f64>> {
    let mut lower = Vec::new();
    let mut upper = Vec::new();
    let mut areas = Vec::new();
    for (&conns, &area) in network.throats.conns.iter().zip(&network.throats.area) {
        if ranges.connects(pair, conns) {
            lower.push(conns[0]);
            upper.push(conns[1]);
            areas.push(area);
        }
    }

    let lower = SpanSum::collect(&lower, &areas)?;
    let upper = SpanSum::collect(&upper, &areas)?;
    let mut out = vec![0.0; network.pore_count()];
    lower.write_into(&mut out, policy);
    upper.write_into(&mut out, policy);
    Some(out)
}

/// Store `pore.p{i}_{j}_area` for every pair with at least one connecting
/// throat, scaled by `voxel_size²`.
pub fn aggregate_interface_areas(
    network: &mut PoreNetwork,
    ranges: &PhaseIdRanges,
    voxel_size: f64,
    policy: AggregationPolicy,
) {
    let scale = voxel_size * voxel_size;
    for pair in PhasePair::all(&ranges.phases()) {
        match pair_interface_area(network, ranges, pair, policy) {
            Some(mut areas) => {
                areas.iter_mut().for_each(|a| *a *= scale);
                network.pores.interface_area.insert(pair, areas);
            }
            None => debug!(pair = %pair, "no throats between phases"),
        }
    }
}
