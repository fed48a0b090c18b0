//! Raw network construction.
//!
//! Calls the toolkit's graph builder (and, on request, its iso-surface
//! estimator) and checks the output against the contract the attribution
//! stages rely on.

use tracing::debug;

use crate::field::{self, DistanceField, LabelField};
use crate::model::{PoreNetwork, RegionGraph};
use crate::toolkit::{RegionGraphBuilder, SurfaceAreaEstimator};
use crate::{Error, Result};

pub fn build_network<T>(
    toolkit: &T,
    labels: &LabelField,
    distance: &DistanceField,
    voxel_size: f64,
    marching_cubes_area: bool,
) -> Result<PoreNetwork>
where
    T: RegionGraphBuilder + SurfaceAreaEstimator + ?Sized,
{
    let graph = toolkit.build(labels, distance, voxel_size)?;
    check_graph(&graph, field::max_label(labels) as usize)?;
    debug!(pores = graph.pore_count(), throats = graph.throat_count(), "built region graph");

    let mut network = PoreNetwork::from_region_graph(graph);

    if marching_cubes_area {
        let surface = toolkit.surface_areas(labels, voxel_size)?;
        check_len("surface area estimator", "surface areas", surface.len(), network.pore_count())?;
        let areas = toolkit.interface_areas(labels, &network.throats.conns)?;
        check_len("surface area estimator", "interface areas", areas.len(), network.throat_count())?;
        network.pores.surface_area = Some(surface);
        network.throats.area = areas;
    }

    Ok(network)
}

/// Pore `i` must carry label `i + 1` and every throat must join two valid
/// pores, smaller index first.
fn check_graph(graph: &RegionGraph, regions: usize) -> Result<()> {
    const STAGE: &str = "region graph builder";
    if graph.pore_count() != regions {
        return Err(Error::collaborator(
            STAGE,
            format!("returned {} pores for {regions} regions", graph.pore_count()),
        ));
    }
    if let Some((i, pore)) = graph
        .pores
        .iter()
        .enumerate()
        .find(|(i, p)| p.label as usize != i + 1)
    {
        return Err(Error::collaborator(
            STAGE,
            format!("pore {i} carries label {}, expected {}", pore.label, i + 1),
        ));
    }
    for (t, throat) in graph.throats.iter().enumerate() {
        let [a, b] = throat.conns;
        if a > b {
            return Err(Error::collaborator(
                STAGE,
                format!("throat {t} stores endpoints {a}-{b} with the larger first"),
            ));
        }
        if b >= regions {
            return Err(Error::collaborator(
                STAGE,
                format!("throat {t} references pore {b} of {regions}"),
            ));
        }
        if throat.area.is_nan() || throat.area < 0.0 {
            return Err(Error::collaborator(STAGE, format!("throat {t} has area {}", throat.area)));
        }
    }
    Ok(())
}

fn check_len(stage: &'static str, what: &str, got: usize, expected: usize) -> Result<()> {
    if got != expected {
        return Err(Error::collaborator(stage, format!("returned {got} {what}, expected {expected}")));
    }
    Ok(())
}
