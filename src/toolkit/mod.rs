//! # Toolkit Traits
//!
//! The contracts between the extraction pipeline and the image-analysis
//! primitives it delegates to. The pipeline owns id bookkeeping, boundary
//! padding policy and attribution; everything voxel-level lives behind
//! these traits.
//!
//! ## Implementations
//!
//! | Toolkit | Module | Description |
//! |---------|--------|-------------|
//! | `ReferenceToolkit` | `reference` | Connected components, exact EDT, surface nets |
//!
//! Implementations report their own failures as
//! [`Error::CollaboratorError`](crate::Error::CollaboratorError); the
//! pipeline propagates them unchanged.

pub mod reference;
mod edt;
mod surface;

use crate::field::{DistanceField, LabelField, PhaseMask};
use crate::model::{FaceSet, RegionGraph};
use crate::Result;

pub use reference::ReferenceToolkit;

/// Segmentation of a single phase mask.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    /// Region ids, positive inside `mask` and 0 outside.
    pub labels: LabelField,
    pub distance: DistanceField,
    /// The voxels this partition covers.
    pub mask: PhaseMask,
}

/// Splits one phase into labelled sub-regions.
pub trait Partitioner {
    /// Returned fields must have the shape of `mask`, with labels `1..=K`.
    fn partition(&self, mask: &PhaseMask) -> Result<Partition>;
}

/// Paints uniquely labelled boundary shells onto a label field.
pub trait BoundaryRegionInjector {
    /// The result must be padded by exactly `faces.pad_widths(ndim, thickness)`,
    /// keep the interior ids unchanged and number the shell regions
    /// contiguously above them.
    fn inject(&self, labels: &LabelField, faces: &FaceSet, thickness: usize) -> Result<LabelField>;
}

/// Turns a region field into a raw pore/throat graph.
pub trait RegionGraphBuilder {
    /// Pore `i` must carry label `i + 1`; every throat must satisfy
    /// `conns[0] <= conns[1]`.
    fn build(
        &self,
        labels: &LabelField,
        distance: &DistanceField,
        voxel_size: f64,
    ) -> Result<RegionGraph>;
}

/// Iso-surface based area estimation.
pub trait SurfaceAreaEstimator {
    /// Surface area of every region in physical units, indexed by pore.
    fn surface_areas(&self, regions: &LabelField, voxel_size: f64) -> Result<Vec<f64>>;

    /// Interfacial area of every throat in voxel units, in `conns` order.
    fn interface_areas(&self, regions: &LabelField, conns: &[[usize; 2]]) -> Result<Vec<f64>>;
}

/// Relabels a field to the dense id space `1..=K`.
pub trait ContiguityNormalizer {
    fn normalize(&self, labels: &LabelField) -> Result<LabelField>;
}

/// Everything the pipeline needs from its collaborators.
pub trait Toolkit:
    Partitioner + BoundaryRegionInjector + RegionGraphBuilder + SurfaceAreaEstimator + ContiguityNormalizer
{
}

impl<T> Toolkit for T where
    T: Partitioner + BoundaryRegionInjector + RegionGraphBuilder + SurfaceAreaEstimator + ContiguityNormalizer
{
}
