//! # Extraction Pipeline
//!
//! The stages between a voxel image and an attributed pore network:
//!
//! ```text
//! image ─► merge ─► boundary ─► build ─► attribute ─► interface ─► faces
//! ```
//!
//! Every stage is a free function over owned or borrowed fields, so a
//! caller can stop after any of them. [`crate::Extractor`] chains them.

pub mod ranges;
pub mod merge;
pub mod boundary;
pub mod build;
pub mod attribute;
pub mod interface;
pub mod faces;

pub use ranges::{PhaseIdRanges, PhaseRange};
pub use merge::{merge_phases, MergedPhases};
pub use boundary::{inject_boundaries, BoundedFields, SHELL_THICKNESS};
pub use build::build_network;
pub use attribute::attribute_phases;
pub use interface::{aggregate_interface_areas, pair_interface_area};
pub use faces::label_boundary_faces;

use crate::field::{DistanceField, LabelField, VoxelImage};
use crate::model::PoreNetwork;

// ============================================================================
// Extraction result
// ============================================================================

/// Everything produced by one extraction run.
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
    pub network: PoreNetwork,
    /// The input image, unchanged.
    pub image: VoxelImage,
    /// Combined distance field, padded along requested faces.
    pub distance: DistanceField,
    /// Merged labelling including boundary shells.
    pub regions: LabelField,
}

/// Result shape, chosen by `ExtractConfig::return_bundle`.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    NetworkOnly(PoreNetwork),
    FullBundle(Bundle),
}

impl Extraction {
    pub fn network(&self) -> &PoreNetwork {
        match self {
            Extraction::NetworkOnly(network) => network,
            Extraction::FullBundle(bundle) => &bundle.network,
        }
    }

    pub fn into_network(self) -> PoreNetwork {
        match self {
            Extraction::NetworkOnly(network) => network,
            Extraction::FullBundle(bundle) => bundle.network,
        }
    }

    pub fn bundle(&self) -> Option<&Bundle> {
        match self {
            Extraction::NetworkOnly(_) => None,
            Extraction::FullBundle(bundle) => Some(bundle),
        }
    }

    pub fn is_bundle(&self) -> bool {
        matches!(self, Extraction::FullBundle(_))
    }
}
