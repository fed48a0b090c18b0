//! # porenet — Multi-Phase Pore Network Extraction
//!
//! Turns a segmented voxel image of a porous material into a pore network:
//! one pore per region, one throat per contact between regions, with phase,
//! phase-pair, boundary and interfacial-area attribution.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: the `toolkit` traits are the contract between the
//!    pipeline and voxel-level image analysis
//! 2. **Typed attributes**: phases and phase pairs key the network's
//!    attribute maps; flat `pore.phase1` names only exist in `export`
//! 3. **Explicit fold**: phases are merged by folding over an immutable
//!    accumulator, in ascending phase order
//!
//! ## Quick Start
//!
//! ```rust
//! use ndarray::Array3;
//! use porenet::{ExtractConfig, Extractor, PhaseId};
//!
//! # fn main() -> porenet::Result<()> {
//! let mut image = Array3::<u32>::from_elem((10, 10, 10), 1);
//! image.slice_mut(ndarray::s![5.., .., ..]).fill(2);
//!
//! let config = ExtractConfig::new()
//!     .with_voxel_size(2.0)
//!     .with_faces(["left", "right"]);
//! let network = Extractor::reference()
//!     .extract(&image.into_dyn(), &config)?
//!     .into_network();
//!
//! assert_eq!(network.pores_in_phase(PhaseId(1)).len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Toolkits
//!
//! | Toolkit | Description |
//! |---------|-------------|
//! | `ReferenceToolkit` | Connected components, exact EDT, surface nets |

use tracing::info;

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod field;
pub mod config;
pub mod toolkit;
pub mod pipeline;
pub mod export;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Face, FaceSet, PhaseId, PhasePair, PoreNetwork, Pores, Throats,
    RegionGraph, RegionPore, RegionThroat, Value, PropertyMap,
};

// ============================================================================
// Re-exports: Fields, config, toolkit
// ============================================================================

pub use field::{DistanceField, LabelField, PhaseMask, VoxelImage};
pub use config::{AggregationPolicy, ExtractConfig, FaceNamePolicy};
pub use toolkit::{ReferenceToolkit, Toolkit};

// ============================================================================
// Re-exports: Pipeline
// ============================================================================

pub use pipeline::{Bundle, Extraction, PhaseIdRanges};

// ============================================================================
// Top-level Extractor handle
// ============================================================================

/// The primary entry point. An `Extractor` wraps a toolkit and runs the
/// full pipeline over an image.
#[derive(Debug, Clone, Default)]
pub struct Extractor<T: Toolkit> {
    toolkit: T,
}

impl<T: Toolkit> Extractor<T> {
    /// Create an Extractor with the given toolkit.
    pub fn with_toolkit(toolkit: T) -> Self {
        Self { toolkit }
    }

    /// Extract the attributed pore network of `image`.
    pub fn extract(&self, image: &VoxelImage, config: &ExtractConfig) -> Result<Extraction> {
        config.validate()?;
        let faces = config.faces()?;
        field::validate_image(image)?;
        let phases = field::phases(image);

        // Phase 1: Merge per-phase partitions
        let merged = pipeline::merge_phases(&self.toolkit, image, &phases)?;

        // Phase 2: Boundary shells
        let bounded = pipeline::inject_boundaries(&self.toolkit, merged, &faces)?;

        // Phase 3: Raw network
        let mut network = pipeline::build_network(
            &self.toolkit,
            &bounded.labels,
            &bounded.distance,
            config.voxel_size,
            config.marching_cubes_area,
        )?;

        // Phase 4: Attribution
        pipeline::attribute_phases(&mut network, &bounded.ranges);
        pipeline::aggregate_interface_areas(
            &mut network,
            &bounded.ranges,
            config.voxel_size,
            config.interface_policy,
        );
        pipeline::label_boundary_faces(&mut network, &faces);

        info!(
            pores = network.pore_count(),
            throats = network.throat_count(),
            phases = phases.len(),
            boundary_pores = network.boundary_pores().len(),
            "extracted pore network"
        );

        Ok(if config.return_bundle {
            Extraction::FullBundle(Bundle {
                network,
                image: image.clone(),
                distance: bounded.distance,
                regions: bounded.labels,
            })
        } else {
            Extraction::NetworkOnly(network)
        })
    }

    /// Access the underlying toolkit.
    pub fn toolkit(&self) -> &T {
        &self.toolkit
    }
}

/// Extractor backed by the in-crate reference toolkit.
impl Extractor<ReferenceToolkit> {
    pub fn reference() -> Self {
        Self::with_toolkit(ReferenceToolkit)
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Input error: {0}")]
    InputError(String),

    #[error("Dimensionality error: expected a 2D or 3D image, got {0} axes")]
    Dimensionality(usize),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Collaborator error in {stage}: {message}")]
    CollaboratorError { stage: &'static str, message: String },

    #[error("Export error: {0}")]
    ExportError(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn collaborator(stage: &'static str, message: impl Into<String>) -> Self {
        Error::CollaboratorError { stage, message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
