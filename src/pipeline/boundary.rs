//! Boundary shells around the merged fields.
//!
//! The label shells are painted by the toolkit's injector; this stage owns
//! the matching distance-field padding (edge replication, only on requested
//! sides) and the single-phase clean-up.

use tracing::debug;

use crate::field::{self, DistanceField, LabelField};
use crate::model::FaceSet;
use crate::toolkit::{BoundaryRegionInjector, ContiguityNormalizer};
use crate::Result;
use super::merge::MergedPhases;
use super::ranges::PhaseIdRanges;

/// Shell thickness in voxels on every requested face.
pub const SHELL_THICKNESS: usize = 3;

/// Merged fields after boundary injection.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedFields {
    pub labels: LabelField,
    pub distance: DistanceField,
    pub ranges: PhaseIdRanges,
}

pub fn inject_boundaries<T>(toolkit: &T, merged: MergedPhases, faces: &FaceSet) -> Result<BoundedFields>
where
    T: BoundaryRegionInjector + ContiguityNormalizer + ?Sized,
{
    let MergedPhases { labels, distance, ranges, single_phase_mask } = merged;
    let widths = faces.pad_widths(labels.ndim(), SHELL_THICKNESS);

    let (mut labels, distance) = if faces.is_empty() {
        (labels, distance)
    } else {
        debug!(?widths, "padding boundary shells");
        let injected = toolkit.inject(&labels, faces, SHELL_THICKNESS)?;
        let padded = field::pad_edge(&distance, &widths);
        field::ensure_shape("boundary injector", padded.shape(), injected.shape())?;
        (injected, padded)
    };

    // Shell painting can leave holes in the id space of a lone phase.
    if let Some(mask) = single_phase_mask {
        let extended = field::pad_edge(&mask, &widths);
        labels = toolkit.normalize(&field::apply_mask(&labels, &extended))?;
    }

    Ok(BoundedFields { labels, distance, ranges })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Face, PhaseId};
    use crate::pipeline::merge::merge_phases;
    use crate::toolkit::ReferenceToolkit;
    use ndarray::{array, Array3};

    fn merged(image: &crate::field::VoxelImage) -> MergedPhases {
        merge_phases(&ReferenceToolkit, image, &field::phases(image)).unwrap()
    }

    #[test]
    fn test_no_faces_pass_through() {
        let image = array![[1u32, 2], [2, 2]].into_dyn();
        let input = merged(&image);
        let out = inject_boundaries(&ReferenceToolkit, input.clone(), &FaceSet::new()).unwrap();
        assert_eq!(out.labels, input.labels);
        assert_eq!(out.distance, input.distance);
        assert_eq!(out.ranges, input.ranges);
    }

    #[test]
    fn test_distance_padded_only_on_requested_sides() {
        let image = Array3::<u32>::from_elem((4, 5, 6), 1).into_dyn();
        let faces: FaceSet = [Face::Left, Face::Top].into_iter().collect();
        let out = inject_boundaries(&ReferenceToolkit, merged(&image), &faces).unwrap();
        assert_eq!(out.distance.shape(), &[7, 5, 9]);
        assert_eq!(out.labels.shape(), out.distance.shape());
        // edge replication: the shell repeats the first interior slice
        assert_eq!(out.distance[[0, 2, 2]], out.distance[[3, 2, 2]]);
    }

    #[test]
    fn test_boundary_ids_sit_above_phase_ranges() {
        let image = array![[1u32, 1, 2, 2], [1, 1, 2, 2]].into_dyn();
        let faces: FaceSet = [Face::Front, Face::Back].into_iter().collect();
        let out = inject_boundaries(&ReferenceToolkit, merged(&image), &faces).unwrap();
        assert_eq!(out.ranges.upper_bound(), 2);
        assert_eq!(out.labels.shape(), &[2, 10]);
        assert_eq!(field::max_label(&out.labels), 4);
        assert!(field::is_contiguous(&out.labels));
        // the interior keeps its ids
        assert_eq!(out.labels[[0, 3]], 1);
        assert_eq!(out.labels[[0, 6]], 2);
    }

    #[test]
    fn test_single_phase_is_renormalized() {
        let image = array![[0u32, 1, 1, 0], [0, 1, 1, 0]].into_dyn();
        let faces: FaceSet = [Face::Left, Face::Right].into_iter().collect();
        let out = inject_boundaries(&ReferenceToolkit, merged(&image), &faces).unwrap();
        assert_eq!(out.ranges.get(PhaseId(1)).map(|r| r.upper), Some(1));
        assert!(field::is_contiguous(&out.labels));
        assert_eq!(field::max_label(&out.labels), 3);
    }
}
