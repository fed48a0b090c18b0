//! Fold per-phase partitions into one global labelling.
//!
//! Each phase is partitioned on its own mask, its labels shifted past every
//! id already handed out, and the result added into the running fields.
//! Phase masks are disjoint, so both the label and the distance fields can
//! be combined by plain addition.

use ndarray::{IxDyn, Zip};
use tracing::{debug, info};

use crate::field::{self, DistanceField, LabelField, PhaseMask, VoxelImage};
use crate::model::PhaseId;
use crate::toolkit::{Partition, Partitioner};
use crate::{Error, Result};
use super::ranges::PhaseIdRanges;

/// Output of the merge stage.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedPhases {
    pub labels: LabelField,
    pub distance: DistanceField,
    pub ranges: PhaseIdRanges,
    /// The phase's own mask when the image holds exactly one phase.
    pub single_phase_mask: Option<PhaseMask>,
}

/// Running accumulator of the fold. Every step consumes it and returns the
/// next one.
#[derive(Debug)]
struct MergeState {
    labels: LabelField,
    distance: DistanceField,
    ranges: PhaseIdRanges,
    single_phase_mask: Option<PhaseMask>,
}

impl MergeState {
    fn empty(shape: &[usize]) -> Self {
        Self {
            labels: LabelField::zeros(IxDyn(shape)),
            distance: DistanceField::zeros(IxDyn(shape)),
            ranges: PhaseIdRanges::new(),
            single_phase_mask: None,
        }
    }

    /// The only phase of the image: taken as is, range `[0, max label]`.
    fn absorb_only(self, phase: PhaseId, part: Partition) -> Result<Self> {
        if !field::is_contiguous(&part.labels) {
            return Err(non_contiguous(phase));
        }
        let upper = field::max_label(&part.labels) as usize;
        Ok(Self {
            labels: part.labels,
            distance: part.distance,
            ranges: PhaseIdRanges::single(phase, upper),
            single_phase_mask: Some(part.mask),
        })
    }

    /// One of several phases: shifted by the running upper bound and
    /// re-masked so that nothing outside the phase picks up the offset.
    fn absorb(mut self, phase: PhaseId, part: Partition) -> Result<Self> {
        let offset = u32::try_from(self.ranges.upper_bound())
            .map_err(|_| Error::InputError("pore id space exceeds u32".into()))?;

        let own = field::apply_mask(&part.labels, &part.mask);
        if !field::is_contiguous(&own) {
            return Err(non_contiguous(phase));
        }

        Zip::from(&mut self.labels).and(&own).for_each(|acc, &raw| {
            if raw > 0 {
                *acc += raw + offset;
            }
        });
        self.distance += &part.distance;

        let upper = field::max_label(&self.labels) as usize;
        self.ranges = self.ranges.with_phase(phase, upper);
        Ok(self)
    }

    fn finish(self) -> MergedPhases {
        MergedPhases {
            labels: self.labels,
            distance: self.distance,
            ranges: self.ranges,
            single_phase_mask: self.single_phase_mask,
        }
    }
}

/// Partition every phase of `image` in ascending order and merge the results.
pub fn merge_phases<P: Partitioner + ?Sized>(
    partitioner: &P,
    image: &VoxelImage,
    phases: &[PhaseId],
) -> Result<MergedPhases> {
    let shape = image.shape().to_vec();
    let only = phases.len() == 1;

    let state = phases.iter().try_fold(MergeState::empty(&shape), |state, &phase| {
        info!(phase = %phase, "processing phase");
        let mask = field::phase_mask(image, phase);
        let part = partitioner.partition(&mask)?;
        field::ensure_shape("partitioner", &shape, part.labels.shape())?;
        field::ensure_shape("partitioner", &shape, part.distance.shape())?;
        field::ensure_shape("partitioner", &shape, part.mask.shape())?;

        let next = if only { state.absorb_only(phase, part)? } else { state.absorb(phase, part)? };
        if let Some(range) = next.ranges.get(phase) {
            debug!(phase = %phase, lower = range.lower, upper = range.upper, "assigned pore id range");
        }
        Ok::<_, Error>(next)
    })?;

    Ok(state.finish())
}

fn non_contiguous(phase: PhaseId) -> Error {
    Error::collaborator(
        "partitioner",
        format!("labels for phase {phase} are not contiguous from 1"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolkit::ReferenceToolkit;
    use ndarray::array;

    #[test]
    fn test_single_phase_is_not_shifted() {
        let image = array![[1u32, 1, 0], [0, 0, 0], [1, 0, 1]].into_dyn();
        let phases = field::phases(&image);
        let merged = merge_phases(&ReferenceToolkit, &image, &phases).unwrap();
        assert_eq!(merged.labels, array![[1u32, 1, 0], [0, 0, 0], [2, 0, 3]].into_dyn());
        let range = merged.ranges.get(PhaseId(1)).unwrap();
        assert_eq!((range.lower, range.upper), (0, 3));
        assert!(merged.single_phase_mask.is_some());
    }

    #[test]
    fn test_two_phases_are_offset() {
        let image = array![[1u32, 2, 2], [1, 0, 0], [0, 2, 1]].into_dyn();
        let phases = field::phases(&image);
        let merged = merge_phases(&ReferenceToolkit, &image, &phases).unwrap();
        // phase 1: components {(0,0),(1,0)} and {(2,2)}; phase 2: {(0,1),(0,2)} and {(2,1)}
        assert_eq!(merged.labels, array![[1u32, 3, 3], [1, 0, 0], [0, 4, 2]].into_dyn());
        let bounds: Vec<(usize, usize)> = merged.ranges.iter().map(|r| (r.lower, r.upper)).collect();
        assert_eq!(bounds, vec![(0, 2), (2, 4)]);
        assert!(merged.single_phase_mask.is_none());
    }

    #[test]
    fn test_distance_fields_are_summed() {
        let image = array![[1u32, 2]].into_dyn();
        let phases = field::phases(&image);
        let merged = merge_phases(&ReferenceToolkit, &image, &phases).unwrap();
        assert_eq!(merged.distance, array![[1.0, 1.0]].into_dyn());
    }

    struct LeakyPartitioner;

    impl Partitioner for LeakyPartitioner {
        fn partition(&self, mask: &PhaseMask) -> Result<Partition> {
            // labels every voxel, including those outside the phase
            Ok(Partition {
                labels: mask.mapv(|_| 1),
                distance: mask.mapv(|m| if m { 1.0 } else { 0.0 }),
                mask: mask.clone(),
            })
        }
    }

    #[test]
    fn test_labels_outside_mask_are_erased() {
        let image = array![[1u32, 2, 2]].into_dyn();
        let phases = field::phases(&image);
        let merged = merge_phases(&LeakyPartitioner, &image, &phases).unwrap();
        assert_eq!(merged.labels, array![[1u32, 2, 2]].into_dyn());
        assert_eq!(merged.ranges.upper_bound(), 2);
    }

    struct WrongShape;

    impl Partitioner for WrongShape {
        fn partition(&self, _mask: &PhaseMask) -> Result<Partition> {
            Ok(Partition {
                labels: LabelField::zeros(IxDyn(&[1])),
                distance: DistanceField::zeros(IxDyn(&[1])),
                mask: PhaseMask::from_elem(IxDyn(&[1]), false),
            })
        }
    }

    #[test]
    fn test_shape_mismatch_is_collaborator_error() {
        let image = array![[1u32, 2]].into_dyn();
        let err = merge_phases(&WrongShape, &image, &field::phases(&image)).unwrap_err();
        assert!(matches!(err, Error::CollaboratorError { stage: "partitioner", .. }));
    }
}
