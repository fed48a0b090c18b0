//! Voxel fields and the array helpers shared by the pipeline stages.
//!
//! All fields are dynamic-dimension `ndarray` arrays; the pipeline accepts
//! 2D and 3D inputs only.

use std::collections::BTreeSet;

use ndarray::{ArrayD, IxDyn, Zip};

use crate::model::PhaseId;
use crate::{Error, Result};

/// Segmented input image: 0 is background, positive values name phases.
pub type VoxelImage = ArrayD<u32>;

/// Region labelling: 0 is unlabelled, positive values are region ids.
pub type LabelField = ArrayD<u32>;

/// Per-voxel distance to the nearest region boundary.
pub type DistanceField = ArrayD<f64>;

/// Voxels belonging to one phase.
pub type PhaseMask = ArrayD<bool>;

/// Reject images the pipeline cannot process.
pub fn validate_image(image: &VoxelImage) -> Result<()> {
    let ndim = image.ndim();
    if ndim != 2 && ndim != 3 {
        return Err(Error::Dimensionality(ndim));
    }
    if !image.iter().any(|&v| v > 0) {
        return Err(Error::InputError("image contains no non-background voxels".into()));
    }
    Ok(())
}

/// Distinct positive phase values in ascending order.
pub fn phases(image: &VoxelImage) -> Vec<PhaseId> {
    let set: BTreeSet<u32> = image.iter().copied().filter(|&v| v > 0).collect();
    set.into_iter().map(PhaseId).collect()
}

pub fn phase_mask(image: &VoxelImage, phase: PhaseId) -> PhaseMask {
    image.mapv(|v| v == phase.0)
}

pub fn max_label(labels: &LabelField) -> u32 {
    labels.iter().copied().max().unwrap_or(0)
}

/// Zero every label outside `mask`.
pub fn apply_mask(labels: &LabelField, mask: &PhaseMask) -> LabelField {
    let mut out = labels.clone();
    Zip::from(&mut out).and(mask).for_each(|l, &m| {
        if !m {
            *l = 0;
        }
    });
    out
}

/// True when the labels present are exactly `1..=max`.
pub fn is_contiguous(labels: &LabelField) -> bool {
    let max = max_label(labels) as usize;
    let mut seen = vec![false; max + 1];
    for &l in labels {
        seen[l as usize] = true;
    }
    seen.iter().skip(1).all(|&s| s)
}

/// Pad by replicating the edge value `widths[axis] = (before, after)` times.
pub fn pad_edge<T: Clone>(field: &ArrayD<T>, widths: &[(usize, usize)]) -> ArrayD<T> {
    let src_shape = field.shape();
    if widths.iter().all(|&(b, a)| b == 0 && a == 0) || src_shape.iter().any(|&n| n == 0) {
        return field.clone();
    }
    let shape: Vec<usize> = src_shape
        .iter()
        .zip(widths)
        .map(|(&n, &(before, after))| n + before + after)
        .collect();
    let mut src = vec![0usize; src_shape.len()];
    ArrayD::from_shape_fn(IxDyn(&shape), |idx| {
        for (axis, slot) in src.iter_mut().enumerate() {
            let before = widths[axis].0;
            *slot = idx[axis].saturating_sub(before).min(src_shape[axis] - 1);
        }
        field[IxDyn(&src)].clone()
    })
}

pub(crate) fn ensure_shape(stage: &'static str, expected: &[usize], got: &[usize]) -> Result<()> {
    if expected != got {
        return Err(Error::collaborator(
            stage,
            format!("returned a field of shape {got:?}, expected {expected:?}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};

    #[test]
    fn test_phases_sorted_and_positive() {
        let image = array![[0u32, 3, 1], [1, 3, 0]].into_dyn();
        assert_eq!(phases(&image), vec![PhaseId(1), PhaseId(3)]);
    }

    #[test]
    fn test_validate_rejects_empty_image() {
        let image = ArrayD::<u32>::zeros(IxDyn(&[4, 4]));
        assert!(matches!(validate_image(&image), Err(Error::InputError(_))));
    }

    #[test]
    fn test_validate_rejects_1d_image() {
        let image = ArrayD::<u32>::ones(IxDyn(&[4]));
        assert!(matches!(validate_image(&image), Err(Error::Dimensionality(1))));
    }

    #[test]
    fn test_pad_edge_2d() {
        let field = array![[1u32, 2], [3, 4]].into_dyn();
        let padded = pad_edge(&field, &[(1, 0), (0, 2)]);
        let expected = array![[1u32, 2, 2, 2], [1, 2, 2, 2], [3, 4, 4, 4]].into_dyn();
        assert_eq!(padded, expected);
    }

    #[test]
    fn test_pad_edge_no_widths_is_identity() {
        let field = Array3::<f64>::from_elem((2, 2, 2), 1.5).into_dyn();
        assert_eq!(pad_edge(&field, &[(0, 0); 3]), field);
    }

    #[test]
    fn test_contiguity() {
        assert!(is_contiguous(&array![[0u32, 1], [2, 2]].into_dyn()));
        assert!(!is_contiguous(&array![[0u32, 1], [3, 3]].into_dyn()));
    }

    #[test]
    fn test_apply_mask() {
        let labels = array![[1u32, 2], [3, 4]].into_dyn();
        let mask = array![[true, false], [false, true]].into_dyn();
        assert_eq!(apply_mask(&labels, &mask), array![[1u32, 0], [0, 4]].into_dyn());
    }
}
