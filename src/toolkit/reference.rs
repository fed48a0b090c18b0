//! Reference toolkit.
//!
//! This is the in-crate implementation of every toolkit trait, enough to
//! run the whole pipeline without external image-analysis code.
//!
//! ## Limitations
//!
//! - **No watershed**: `partition()` labels face-connected components of
//!   the mask. A phase is only split where it is physically disconnected.
//! - **Edge distances**: the distance transform treats the outside of the
//!   image as background.
//! - **3D only iso-surfaces**: `surface_areas()` and `interface_areas()`
//!   reject 2D label fields.
//!
//! Use this toolkit for:
//! - Testing the extraction pipeline end to end
//! - Images whose phases are already split into meaningful components
//! - Validating a production toolkit against simple, exact geometry

use std::collections::VecDeque;

use hashbrown::HashMap;
use ndarray::{ArrayD, Axis, Ix3, IxDyn, Slice};

use crate::field::{self, DistanceField, LabelField, PhaseMask};
use crate::model::{FaceSet, RegionGraph, RegionPore, RegionThroat, Side};
use crate::{Error, Result};
use super::edt::distance_transform;
use super::surface::{iso_surface_area, label_bounds};
use super::{
    BoundaryRegionInjector, ContiguityNormalizer, Partition, Partitioner,
    RegionGraphBuilder, SurfaceAreaEstimator,
};

// ============================================================================
// ReferenceToolkit
// ============================================================================

/// Self-contained implementation of every toolkit trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceToolkit;

impl ReferenceToolkit {
    pub fn new() -> Self {
        Self
    }
}

// ============================================================================
// Partitioner impl
// ============================================================================

impl Partitioner for ReferenceToolkit {
    fn partition(&self, mask: &PhaseMask) -> Result<Partition> {
        let shape = mask.shape().to_vec();
        let inside: Vec<bool> = mask.iter().copied().collect();
        let strides = row_major_strides(&shape);

        let mut labels = vec![0u32; inside.len()];
        let mut next = 0u32;
        let mut queue = VecDeque::new();
        for seed in 0..inside.len() {
            if !inside[seed] || labels[seed] != 0 {
                continue;
            }
            next += 1;
            labels[seed] = next;
            queue.push_back(seed);
            while let Some(at) = queue.pop_front() {
                for (axis, &stride) in strides.iter().enumerate() {
                    let coord = (at / stride) % shape[axis];
                    if coord > 0 {
                        visit(at - stride, next, &inside, &mut labels, &mut queue);
                    }
                    if coord + 1 < shape[axis] {
                        visit(at + stride, next, &inside, &mut labels, &mut queue);
                    }
                }
            }
        }

        let labels = ArrayD::from_shape_vec(IxDyn(&shape), labels)
            .map_err(|e| Error::collaborator("partitioner", e.to_string()))?;
        Ok(Partition {
            labels,
            distance: distance_transform(mask),
            mask: mask.clone(),
        })
    }
}

fn visit(n: usize, label: u32, inside: &[bool], labels: &mut [u32], queue: &mut VecDeque<usize>) {
    if inside[n] && labels[n] == 0 {
        labels[n] = label;
        queue.push_back(n);
    }
}

fn row_major_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1; shape.len()];
    for axis in (0..shape.len().saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * shape[axis + 1];
    }
    strides
}

// ============================================================================
// BoundaryRegionInjector impl
// ============================================================================

impl BoundaryRegionInjector for ReferenceToolkit {
    fn inject(&self, labels: &LabelField, faces: &FaceSet, thickness: usize) -> Result<LabelField> {
        let ndim = labels.ndim();
        let widths = faces.pad_widths(ndim, thickness);
        let mut regions = labels.clone();

        for (axis, &(low, high)) in widths.iter().enumerate() {
            for (side, width) in [(Side::Low, low), (Side::High, high)] {
                if width == 0 {
                    continue;
                }
                let shift = field::max_label(&regions);
                let mut pad = vec![(0, 0); ndim];
                pad[axis] = match side {
                    Side::Low => (width, 0),
                    Side::High => (0, width),
                };
                regions = field::pad_edge(&regions, &pad);

                let extent = regions.shape()[axis];
                let shell = match side {
                    Side::Low => Slice::from(0..width),
                    Side::High => Slice::from(extent - width..extent),
                };
                regions
                    .slice_axis_mut(Axis(axis), shell)
                    .mapv_inplace(|l| if l > 0 { l + shift } else { 0 });
            }
        }

        self.normalize(&regions)
    }
}

// ============================================================================
// RegionGraphBuilder impl
// ============================================================================

#[derive(Default, Clone)]
struct RegionStats {
    voxels: usize,
    sum: [f64; 3],
    max_distance: f64,
}

impl RegionGraphBuilder for ReferenceToolkit {
    fn build(
        &self,
        labels: &LabelField,
        distance: &DistanceField,
        voxel_size: f64,
    ) -> Result<RegionGraph> {
        let ndim = labels.ndim();
        if ndim != 2 && ndim != 3 {
            return Err(Error::collaborator(
                "region graph builder",
                format!("expected a 2D or 3D label field, got {ndim} axes"),
            ));
        }
        field::ensure_shape("region graph builder", labels.shape(), distance.shape())?;

        let count = field::max_label(labels) as usize;
        let shape = labels.shape().to_vec();
        let mut stats = vec![RegionStats::default(); count + 1];
        // (lo, hi) -> (shared faces, max of the smaller distance across the face)
        let mut contacts: HashMap<(u32, u32), (usize, f64)> = HashMap::new();
        let mut neighbour = vec![0usize; ndim];

        for (idx, &label) in labels.indexed_iter() {
            if label == 0 {
                continue;
            }
            let here = distance[&idx];
            let region = &mut stats[label as usize];
            region.voxels += 1;
            region.max_distance = region.max_distance.max(here);
            for axis in 0..ndim {
                region.sum[axis] += idx[axis] as f64;
            }

            for axis in 0..ndim {
                if idx[axis] + 1 >= shape[axis] {
                    continue;
                }
                for (k, slot) in neighbour.iter_mut().enumerate() {
                    *slot = idx[k];
                }
                neighbour[axis] += 1;
                let other = labels[IxDyn(&neighbour)];
                if other == 0 || other == label {
                    continue;
                }
                let throat_distance = here.min(distance[IxDyn(&neighbour)]);
                let entry = contacts
                    .entry((label.min(other), label.max(other)))
                    .or_insert((0, 0.0));
                entry.0 += 1;
                entry.1 = entry.1.max(throat_distance);
            }
        }

        let mut pores = Vec::with_capacity(count);
        for (n, region) in stats.iter().enumerate().skip(1) {
            if region.voxels == 0 {
                return Err(Error::collaborator(
                    "region graph builder",
                    format!("region {n} has no voxels; labels must be contiguous"),
                ));
            }
            let voxels = region.voxels as f64;
            let volume = voxels * voxel_size.powi(ndim as i32);
            let equivalent_diameter = if ndim == 3 {
                (6.0 * volume / std::f64::consts::PI).cbrt()
            } else {
                (4.0 * volume / std::f64::consts::PI).sqrt()
            };
            pores.push(RegionPore {
                label: n as u32,
                coords: [
                    region.sum[0] / voxels * voxel_size,
                    region.sum[1] / voxels * voxel_size,
                    region.sum[2] / voxels * voxel_size,
                ],
                volume,
                inscribed_diameter: 2.0 * region.max_distance * voxel_size,
                equivalent_diameter,
            });
        }

        let mut pairs: Vec<_> = contacts.into_iter().collect();
        pairs.sort_by_key(|(key, _)| *key);
        let throats = pairs
            .into_iter()
            .map(|((a, b), (faces, reach))| {
                RegionThroat::new(a as usize - 1, b as usize - 1, faces as f64)
                    .with_inscribed_diameter(2.0 * reach * voxel_size)
            })
            .collect();

        Ok(RegionGraph { pores, throats })
    }
}

// ============================================================================
// SurfaceAreaEstimator impl
// ============================================================================

impl SurfaceAreaEstimator for ReferenceToolkit {
    fn surface_areas(&self, regions: &LabelField, voxel_size: f64) -> Result<Vec<f64>> {
        let view = regions
            .view()
            .into_dimensionality::<Ix3>()
            .map_err(|_| iso_surface_dimensionality(regions.ndim()))?;
        let bounds = label_bounds(&view);
        let count = field::max_label(regions);
        let scale = voxel_size * voxel_size;
        Ok((1..=count)
            .map(|label| {
                bounds
                    .get(&label)
                    .map_or(0.0, |b| iso_surface_area(&view, b, |l| l == label) * scale)
            })
            .collect())
    }

    fn interface_areas(&self, regions: &LabelField, conns: &[[usize; 2]]) -> Result<Vec<f64>> {
        let view = regions
            .view()
            .into_dimensionality::<Ix3>()
            .map_err(|_| iso_surface_dimensionality(regions.ndim()))?;
        let bounds = label_bounds(&view);
        let mut single: HashMap<u32, f64> = HashMap::new();

        let mut areas = Vec::with_capacity(conns.len());
        for &[p, q] in conns {
            let (a, b) = (p as u32 + 1, q as u32 + 1);
            let (Some(ba), Some(bb)) = (bounds.get(&a), bounds.get(&b)) else {
                return Err(Error::collaborator(
                    "surface area estimator",
                    format!("throat {p}-{q} references a region with no voxels"),
                ));
            };
            let area_a = *single
                .entry(a)
                .or_insert_with(|| iso_surface_area(&view, ba, |l| l == a));
            let area_b = *single
                .entry(b)
                .or_insert_with(|| iso_surface_area(&view, bb, |l| l == b));
            let union = iso_surface_area(&view, &ba.union(bb), |l| l == a || l == b);
            areas.push(((area_a + area_b - union) / 2.0).max(0.0));
        }
        Ok(areas)
    }
}

fn iso_surface_dimensionality(ndim: usize) -> Error {
    Error::collaborator(
        "surface area estimator",
        format!("iso-surface areas need a 3D label field, got {ndim} axes"),
    )
}

// ============================================================================
// ContiguityNormalizer impl
// ============================================================================

impl ContiguityNormalizer for ReferenceToolkit {
    fn normalize(&self, labels: &LabelField) -> Result<LabelField> {
        let mut ids: Vec<u32> = labels.iter().copied().filter(|&l| l > 0).collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(labels.mapv(|l| match ids.binary_search(&l) {
            Ok(pos) if l > 0 => pos as u32 + 1,
            _ => 0,
        }))
    }
}
