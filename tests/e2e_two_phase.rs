//! End-to-end tests on a two-phase block.
//!
//! A 10×10×10 volume split at x = 5 into phase 1 and phase 2, boundary
//! shells on the left and right faces. Each test runs the full pipeline
//! through `Extractor::reference()`.

use ndarray::{s, Array3};
use porenet::{
    ExtractConfig, Extraction, Extractor, Face, PhaseId, PhasePair, PoreNetwork, VoxelImage,
};
use pretty_assertions::assert_eq;

// ============================================================================
// Helpers
// ============================================================================

fn split_block() -> VoxelImage {
    let mut image = Array3::<u32>::from_elem((10, 10, 10), 1);
    image.slice_mut(s![5.., .., ..]).fill(2);
    image.into_dyn()
}

fn config() -> ExtractConfig {
    ExtractConfig::new().with_voxel_size(2.0).with_faces(["left", "right"])
}

fn extract(config: &ExtractConfig) -> PoreNetwork {
    Extractor::reference().extract(&split_block(), config).unwrap().into_network()
}

fn pair() -> PhasePair {
    PhasePair::new(PhaseId(1), PhaseId(2)).unwrap()
}

// ============================================================================
// 1. Ids and phases
// ============================================================================

#[test]
fn test_pores_are_phase_regions_then_shells() {
    let net = extract(&config());
    assert_eq!(net.pores.label, vec![1, 2, 3, 4]);
    assert_eq!(net.pores_in_phase(PhaseId(1)), vec![0]);
    assert_eq!(net.pores_in_phase(PhaseId(2)), vec![1]);
    assert_eq!(net.boundary_pores(), vec![2, 3]);
}

#[test]
fn test_phases_cover_interior() {
    let net = extract(&config());
    let mut covered: Vec<usize> = net
        .pores_in_phase(PhaseId(1))
        .into_iter()
        .chain(net.pores_in_phase(PhaseId(2)))
        .collect();
    covered.sort_unstable();
    assert_eq!(covered, net.interior_pores());
}

// ============================================================================
// 2. Throats
// ============================================================================

#[test]
fn test_throat_classification() {
    let net = extract(&config());
    assert_eq!(net.throats.conns, vec![[0, 1], [0, 2], [1, 3]]);
    assert_eq!(net.throats_between(pair()), vec![0]);
    assert_eq!(net.throats.boundary, vec![false, true, true]);
    assert_eq!(net.throats.phase[&PhaseId(1)], vec![false, false, false]);
    assert_eq!(net.throats.phase[&PhaseId(2)], vec![false, false, false]);
}

#[test]
fn test_throat_area_is_voxel_face_count() {
    let net = extract(&config());
    assert_eq!(net.throats.area, vec![100.0, 100.0, 100.0]);
}

// ============================================================================
// 3. Interfacial area
// ============================================================================

#[test]
fn test_interface_area_scaled_by_voxel_area() {
    let net = extract(&config());
    assert_eq!(net.interface_area(pair()), Some(&[400.0, 400.0, 0.0, 0.0][..]));
}

#[test]
fn test_interface_area_scales_quadratically() {
    let unit = extract(&config().with_voxel_size(1.0));
    let triple = extract(&config().with_voxel_size(3.0));
    let unit = unit.interface_area(pair()).unwrap();
    let triple = triple.interface_area(pair()).unwrap();
    for (a, b) in unit.iter().zip(triple) {
        assert!((a * 9.0 - b).abs() < 1e-9);
    }
}

#[test]
fn test_marching_cubes_area_feeds_interface() {
    let net = extract(&config().with_marching_cubes_area(true));
    let throat = net.throats.area[0];
    assert!(throat > 0.0, "area = {throat}");
    let area = net.interface_area(pair()).unwrap();
    assert!((area[0] - throat * 4.0).abs() < 1e-9);
    assert!((area[1] - throat * 4.0).abs() < 1e-9);
    let surface = net.pores.surface_area.as_ref().unwrap();
    assert_eq!(surface.len(), 4);
    assert!(surface.iter().all(|&a| a > 0.0));
}

// ============================================================================
// 4. Boundary faces
// ============================================================================

#[test]
fn test_face_pores_lie_outside_interior() {
    let net = extract(&config());
    let interior_x: Vec<f64> = net.interior_pores().iter().map(|&p| net.pores.coords[p][0]).collect();
    let min = interior_x.iter().copied().fold(f64::INFINITY, f64::min);
    let max = interior_x.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let left = net.pores_on_face(Face::Left);
    let right = net.pores_on_face(Face::Right);
    assert_eq!(left, vec![2]);
    assert_eq!(right, vec![3]);
    assert!(left.iter().all(|&p| net.pores.coords[p][0] < min));
    assert!(right.iter().all(|&p| net.pores.coords[p][0] > max));
    assert!(!net.pores.face.contains_key(&Face::Top));
}

#[test]
fn test_coordinates_in_physical_units() {
    let net = extract(&config());
    // shells are 3 voxels thick; the left shell is centred on padded row 1
    assert_eq!(net.pores.coords[0], [10.0, 9.0, 9.0]);
    assert_eq!(net.pores.coords[2], [2.0, 9.0, 9.0]);
    assert_eq!(net.pores.coords[3], [28.0, 9.0, 9.0]);
}

#[test]
fn test_without_boundaries() {
    let net = extract(&config().without_boundaries());
    assert_eq!(net.pore_count(), 2);
    assert!(net.boundary_pores().is_empty());
    assert!(net.pores.face.is_empty());
    assert_eq!(net.throats.conns, vec![[0, 1]]);
}

// ============================================================================
// 5. Result shape
// ============================================================================

#[test]
fn test_bundle_carries_fields() {
    let image = split_block();
    let out = Extractor::reference().extract(&image, &config().with_bundle(true)).unwrap();
    let Extraction::FullBundle(bundle) = out else {
        panic!("expected a bundle");
    };
    assert_eq!(bundle.image, image);
    assert_eq!(bundle.regions.shape(), &[16, 10, 10]);
    assert_eq!(bundle.distance.shape(), &[16, 10, 10]);
    assert_eq!(bundle.regions[[0, 0, 0]], 3);
    assert_eq!(bundle.regions[[15, 0, 0]], 4);
    assert_eq!(bundle.network.pore_count(), 4);
}

#[test]
fn test_network_only_by_default() {
    let out = Extractor::reference().extract(&split_block(), &config()).unwrap();
    assert!(!out.is_bundle());
    assert!(out.bundle().is_none());
    assert_eq!(out.network().pore_count(), 4);
}

#[test]
fn test_repeat_runs_are_identical() {
    assert_eq!(extract(&config()), extract(&config()));
}
