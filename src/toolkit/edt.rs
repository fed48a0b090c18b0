//! Exact Euclidean distance transform.
//!
//! Separable lower-envelope-of-parabolas algorithm (Felzenszwalb &
//! Huttenlocher), one 1D pass per axis. Voxels outside the array are
//! treated as background, so a mask that fills the whole domain still
//! gets finite distances.

use ndarray::Axis;

use crate::field::{DistanceField, PhaseMask};

/// Distance from every `true` voxel to the nearest `false` voxel (or the
/// domain edge). `false` voxels get 0.
pub(crate) fn distance_transform(mask: &PhaseMask) -> DistanceField {
    let mut field = mask.mapv(|inside| if inside { f64::INFINITY } else { 0.0 });

    let mut f = Vec::new();
    let mut d = Vec::new();
    let mut v = Vec::new();
    let mut z = Vec::new();

    for axis in 0..field.ndim() {
        for mut lane in field.lanes_mut(Axis(axis)) {
            f.clear();
            f.extend(lane.iter().copied());
            d.resize(f.len(), 0.0);
            squared_1d(&f, &mut d, &mut v, &mut z);
            for (dst, &src) in lane.iter_mut().zip(d.iter()) {
                *dst = src;
            }
        }
    }

    field.mapv_inplace(f64::sqrt);
    field
}

/// `d[q] = min(min_p f[p] + (q - p)^2, (q + 1)^2, (n - q)^2)`.
fn squared_1d(f: &[f64], d: &mut [f64], v: &mut Vec<usize>, z: &mut Vec<f64>) {
    let n = f.len();
    v.clear();
    z.clear();

    for q in 0..n {
        if !f[q].is_finite() {
            continue;
        }
        let hq = f[q] + (q * q) as f64;
        loop {
            let Some(&p) = v.last() else {
                v.push(q);
                z.push(f64::NEG_INFINITY);
                break;
            };
            let hp = f[p] + (p * p) as f64;
            let s = (hq - hp) / (2.0 * (q - p) as f64);
            if z.last().is_some_and(|&zl| s <= zl) {
                v.pop();
                z.pop();
                continue;
            }
            v.push(q);
            z.push(s);
            break;
        }
    }

    let mut k = 0;
    for (q, slot) in d.iter_mut().enumerate() {
        let edge = ((q + 1).min(n - q) as f64).powi(2);
        if v.is_empty() {
            *slot = edge;
            continue;
        }
        while k + 1 < v.len() && z[k + 1] < q as f64 {
            k += 1;
        }
        let offset = q as f64 - v[k] as f64;
        *slot = (offset * offset + f[v[k]]).min(edge);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn test_single_background_voxel() {
        let mask = array![[true, true, true], [true, false, true], [true, true, true]].into_dyn();
        let dt = distance_transform(&mask);
        assert_eq!(dt[[1, 1]], 0.0);
        assert_eq!(dt[[0, 1]], 1.0);
        // corners: either the diagonal background voxel or the domain edge
        assert_eq!(dt[[0, 0]], 1.0);
    }

    #[test]
    fn test_domain_edge_counts_as_background() {
        let mask = Array2::from_elem((1, 7), true).into_dyn();
        let dt = distance_transform(&mask);
        let row: Vec<f64> = dt.iter().copied().collect();
        assert_eq!(row, vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);

        let mask = Array2::from_elem((7, 7), true).into_dyn();
        let dt = distance_transform(&mask);
        assert_eq!(dt[[3, 3]], 4.0);
        assert_eq!(dt[[0, 3]], 1.0);
    }

    #[test]
    fn test_exact_diagonal_distance() {
        let mut mask = Array2::from_elem((9, 9), true);
        mask[[0, 0]] = false;
        let dt = distance_transform(&mask.into_dyn());
        // (2, 2) is sqrt(8) from the background voxel, 3 from the edge
        assert!((dt[[2, 2]] - 8f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_background_is_zero() {
        let mask = array![[false, false], [false, true]].into_dyn();
        let dt = distance_transform(&mask);
        assert_eq!(dt[[0, 0]], 0.0);
        assert_eq!(dt[[1, 1]], 1.0);
    }
}
