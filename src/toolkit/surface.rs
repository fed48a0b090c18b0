//! Iso-surface area of labelled regions via surface nets.
//!
//! The binary field `inside(label)` is sampled at voxel centres and meshed
//! at level 0.5: one vertex per mixed 2×2×2 cell (the mean of its crossing
//! edge midpoints), one quad per crossing voxel edge. Areas are in voxel
//! units.

use hashbrown::HashMap;
use ndarray::ArrayView3;

/// Inclusive voxel bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Bounds {
    pub min: [i64; 3],
    pub max: [i64; 3],
}

impl Bounds {
    pub fn point(p: [i64; 3]) -> Self {
        Self { min: p, max: p }
    }

    pub fn include(&mut self, p: [i64; 3]) {
        for k in 0..3 {
            self.min[k] = self.min[k].min(p[k]);
            self.max[k] = self.max[k].max(p[k]);
        }
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        let mut out = *self;
        out.include(other.min);
        out.include(other.max);
        out
    }
}

/// Bounding box of every label present, keyed by label.
pub(crate) fn label_bounds(labels: &ArrayView3<u32>) -> HashMap<u32, Bounds> {
    let mut bounds: HashMap<u32, Bounds> = HashMap::new();
    for ((i, j, k), &label) in labels.indexed_iter() {
        if label == 0 {
            continue;
        }
        let p = [i as i64, j as i64, k as i64];
        bounds
            .entry(label)
            .and_modify(|b| b.include(p))
            .or_insert_with(|| Bounds::point(p));
    }
    bounds
}

struct Mesher<'a, 'v, F> {
    labels: &'a ArrayView3<'v, u32>,
    inside: F,
    vertices: HashMap<[i64; 3], [f64; 3]>,
}

impl<F: Fn(u32) -> bool> Mesher<'_, '_, F> {
    fn sample(&self, p: [i64; 3]) -> bool {
        let shape = self.labels.shape();
        if (0..3).any(|k| p[k] < 0 || p[k] >= shape[k] as i64) {
            return false;
        }
        (self.inside)(self.labels[[p[0] as usize, p[1] as usize, p[2] as usize]])
    }

    fn vertex(&mut self, cell: [i64; 3]) -> [f64; 3] {
        if let Some(v) = self.vertices.get(&cell) {
            return *v;
        }
        let mut sum = [0.0; 3];
        let mut count = 0usize;
        for axis in 0..3 {
            let (a, b) = others(axis);
            for (da, db) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                let mut q0 = cell;
                q0[a] += da;
                q0[b] += db;
                let mut q1 = q0;
                q1[axis] += 1;
                if self.sample(q0) != self.sample(q1) {
                    for k in 0..3 {
                        sum[k] += q0[k] as f64;
                    }
                    sum[axis] += 0.5;
                    count += 1;
                }
            }
        }
        let v = if count == 0 {
            [cell[0] as f64 + 0.5, cell[1] as f64 + 0.5, cell[2] as f64 + 0.5]
        } else {
            let n = count as f64;
            [sum[0] / n, sum[1] / n, sum[2] / n]
        };
        self.vertices.insert(cell, v);
        v
    }

    fn area(&mut self, bounds: &Bounds) -> f64 {
        let mut total = 0.0;
        for axis in 0..3 {
            let (a, b) = others(axis);
            for pa in bounds.min[a]..=bounds.max[a] {
                for pb in bounds.min[b]..=bounds.max[b] {
                    for pk in bounds.min[axis] - 1..=bounds.max[axis] {
                        let mut p = [0i64; 3];
                        p[a] = pa;
                        p[b] = pb;
                        p[axis] = pk;
                        let mut q = p;
                        q[axis] += 1;
                        if self.sample(p) == self.sample(q) {
                            continue;
                        }
                        let cell = |da: i64, db: i64| {
                            let mut c = p;
                            c[a] -= da;
                            c[b] -= db;
                            c
                        };
                        let v00 = self.vertex(cell(0, 0));
                        let v10 = self.vertex(cell(1, 0));
                        let v11 = self.vertex(cell(1, 1));
                        let v01 = self.vertex(cell(0, 1));
                        total += 0.5 * norm(cross(sub(v11, v00), sub(v01, v10)));
                    }
                }
            }
        }
        total
    }
}

/// Area of the iso-surface enclosing every voxel whose label satisfies
/// `inside`. `bounds` must cover all such voxels.
pub(crate) fn iso_surface_area<F: Fn(u32) -> bool>(
    labels: &ArrayView3<u32>,
    bounds: &Bounds,
    inside: F,
) -> f64 {
    let mut mesher = Mesher { labels, inside, vertices: HashMap::new() };
    mesher.area(bounds)
}

fn others(axis: usize) -> (usize, usize) {
    match axis {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    }
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm(a: [f64; 3]) -> f64 {
    (a[0] * a[0] + a[1] * a[1] + a[2] * a[2]).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_cube_area_is_bounded_by_face_count() {
        let mut labels = Array3::<u32>::zeros((10, 10, 10));
        for i in 2..8 {
            for j in 2..8 {
                for k in 2..8 {
                    labels[[i, j, k]] = 1;
                }
            }
        }
        let view = labels.view();
        let bounds = label_bounds(&view)[&1];
        assert_eq!(bounds, Bounds { min: [2, 2, 2], max: [7, 7, 7] });
        let area = iso_surface_area(&view, &bounds, |l| l == 1);
        assert!(area > 100.0 && area < 216.0, "area = {area}");
    }

    #[test]
    fn test_slab_area_covers_flat_sides() {
        // The slab's two x-facing sides alone cover 2 × 16 voxel faces.
        let mut labels = Array3::<u32>::zeros((8, 4, 4));
        for i in 3..6 {
            for j in 0..4 {
                for k in 0..4 {
                    labels[[i, j, k]] = 1;
                }
            }
        }
        let view = labels.view();
        let bounds = label_bounds(&view)[&1];
        let area = iso_surface_area(&view, &bounds, |l| l == 1);
        let slab_faces = 2.0 * 16.0;
        assert!(area >= slab_faces - 1e-9, "area = {area}");
    }

    #[test]
    fn test_empty_selection_has_no_area() {
        let labels = Array3::<u32>::zeros((3, 3, 3));
        let view = labels.view();
        let area = iso_surface_area(&view, &Bounds::point([1, 1, 1]), |l| l == 1);
        assert_eq!(area, 0.0);
    }
}
