//! Face flags for boundary pseudo-pores.
//!
//! A pore is on a face when its coordinate along the face's axis lies
//! strictly outside the envelope of the interior (non-boundary) pores, on
//! the face's side.

use tracing::warn;

use crate::model::{FaceSet, PoreNetwork, Side};

/// Per-axis `(min, max)` of interior pore coordinates.
fn interior_envelope(network: &PoreNetwork) -> Option<[(f64, f64); 3]> {
    let mut interior = network.interior_pores().into_iter().map(|p| network.pores.coords[p]);
    let first = interior.next()?;
    let mut envelope = first.map(|c| (c, c));
    for coords in interior {
        for (bounds, c) in envelope.iter_mut().zip(coords) {
            bounds.0 = bounds.0.min(c);
            bounds.1 = bounds.1.max(c);
        }
    }
    Some(envelope)
}

/// Set `pore.{face}` for every face in `faces`. No-op for an empty set.
pub fn label_boundary_faces(network: &mut PoreNetwork, faces: &FaceSet) {
    if faces.is_empty() {
        return;
    }
    let pore_count = network.pore_count();
    let Some(envelope) = interior_envelope(network) else {
        warn!("no interior pores; face flags left unset");
        for face in faces.iter() {
            network.pores.face.insert(face, vec![false; pore_count]);
        }
        return;
    };

    let flat = network.pores.coords.iter().all(|c| c[2] == 0.0);
    let ndim = if flat { 2 } else { 3 };

    for face in faces.iter() {
        let axis = face.axis(ndim);
        let (min, max) = envelope[axis];
        let flags = network
            .pores
            .coords
            .iter()
            .map(|c| match face.side() {
                Side::Low => c[axis] < min,
                Side::High => c[axis] > max,
            })
            .collect();
        network.pores.face.insert(face, flags);
    }
}
