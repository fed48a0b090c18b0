//! Domain faces that can receive boundary pseudo-pores.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::Error;

/// One side of the sample domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    Left,
    Right,
    Front,
    Back,
    Bottom,
    Top,
}

/// Which end of an axis a face sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Index 0 end; boundary pores lie below the interior minimum.
    Low,
    /// Last-index end; boundary pores lie above the interior maximum.
    High,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Left, Face::Right, Face::Front, Face::Back, Face::Bottom, Face::Top,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Face::Left => "left",
            Face::Right => "right",
            Face::Front => "front",
            Face::Back => "back",
            Face::Bottom => "bottom",
            Face::Top => "top",
        }
    }

    /// Array axis this face is normal to. In 2D, bottom/top share the
    /// front/back axis.
    pub fn axis(&self, ndim: usize) -> usize {
        match self {
            Face::Left | Face::Right => 0,
            Face::Front | Face::Back => 1,
            Face::Bottom | Face::Top => if ndim == 2 { 1 } else { 2 },
        }
    }

    pub fn side(&self) -> Side {
        match self {
            Face::Left | Face::Front | Face::Bottom => Side::Low,
            Face::Right | Face::Back | Face::Top => Side::High,
        }
    }
}

impl std::fmt::Display for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Face {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Face::ALL
            .iter()
            .copied()
            .find(|face| face.name() == s)
            .ok_or_else(|| Error::ConfigError(format!("unknown boundary face '{s}'")))
    }
}

/// Ordered, duplicate-free set of requested faces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceSet {
    faces: SmallVec<[Face; 6]>,
}

impl FaceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Face::ALL.into_iter().collect()
    }

    pub fn insert(&mut self, face: Face) {
        if let Err(pos) = self.faces.binary_search(&face) {
            self.faces.insert(pos, face);
        }
    }

    pub fn contains(&self, face: Face) -> bool {
        self.faces.binary_search(&face).is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Face> + '_ {
        self.faces.iter().copied()
    }

    /// Per-axis `(low, high)` shell widths for an `ndim`-dimensional field.
    /// Two faces mapped onto the same axis side share one shell.
    pub fn pad_widths(&self, ndim: usize, thickness: usize) -> Vec<(usize, usize)> {
        let mut widths = vec![(0, 0); ndim];
        for face in self.iter() {
            let axis = face.axis(ndim);
            if axis >= ndim {
                continue;
            }
            match face.side() {
                Side::Low => widths[axis].0 = thickness,
                Side::High => widths[axis].1 = thickness,
            }
        }
        widths
    }
}

impl FromIterator<Face> for FaceSet {
    fn from_iter<I: IntoIterator<Item = Face>>(iter: I) -> Self {
        let mut set = FaceSet::new();
        for face in iter {
            set.insert(face);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_face_names() {
        assert_eq!("left".parse::<Face>().unwrap(), Face::Left);
        assert_eq!("top".parse::<Face>().unwrap(), Face::Top);
        assert!("north".parse::<Face>().is_err());
    }

    #[test]
    fn test_face_set_dedups() {
        let set: FaceSet = [Face::Top, Face::Left, Face::Top].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Face::Left, Face::Top]);
    }

    #[test]
    fn test_pad_widths_3d() {
        let set: FaceSet = [Face::Left, Face::Back, Face::Top].into_iter().collect();
        assert_eq!(set.pad_widths(3, 3), vec![(3, 0), (0, 3), (0, 3)]);
    }

    #[test]
    fn test_pad_widths_2d_collapses_vertical_axis() {
        let set: FaceSet = [Face::Front, Face::Bottom, Face::Top].into_iter().collect();
        assert_eq!(set.pad_widths(2, 3), vec![(0, 0), (3, 3)]);
    }
}
