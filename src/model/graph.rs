//! Raw region adjacency graph, as produced by a `RegionGraphBuilder`.
//!
//! One `RegionPore` per label id (pore `i` carries label `i + 1`) and one
//! `RegionThroat` per pair of touching regions.

use serde::{Deserialize, Serialize};

/// A segmented region before any phase attribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionPore {
    /// Originating region id, 1-based.
    pub label: u32,
    /// Representative point in physical units; `z = 0` for 2D images.
    pub coords: [f64; 3],
    pub volume: f64,
    pub inscribed_diameter: f64,
    pub equivalent_diameter: f64,
}

/// Contact interface between two regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionThroat {
    /// 0-based pore indices, smaller first.
    pub conns: [usize; 2],
    /// Contact area in voxel units (shared voxel faces).
    pub area: f64,
    pub inscribed_diameter: f64,
}

impl RegionThroat {
    pub fn new(a: usize, b: usize, area: f64) -> Self {
        Self { conns: [a, b], area, inscribed_diameter: 0.0 }
    }

    pub fn with_inscribed_diameter(mut self, diameter: f64) -> Self {
        self.inscribed_diameter = diameter;
        self
    }
}

/// Output of a region graph builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionGraph {
    pub pores: Vec<RegionPore>,
    pub throats: Vec<RegionThroat>,
}

impl RegionGraph {
    pub fn pore_count(&self) -> usize {
        self.pores.len()
    }

    pub fn throat_count(&self) -> usize {
        self.throats.len()
    }
}
