//! # Pore Network Model
//!
//! Clean DTOs shared by every pipeline stage and by downstream consumers.
//!
//! Design rule: no array fields, no toolkit types, no Arrow types here.
//! This module is pure data — no I/O, no state.

pub mod phase;
pub mod face;
pub mod graph;
pub mod network;
pub mod value;
pub mod property_map;

pub use phase::{PhaseId, PhasePair};
pub use face::{Face, FaceSet, Side};
pub use graph::{RegionGraph, RegionPore, RegionThroat};
pub use network::{PoreNetwork, Pores, Throats};
pub use value::Value;
pub use property_map::PropertyMap;
