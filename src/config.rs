//! Extraction configuration.
//!
//! ```
//! use porenet::ExtractConfig;
//!
//! let config = ExtractConfig::from_json(
//!     r#"{ "voxel_size": 2.0, "boundary_faces": ["left", "right"] }"#,
//! ).unwrap();
//! assert_eq!(config.voxel_size, 2.0);
//! assert_eq!(config.faces().unwrap().len(), 2);
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::{Face, FaceSet};
use crate::{Error, Result};

/// How unrecognised boundary face names are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceNamePolicy {
    /// Unknown names are a configuration error.
    #[default]
    Strict,
    /// Unknown names are dropped with a warning.
    Lenient,
}

/// How the lower- and upper-endpoint interfacial aggregates are combined
/// when their pore positions coincide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationPolicy {
    /// Both aggregates are summed into the per-pore result.
    #[default]
    Accumulate,
    /// Each aggregate span is assigned in turn; the upper-endpoint span wins.
    Overwrite,
}

/// Options recognised by [`crate::Extractor::extract`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Edge length of one voxel. Coordinates scale linearly, areas by its square.
    pub voxel_size: f64,
    /// Faces that receive boundary pseudo-pores; `None` adds none.
    pub boundary_faces: Option<Vec<String>>,
    /// Use iso-surface areas instead of voxel-face counts.
    pub marching_cubes_area: bool,
    /// Return the image, distance field and regions alongside the network.
    pub return_bundle: bool,
    pub face_names: FaceNamePolicy,
    pub interface_policy: AggregationPolicy,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            voxel_size: 1.0,
            boundary_faces: Some(Face::ALL.iter().map(|f| f.name().to_owned()).collect()),
            marching_cubes_area: false,
            return_bundle: false,
            face_names: FaceNamePolicy::Strict,
            interface_policy: AggregationPolicy::Accumulate,
        }
    }
}

impl ExtractConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_voxel_size(mut self, voxel_size: f64) -> Self {
        self.voxel_size = voxel_size;
        self
    }

    pub fn with_faces<I, S>(mut self, faces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.boundary_faces = Some(faces.into_iter().map(Into::into).collect());
        self
    }

    pub fn without_boundaries(mut self) -> Self {
        self.boundary_faces = None;
        self
    }

    pub fn with_marching_cubes_area(mut self, enabled: bool) -> Self {
        self.marching_cubes_area = enabled;
        self
    }

    pub fn with_bundle(mut self, enabled: bool) -> Self {
        self.return_bundle = enabled;
        self
    }

    pub fn with_face_names(mut self, policy: FaceNamePolicy) -> Self {
        self.face_names = policy;
        self
    }

    pub fn with_interface_policy(mut self, policy: AggregationPolicy) -> Self {
        self.interface_policy = policy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.voxel_size.is_finite() && self.voxel_size > 0.0) {
            return Err(Error::ConfigError(format!(
                "voxel_size must be positive and finite, got {}",
                self.voxel_size
            )));
        }
        if self.face_names == FaceNamePolicy::Strict {
            self.faces()?;
        }
        Ok(())
    }

    /// Resolve `boundary_faces` under the configured name policy.
    pub fn faces(&self) -> Result<FaceSet> {
        let Some(names) = &self.boundary_faces else {
            return Ok(FaceSet::new());
        };
        let mut set = FaceSet::new();
        for name in names {
            match name.parse::<Face>() {
                Ok(face) => set.insert(face),
                Err(err) => match self.face_names {
                    FaceNamePolicy::Strict => return Err(err),
                    FaceNamePolicy::Lenient => {
                        warn!(face = %name, "ignoring unrecognised boundary face");
                    }
                },
            }
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExtractConfig::default();
        assert_eq!(config.voxel_size, 1.0);
        assert!(!config.marching_cubes_area);
        assert!(!config.return_bundle);
        assert_eq!(config.faces().unwrap(), FaceSet::all());
        assert_eq!(config.interface_policy, AggregationPolicy::Accumulate);
    }

    #[test]
    fn test_strict_rejects_unknown_face() {
        let config = ExtractConfig::new().with_faces(["left", "upwards"]);
        assert!(matches!(config.faces(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_lenient_ignores_unknown_face() {
        let config = ExtractConfig::new()
            .with_faces(["left", "upwards"])
            .with_face_names(FaceNamePolicy::Lenient);
        let faces = config.faces().unwrap();
        assert_eq!(faces.iter().collect::<Vec<_>>(), vec![Face::Left]);
    }

    #[test]
    fn test_no_boundaries() {
        let config = ExtractConfig::new().without_boundaries();
        assert!(config.faces().unwrap().is_empty());
    }

    #[test]
    fn test_rejects_bad_voxel_size() {
        assert!(ExtractConfig::new().with_voxel_size(0.0).validate().is_err());
        assert!(ExtractConfig::new().with_voxel_size(f64::NAN).validate().is_err());
        assert!(ExtractConfig::new().with_voxel_size(0.5).validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = ExtractConfig::from_json(
            r#"{ "marching_cubes_area": true, "interface_policy": "overwrite", "boundary_faces": null }"#,
        )
        .unwrap();
        assert!(config.marching_cubes_area);
        assert_eq!(config.interface_policy, AggregationPolicy::Overwrite);
        assert!(config.boundary_faces.is_none());
        assert_eq!(config.voxel_size, 1.0);
    }
}
