//! # World Configuration
//!
//! Tunable parameters for one generated world. Everything here is fixed for the
//! lifetime of a session: reseeding or retuning changes the whole field, so a
//! world must be generated from a single `WorldConfig`.
//!
//! Configuration is plain JSON; every field is optional and falls back to the
//! defaults below.
//!
//! ```json
//! { "seed": 42, "biome": "Mountains", "render_distance": 8 }
//! ```

use std::{fs, path::Path};

use log::info;
use serde::{Deserialize, Serialize};

use crate::{engine_state::voxels::generation::Biome, error::VoxelError};

/// Top-level configuration for a world session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed shared by every noise primitive.
    pub seed: u32,
    /// Terrain profile used for every chunk.
    pub biome: Biome,
    /// Chunks further than this (per axis) from the observer are evicted.
    pub render_distance: i32,
    /// Side of the square generated synchronously at start-up.
    pub starting_area: i32,
    /// Number of background worker threads.
    pub worker_count: usize,
    /// Parameters of the underlying noise primitives.
    pub noise: NoiseSettings,
    /// Height fractions and thresholds of the terrain classifier.
    pub terrain: TerrainTuning,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            seed: 1337,
            biome: Biome::Forest,
            render_distance: 5,
            starting_area: 5,
            worker_count: 4,
            noise: NoiseSettings::default(),
            terrain: TerrainTuning::default(),
        }
    }
}

/// Frequency and fractal parameters applied to every noise primitive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSettings {
    /// Multiplier applied to every input coordinate.
    pub frequency: f64,
    /// Octave count of the fractal primitives.
    pub octaves: usize,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between octaves.
    pub gain: f64,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        NoiseSettings {
            frequency: 0.01,
            octaves: 3,
            lacunarity: 2.0,
            gain: 0.5,
        }
    }
}

/// Constants of the column classifier, expressed relative to the chunk height.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainTuning {
    /// Baseline land height as a fraction of the chunk height.
    pub land_height: f64,
    /// Baseline stone height as a fraction of the chunk height.
    pub stone_height: f64,
    /// Baseline deepslate height as a fraction of the chunk height.
    pub deepslate_height: f64,
    /// Cave ceiling as a fraction of the chunk height.
    pub cave_height: f64,
    /// Deepslate starts this many cells below its baseline height.
    pub deepslate_depth: f64,
    /// Thickness of the deepslate coal band below the deepslate surface.
    pub deepslate_coal_band: f64,
    /// Minimum field value for any masked feature to trigger.
    pub feature_threshold: f64,
    /// Cells at or below this height are always bedrock.
    pub bedrock_ceiling: i32,
}

impl Default for TerrainTuning {
    fn default() -> Self {
        TerrainTuning {
            land_height: 0.5,
            stone_height: 0.47,
            deepslate_height: 0.47,
            cave_height: 0.48,
            deepslate_depth: 90.0,
            deepslate_coal_band: 5.0,
            feature_threshold: 0.2,
            bedrock_ceiling: 2,
        }
    }
}

impl WorldConfig {
    /// Parses a configuration from a JSON document.
    ///
    /// # Arguments
    /// * `json` - The document; missing fields take their defaults
    ///
    /// # Returns
    /// The validated configuration, or the parse/validation error
    pub fn from_json_str(json: &str) -> Result<Self, VoxelError> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VoxelError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        info!("Loaded world configuration from {}", path.display());
        Ok(config)
    }

    /// Checks the ranges the rest of the crate relies on.
    pub fn validate(&self) -> Result<(), VoxelError> {
        if self.render_distance < 1 {
            return Err(VoxelError::Config(format!(
                "render_distance must be at least 1, got {}",
                self.render_distance
            )));
        }
        if self.starting_area < 0 {
            return Err(VoxelError::Config(format!(
                "starting_area must not be negative, got {}",
                self.starting_area
            )));
        }
        if self.worker_count == 0 {
            return Err(VoxelError::Config("worker_count must be at least 1".into()));
        }
        if self.noise.octaves == 0 {
            return Err(VoxelError::Config("noise.octaves must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = WorldConfig::from_json_str("{}").unwrap();
        assert_eq!(config, WorldConfig::default());
        assert_eq!(config.seed, 1337);
    }

    #[test]
    fn partial_document_overrides_named_fields() {
        let config = WorldConfig::from_json_str(
            r#"{ "seed": 7, "biome": "Desert", "noise": { "octaves": 5 } }"#,
        )
        .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.biome, Biome::Desert);
        assert_eq!(config.noise.octaves, 5);
        assert_eq!(config.noise.frequency, 0.01);
        assert_eq!(config.render_distance, 5);
    }

    #[test]
    fn zero_render_distance_is_rejected() {
        let err = WorldConfig::from_json_str(r#"{ "render_distance": 0 }"#).unwrap_err();
        assert!(matches!(err, VoxelError::Config(_)));
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = WorldConfig::from_json_str("{ seed: }").unwrap_err();
        assert!(matches!(err, VoxelError::Json(_)));
    }
}
