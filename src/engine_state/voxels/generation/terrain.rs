//! # Terrain Column Classifier
//!
//! Decides the block type of a single cell from layered noise. The rules run
//! in a fixed sequence and later rules override earlier ones:
//!
//! 1. soil below the land height, grass on its topmost layer
//! 2. near-surface stone veins inside soil
//! 3. desert sand over all land
//! 4. stone and deepslate below their height fields
//! 5. granite, diorite, andesite and tuff rock variants
//! 6. coal and iron ore fields
//! 7. caves, then land holes, carve air
//! 8. bedrock floor
//!
//! Every masked feature triggers only when its field exceeds
//! `max(feature_threshold, mask)`, so the mask can only raise the bar.
//!
//! The 2-D fields depend on the column alone and are computed once per column
//! in [`ColumnSample`]. 3-D fields are sampled only when the rule reading them
//! could still change the result.

use super::{noise_source::NoiseField, Biome};
use crate::{
    config::TerrainTuning,
    engine_state::voxels::{block::TerrainBlock, chunk::CHUNK_HEIGHT},
};

/// The per-column fields of the classifier.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColumnSample {
    /// World X of the column.
    pub x: i32,
    /// World Z of the column.
    pub z: i32,
    /// Biome the column was sampled for.
    pub biome: Biome,
    /// Cells at or below this are land.
    pub land_height: f64,
    /// Cells at or below this are stone.
    pub stone_height: f64,
    /// Deepslate starts `deepslate_depth` below this.
    pub deepslate_height: f64,
    /// Caves are only carved at or below this.
    pub cave_height: f64,
    /// Raises the trigger threshold of every masked feature.
    pub mask: f64,
}

/// Classifies cells of the world into [`TerrainBlock`]s.
pub struct TerrainColumnClassifier<N: NoiseField> {
    noise: N,
    tuning: TerrainTuning,
}

impl<N: NoiseField> TerrainColumnClassifier<N> {
    /// Creates a classifier over `noise` with the given constants.
    pub fn new(noise: N, tuning: TerrainTuning) -> Self {
        TerrainColumnClassifier { noise, tuning }
    }

    /// The noise the classifier samples.
    pub fn noise(&self) -> &N {
        &self.noise
    }

    /// Evaluates the 2-D fields of one column.
    pub fn sample_column(&self, x: i32, z: i32, biome: Biome) -> ColumnSample {
        let (fx, fz) = (x as f64, z as f64);
        let height = CHUNK_HEIGHT as f64;
        let n = &self.noise;

        let primary = biome.shape_primary_land(n.simplex_2d(fx * 0.8, fz * 0.8));
        let secondary =
            n.simplex_2d(fx * 3.5, fz * 3.5) * 10.0 * (n.simplex_2d(fx * 0.35, fz * 0.35) + 0.3);
        let stone_hump = n.simplex_2d(fx * 2.0, fz * 2.0) * 10.0;
        let deepslate_hump = n.simplex_2d(fx * 20.0, fz * 20.0) * 3.0;
        let mask = n.simplex_2d(fx * 0.45, fz * 0.45) * 0.3;

        ColumnSample {
            x,
            z,
            biome,
            land_height: height * self.tuning.land_height + primary + secondary,
            stone_height: height * self.tuning.stone_height + 2.0 * stone_hump,
            deepslate_height: height * self.tuning.deepslate_height + 2.0 * deepslate_hump,
            cave_height: height * self.tuning.cave_height,
            mask,
        }
    }

    /// Classifies the cell at world `(x, y, z)`.
    ///
    /// Pure and deterministic for a given noise seed.
    pub fn classify(&self, x: i32, y: i32, z: i32, biome: Biome) -> TerrainBlock {
        let column = self.sample_column(x, z, biome);
        self.classify_in_column(&column, y)
    }

    /// Classifies the cell at height `y` of an already sampled column.
    pub fn classify_in_column(&self, column: &ColumnSample, y: i32) -> TerrainBlock {
        use TerrainBlock::*;

        if y <= self.tuning.bedrock_ceiling {
            return BEDROCK;
        }

        let n = &self.noise;
        let (fx, fy, fz) = (column.x as f64, y as f64, column.z as f64);
        let height = fy;
        let threshold = self.tuning.feature_threshold.max(column.mask);
        let triggers = |value: f64| value > threshold;
        let is_host = |block: TerrainBlock| !matches!(block, AIR | DEEPSLATE | DIRT | GRASS);

        // The vein and andesite rules read the same cellular layer.
        let mut cellular_18 = None;
        let mut coal = None;
        let cellular_18_at = |cache: &mut Option<f64>| {
            *cache.get_or_insert_with(|| n.cellular_3d(fx * 18.0, fy * 18.0, fz * 18.0))
        };

        let mut block = AIR;

        if height <= column.land_height {
            block = if y == column.land_height.floor() as i32 {
                GRASS
            } else {
                DIRT
            };
        }

        if block == DIRT
            && height <= column.land_height + 10.0
            && triggers(cellular_18_at(&mut cellular_18) * 0.33)
        {
            block = STONE;
        }

        if column.biome == Biome::Desert && height <= column.land_height {
            block = SAND;
        }

        if height <= column.stone_height {
            block = STONE;
        }

        let deepslate_top = column.deepslate_height - self.tuning.deepslate_depth;
        if height <= deepslate_top {
            block = DEEPSLATE;
        }

        let below_caves = height <= column.cave_height;

        if below_caves {
            if is_host(block) && triggers(n.cellular_3d(fx * 20.0, fy * 20.0, fz * 20.0) * 0.23) {
                block = GRANITE;
            }
            if is_host(block) && triggers(n.cellular_3d(fx * 19.5, fy * 19.5, fz * 19.5) * 0.23) {
                block = DIORITE;
            }
            if (is_host(block) || block == DEEPSLATE)
                && triggers(cellular_18_at(&mut cellular_18) * 0.23)
            {
                block = if block == DEEPSLATE { TUFF } else { ANDESITE };
            }
        }

        let coal_at = |cache: &mut Option<f64>| {
            *cache.get_or_insert_with(|| n.simplex_fractal_3d(fx * 12.0, fy * 12.0, fz * 12.0) * 0.37)
        };

        if below_caves && is_host(block) && block != TUFF && triggers(coal_at(&mut coal)) {
            block = ORE_COAL;
        }

        let in_coal_band = height <= deepslate_top
            && height >= deepslate_top - self.tuning.deepslate_coal_band;
        if in_coal_band && !matches!(block, AIR | DIRT | GRASS) && triggers(coal_at(&mut coal)) {
            block = DEEPSLATE_COAL_ORE;
        }

        if below_caves
            && !matches!(block, AIR | DIRT | GRASS)
            && triggers(n.simplex_fractal_3d(fx * 11.0, fy * 11.0, fz * 11.0) * 0.37)
        {
            block = if matches!(block, DEEPSLATE | TUFF) {
                DEEPSLATE_IRON_ORE
            } else {
                ORE_IRON
            };
        }

        if block != AIR
            && below_caves
            && triggers(n.simplex_3d(fx * 5.0, fy * 3.0, fz * 5.0) * 1.1)
        {
            block = AIR;
        }

        if block != AIR
            && height <= column.land_height
            && triggers(n.perlin_fractal_3d(fx * 5.0, fy * 3.0, fz * 5.0) * 0.7)
        {
            block = AIR;
        }

        block
    }
}
