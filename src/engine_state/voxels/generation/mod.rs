//! # Generation Module
//!
//! Deterministic terrain generation for one chunk at a time.
//!
//! ## Pipeline
//!
//! 1. The 2-D fields of all 256 columns are sampled once.
//! 2. Every cell is classified, in x, then y, then z order. Cells classified
//!    as plain stone draw from the chunk's ore stream.
//! 3. Biomes that permit trees get one pass of the tree decorator.
//! 4. Stateful cells of the final grid are instantiated and reported with
//!    their absolute positions.
//!
//! The generator only reads shared data (registry, noise) and writes its own
//! grid, so any number of chunks can be generated concurrently.

use cgmath::Point3;
use log::debug;
use web_time::Instant;

use crate::{
    config::{TerrainTuning, WorldConfig},
    core::CancellationToken,
    engine_state::voxels::{
        block::{BlockRegistry, StatefulBlock, TerrainBlock, TerrainPalette},
        chunk::{BlockGrid, ChunkCoordinate, CHUNK_HEIGHT, CHUNK_SIZE},
    },
    error::VoxelError,
};

mod biome;
mod noise_source;
mod ores;
mod terrain;
mod trees;

pub use biome::Biome;
pub use noise_source::{NoiseField, NoiseSource};
pub use ores::{decorate_ore, ore_seed, PercentStream};
pub use terrain::{ColumnSample, TerrainColumnClassifier};
pub use trees::{tree_seed, TreeDecorator};

/// The output of generating one chunk.
#[derive(Clone, Debug)]
pub struct GeneratedChunk {
    /// The chunk that was generated.
    pub coordinate: ChunkCoordinate,
    /// The fully decorated grid.
    pub grid: BlockGrid,
    /// Live instances of every stateful cell, keyed by absolute position.
    pub stateful: Vec<(Point3<i32>, StatefulBlock)>,
}

/// Produces chunk grids for one world.
pub struct ChunkGenerator<'a, N: NoiseField = NoiseSource> {
    classifier: TerrainColumnClassifier<N>,
    palette: TerrainPalette,
    registry: &'a BlockRegistry,
    biome: Biome,
}

impl<'a> ChunkGenerator<'a, NoiseSource> {
    /// Creates a generator seeded and tuned from `config`.
    pub fn from_config(config: &WorldConfig, registry: &'a BlockRegistry) -> Result<Self, VoxelError> {
        Self::new(
            NoiseSource::new(config.seed, &config.noise),
            config.terrain.clone(),
            config.biome,
            registry,
        )
    }
}

impl<'a, N: NoiseField> ChunkGenerator<'a, N> {
    /// Creates a generator over arbitrary noise.
    ///
    /// Fails if `registry` is missing any block the generator can emit.
    pub fn new(
        noise: N,
        tuning: TerrainTuning,
        biome: Biome,
        registry: &'a BlockRegistry,
    ) -> Result<Self, VoxelError> {
        Ok(ChunkGenerator {
            classifier: TerrainColumnClassifier::new(noise, tuning),
            palette: TerrainPalette::new(registry)?,
            registry,
            biome,
        })
    }

    /// The column classifier, for sampling terrain outside chunk generation.
    pub fn classifier(&self) -> &TerrainColumnClassifier<N> {
        &self.classifier
    }

    /// Cells of the terrain blocks, resolved against the registry.
    pub fn palette(&self) -> &TerrainPalette {
        &self.palette
    }

    /// The biome every chunk of this generator is shaped by.
    pub fn biome(&self) -> Biome {
        self.biome
    }

    /// Generates a chunk to completion.
    pub fn generate(&self, coordinate: ChunkCoordinate) -> Result<GeneratedChunk, VoxelError> {
        self.generate_cancellable(coordinate, &CancellationToken::new())
    }

    /// Generates a chunk, giving up between rows once `token` is cancelled.
    ///
    /// # Arguments
    /// * `coordinate` - The chunk to generate
    /// * `token` - Checked before every row of cells
    ///
    /// # Returns
    /// The generated chunk, or `VoxelError::Cancelled`
    pub fn generate_cancellable(
        &self,
        coordinate: ChunkCoordinate,
        token: &CancellationToken,
    ) -> Result<GeneratedChunk, VoxelError> {
        let start = Instant::now();
        let origin = coordinate.origin();

        let columns: Vec<ColumnSample> = (0..CHUNK_SIZE)
            .flat_map(|x| (0..CHUNK_SIZE).map(move |z| (x, z)))
            .map(|(x, z)| self.classifier.sample_column(origin.x + x, origin.z + z, self.biome))
            .collect();

        let mut grid = BlockGrid::filled(self.palette.cell(TerrainBlock::AIR));
        let mut ores = fastrand::Rng::with_seed(ore_seed(coordinate));

        for x in 0..CHUNK_SIZE {
            for y in 0..CHUNK_HEIGHT {
                if token.is_cancelled() {
                    return Err(VoxelError::Cancelled { coordinate });
                }
                for z in 0..CHUNK_SIZE {
                    let column = &columns[(x * CHUNK_SIZE + z) as usize];
                    let mut block = self.classifier.classify_in_column(column, y);
                    if block == TerrainBlock::STONE {
                        block = decorate_ore(&mut ores, y);
                    }
                    grid.set(x, y, z, self.palette.cell(block));
                }
            }
        }

        if self.biome.permits_trees() {
            TreeDecorator::new(&self.palette).decorate(coordinate, &mut grid, self.classifier.noise());
        }

        let stateful = grid
            .iter()
            .filter(|(_, cell)| cell.stateful)
            .filter_map(|(local, cell)| {
                self.registry
                    .stateful_instance(cell)
                    .map(|instance| (coordinate.to_world(local), instance))
            })
            .collect();

        debug!(
            "Generated chunk {} in {:.2}ms",
            coordinate,
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(GeneratedChunk {
            coordinate,
            grid,
            stateful,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Zero;

    impl NoiseField for Zero {
        fn simplex_2d(&self, _: f64, _: f64) -> f64 {
            0.0
        }
        fn simplex_3d(&self, _: f64, _: f64, _: f64) -> f64 {
            0.0
        }
        fn perlin_fractal_3d(&self, _: f64, _: f64, _: f64) -> f64 {
            0.0
        }
        fn simplex_fractal_3d(&self, _: f64, _: f64, _: f64) -> f64 {
            0.0
        }
        fn cellular_3d(&self, _: f64, _: f64, _: f64) -> f64 {
            0.0
        }
    }

    #[test]
    fn cancelled_token_aborts_generation() {
        let registry = BlockRegistry::with_default_blocks().unwrap();
        let generator =
            ChunkGenerator::new(Zero, TerrainTuning::default(), Biome::Plains, &registry).unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let err = generator
            .generate_cancellable(ChunkCoordinate::new(2, 2), &token)
            .unwrap_err();
        assert!(matches!(err, VoxelError::Cancelled { coordinate } if coordinate == ChunkCoordinate::new(2, 2)));
    }

    #[test]
    fn flat_world_has_grass_at_land_height() {
        let registry = BlockRegistry::with_default_blocks().unwrap();
        let generator =
            ChunkGenerator::new(Zero, TerrainTuning::default(), Biome::Plains, &registry).unwrap();
        let chunk = generator.generate(ChunkCoordinate::new(0, 0)).unwrap();
        let palette = generator.palette();
        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                let surface = chunk.grid.get(x, 175, z).unwrap();
                assert!(palette.is(surface, TerrainBlock::GRASS));
                assert!(palette.is(chunk.grid.get(x, 176, z).unwrap(), TerrainBlock::AIR));
            }
        }
        assert!(chunk.stateful.is_empty());
    }

    #[test]
    fn ores_only_appear_below_their_ceilings() {
        let registry = BlockRegistry::with_default_blocks().unwrap();
        let generator =
            ChunkGenerator::new(Zero, TerrainTuning::default(), Biome::Plains, &registry).unwrap();
        let chunk = generator.generate(ChunkCoordinate::new(5, -4)).unwrap();
        let palette = generator.palette();
        for (position, cell) in chunk.grid.iter() {
            if palette.is(cell, TerrainBlock::ORE_SULFUR) {
                assert!(position.y <= 105);
            }
            if palette.is(cell, TerrainBlock::ORE_GOLD) {
                assert!(position.y <= 85);
            }
            if palette.is(cell, TerrainBlock::ORE_DIAMOND) || palette.is(cell, TerrainBlock::ORE_EMERALD) {
                assert!(position.y <= 95);
            }
        }
    }
}
