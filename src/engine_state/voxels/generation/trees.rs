//! # Tree Decorator
//!
//! Plants trees on the grass of a freshly generated chunk. Whether a chunk
//! gets trees, and how many, comes from one noise sample per chunk; where they
//! go comes from a chunk-seeded stream, so a chunk always grows the same trees.

use log::trace;

use super::noise_source::NoiseField;
use crate::engine_state::voxels::{
    block::{TerrainBlock, TerrainPalette},
    chunk::{BlockGrid, ChunkCoordinate, CHUNK_HEIGHT},
};

const TRUNK_HEIGHT: i32 = 5;

/// Seed of the tree stream of a chunk. Distinct from the ore stream's seed.
pub fn tree_seed(coordinate: ChunkCoordinate) -> u64 {
    coordinate.x.wrapping_mul(coordinate.z).wrapping_mul(8192) as i64 as u64
}

/// Writes trees into chunk grids.
pub struct TreeDecorator<'a> {
    palette: &'a TerrainPalette,
}

impl<'a> TreeDecorator<'a> {
    /// Creates a decorator placing the log and leaves cells of `palette`.
    ///
    /// # Arguments
    /// * `palette` - Resolves the cells trees grow on and are built from
    pub fn new(palette: &'a TerrainPalette) -> Self {
        TreeDecorator { palette }
    }

    /// Plants the chunk's trees into `grid`.
    ///
    /// # Arguments
    /// * `coordinate` - The chunk being decorated
    /// * `grid` - The chunk's fully classified grid
    /// * `noise` - The world's noise, sampled once for the chunk
    ///
    /// # Returns
    /// The number of trees actually planted
    pub fn decorate<N: NoiseField + ?Sized>(
        &self,
        coordinate: ChunkCoordinate,
        grid: &mut BlockGrid,
        noise: &N,
    ) -> usize {
        let sample = noise.simplex_2d(coordinate.x as f64 * 2.5, coordinate.z as f64 * 2.5);
        if sample < 0.0 {
            return 0;
        }

        let mut rng = fastrand::Rng::with_seed(tree_seed(coordinate));
        let attempts = ((rng.f64() * 4.0 + 1.0) * (sample + 1.0)) as i32;

        let mut planted = 0;
        for _ in 0..attempts {
            let x = (rng.f64() * 12.0 + 2.0) as i32;
            let z = (rng.f64() * 12.0 + 2.0) as i32;

            let Some(ground) = self.find_ground(grid, x, z) else {
                continue;
            };
            if self.crowded(grid, x, ground, z) {
                continue;
            }

            self.grow(grid, x, ground, z);
            planted += 1;
        }

        trace!("Planted {planted}/{attempts} trees in chunk {coordinate}");
        planted
    }

    /// The height just above the lowest grass cell of a column.
    fn find_ground(&self, grid: &BlockGrid, x: i32, z: i32) -> Option<i32> {
        (0..CHUNK_HEIGHT)
            .find(|&y| {
                grid.get(x, y, z)
                    .is_some_and(|cell| self.palette.is(cell, TerrainBlock::GRASS))
            })
            .map(|y| y + 1)
    }

    /// Whether another trunk lies inside the exclusion box of a candidate.
    fn crowded(&self, grid: &BlockGrid, x: i32, ground: i32, z: i32) -> bool {
        (x - 2..x + 3).any(|a| {
            (ground - 3..ground + 7).any(|b| {
                (z - 2..z + 3).any(|c| {
                    grid.get(a, b, c)
                        .is_some_and(|cell| self.palette.is(cell, TerrainBlock::LOG))
                })
            })
        })
    }

    fn grow(&self, grid: &mut BlockGrid, x: i32, ground: i32, z: i32) {
        grid.set(x, ground - 1, z, self.palette.cell(TerrainBlock::DIRT));
        for y in ground..ground + TRUNK_HEIGHT {
            grid.set(x, y, z, self.palette.cell(TerrainBlock::LOG));
        }

        self.leaf_layer(grid, x, ground + 3, z, 2);
        self.leaf_layer(grid, x, ground + 4, z, 1);
        self.leaf_layer(grid, x, ground + 5, z, 1);
        self.leaf_layer(grid, x, ground + 6, z, 0);
    }

    /// Fills a square of leaves of the given radius, sparing logs.
    fn leaf_layer(&self, grid: &mut BlockGrid, x: i32, y: i32, z: i32, radius: i32) {
        let leaves = self.palette.cell(TerrainBlock::LEAVES);
        for a in x - radius..=x + radius {
            for c in z - radius..=z + radius {
                match grid.get(a, y, c) {
                    Some(cell) if !self.palette.is(cell, TerrainBlock::LOG) => {
                        grid.set(a, y, c, leaves);
                    }
                    _ => {}
                }
            }
        }
    }
}
