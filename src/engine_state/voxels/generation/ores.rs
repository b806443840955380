//! Random ore decoration of stone cells.

use crate::engine_state::voxels::{block::TerrainBlock, chunk::ChunkCoordinate};

/// A source of uniform draws in `[0, 100)`.
pub trait PercentStream {
    /// The next draw.
    fn next_percent(&mut self) -> f64;
}

impl PercentStream for fastrand::Rng {
    fn next_percent(&mut self) -> f64 {
        self.f64() * 100.0
    }
}

/// Seed of the ore stream of a chunk.
///
/// Depends on the coordinate product only, so the stream is identical every
/// time the chunk is regenerated.
pub fn ore_seed(coordinate: ChunkCoordinate) -> u64 {
    coordinate.x.wrapping_mul(coordinate.z).wrapping_mul(4096) as i64 as u64
}

/// Picks the block a stone cell at height `y` is replaced with.
///
/// Two draws are taken on every call, whether or not the cell changes, so the
/// stream stays aligned with the chunk's cell order. The checks run in a fixed
/// order and later matches win:
///
/// | first draw | height   | result                                        |
/// |------------|----------|-----------------------------------------------|
/// | `<= 4`     | `<= 105` | sulfur                                        |
/// | `<= 3`     | `<= 85`  | gold                                          |
/// | `<= 2`     | `<= 95`  | redstone                                      |
/// | `<= 1`     | `<= 95`  | diamond if the second draw `> 47`, else emerald |
///
/// # Arguments
/// * `stream` - The chunk's ore stream
/// * `y` - World height of the stone cell
///
/// # Returns
/// The replacement block, `STONE` if nothing matched
pub fn decorate_ore<S: PercentStream + ?Sized>(stream: &mut S, y: i32) -> TerrainBlock {
    let roll = stream.next_percent();
    let gem_roll = stream.next_percent();

    let mut block = TerrainBlock::STONE;
    if roll <= 4.0 && y <= 105 {
        block = TerrainBlock::ORE_SULFUR;
    }
    if roll <= 3.0 && y <= 85 {
        block = TerrainBlock::ORE_GOLD;
    }
    if roll <= 2.0 && y <= 95 {
        block = TerrainBlock::ORE_REDSTONE;
    }
    if roll <= 1.0 && y <= 95 {
        block = if gem_roll > 47.0 {
            TerrainBlock::ORE_DIAMOND
        } else {
            TerrainBlock::ORE_EMERALD
        };
    }
    block
}
