//! Dense storage of one chunk's cells.

use cgmath::Point3;

use super::{CHUNK_HEIGHT, CHUNK_SIZE, CHUNK_VOLUME};
use crate::engine_state::voxels::block::BlockCell;

/// A fully allocated `CHUNK_SIZE x CHUNK_HEIGHT x CHUNK_SIZE` grid of cells.
///
/// Coordinates are chunk-local. Reads outside the grid return `None` instead of
/// panicking so neighbour lookups at the chunk shell degrade to "absent".
#[derive(Clone, Debug, PartialEq)]
pub struct BlockGrid {
    cells: Vec<BlockCell>,
}

impl BlockGrid {
    /// Creates a grid with every cell set to `fill`.
    pub fn filled(fill: BlockCell) -> Self {
        BlockGrid {
            cells: vec![fill; CHUNK_VOLUME],
        }
    }

    /// Whether the local coordinate lies inside the grid.
    #[inline]
    pub fn contains(x: i32, y: i32, z: i32) -> bool {
        (0..CHUNK_SIZE).contains(&x) && (0..CHUNK_HEIGHT).contains(&y) && (0..CHUNK_SIZE).contains(&z)
    }

    /// Linear index of an in-bounds local coordinate.
    #[inline]
    pub fn index(x: i32, y: i32, z: i32) -> usize {
        (x + CHUNK_SIZE * (z + CHUNK_SIZE * y)) as usize
    }

    /// The cell at a local coordinate, or `None` outside the grid.
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<BlockCell> {
        if Self::contains(x, y, z) {
            Some(self.cells[Self::index(x, y, z)])
        } else {
            None
        }
    }

    /// Writes a cell. Returns `false` and does nothing outside the grid.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, z: i32, cell: BlockCell) -> bool {
        if Self::contains(x, y, z) {
            self.cells[Self::index(x, y, z)] = cell;
            true
        } else {
            false
        }
    }

    /// The cells in storage order.
    pub fn cells(&self) -> &[BlockCell] {
        &self.cells
    }

    /// Iterates over every local position and its cell.
    pub fn iter(&self) -> impl Iterator<Item = (Point3<i32>, BlockCell)> + '_ {
        self.cells.iter().enumerate().map(|(index, cell)| {
            let index = index as i32;
            let x = index % CHUNK_SIZE;
            let z = (index / CHUNK_SIZE) % CHUNK_SIZE;
            let y = index / (CHUNK_SIZE * CHUNK_SIZE);
            (Point3::new(x, y, z), *cell)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::{BlockId, Facing};

    fn cell(id: u16) -> BlockCell {
        BlockCell {
            id: BlockId(id),
            facing: Facing::Up,
            stateful: false,
        }
    }

    #[test]
    fn out_of_bounds_reads_are_absent() {
        let grid = BlockGrid::filled(cell(0));
        assert!(grid.get(-1, 0, 0).is_none());
        assert!(grid.get(0, CHUNK_HEIGHT, 0).is_none());
        assert!(grid.get(0, 0, CHUNK_SIZE).is_none());
        assert_eq!(grid.get(15, 349, 15), Some(cell(0)));
    }

    #[test]
    fn iteration_reports_positions_that_round_trip() {
        let mut grid = BlockGrid::filled(cell(0));
        assert!(grid.set(3, 200, 11, cell(7)));
        assert!(!grid.set(16, 0, 0, cell(7)));
        let found: Vec<_> = grid.iter().filter(|(_, c)| c.id == BlockId(7)).collect();
        assert_eq!(found, vec![(Point3::new(3, 200, 11), cell(7))]);
    }
}
