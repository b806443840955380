//! # Block Module
//!
//! This module provides the block-related data of the voxel world: compact
//! per-cell values stored in chunk grids, the prototype registry they point
//! into, the fixed set of terrain blocks the generator emits and the free
//! functions that implement block behaviour over prototype records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub mod behaviour;
pub mod block_side;
pub mod block_type;
pub mod registry;

pub use block_type::{TerrainBlock, TerrainPalette};
pub use registry::{BlockPrototype, BlockRegistry, Drop, MiningLevel, ToolType};

/// Compact handle of a registered prototype.
///
/// Handles are assigned in registration order and are only meaningful for the
/// registry that issued them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u16);

impl BlockId {
    /// Index of the handle in registry-sized tables.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The six orientations a block can be placed in.
///
/// `Up` is the default, un-rotated orientation. The others name the direction
/// the block's logical top points at once placed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Top points up.
    #[default]
    Up,
    /// Top points towards positive Z.
    North,
    /// Top points towards positive X.
    East,
    /// Top points towards negative Z.
    South,
    /// Top points towards negative X.
    West,
    /// Top points down.
    Down,
}

impl Facing {
    /// All orientations, `Up` first.
    pub fn all() -> [Facing; 6] {
        [
            Facing::Up,
            Facing::North,
            Facing::East,
            Facing::South,
            Facing::West,
            Facing::Down,
        ]
    }
}

/// A single voxel stored in a chunk grid.
///
/// Cells are lightweight copies of their prototype: the handle, the placement
/// orientation and whether the prototype keeps per-instance state. The state
/// itself lives in the world's sparse [`StatefulBlock`] map.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlockCell {
    /// The prototype this cell was instantiated from.
    pub id: BlockId,
    /// How the block is rotated.
    pub facing: Facing,
    /// Whether the prototype owns mutable per-instance data.
    pub stateful: bool,
}

impl BlockCell {
    /// Returns a copy of the cell rotated to `facing`.
    pub fn with_facing(self, facing: Facing) -> Self {
        BlockCell { facing, ..self }
    }
}

/// The persistent instance of a stateful block, keyed in the world by its
/// absolute voxel position.
#[derive(Clone, Debug, PartialEq)]
pub struct StatefulBlock {
    /// The grid cell this instance backs.
    pub cell: BlockCell,
    /// Prototype identifier, kept for collaborators that never see the registry.
    pub identifier: String,
    /// Named mutable values, e.g. a furnace's remaining fuel.
    pub properties: BTreeMap<String, i64>,
}

impl StatefulBlock {
    /// Creates an instance with no properties set.
    pub fn new(cell: BlockCell, identifier: impl Into<String>) -> Self {
        StatefulBlock {
            cell,
            identifier: identifier.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Reads a property, if set.
    pub fn property(&self, name: &str) -> Option<i64> {
        self.properties.get(name).copied()
    }

    /// Writes a property, returning the previous value.
    pub fn set_property(&mut self, name: impl Into<String>, value: i64) -> Option<i64> {
        self.properties.insert(name.into(), value)
    }
}
