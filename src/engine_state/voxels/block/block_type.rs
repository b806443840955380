//! # Terrain Block Module
//!
//! The closed set of block types the terrain generator can emit, and the
//! palette that resolves them to registry cells once per generation pass.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::{registry::BlockRegistry, BlockCell};
use crate::error::VoxelError;

/// Enumerates every block type produced by classification and decoration.
///
/// Each variant maps to the registry identifier returned by
/// [`TerrainBlock::identifier`]. Classification works on this enum so the
/// rule table never touches strings; the palette turns the result into cells.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum TerrainBlock {
    /// Empty space.
    AIR,
    /// Soil below the surface.
    DIRT,
    /// The topmost soil layer.
    GRASS,
    /// Desert soil.
    SAND,
    /// Generic host rock, the only cell ores are decorated onto.
    STONE,
    /// Deep host rock.
    DEEPSLATE,
    /// Indestructible floor.
    BEDROCK,
    /// Rock variant.
    GRANITE,
    /// Rock variant.
    DIORITE,
    /// Rock variant.
    ANDESITE,
    /// Rock variant found inside deepslate.
    TUFF,
    /// Coal in ordinary rock.
    ORE_COAL,
    /// Iron in ordinary rock.
    ORE_IRON,
    /// Coal in the deepslate band.
    DEEPSLATE_COAL_ORE,
    /// Iron in deepslate or tuff.
    DEEPSLATE_IRON_ORE,
    /// Random stone decoration.
    ORE_SULFUR,
    /// Random stone decoration.
    ORE_GOLD,
    /// Random stone decoration.
    ORE_REDSTONE,
    /// Random stone decoration.
    ORE_DIAMOND,
    /// Random stone decoration.
    ORE_EMERALD,
    /// Tree trunk.
    LOG,
    /// Tree canopy.
    LEAVES,
}

impl TerrainBlock {
    /// Number of terrain block types.
    pub const COUNT: usize = TerrainBlock::LEAVES as usize + 1;

    /// Iterates over every terrain block type in declaration order.
    pub fn all() -> impl Iterator<Item = TerrainBlock> {
        (0..Self::COUNT).filter_map(TerrainBlock::from_usize)
    }

    /// The registry identifier of this block type.
    pub fn identifier(self) -> &'static str {
        match self {
            TerrainBlock::AIR => "air",
            TerrainBlock::DIRT => "dirt",
            TerrainBlock::GRASS => "grass",
            TerrainBlock::SAND => "sand",
            TerrainBlock::STONE => "stone",
            TerrainBlock::DEEPSLATE => "deepslate",
            TerrainBlock::BEDROCK => "bedrock",
            TerrainBlock::GRANITE => "granite",
            TerrainBlock::DIORITE => "diorite",
            TerrainBlock::ANDESITE => "andesite",
            TerrainBlock::TUFF => "tuff",
            TerrainBlock::ORE_COAL => "oreCoal",
            TerrainBlock::ORE_IRON => "oreIron",
            TerrainBlock::DEEPSLATE_COAL_ORE => "deepslateCoalOre",
            TerrainBlock::DEEPSLATE_IRON_ORE => "deepslateIronOre",
            TerrainBlock::ORE_SULFUR => "oreSulfur",
            TerrainBlock::ORE_GOLD => "oreGold",
            TerrainBlock::ORE_REDSTONE => "oreRedstone",
            TerrainBlock::ORE_DIAMOND => "oreDiamond",
            TerrainBlock::ORE_EMERALD => "oreEmerald",
            TerrainBlock::LOG => "log",
            TerrainBlock::LEAVES => "leaves",
        }
    }
}

/// Pre-resolved cells for every [`TerrainBlock`].
///
/// Built once per generation pass so the per-cell hot loop never performs a
/// string lookup. Construction fails if any terrain identifier is missing from
/// the registry, which makes an incomplete registry a configuration error
/// reported before a single cell is generated.
#[derive(Clone, Debug)]
pub struct TerrainPalette {
    cells: Vec<BlockCell>,
}

impl TerrainPalette {
    /// Resolves every terrain block type against `registry`.
    pub fn new(registry: &BlockRegistry) -> Result<Self, VoxelError> {
        let cells = TerrainBlock::all()
            .map(|block| registry.instantiate(block.identifier()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TerrainPalette { cells })
    }

    /// The cell a terrain block type resolves to.
    pub fn cell(&self, block: TerrainBlock) -> BlockCell {
        self.cells[block as usize]
    }

    /// Whether `cell` is an instance of `block`.
    pub fn is(&self, cell: BlockCell, block: TerrainBlock) -> bool {
        cell.id == self.cells[block as usize].id
    }
}
