//! # Block Registry
//!
//! Maps block identifiers to prototype records and hands out compact
//! [`BlockCell`] values for them. The registry is populated once at start-up
//! (either from the bundled definition table or by a bootstrap collaborator)
//! and then shared read-only with every generation and meshing worker.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{BlockCell, BlockId, Facing, StatefulBlock};
use crate::{engine_state::crafting::CraftingResult, error::VoxelError};

/// Bundled definitions of every block the game ships with.
const DEFAULT_BLOCKS: &str = include_str!("../../../../assets/blocks.json");

/// The kind of tool a block must be broken with to yield its drops.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolType {
    /// Any tool, or a bare hand.
    #[default]
    Any,
    /// Stone-like blocks and ores.
    Pickaxe,
    /// Wooden blocks.
    Axe,
    /// Soil and sand.
    Shovel,
}

/// Tool tiers, ordered from weakest to strongest.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum MiningLevel {
    /// Wooden tools (the default requirement).
    #[default]
    Wood,
    /// Stone tools.
    Stone,
    /// Iron tools.
    Iron,
    /// Diamond tools.
    Diamond,
}

/// One entry of a block's drop table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Drop {
    /// Identifier of the dropped item.
    pub item: String,
    /// How many are dropped when the roll succeeds.
    pub quantity: u32,
    /// Probability in `[0, 1]` that the drop happens.
    pub chance: f32,
}

/// Attribute record describing one block type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockPrototype {
    /// Registry key.
    pub identifier: String,
    /// Base time to break the block by hand.
    pub hardness: f32,
    /// Atlas name used instead of the identifier, if any.
    pub texture_name: Option<String>,
    /// Whether faces look up `{name}_{face}` keys.
    pub has_sided_textures: bool,
    /// Whether instances carry mutable per-position data.
    pub stateful: bool,
    /// Items rolled when the block is harvested.
    pub drops: Vec<Drop>,
    /// Whether harvesting yields the block itself.
    pub drops_itself: bool,
    /// Tool needed for the block to yield anything.
    pub tool_required: ToolType,
    /// Minimum tool tier needed for the block to yield anything.
    pub mining_level: MiningLevel,
    /// Whether a player can place the block.
    pub placeable: bool,
    /// Whether a player can break the block at all.
    pub breakable: bool,
    /// What the block turns into in a furnace.
    pub smelted_result: Option<CraftingResult>,
    /// Ticks the block burns for as furnace fuel.
    pub burn_time: Option<u32>,
}

impl Default for BlockPrototype {
    fn default() -> Self {
        BlockPrototype {
            identifier: String::new(),
            hardness: 0.0,
            texture_name: None,
            has_sided_textures: false,
            stateful: false,
            drops: Vec::new(),
            drops_itself: true,
            tool_required: ToolType::Any,
            mining_level: MiningLevel::Wood,
            placeable: true,
            breakable: true,
            smelted_result: None,
            burn_time: None,
        }
    }
}

impl BlockPrototype {
    /// Creates a prototype with default attributes.
    pub fn new(identifier: impl Into<String>) -> Self {
        BlockPrototype {
            identifier: identifier.into(),
            ..Default::default()
        }
    }

    /// The atlas name faces of this block are looked up by.
    pub fn texture_base(&self) -> &str {
        self.texture_name.as_deref().unwrap_or(&self.identifier)
    }
}

/// Registry of block prototypes.
///
/// # Examples
/// ```
/// use voxel_terrain::{BlockPrototype, BlockRegistry};
///
/// let mut registry = BlockRegistry::new();
/// registry.register_prototype(BlockPrototype::new("stone")).unwrap();
/// let cell = registry.instantiate("stone").unwrap();
/// assert_eq!(registry.identifier(cell.id), Some("stone"));
/// assert!(registry.instantiate("cheese").is_err());
/// ```
#[derive(Debug, Default)]
pub struct BlockRegistry {
    prototypes: Vec<BlockPrototype>,
    ids: HashMap<String, BlockId>,
}

impl BlockRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the bundled block table.
    pub fn with_default_blocks() -> Result<Self, VoxelError> {
        Self::from_json_str(DEFAULT_BLOCKS)
    }

    /// Creates a registry from a JSON array of prototype records.
    pub fn from_json_str(json: &str) -> Result<Self, VoxelError> {
        let prototypes: Vec<BlockPrototype> = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for prototype in prototypes {
            registry.register_prototype(prototype)?;
        }
        Ok(registry)
    }

    /// Registers a prototype under its own identifier.
    ///
    /// # Returns
    /// - `Ok(BlockId)` the handle assigned to the prototype
    /// - `Err(VoxelError::DuplicateBlock)` if the identifier is taken
    pub fn register_prototype(&mut self, prototype: BlockPrototype) -> Result<BlockId, VoxelError> {
        if self.ids.contains_key(&prototype.identifier) {
            return Err(VoxelError::DuplicateBlock {
                identifier: prototype.identifier,
            });
        }
        let index = u16::try_from(self.prototypes.len())
            .map_err(|_| VoxelError::Config("block registry is full".into()))?;
        let id = BlockId(index);
        self.ids.insert(prototype.identifier.clone(), id);
        self.prototypes.push(prototype);
        Ok(id)
    }

    /// Registers the prototype built by `constructor` under `identifier`.
    pub fn register_with<F>(&mut self, identifier: &str, constructor: F) -> Result<BlockId, VoxelError>
    where
        F: FnOnce() -> BlockPrototype,
    {
        let prototype = BlockPrototype {
            identifier: identifier.to_owned(),
            ..constructor()
        };
        self.register_prototype(prototype)
    }

    /// Creates a fresh, un-rotated cell of the named prototype.
    pub fn instantiate(&self, identifier: &str) -> Result<BlockCell, VoxelError> {
        let id = self.require(identifier)?;
        Ok(self.cell_for(id))
    }

    /// Creates the persistent instance backing a stateful cell.
    pub fn instantiate_stateful(&self, identifier: &str) -> Result<StatefulBlock, VoxelError> {
        let cell = self.instantiate(identifier)?;
        Ok(StatefulBlock::new(cell, identifier))
    }

    /// Creates the persistent instance for an existing cell.
    ///
    /// Returns `None` unless the cell's prototype is stateful.
    pub fn stateful_instance(&self, cell: BlockCell) -> Option<StatefulBlock> {
        let prototype = self.prototype(cell.id)?;
        prototype
            .stateful
            .then(|| StatefulBlock::new(cell, prototype.identifier.as_str()))
    }

    /// Looks up the handle of an identifier.
    pub fn id_of(&self, identifier: &str) -> Option<BlockId> {
        self.ids.get(identifier).copied()
    }

    /// Looks up the handle of an identifier, failing if it is not registered.
    pub fn require(&self, identifier: &str) -> Result<BlockId, VoxelError> {
        self.id_of(identifier).ok_or_else(|| VoxelError::UnknownBlock {
            identifier: identifier.to_owned(),
        })
    }

    /// The prototype behind a handle.
    pub fn prototype(&self, id: BlockId) -> Option<&BlockPrototype> {
        self.prototypes.get(id.index())
    }

    /// The prototype registered under an identifier.
    pub fn prototype_named(&self, identifier: &str) -> Result<&BlockPrototype, VoxelError> {
        let id = self.require(identifier)?;
        Ok(&self.prototypes[id.index()])
    }

    /// The identifier behind a handle.
    pub fn identifier(&self, id: BlockId) -> Option<&str> {
        self.prototype(id).map(|prototype| prototype.identifier.as_str())
    }

    /// Number of registered prototypes.
    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    /// Whether nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    /// Iterates over handles and prototypes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockId, &BlockPrototype)> {
        self.prototypes
            .iter()
            .enumerate()
            .map(|(index, prototype)| (BlockId(index as u16), prototype))
    }

    fn cell_for(&self, id: BlockId) -> BlockCell {
        BlockCell {
            id,
            facing: Facing::Up,
            stateful: self.prototypes[id.index()].stateful,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_identifiers_are_rejected() {
        let mut registry = BlockRegistry::new();
        registry.register_prototype(BlockPrototype::new("dirt")).unwrap();
        let err = registry
            .register_prototype(BlockPrototype::new("dirt"))
            .unwrap_err();
        assert!(matches!(err, VoxelError::DuplicateBlock { .. }));
    }

    #[test]
    fn register_with_uses_the_given_identifier() {
        let mut registry = BlockRegistry::new();
        let id = registry
            .register_with("furnace", || BlockPrototype {
                stateful: true,
                ..BlockPrototype::new("ignored")
            })
            .unwrap();
        assert_eq!(registry.identifier(id), Some("furnace"));
        assert!(registry.instantiate("furnace").unwrap().stateful);
        assert!(registry.id_of("ignored").is_none());
    }

    #[test]
    fn default_table_contains_every_generated_block() {
        let registry = BlockRegistry::with_default_blocks().unwrap();
        for identifier in [
            "air", "stone", "dirt", "grass", "sand", "deepslate", "bedrock", "log", "leaves",
            "glass", "oreCoal", "oreIron", "oreGold", "oreRedstone", "oreSulfur", "oreDiamond",
            "oreEmerald", "deepslateCoalOre", "deepslateIronOre", "granite", "diorite",
            "andesite", "tuff",
        ] {
            assert!(registry.id_of(identifier).is_some(), "missing {identifier}");
        }
        assert!(registry.prototype_named("furnace").unwrap().stateful);
        assert!(registry.prototype_named("rainbowGenerator").unwrap().stateful);
        assert!(!registry.prototype_named("stone").unwrap().stateful);
    }

    #[test]
    fn texture_base_prefers_the_texture_name() {
        let registry = BlockRegistry::with_default_blocks().unwrap();
        assert_eq!(
            registry.prototype_named("oreCoal").unwrap().texture_base(),
            "coal_ore"
        );
        assert_eq!(registry.prototype_named("dirt").unwrap().texture_base(), "dirt");
    }
}
