//! # Block Behaviour
//!
//! Placing, breaking and smelting are capability checks over a
//! [`BlockPrototype`] record rather than per-block overrides.

use super::registry::{BlockPrototype, MiningLevel, ToolType};
use crate::engine_state::crafting::CraftingResult;

/// The tool a player is holding while breaking a block.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tool {
    /// Kind of the tool.
    pub tool_type: ToolType,
    /// Tier of the tool.
    pub mining_level: MiningLevel,
    /// Hardness is divided by this when the tool suits the block.
    pub speed: f32,
}

/// A quantity of one item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemStack {
    /// Item identifier.
    pub identifier: String,
    /// Number of items.
    pub quantity: u32,
}

/// Whether breaking `block` with `tool` (or by hand when `None`) yields drops.
pub fn can_harvest(block: &BlockPrototype, tool: Option<&Tool>) -> bool {
    if !block.breakable {
        return false;
    }
    match (block.tool_required, tool) {
        (ToolType::Any, _) => true,
        (_, None) => false,
        (required, Some(tool)) => {
            tool.tool_type == required && tool.mining_level >= block.mining_level
        }
    }
}

/// Time needed to break `block`, or `None` if it cannot be broken.
pub fn break_time(block: &BlockPrototype, tool: Option<&Tool>) -> Option<f32> {
    if !block.breakable {
        return None;
    }
    let speed = match tool {
        Some(tool) if tool.tool_type == block.tool_required && tool.speed > 0.0 => tool.speed,
        _ => 1.0,
    };
    Some(block.hardness / speed)
}

/// Rolls the items produced by harvesting `block`.
///
/// Nothing drops when the tool is unsuitable. Each entry of the drop table is
/// rolled independently against its chance.
pub fn harvest(block: &BlockPrototype, tool: Option<&Tool>, rng: &mut fastrand::Rng) -> Vec<ItemStack> {
    if !can_harvest(block, tool) {
        return Vec::new();
    }

    let mut items = Vec::new();
    if block.drops_itself {
        items.push(ItemStack {
            identifier: block.identifier.clone(),
            quantity: 1,
        });
    }
    for drop in &block.drops {
        if rng.f32() < drop.chance {
            items.push(ItemStack {
                identifier: drop.item.clone(),
                quantity: drop.quantity,
            });
        }
    }
    items
}

/// What `block` turns into when smelted.
pub fn smelt(block: &BlockPrototype) -> Option<&CraftingResult> {
    block.smelted_result.as_ref()
}

/// Whether `block` can be placed by a player.
pub fn can_place(block: &BlockPrototype) -> bool {
    block.placeable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::BlockRegistry;

    fn pickaxe(mining_level: MiningLevel) -> Tool {
        Tool {
            tool_type: ToolType::Pickaxe,
            mining_level,
            speed: 6.0,
        }
    }

    #[test]
    fn ores_need_a_suitable_pickaxe() {
        let registry = BlockRegistry::with_default_blocks().unwrap();
        let gold = registry.prototype_named("oreGold").unwrap();
        assert!(!can_harvest(gold, None));
        assert!(!can_harvest(gold, Some(&pickaxe(MiningLevel::Wood))));
        assert!(can_harvest(gold, Some(&pickaxe(MiningLevel::Iron))));
        assert!(can_harvest(gold, Some(&pickaxe(MiningLevel::Diamond))));
    }

    #[test]
    fn coal_ore_drops_coal_not_itself() {
        let registry = BlockRegistry::with_default_blocks().unwrap();
        let coal = registry.prototype_named("oreCoal").unwrap();
        let mut rng = fastrand::Rng::with_seed(3);
        let items = harvest(coal, Some(&pickaxe(MiningLevel::Wood)), &mut rng);
        assert_eq!(
            items,
            vec![ItemStack {
                identifier: "coal".into(),
                quantity: 1
            }]
        );
    }

    #[test]
    fn matching_tool_divides_hardness() {
        let registry = BlockRegistry::with_default_blocks().unwrap();
        let stone = registry.prototype_named("stone").unwrap();
        assert_eq!(break_time(stone, None), Some(240.0));
        assert_eq!(break_time(stone, Some(&pickaxe(MiningLevel::Iron))), Some(40.0));
        let bedrock = registry.prototype_named("bedrock").unwrap();
        assert_eq!(break_time(bedrock, Some(&pickaxe(MiningLevel::Diamond))), None);
    }

    #[test]
    fn cobblestone_smelts_into_stone() {
        let registry = BlockRegistry::with_default_blocks().unwrap();
        let cobblestone = registry.prototype_named("cobblestone").unwrap();
        let result = smelt(cobblestone).unwrap();
        assert_eq!(result.identifier, "stone");
        assert_eq!(result.quantity, 1);
        assert!(smelt(registry.prototype_named("dirt").unwrap()).is_none());
        assert!(!can_place(registry.prototype_named("water").unwrap()));
    }
}
