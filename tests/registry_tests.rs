use cgmath::Point3;
use voxel_terrain::{
    engine_state::voxels::block::behaviour, Biome, BlockRegistry, ChunkCoordinate,
    CraftingResult, Facing, RecipeRegistry, VoxelError, World, WorldConfig,
};

#[test]
fn test_every_default_recipe_resolves_to_its_own_result() {
    let recipes = RecipeRegistry::with_default_recipes().unwrap();
    assert!(!recipes.is_empty());

    for recipe in recipes.iter() {
        assert_eq!(recipes.find(&recipe.pattern), Some(&recipe.result));
    }
}

#[test]
fn test_recipes_survive_a_json_round_trip() {
    let recipes = RecipeRegistry::with_default_recipes().unwrap();
    let json = serde_json::to_string(&recipes.iter().collect::<Vec<_>>()).unwrap();
    let reloaded = RecipeRegistry::from_json_str(&json).unwrap();

    assert_eq!(reloaded.len(), recipes.len());
    for (before, after) in recipes.iter().zip(reloaded.iter()) {
        assert_eq!(before, after);
    }
}

#[test]
fn test_torch_matches_in_a_corner() {
    let recipes = RecipeRegistry::with_default_recipes().unwrap();
    let mut grid: [[Option<String>; 3]; 3] = Default::default();
    grid[1][2] = Some("coal".into());
    grid[2][2] = Some("stick".into());

    assert_eq!(recipes.find(&grid), Some(&CraftingResult::new("torch", 4)));
}

#[test]
fn test_unknown_blocks_are_configuration_errors() {
    let registry = BlockRegistry::with_default_blocks().unwrap();
    let error = registry.instantiate("cheese").unwrap_err();
    assert!(matches!(error, VoxelError::UnknownBlock { ref identifier } if identifier == "cheese"));
}

#[test]
fn test_smelting_chain_resolves_through_the_registry() {
    let registry = BlockRegistry::with_default_blocks().unwrap();
    let sand = registry.prototype_named("sand").unwrap();
    let glass = behaviour::smelt(sand).unwrap();

    assert_eq!(glass, &CraftingResult::new("glass", 1));
    assert!(registry.id_of(&glass.identifier).is_some());
}

#[test]
fn test_bedrock_cannot_be_broken() {
    let registry = BlockRegistry::with_default_blocks().unwrap();
    let bedrock = registry.prototype_named("bedrock").unwrap();
    assert_eq!(behaviour::break_time(bedrock, None), None);
    assert!(!behaviour::can_harvest(bedrock, None));
}

#[test]
fn test_placing_a_furnace_creates_its_instance() {
    let registry = BlockRegistry::with_default_blocks().unwrap();
    let mut world = World::new();
    let air = registry.instantiate("air").unwrap();
    world.insert_placeholder(ChunkCoordinate::new(-1, 0), air);

    let position = Point3::new(-3, 120, 5);
    let furnace = registry.instantiate("furnace").unwrap().with_facing(Facing::North);
    world.set_block(position, furnace, &registry).unwrap();

    let instance = world.stateful_at(position).unwrap();
    assert_eq!(instance.identifier, "furnace");
    assert_eq!(instance.cell.facing, Facing::North);

    world.set_block(position, air, &registry).unwrap();
    assert!(world.stateful_at(position).is_none());
}

#[test]
fn test_world_config_reads_partial_json() {
    let config = WorldConfig::from_json_str(r#"{ "seed": 42, "biome": "Desert" }"#).unwrap();
    assert_eq!(config.seed, 42);
    assert_eq!(config.biome, Biome::Desert);
    assert_eq!(config.render_distance, WorldConfig::default().render_distance);

    let error = WorldConfig::from_json_str(r#"{ "worker_count": 0 }"#).unwrap_err();
    assert!(matches!(error, VoxelError::Config(_)));
}
