use voxel_terrain::{
    Biome, BlockPrototype, BlockRegistry, ChunkCoordinate, ChunkGenerator, NoiseField,
    TerrainBlock, TerrainTuning, WorldConfig, CHUNK_SIZE,
};

/// Noise that is zero everywhere.
struct FlatNoise;

impl NoiseField for FlatNoise {
    fn simplex_2d(&self, _x: f64, _z: f64) -> f64 {
        0.0
    }

    fn simplex_3d(&self, _x: f64, _y: f64, _z: f64) -> f64 {
        0.0
    }

    fn perlin_fractal_3d(&self, _x: f64, _y: f64, _z: f64) -> f64 {
        0.0
    }

    fn simplex_fractal_3d(&self, _x: f64, _y: f64, _z: f64) -> f64 {
        0.0
    }

    fn cellular_3d(&self, _x: f64, _y: f64, _z: f64) -> f64 {
        0.0
    }
}

/// A registry holding only the blocks the generator emits.
fn terrain_registry(stateful: Option<TerrainBlock>) -> BlockRegistry {
    let mut registry = BlockRegistry::new();
    for block in TerrainBlock::all() {
        let mut prototype = BlockPrototype::new(block.identifier());
        prototype.stateful = Some(block) == stateful;
        registry.register_prototype(prototype).unwrap();
    }
    registry
}

fn small_config(seed: u32, biome: Biome) -> WorldConfig {
    WorldConfig {
        seed,
        biome,
        ..WorldConfig::default()
    }
}

#[test]
fn test_same_seed_generates_identical_chunks() {
    let registry = BlockRegistry::with_default_blocks().unwrap();
    let config = small_config(7, Biome::Forest);
    let first = ChunkGenerator::from_config(&config, &registry).unwrap();
    let second = ChunkGenerator::from_config(&config, &registry).unwrap();

    let coordinate = ChunkCoordinate::new(3, -2);
    let a = first.generate(coordinate).unwrap();
    let b = second.generate(coordinate).unwrap();

    assert_eq!(a.grid, b.grid);
    assert_eq!(a.stateful, b.stateful);
}

#[test]
fn test_different_seeds_generate_different_chunks() {
    let registry = BlockRegistry::with_default_blocks().unwrap();
    let coordinate = ChunkCoordinate::new(0, 0);

    let a = ChunkGenerator::from_config(&small_config(1, Biome::Plains), &registry)
        .unwrap()
        .generate(coordinate)
        .unwrap();
    let b = ChunkGenerator::from_config(&small_config(2, Biome::Plains), &registry)
        .unwrap()
        .generate(coordinate)
        .unwrap();

    assert_ne!(a.grid, b.grid);
}

#[test]
fn test_bottom_layers_are_bedrock_for_every_seed() {
    let registry = BlockRegistry::with_default_blocks().unwrap();
    let bedrock = registry.instantiate("bedrock").unwrap();

    for seed in [0, 1337, 90210] {
        let generator =
            ChunkGenerator::from_config(&small_config(seed, Biome::Forest), &registry).unwrap();
        let chunk = generator.generate(ChunkCoordinate::new(-1, 4)).unwrap();

        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                for y in 0..=2 {
                    assert_eq!(chunk.grid.get(x, y, z), Some(bedrock), "seed {seed} at ({x}, {y}, {z})");
                }
            }
        }
        assert_eq!(chunk.grid.get(8, 1, 8), Some(bedrock));
    }
}

#[test]
fn test_flat_noise_puts_grass_on_dirt_at_half_height() {
    let registry = BlockRegistry::with_default_blocks().unwrap();
    let generator = ChunkGenerator::new(
        FlatNoise,
        TerrainTuning::default(),
        Biome::Plains,
        &registry,
    )
    .unwrap();
    let chunk = generator.generate(ChunkCoordinate::new(0, 0)).unwrap();

    let grass = registry.instantiate("grass").unwrap();
    let dirt = registry.instantiate("dirt").unwrap();
    let air = registry.instantiate("air").unwrap();
    assert_eq!(chunk.grid.get(8, 175, 8), Some(grass));
    assert_eq!(chunk.grid.get(8, 174, 8), Some(dirt));
    assert_eq!(chunk.grid.get(8, 176, 8), Some(air));
}

#[test]
fn test_plains_origin_has_bedrock_floor_and_grass_at_half_height() {
    let registry = BlockRegistry::with_default_blocks().unwrap();
    let origin = ChunkCoordinate::new(0, 0);

    let seeded = ChunkGenerator::from_config(&small_config(1337, Biome::Plains), &registry)
        .unwrap()
        .generate(origin)
        .unwrap();
    assert_eq!(seeded.grid.get(8, 1, 8), Some(registry.instantiate("bedrock").unwrap()));

    // With every override suppressed the surface sits at half the chunk height.
    let flat = ChunkGenerator::new(FlatNoise, TerrainTuning::default(), Biome::Plains, &registry)
        .unwrap()
        .generate(origin)
        .unwrap();
    assert_eq!(flat.grid.get(8, 1, 8), Some(registry.instantiate("bedrock").unwrap()));
    assert_eq!(flat.grid.get(8, 175, 8), Some(registry.instantiate("grass").unwrap()));
}

#[test]
fn test_flat_desert_is_sand() {
    let registry = BlockRegistry::with_default_blocks().unwrap();
    let generator = ChunkGenerator::new(
        FlatNoise,
        TerrainTuning::default(),
        Biome::Desert,
        &registry,
    )
    .unwrap();
    let chunk = generator.generate(ChunkCoordinate::new(2, 2)).unwrap();

    let sand = registry.instantiate("sand").unwrap();
    assert_eq!(chunk.grid.get(4, 175, 4), Some(sand));
    assert_eq!(chunk.grid.get(4, 170, 4), Some(sand));
}

#[test]
fn test_every_stateful_cell_has_an_instance() {
    let registry = terrain_registry(Some(TerrainBlock::BEDROCK));
    let generator = ChunkGenerator::new(
        FlatNoise,
        TerrainTuning::default(),
        Biome::Plains,
        &registry,
    )
    .unwrap();
    let coordinate = ChunkCoordinate::new(1, -1);
    let chunk = generator.generate(coordinate).unwrap();

    let stateful_cells: Vec<_> = chunk.grid.iter().filter(|(_, cell)| cell.stateful).collect();
    assert_eq!(stateful_cells.len(), (CHUNK_SIZE * CHUNK_SIZE * 3) as usize);
    assert_eq!(chunk.stateful.len(), stateful_cells.len());

    for (local, cell) in stateful_cells {
        let position = coordinate.to_world(local);
        let (_, instance) = chunk
            .stateful
            .iter()
            .find(|(at, _)| *at == position)
            .unwrap();
        assert_eq!(instance.cell, cell);
        assert_eq!(instance.identifier, "bedrock");
    }
}

#[test]
fn test_plain_stone_is_only_ever_decorated_into_listed_ores() {
    let registry = terrain_registry(None);
    let generator = ChunkGenerator::new(
        FlatNoise,
        TerrainTuning::default(),
        Biome::Plains,
        &registry,
    )
    .unwrap();
    let chunk = generator.generate(ChunkCoordinate::new(5, 5)).unwrap();

    let allowed: Vec<_> = [
        TerrainBlock::STONE,
        TerrainBlock::ORE_SULFUR,
        TerrainBlock::ORE_GOLD,
        TerrainBlock::ORE_REDSTONE,
        TerrainBlock::ORE_DIAMOND,
        TerrainBlock::ORE_EMERALD,
    ]
    .into_iter()
    .map(|block| registry.instantiate(block.identifier()).unwrap())
    .collect();

    // Flat noise leaves y in 75..=164 as stone before decoration and
    // deepslate below it.
    for y in 75..=164 {
        let cell = chunk.grid.get(8, y, 8).unwrap();
        assert!(allowed.contains(&cell), "unexpected {:?} at y {}", cell, y);
    }
    let deepslate = registry.instantiate("deepslate").unwrap();
    for y in 3..=74 {
        assert_eq!(chunk.grid.get(8, y, 8), Some(deepslate));
    }
}
