//! # Engine State Module
//!
//! The session object of the voxel world and the subsystems it owns.
//!
//! ## Key Components
//!
//! * `EngineState` - Owns configuration, registries, the world and the streaming manager
//! * `chunk_streaming` - Loads and evicts chunks around the observer
//! * `crafting` - Shaped crafting recipes
//! * `rendering` - Texture atlas, meshing and mesh tasks
//! * `task_management` - Manages background tasks and worker threads
//! * `voxels` - Handles voxel data, chunks, and world generation
//!
//! ## Architecture
//!
//! `EngineState` is the only owner of mutable world state. Registries and the
//! atlas are built once and then shared read-only with worker threads through
//! `Arc`; everything a worker produces comes back as plain data and is applied
//! by `EngineState::tick` on the calling thread.

use std::sync::Arc;

use cgmath::Point3;
use log::info;
use web_time::Instant;

use crate::{config::WorldConfig, error::VoxelError};
use chunk_streaming::{ChunkStreamingManager, StreamingEvent};
use crafting::RecipeRegistry;
use rendering::{meshing::ChunkMesher, TextureAtlas, UvLookup};
use voxels::{
    block::{BlockCell, BlockRegistry}, chunk::ChunkCoordinate, generation::ChunkGenerator, world::World,
};

pub mod chunk_streaming;
pub mod crafting;
pub mod rendering;
pub mod task_management;
pub mod voxels;

/// The voxel world session.
///
/// # Examples
///
/// ```no_run
/// use cgmath::Point3;
/// use voxel_terrain::{EngineState, WorldConfig};
///
/// let mut engine = EngineState::new(WorldConfig::default())?;
/// engine.generate_starting_terrain()?;
///
/// // Main loop
/// loop {
///     for event in engine.tick(Point3::new(0, 170, 0)) {
///         println!("{event:?}");
///     }
/// }
/// # Ok::<(), voxel_terrain::VoxelError>(())
/// ```
pub struct EngineState {
    /// World configuration, shared with workers
    config: Arc<WorldConfig>,
    /// Block definitions, shared with workers
    registry: Arc<BlockRegistry>,
    /// Crafting recipes
    recipes: RecipeRegistry,
    /// Texture lookup used by meshing, shared with workers
    atlas: Arc<dyn UvLookup>,
    /// The voxel world containing all chunk data
    pub world: World,
    /// Background chunk loading
    streaming: ChunkStreamingManager,
}

impl EngineState {
    /// Creates a session with the bundled blocks, recipes and texture tiles.
    ///
    /// # Arguments
    ///
    /// * `config` - The world configuration
    ///
    /// # Returns
    ///
    /// The session, or the error of the first definition that failed to load
    pub fn new(config: WorldConfig) -> Result<Self, VoxelError> {
        let registry = BlockRegistry::with_default_blocks()?;
        let recipes = RecipeRegistry::with_default_recipes()?;
        let atlas = TextureAtlas::with_default_tiles()?;
        Self::from_parts(config, registry, recipes, Arc::new(atlas))
    }

    /// Creates a session from explicitly supplied definitions.
    ///
    /// # Arguments
    ///
    /// * `config` - The world configuration
    /// * `registry` - Block definitions
    /// * `recipes` - Crafting recipes
    /// * `atlas` - Texture lookup for meshing
    pub fn from_parts(
        config: WorldConfig,
        registry: BlockRegistry,
        recipes: RecipeRegistry,
        atlas: Arc<dyn UvLookup>,
    ) -> Result<Self, VoxelError> {
        config.validate()?;
        let config = Arc::new(config);
        let registry = Arc::new(registry);

        let streaming = ChunkStreamingManager::new(
            Arc::clone(&config),
            Arc::clone(&registry),
            Arc::clone(&atlas),
        )?;

        info!(
            "Engine ready: seed {}, biome {:?}, {} blocks, {} recipes",
            config.seed,
            config.biome,
            registry.len(),
            recipes.len()
        );

        Ok(EngineState {
            config,
            registry,
            recipes,
            atlas,
            world: World::new(),
            streaming,
        })
    }

    /// Generates and meshes the starting area around the origin on the
    /// calling thread.
    ///
    /// Chunks already present are left alone.
    ///
    /// # Returns
    ///
    /// The number of chunks built
    pub fn generate_starting_terrain(&mut self) -> Result<usize, VoxelError> {
        let start = Instant::now();
        let generator = ChunkGenerator::from_config(&self.config, &self.registry)?;
        let mesher = ChunkMesher::new(&self.registry, self.atlas.as_ref());
        let air = self.registry.instantiate("air")?;

        let half = self.config.starting_area / 2;
        let mut built = 0;
        for x in -half..=half {
            for z in -half..=half {
                let coordinate = ChunkCoordinate::new(x, z);
                if !self.world.insert_placeholder(coordinate, air) {
                    continue;
                }

                let generated = generator.generate(coordinate)?;
                let grid = self
                    .world
                    .install_grid(coordinate, generated.grid, generated.stateful)?;
                let mesh = mesher.build_mesh(&grid, coordinate)?;
                self.world.install_mesh(mesh)?;
                built += 1;
            }
        }

        info!(
            "Generated {} starting chunks in {:?}",
            built,
            start.elapsed()
        );
        Ok(built)
    }

    /// Advances streaming for an observer standing at `observer_position`.
    ///
    /// Should be called once per frame.
    ///
    /// # Arguments
    ///
    /// * `observer_position` - The observer's voxel position
    ///
    /// # Returns
    ///
    /// What changed during this tick
    pub fn tick(&mut self, observer_position: Point3<i32>) -> Vec<StreamingEvent> {
        let observer = ChunkCoordinate::containing(observer_position);
        self.streaming.update(observer, &mut self.world)
    }

    /// Places `cell` at an absolute voxel position.
    ///
    /// The chunk keeps its current mesh until the next ticks have re-meshed it.
    ///
    /// # Arguments
    ///
    /// * `position` - Absolute voxel position
    /// * `cell` - The new cell
    ///
    /// # Returns
    ///
    /// The replaced cell
    pub fn set_block(
        &mut self,
        position: Point3<i32>,
        cell: BlockCell,
    ) -> Result<BlockCell, VoxelError> {
        self.world.set_block(position, cell, &self.registry)
    }

    /// Requests a chunk again after it failed.
    pub fn retry(&mut self, coordinate: ChunkCoordinate) -> bool {
        self.streaming.retry(coordinate, &mut self.world)
    }

    /// Whether no chunk is waiting on background work.
    pub fn is_idle(&self) -> bool {
        self.streaming.is_idle()
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    pub fn recipes(&self) -> &RecipeRegistry {
        &self.recipes
    }

    /// Recipes are registered during start-up, before the session is shared.
    pub fn recipes_mut(&mut self) -> &mut RecipeRegistry {
        &mut self.recipes
    }

    pub fn atlas(&self) -> &dyn UvLookup {
        self.atlas.as_ref()
    }

    pub fn streaming(&self) -> &ChunkStreamingManager {
        &self.streaming
    }
}
