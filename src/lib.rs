#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Terrain
//!
//! The procedural core of a voxel world: deterministic chunk terrain from
//! layered noise, ore and tree decoration, face-culled chunk meshes and
//! background streaming of chunks around a moving observer.
//!
//! ## Key Modules
//!
//! * `config` - World configuration loaded from JSON
//! * `core` - Concurrency primitives shared by the task system
//! * `engine_state` - Registries, generation, meshing, the world and chunk streaming
//! * `error` - The crate's error type
//!
//! ## Architecture
//!
//! The crate follows a modular architecture with clear separation between:
//! * Block and recipe definitions (data, loaded once)
//! * Terrain generation (pure functions of seed and coordinate)
//! * Meshing (pure function of a chunk grid)
//! * Task scheduling and execution on a worker pool
//!
//! Rendering, input and user interface are left to collaborators, which
//! consume [`MeshBuffers`] and drive [`EngineState::tick`].
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     if let Err(error) = voxel_terrain::run() {
//!         eprintln!("{error}");
//!     }
//! }
//! ```

use std::{env, thread, time::Duration};

use cgmath::Point3;
use log::{info, warn};

pub mod config;
pub mod core;
pub mod engine_state;
pub mod error;

pub use config::{NoiseSettings, TerrainTuning, WorldConfig};
pub use crate::core::CancellationToken;
pub use engine_state::{
    chunk_streaming::{ChunkStreamingManager, StreamingEvent},
    crafting::{CraftingGrid, CraftingRecipe, CraftingResult, RecipeRegistry},
    rendering::{ChunkMesher, MeshBuffers, TextureAtlas, TileUvs, UvLookup, Vertex},
    voxels::{
        block::{
            block_side::BlockSide, BlockCell, BlockId, BlockPrototype, BlockRegistry, Facing,
            StatefulBlock, TerrainBlock,
        },
        chunk::{BlockGrid, Chunk, ChunkCoordinate, ChunkState, CHUNK_HEIGHT, CHUNK_SIZE},
        generation::{
            decorate_ore, Biome, ChunkGenerator, GeneratedChunk, NoiseField, NoiseSource,
            PercentStream, TerrainColumnClassifier, TreeDecorator,
        },
        world::World,
    },
    EngineState,
};
pub use error::VoxelError;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "VOXEL_CONFIG";

/// Number of chunks the demo observer walks along the X axis.
const WALK_CHUNKS: i32 = 4;

/// Runs a headless session: builds the starting area, then walks an
/// observer across the world and logs what streaming reports.
///
/// The configuration path is taken from the first argument or from
/// `VOXEL_CONFIG`; without either the defaults are used.
pub fn run() -> Result<(), VoxelError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = match env::args().nth(1).or_else(|| env::var(CONFIG_ENV).ok()) {
        Some(path) => WorldConfig::load(path)?,
        None => {
            info!("No configuration given, using defaults");
            WorldConfig::default()
        }
    };

    let mut engine = EngineState::new(config)?;
    engine.generate_starting_terrain()?;

    for step in 0..=WALK_CHUNKS {
        let observer = Point3::new(step * CHUNK_SIZE, 170, 0);
        report(engine.tick(observer));

        while !engine.is_idle() {
            thread::sleep(Duration::from_millis(10));
            report(engine.tick(observer));
        }
    }

    info!("{} chunks materialized", engine.world.len());
    Ok(())
}

fn report(events: Vec<StreamingEvent>) {
    for event in events {
        match event {
            StreamingEvent::ChunkFailed { coordinate, error } => {
                warn!("Chunk {coordinate} failed: {error}")
            }
            StreamingEvent::BatchCompleted {
                batch,
                built,
                failed,
                cancelled,
            } => info!("Batch {batch}: {built} built, {failed} failed, {cancelled} cancelled"),
            StreamingEvent::ChunkBuilt(_)
            | StreamingEvent::ChunkEvicted(_)
            | StreamingEvent::ChunkRemeshed(_) => {}
        }
    }
}
