//! # Error Types
//!
//! Every fallible operation in the crate returns [`VoxelError`]. Configuration
//! problems (unknown identifiers, missing textures, malformed definition files)
//! are distinguished from per-chunk failures so the streaming layer can report
//! the latter without tearing the session down.

use thiserror::Error;

use crate::engine_state::voxels::chunk::ChunkCoordinate;

/// Errors produced by the terrain core.
#[derive(Error, Debug)]
pub enum VoxelError {
    /// A block identifier was looked up that no prototype was registered for.
    #[error("unknown block identifier `{identifier}`")]
    UnknownBlock {
        /// The identifier that failed to resolve.
        identifier: String,
    },

    /// A prototype was registered twice under the same identifier.
    #[error("block `{identifier}` is already registered")]
    DuplicateBlock {
        /// The identifier that was registered twice.
        identifier: String,
    },

    /// The atlas has neither the exact key nor the `_side` fallback.
    #[error("texture atlas has no entry for `{key}`")]
    MissingTexture {
        /// The fallback key that missed.
        key: String,
    },

    /// The chunk's cancellation token fired before the work completed.
    #[error("work on chunk {coordinate} was cancelled")]
    Cancelled {
        /// The chunk whose work was abandoned.
        coordinate: ChunkCoordinate,
    },

    /// A background worker panicked while processing a chunk.
    #[error("worker panicked while processing chunk {coordinate}: {message}")]
    WorkerPanicked {
        /// The chunk being processed.
        coordinate: ChunkCoordinate,
        /// The panic payload, if it was a string.
        message: String,
    },

    /// An operation addressed a chunk that is not in the world map.
    #[error("chunk {coordinate} is not loaded")]
    ChunkNotLoaded {
        /// The missing chunk.
        coordinate: ChunkCoordinate,
    },

    /// An absolute position lies above or below the world.
    #[error("position ({x}, {y}, {z}) is outside the world")]
    OutOfBounds {
        x: i32,
        y: i32,
        z: i32,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A definition or configuration file could not be parsed.
    #[error("malformed definition data: {0}")]
    Json(#[from] serde_json::Error),

    /// A definition or configuration file could not be read.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl VoxelError {
    /// Whether the error belongs to a single chunk and can be retried.
    pub fn is_chunk_local(&self) -> bool {
        matches!(
            self,
            VoxelError::Cancelled { .. } | VoxelError::WorkerPanicked { .. }
        )
    }
}
