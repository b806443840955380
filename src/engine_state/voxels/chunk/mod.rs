//! # Chunk Module
//!
//! This module provides the `Chunk` struct, its coordinate type and the dense
//! grid it owns.
//!
//! ## Lifecycle
//!
//! A chunk is inserted into the world as soon as it is scheduled, with an
//! all-air grid, in the `Generating` state. Once its generated grid and mesh
//! have been installed on the orchestrating thread it becomes `Built`.
//! Destroying a chunk drops its mesh and removes it from the world map.
//!
//! ```text
//! Unbuilt -> Generating -> Built -> Destroyed
//! ```
//!
//! The grid is shared behind an `Arc` so a meshing task can read it on a worker
//! while the world keeps serving reads on the orchestrating thread. Edits clone
//! the grid if a task still holds it.
//!
//! An edit leaves a built chunk `Built` and keeps its old mesh, flagged
//! `stale`, until the streaming manager has re-meshed it.

use std::{fmt, sync::Arc};

use cgmath::Point3;
use serde::{Deserialize, Serialize};

use super::block::BlockCell;
use crate::engine_state::rendering::meshing::MeshBuffers;

mod block_grid;

pub use block_grid::BlockGrid;

/// Horizontal side of a chunk in blocks.
pub const CHUNK_SIZE: i32 = 16;
/// Vertical extent of a chunk in blocks.
pub const CHUNK_HEIGHT: i32 = 350;
/// Number of cells in a chunk.
pub const CHUNK_VOLUME: usize = (CHUNK_SIZE * CHUNK_SIZE * CHUNK_HEIGHT) as usize;

/// Identifies a chunk column in chunk space.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoordinate {
    /// Chunk index along X.
    pub x: i32,
    /// Chunk index along Z.
    pub z: i32,
}

impl ChunkCoordinate {
    /// Creates a coordinate.
    pub const fn new(x: i32, z: i32) -> Self {
        ChunkCoordinate { x, z }
    }

    /// The chunk containing an absolute voxel position.
    pub fn containing(position: Point3<i32>) -> Self {
        ChunkCoordinate {
            x: position.x.div_euclid(CHUNK_SIZE),
            z: position.z.div_euclid(CHUNK_SIZE),
        }
    }

    /// Absolute position of the chunk's local origin.
    pub fn origin(self) -> Point3<i32> {
        Point3::new(self.x * CHUNK_SIZE, 0, self.z * CHUNK_SIZE)
    }

    /// Converts a chunk-local position to an absolute one.
    pub fn to_world(self, local: Point3<i32>) -> Point3<i32> {
        Point3::new(
            local.x + self.x * CHUNK_SIZE,
            local.y,
            local.z + self.z * CHUNK_SIZE,
        )
    }

    /// Converts an absolute position to a position local to this chunk.
    pub fn to_local(self, world: Point3<i32>) -> Point3<i32> {
        Point3::new(
            world.x - self.x * CHUNK_SIZE,
            world.y,
            world.z - self.z * CHUNK_SIZE,
        )
    }

    /// The coordinate shifted by whole chunks.
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        ChunkCoordinate::new(self.x + dx, self.z + dz)
    }
}

impl fmt::Display for ChunkCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Where a chunk is in its lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkState {
    /// Allocated but not yet scheduled.
    Unbuilt,
    /// Scheduled; the grid is still a placeholder or the mesh is pending.
    Generating,
    /// Grid and mesh are installed.
    Built,
    /// Removed from the world; the mesh has been released.
    Destroyed,
}

/// One column of the voxel world.
#[derive(Debug)]
pub struct Chunk {
    /// The chunk's position in chunk space.
    pub coordinate: ChunkCoordinate,
    /// The chunk's cells.
    pub grid: Arc<BlockGrid>,
    /// The installed surface mesh, once built.
    pub mesh: Option<MeshBuffers>,
    /// Lifecycle state.
    pub state: ChunkState,
    /// The grid was edited after `mesh` was built from it.
    pub stale: bool,
}

impl Chunk {
    /// Creates an unbuilt chunk whose every cell is `fill`.
    pub fn new(coordinate: ChunkCoordinate, fill: BlockCell) -> Self {
        Chunk {
            coordinate,
            grid: Arc::new(BlockGrid::filled(fill)),
            mesh: None,
            state: ChunkState::Unbuilt,
            stale: false,
        }
    }

    /// Whether a mesh has been installed and is current.
    pub fn is_mesh_built(&self) -> bool {
        self.state == ChunkState::Built && self.mesh.is_some() && !self.stale
    }

    /// Drops the mesh and marks the chunk destroyed.
    pub fn destroy(&mut self) {
        self.mesh = None;
        self.state = ChunkState::Destroyed;
    }
}
