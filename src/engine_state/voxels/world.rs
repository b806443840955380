//! # World Module
//!
//! This module provides the `World` struct which owns every materialized chunk
//! and the sparse map of stateful block instances.
//!
//! ## Ownership
//!
//! The world is only ever mutated on the orchestrating thread. Background
//! workers receive `Arc` snapshots of chunk grids and hand back plain data, so
//! neither map needs a lock.
//!
//! ## Stateful blocks
//!
//! Every cell whose prototype is stateful has exactly one entry in
//! `stateful_blocks`, keyed by its absolute voxel position. Installing grids,
//! editing cells and removing chunks all keep that map in step.

use std::{collections::HashMap, sync::Arc};

use cgmath::Point3;
use log::trace;

use crate::{
    engine_state::{
        rendering::meshing::MeshBuffers,
        voxels::{
            block::{BlockCell, BlockRegistry, StatefulBlock},
            chunk::{BlockGrid, Chunk, ChunkCoordinate, ChunkState},
        },
    },
    error::VoxelError,
};

/// The materialized part of the voxel world.
#[derive(Debug, Default)]
pub struct World {
    /// Materialized chunks by coordinate.
    pub chunks: HashMap<ChunkCoordinate, Chunk>,
    /// Live stateful block instances by absolute position.
    pub stateful_blocks: HashMap<Point3<i32>, StatefulBlock>,
}

impl World {
    /// Creates an empty world.
    pub fn new() -> Self {
        World::default()
    }

    /// Inserts a chunk that is about to be generated.
    ///
    /// The chunk gets an allocated grid of `air` and the `Generating` state, so
    /// it counts as present for streaming while its real grid is computed.
    /// Does nothing if the chunk is already present.
    ///
    /// # Returns
    /// `true` if a placeholder was inserted
    pub fn insert_placeholder(&mut self, coordinate: ChunkCoordinate, air: BlockCell) -> bool {
        if self.chunks.contains_key(&coordinate) {
            return false;
        }
        let mut chunk = Chunk::new(coordinate, air);
        chunk.state = ChunkState::Generating;
        self.chunks.insert(coordinate, chunk);
        true
    }

    /// Replaces a chunk's grid with its generated one and registers the
    /// chunk's stateful instances.
    ///
    /// # Arguments
    /// * `coordinate` - The chunk receiving the grid
    /// * `grid` - The generated grid
    /// * `stateful` - Instances of the grid's stateful cells, by absolute position
    ///
    /// # Returns
    /// The shared grid, ready to hand to a meshing task
    pub fn install_grid(
        &mut self,
        coordinate: ChunkCoordinate,
        grid: BlockGrid,
        stateful: Vec<(Point3<i32>, StatefulBlock)>,
    ) -> Result<Arc<BlockGrid>, VoxelError> {
        let chunk = self
            .chunks
            .get_mut(&coordinate)
            .ok_or(VoxelError::ChunkNotLoaded { coordinate })?;

        let grid = Arc::new(grid);
        chunk.grid = Arc::clone(&grid);
        chunk.mesh = None;
        chunk.state = ChunkState::Generating;
        chunk.stale = false;

        self.stateful_blocks
            .retain(|position, _| ChunkCoordinate::containing(*position) != coordinate);
        self.stateful_blocks.extend(stateful);

        Ok(grid)
    }

    /// Installs a freshly built mesh, completing the chunk.
    pub fn install_mesh(&mut self, mesh: MeshBuffers) -> Result<(), VoxelError> {
        let coordinate = mesh.coordinate;
        let chunk = self
            .chunks
            .get_mut(&coordinate)
            .ok_or(VoxelError::ChunkNotLoaded { coordinate })?;
        chunk.mesh = Some(mesh);
        chunk.state = ChunkState::Built;
        Ok(())
    }

    /// Built chunks whose mesh no longer matches their grid.
    pub fn stale_chunks(&self) -> impl Iterator<Item = ChunkCoordinate> + '_ {
        self.chunks
            .values()
            .filter(|chunk| chunk.stale && chunk.state == ChunkState::Built)
            .map(|chunk| chunk.coordinate)
    }

    /// Takes a snapshot of a stale chunk's grid for re-meshing and clears the
    /// mark. Edits made after this call mark the chunk stale again.
    pub fn take_stale_grid(&mut self, coordinate: ChunkCoordinate) -> Option<Arc<BlockGrid>> {
        let chunk = self.chunks.get_mut(&coordinate)?;
        if !chunk.stale {
            return None;
        }
        chunk.stale = false;
        Some(Arc::clone(&chunk.grid))
    }

    pub fn chunk(&self, coordinate: ChunkCoordinate) -> Option<&Chunk> {
        self.chunks.get(&coordinate)
    }

    pub fn chunk_mut(&mut self, coordinate: ChunkCoordinate) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coordinate)
    }

    pub fn contains(&self, coordinate: ChunkCoordinate) -> bool {
        self.chunks.contains_key(&coordinate)
    }

    /// Coordinates of every materialized chunk.
    pub fn coordinates(&self) -> impl Iterator<Item = ChunkCoordinate> + '_ {
        self.chunks.keys().copied()
    }

    /// Destroys a chunk: releases its mesh, removes it from the map and drops
    /// its stateful instances.
    ///
    /// # Returns
    /// The destroyed chunk, if it was present
    pub fn remove_chunk(&mut self, coordinate: ChunkCoordinate) -> Option<Chunk> {
        let mut chunk = self.chunks.remove(&coordinate)?;
        chunk.destroy();
        self.stateful_blocks
            .retain(|position, _| ChunkCoordinate::containing(*position) != coordinate);
        trace!("Removed chunk {coordinate}");
        Some(chunk)
    }

    /// The cell at an absolute voxel position, if its chunk is materialized.
    pub fn block_at(&self, position: Point3<i32>) -> Option<BlockCell> {
        let coordinate = ChunkCoordinate::containing(position);
        let local = coordinate.to_local(position);
        self.chunks.get(&coordinate)?.grid.get(local.x, local.y, local.z)
    }

    /// The stateful instance at an absolute voxel position.
    pub fn stateful_at(&self, position: Point3<i32>) -> Option<&StatefulBlock> {
        self.stateful_blocks.get(&position)
    }

    /// Overwrites the cell at an absolute voxel position.
    ///
    /// The chunk's grid is copied first if a meshing task still holds it. The
    /// stateful map is updated for the old and new cell and the chunk's mesh
    /// is marked stale. The old mesh stays installed until a new one replaces
    /// it.
    ///
    /// # Arguments
    /// * `position` - Absolute voxel position
    /// * `cell` - The new cell
    /// * `registry` - Resolves the new cell's stateful instance
    ///
    /// # Returns
    /// The replaced cell
    pub fn set_block(
        &mut self,
        position: Point3<i32>,
        cell: BlockCell,
        registry: &BlockRegistry,
    ) -> Result<BlockCell, VoxelError> {
        let coordinate = ChunkCoordinate::containing(position);
        let local = coordinate.to_local(position);
        let chunk = self
            .chunks
            .get_mut(&coordinate)
            .ok_or(VoxelError::ChunkNotLoaded { coordinate })?;

        let previous = chunk
            .grid
            .get(local.x, local.y, local.z)
            .ok_or(VoxelError::OutOfBounds {
                x: position.x,
                y: position.y,
                z: position.z,
            })?;

        Arc::make_mut(&mut chunk.grid).set(local.x, local.y, local.z, cell);
        chunk.stale = true;

        self.stateful_blocks.remove(&position);
        if let Some(instance) = registry.stateful_instance(cell) {
            self.stateful_blocks.insert(position, instance);
        }

        Ok(previous)
    }

    /// Number of materialized chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::BlockPrototype;

    fn registry() -> BlockRegistry {
        let mut registry = BlockRegistry::new();
        registry.register_prototype(BlockPrototype::new("air")).unwrap();
        registry.register_prototype(BlockPrototype::new("stone")).unwrap();
        registry
            .register_prototype(BlockPrototype {
                stateful: true,
                ..BlockPrototype::new("furnace")
            })
            .unwrap();
        registry
    }

    #[test]
    fn placeholders_are_generating_air() {
        let registry = registry();
        let air = registry.instantiate("air").unwrap();
        let mut world = World::new();
        let coordinate = ChunkCoordinate::new(1, -1);
        assert!(world.insert_placeholder(coordinate, air));
        assert!(!world.insert_placeholder(coordinate, air));
        assert_eq!(world.chunk(coordinate).unwrap().state, ChunkState::Generating);
        assert_eq!(world.block_at(Point3::new(20, 10, -3)), Some(air));
    }

    #[test]
    fn set_block_tracks_stateful_instances() {
        let registry = registry();
        let air = registry.instantiate("air").unwrap();
        let furnace = registry.instantiate("furnace").unwrap();
        let mut world = World::new();
        world.insert_placeholder(ChunkCoordinate::new(0, 0), air);

        let position = Point3::new(3, 40, 5);
        let snapshot = Arc::clone(&world.chunk(ChunkCoordinate::new(0, 0)).unwrap().grid);
        assert_eq!(world.set_block(position, furnace, &registry).unwrap(), air);
        assert_eq!(world.stateful_at(position).unwrap().identifier, "furnace");
        // The meshing snapshot is untouched.
        assert_eq!(snapshot.get(3, 40, 5), Some(air));

        world.set_block(position, air, &registry).unwrap();
        assert!(world.stateful_at(position).is_none());
    }

    #[test]
    fn edits_keep_built_chunks_built_with_a_stale_mesh() {
        let registry = registry();
        let air = registry.instantiate("air").unwrap();
        let stone = registry.instantiate("stone").unwrap();
        let coordinate = ChunkCoordinate::new(0, 0);
        let mut world = World::new();
        world.insert_placeholder(coordinate, air);
        world.install_mesh(MeshBuffers::new(coordinate)).unwrap();
        assert!(world.chunk(coordinate).unwrap().is_mesh_built());
        assert_eq!(world.stale_chunks().count(), 0);

        world.set_block(Point3::new(2, 60, 2), stone, &registry).unwrap();
        let chunk = world.chunk(coordinate).unwrap();
        assert_eq!(chunk.state, ChunkState::Built);
        assert!(chunk.mesh.is_some());
        assert!(!chunk.is_mesh_built());
        assert_eq!(world.stale_chunks().collect::<Vec<_>>(), vec![coordinate]);

        let grid = world.take_stale_grid(coordinate).unwrap();
        assert_eq!(grid.get(2, 60, 2), Some(stone));
        assert!(world.take_stale_grid(coordinate).is_none());
        assert_eq!(world.stale_chunks().count(), 0);
    }

    #[test]
    fn removing_a_chunk_drops_its_stateful_blocks() {
        let registry = registry();
        let air = registry.instantiate("air").unwrap();
        let furnace = registry.instantiate("furnace").unwrap();
        let mut world = World::new();
        world.insert_placeholder(ChunkCoordinate::new(0, 0), air);
        world.insert_placeholder(ChunkCoordinate::new(1, 0), air);
        world.set_block(Point3::new(1, 1, 1), furnace, &registry).unwrap();
        world.set_block(Point3::new(17, 1, 1), furnace, &registry).unwrap();

        let removed = world.remove_chunk(ChunkCoordinate::new(0, 0)).unwrap();
        assert_eq!(removed.state, ChunkState::Destroyed);
        assert!(world.stateful_at(Point3::new(1, 1, 1)).is_none());
        assert!(world.stateful_at(Point3::new(17, 1, 1)).is_some());
        assert!(world.block_at(Point3::new(1, 1, 1)).is_none());
    }

    #[test]
    fn edits_to_absent_chunks_fail() {
        let registry = registry();
        let stone = registry.instantiate("stone").unwrap();
        let mut world = World::new();
        let err = world.set_block(Point3::new(0, 0, 0), stone, &registry).unwrap_err();
        assert!(matches!(err, VoxelError::ChunkNotLoaded { .. }));
    }
}
