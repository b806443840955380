//! Mesh generation for voxel chunks.
//!
//! This module converts a chunk's block grid into the quads of its exposed
//! surface using boundary-face culling: a face is emitted unless the cell it
//! touches is opaque.
//!
//! # Architecture
//! - `ChunkMesher`: culls faces and assembles [`MeshBuffers`]
//! - `mesh/`: the quad and buffer types
//!
//! # Culling
//! - `air`, `leaves` and `glass` are see-through; every other block is opaque
//! - neighbours outside the chunk count as absent, so faces on the chunk shell
//!   are always emitted
//! - a rotated cell checks the neighbour its rotated face actually points at
//!
//! # Performance Considerations
//! - See-through lookups are resolved to a bit mask over the grid up front
//! - Texture lookups are cached per block and side for the duration of a build

use std::collections::HashMap;

use bitvec::prelude::*;
use log::debug;
use phf::phf_set;
use web_time::Instant;

mod mesh;

pub use mesh::*;

use crate::{
    engine_state::{
        rendering::texture::{TileUvs, UvLookup},
        voxels::{
            block::{block_side::BlockSide, BlockId, BlockRegistry},
            chunk::{BlockGrid, ChunkCoordinate, CHUNK_VOLUME},
        },
    },
    error::VoxelError,
};

/// Blocks whose neighbours keep the faces they share with them.
static SEE_THROUGH: phf::Set<&'static str> = phf_set! {
    "air",
    "leaves",
    "glass",
};

/// Builds surface meshes for chunk grids.
pub struct ChunkMesher<'a> {
    registry: &'a BlockRegistry,
    atlas: &'a dyn UvLookup,
    see_through: Vec<bool>,
    air: Option<BlockId>,
}

impl<'a> ChunkMesher<'a> {
    /// Creates a mesher resolving blocks against `registry` and textures
    /// against `atlas`.
    pub fn new(registry: &'a BlockRegistry, atlas: &'a dyn UvLookup) -> Self {
        let see_through = registry
            .iter()
            .map(|(_, prototype)| SEE_THROUGH.contains(prototype.identifier.as_str()))
            .collect();

        ChunkMesher {
            registry,
            atlas,
            see_through,
            air: registry.id_of("air"),
        }
    }

    /// Whether faces next to a block of this id are kept.
    pub fn is_see_through(&self, id: BlockId) -> bool {
        self.see_through.get(id.index()).copied().unwrap_or(false)
    }

    /// Builds the surface mesh of a chunk grid.
    ///
    /// # Arguments
    /// * `grid` - The chunk's cells
    /// * `coordinate` - The chunk the grid belongs to
    ///
    /// # Returns
    /// The chunk's mesh, or `MissingTexture` / `UnknownBlock` if a visible face
    /// cannot be textured
    pub fn build_mesh(
        &self,
        grid: &BlockGrid,
        coordinate: ChunkCoordinate,
    ) -> Result<MeshBuffers, VoxelError> {
        let start = Instant::now();

        let mut transparent = bitvec![0; CHUNK_VOLUME];
        for (index, cell) in grid.cells().iter().enumerate() {
            transparent.set(index, self.is_see_through(cell.id));
        }

        let mut mesh = MeshBuffers::new(coordinate);
        let mut textures: HashMap<(BlockId, BlockSide), TileUvs> = HashMap::new();

        for (position, cell) in grid.iter() {
            if Some(cell.id) == self.air {
                continue;
            }

            for side in BlockSide::all() {
                let geometric = side.rotated(cell.facing);
                let neighbour = position + geometric.offset();

                let exposed = if BlockGrid::contains(neighbour.x, neighbour.y, neighbour.z) {
                    transparent[BlockGrid::index(neighbour.x, neighbour.y, neighbour.z)]
                } else {
                    true
                };
                if !exposed {
                    continue;
                }

                let uvs = match textures.get(&(cell.id, side)) {
                    Some(uvs) => *uvs,
                    None => {
                        let uvs = self.face_uvs(cell.id, side)?;
                        textures.insert((cell.id, side), uvs);
                        uvs
                    }
                };

                mesh.push_face(&Face::new(position.x, position.y, position.z, geometric), uvs);
            }
        }

        mesh.recalculate_normals();

        debug!(
            "Meshed chunk {} ({} faces) in {:.2}ms",
            coordinate,
            mesh.face_count(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(mesh)
    }

    /// Resolves the tile for one logical face of a block.
    ///
    /// Sided blocks look up `{name}_{face}`, other blocks `{name}`; both fall
    /// back to `{name}_side` once.
    fn face_uvs(&self, id: BlockId, side: BlockSide) -> Result<TileUvs, VoxelError> {
        let prototype = self.registry.prototype(id).ok_or_else(|| VoxelError::UnknownBlock {
            identifier: format!("#{}", id.0),
        })?;
        let base = prototype.texture_base();

        let exact = if prototype.has_sided_textures {
            format!("{base}_{}", side.texture_suffix())
        } else {
            base.to_string()
        };
        if let Some(uvs) = self.atlas.uvs(&exact) {
            return Ok(uvs);
        }

        let fallback = format!("{base}_side");
        self.atlas
            .uvs(&fallback)
            .ok_or(VoxelError::MissingTexture { key: fallback })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::{rendering::TextureAtlas, voxels::block::Facing};

    fn setup() -> (BlockRegistry, TextureAtlas) {
        (
            BlockRegistry::with_default_blocks().unwrap(),
            TextureAtlas::with_default_tiles().unwrap(),
        )
    }

    #[test]
    fn see_through_table_matches_the_named_blocks() {
        let (registry, atlas) = setup();
        let mesher = ChunkMesher::new(&registry, &atlas);
        for (identifier, expected) in [("air", true), ("leaves", true), ("glass", true), ("stone", false)] {
            assert_eq!(mesher.is_see_through(registry.id_of(identifier).unwrap()), expected);
        }
    }

    #[test]
    fn sided_blocks_fall_back_to_their_side_tile() {
        let (registry, atlas) = setup();
        let mesher = ChunkMesher::new(&registry, &atlas);
        let grass = registry.id_of("grass").unwrap();
        assert_eq!(mesher.face_uvs(grass, BlockSide::TOP).unwrap(), atlas.uvs("grass_top").unwrap());
        assert_eq!(mesher.face_uvs(grass, BlockSide::FRONT).unwrap(), atlas.uvs("grass_side").unwrap());
    }

    #[test]
    fn missing_tiles_are_reported_with_the_fallback_key() {
        let (registry, _) = setup();
        let atlas = TextureAtlas::from_tile_names(["stone"]);
        let mesher = ChunkMesher::new(&registry, &atlas);
        let err = mesher
            .face_uvs(registry.id_of("dirt").unwrap(), BlockSide::TOP)
            .unwrap_err();
        assert!(matches!(err, VoxelError::MissingTexture { key } if key == "dirt_side"));
    }

    #[test]
    fn rotated_cells_check_the_rotated_neighbour() {
        let (registry, atlas) = setup();
        let mesher = ChunkMesher::new(&registry, &atlas);
        let air = registry.instantiate("air").unwrap();
        let stone = registry.instantiate("stone").unwrap();
        let log = registry.instantiate("log").unwrap().with_facing(Facing::East);

        let mut grid = BlockGrid::filled(air);
        grid.set(5, 10, 5, log);
        grid.set(6, 10, 5, stone);

        let mesh = mesher.build_mesh(&grid, ChunkCoordinate::new(0, 0)).unwrap();
        // The log's top now points east into the stone, and the stone's west
        // face touches the log: both shared faces are culled.
        assert_eq!(mesh.face_count(), 10);
        // Its upward face is the logical west face, which shows bark.
        let log_side = atlas.uvs("log_side").unwrap();
        let up_faces: Vec<_> = mesh
            .vertices
            .chunks_exact(4)
            .zip(mesh.uvs.chunks_exact(4))
            .filter(|(corners, _)| corners.iter().all(|c| c[1] == 11.0 && c[0] <= 6.0))
            .map(|(_, uvs)| uvs.to_vec())
            .collect();
        assert_eq!(up_faces, vec![log_side.to_vec()]);
    }
}
