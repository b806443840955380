//! Rendering-side data for the voxel engine.
//!
//! The engine does not own a GPU pipeline. This module turns chunk grids into
//! plain mesh buffers, looks their textures up in the shared atlas and hands
//! interleaved [`Vertex`] data to whichever renderer consumes it.

pub mod meshing;
pub mod tasks;
mod texture;
mod vertex;

pub use meshing::{ChunkMesher, MeshBuffers};
pub use texture::{TextureAtlas, TileUvs, UvLookup};
pub use vertex::Vertex;
