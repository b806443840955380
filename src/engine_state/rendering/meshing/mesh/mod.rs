//! Mesh data structures for voxel rendering.
//!
//! # Architecture
//! - [`Face`]: one unit quad on the surface of a cell
//! - [`MeshBuffers`]: the flat vertex, UV, triangle and normal lists of a chunk

mod face;
mod mesh;

pub use face::Face;
pub use mesh::MeshBuffers;
