//! # Voxel World
//!
//! Representation and generation of the voxel world.
//!
//! ## Architecture
//!
//! * **Block**: Block identifiers, prototypes and their behaviour
//! * **Chunk**: Fixed-size columns of 16 x 350 x 16 cells
//! * **Generation**: Noise-driven terrain classification plus ore and tree decoration
//! * **World**: The map of materialized chunks and the stateful block instances
//! * **Tasks**: Background generation of chunks
//!
//! ## Data Flow
//!
//! 1. The streaming manager inserts a placeholder chunk and schedules its generation
//! 2. A worker generates the chunk's grid from noise
//! 3. The grid is installed into the world and meshing is scheduled
//! 4. The finished mesh is installed and the chunk becomes `Built`
//!
//! ## Thread Safety
//!
//! Workers never see the `World`. They read shared, immutable registries and
//! grid snapshots, and return plain data that is applied on one thread.

pub mod block;
pub mod chunk;
pub mod generation;
pub mod tasks;
pub mod world;
