//! Background tasks for the rendering side of chunk streaming.
//!
//! # Available Tasks
//! - `ChunkMeshGenerationTask`: Builds a chunk's mesh buffers on a worker

pub mod chunk_mesh_generation_task;
