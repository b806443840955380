//! # Voxel Task System
//!
//! Tasks that generate chunk grids on background workers. Meshing of the
//! generated grids is scheduled from here as a follow-up task.

pub mod chunk_generation_task;
