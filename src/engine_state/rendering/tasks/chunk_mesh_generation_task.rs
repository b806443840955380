//! Task for generating mesh data for chunks in a background thread.
//!
//! The worker only produces plain [`MeshBuffers`]. Installing them on the
//! chunk, the one engine-visible mutation, happens in `handle_result` on the
//! orchestrating thread.

use std::sync::Arc;

use log::warn;

use crate::{
    engine_state::{
        rendering::meshing::{ChunkMesher, MeshBuffers},
        task_management::task::{ChunkOutcome, Task, TaskResult},
        voxels::{chunk::BlockGrid, tasks::chunk_generation_task::ChunkJob, world::World},
    },
    error::VoxelError,
};

/// A task that generates mesh data for a chunk in a background thread.
pub struct ChunkMeshGenerationTask {
    job: ChunkJob,
    /// Snapshot of the chunk's grid taken when it was installed.
    grid: Arc<BlockGrid>,
}

impl ChunkMeshGenerationTask {
    /// Creates a new chunk mesh generation task.
    ///
    /// # Arguments
    /// * `job` - The chunk's shared job data
    /// * `grid` - The grid to mesh
    pub fn new(job: ChunkJob, grid: Arc<BlockGrid>) -> Self {
        ChunkMeshGenerationTask { job, grid }
    }
}

impl Task for ChunkMeshGenerationTask {
    /// Builds the mesh on the worker.
    fn process(&self) -> Box<dyn TaskResult + Send> {
        let mesh = if self.job.token.is_cancelled() {
            Err(VoxelError::Cancelled {
                coordinate: self.job.coordinate,
            })
        } else {
            ChunkMesher::new(&self.job.registry, self.job.atlas.as_ref())
                .build_mesh(&self.grid, self.job.coordinate)
        };

        Box::new(ChunkMeshGenerationTaskResult {
            job: self.job.clone(),
            mesh,
        })
    }

    fn failure_result(&self, message: String) -> Box<dyn TaskResult + Send> {
        Box::new(ChunkMeshGenerationTaskResult {
            job: self.job.clone(),
            mesh: Err(VoxelError::WorkerPanicked {
                coordinate: self.job.coordinate,
                message,
            }),
        })
    }
}

/// The result of a chunk mesh generation task.
pub struct ChunkMeshGenerationTaskResult {
    job: ChunkJob,
    mesh: Result<MeshBuffers, VoxelError>,
}

impl TaskResult for ChunkMeshGenerationTaskResult {
    /// Installs the mesh, completing the chunk.
    fn handle_result(
        self: Box<Self>,
        world: &mut World,
    ) -> (Vec<Box<dyn Task + Send>>, Vec<ChunkOutcome>) {
        let ChunkMeshGenerationTaskResult { job, mesh } = *self;

        if job.token.is_cancelled() {
            return (Vec::new(), vec![job.cancelled()]);
        }

        let outcome = match mesh.and_then(|mesh| world.install_mesh(mesh)) {
            Ok(()) => ChunkOutcome::Built {
                coordinate: job.coordinate,
                ticket: job.ticket,
            },
            Err(VoxelError::ChunkNotLoaded { .. }) => job.cancelled(),
            Err(error) => {
                warn!("Meshing chunk {} failed: {}", job.coordinate, error);
                job.failed(error)
            }
        };

        (Vec::new(), vec![outcome])
    }
}
