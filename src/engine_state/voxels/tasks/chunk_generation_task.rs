//! # Chunk Generation Task
//!
//! This module defines the `ChunkGenerationTask` which generates a chunk's
//! grid on a worker. It is scheduled by the streaming manager for every chunk
//! that enters the render distance.

use std::sync::Arc;

use log::warn;

use crate::{
    config::WorldConfig,
    core::CancellationToken,
    engine_state::{
        rendering::{tasks::chunk_mesh_generation_task::ChunkMeshGenerationTask, UvLookup},
        task_management::task::{ChunkOutcome, Task, TaskResult},
        voxels::{
            block::BlockRegistry,
            chunk::ChunkCoordinate,
            generation::{ChunkGenerator, GeneratedChunk},
            world::World,
        },
    },
    error::VoxelError,
};

/// Everything a chunk's background work needs, shared by its generation and
/// meshing tasks.
#[derive(Clone)]
pub struct ChunkJob {
    /// The chunk being built.
    pub coordinate: ChunkCoordinate,
    /// Identifies this request for the chunk.
    pub ticket: u64,
    /// Fired when the chunk is evicted before it is built.
    pub token: CancellationToken,
    pub config: Arc<WorldConfig>,
    pub registry: Arc<BlockRegistry>,
    pub atlas: Arc<dyn UvLookup>,
}

impl ChunkJob {
    pub(crate) fn failed(&self, error: VoxelError) -> ChunkOutcome {
        if matches!(error, VoxelError::Cancelled { .. }) {
            return self.cancelled();
        }
        ChunkOutcome::Failed {
            coordinate: self.coordinate,
            ticket: self.ticket,
            error,
        }
    }

    pub(crate) fn cancelled(&self) -> ChunkOutcome {
        ChunkOutcome::Cancelled {
            coordinate: self.coordinate,
            ticket: self.ticket,
        }
    }
}

/// A task that generates chunk data asynchronously.
///
/// This task is responsible for:
/// 1. Generating the chunk's grid and stateful instances on a worker
/// 2. Installing them into the world on the orchestrating thread
/// 3. Scheduling mesh generation for the chunk
pub struct ChunkGenerationTask {
    job: ChunkJob,
}

impl ChunkGenerationTask {
    /// Creates a new chunk generation task.
    pub fn new(job: ChunkJob) -> Self {
        ChunkGenerationTask { job }
    }
}

impl Task for ChunkGenerationTask {
    /// Generates the chunk.
    ///
    /// The noise source is built here, on the worker, so no noise state is
    /// shared between threads.
    fn process(&self) -> Box<dyn TaskResult + Send> {
        let job = &self.job;
        let generated = if job.token.is_cancelled() {
            Err(VoxelError::Cancelled {
                coordinate: job.coordinate,
            })
        } else {
            ChunkGenerator::from_config(&job.config, &job.registry)
                .and_then(|generator| generator.generate_cancellable(job.coordinate, &job.token))
        };

        Box::new(ChunkGenerationTaskResult {
            job: job.clone(),
            generated,
        })
    }

    fn failure_result(&self, message: String) -> Box<dyn TaskResult + Send> {
        Box::new(ChunkGenerationTaskResult {
            job: self.job.clone(),
            generated: Err(VoxelError::WorkerPanicked {
                coordinate: self.job.coordinate,
                message,
            }),
        })
    }
}

/// The result of a chunk generation task.
pub struct ChunkGenerationTaskResult {
    job: ChunkJob,
    generated: Result<GeneratedChunk, VoxelError>,
}

impl TaskResult for ChunkGenerationTaskResult {
    /// Installs the generated grid and schedules meshing.
    ///
    /// Results of cancelled jobs are dropped without touching the world.
    fn handle_result(
        self: Box<Self>,
        world: &mut World,
    ) -> (Vec<Box<dyn Task + Send>>, Vec<ChunkOutcome>) {
        let ChunkGenerationTaskResult { job, generated } = *self;

        if job.token.is_cancelled() {
            return (Vec::new(), vec![job.cancelled()]);
        }

        let chunk = match generated {
            Ok(chunk) => chunk,
            Err(error) => {
                warn!("Generating chunk {} failed: {}", job.coordinate, error);
                return (Vec::new(), vec![job.failed(error)]);
            }
        };

        match world.install_grid(chunk.coordinate, chunk.grid, chunk.stateful) {
            Ok(grid) => {
                let mesh_task: Box<dyn Task + Send> =
                    Box::new(ChunkMeshGenerationTask::new(job, grid));
                (vec![mesh_task], Vec::new())
            }
            // The chunk left the world without its token firing.
            Err(VoxelError::ChunkNotLoaded { .. }) => (Vec::new(), vec![job.cancelled()]),
            Err(error) => (Vec::new(), vec![job.failed(error)]),
        }
    }
}
