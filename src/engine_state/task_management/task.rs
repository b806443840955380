//! # Task System Core Traits
//!
//! This module defines the fundamental building blocks of the task system,
//! which executes chunk work on background workers.
//!
//! ## Core Components
//! - `Task`: A unit of work that runs on a worker thread
//! - `TaskResult`: The plain-data result of a task, applied on the orchestrating thread
//! - `ChunkOutcome`: What applying a result meant for its chunk
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The task returns a boxed `TaskResult`, or `failure_result()` if it panicked
//! 4. The result's `handle_result()` is called on the orchestrating thread
//! 5. The result can mutate the world, spawn follow-up tasks and report outcomes
//!
//! ## Thread Safety
//! - Tasks own everything they read: `Arc` snapshots and configuration
//! - Only `handle_result()` sees the `World`, and it runs on one thread

use crate::{
    engine_state::voxels::{chunk::ChunkCoordinate, world::World},
    error::VoxelError,
};

/// A unit of work executed on a worker thread.
///
/// Tasks must own all the data they need; the world is never visible from a
/// worker.
pub trait Task: Send {
    /// Performs the work and returns its result.
    ///
    /// # Returns
    /// A boxed `TaskResult` that will be applied on the orchestrating thread.
    fn process(&self) -> Box<dyn TaskResult + Send>;

    /// The result reported in place of `process()`'s when it panicked.
    ///
    /// # Arguments
    /// * `message` - The panic payload, if it was a string
    fn failure_result(&self, message: String) -> Box<dyn TaskResult + Send>;
}

/// The result of processing a `Task`.
pub trait TaskResult: Send {
    /// Applies the result on the orchestrating thread.
    ///
    /// # Arguments
    /// * `world` - The world, exclusively borrowed for the duration of the call
    ///
    /// # Returns
    /// A tuple containing:
    /// 1. A vector of follow-up tasks to schedule (can be empty)
    /// 2. A vector of chunk outcomes to report (can be empty)
    fn handle_result(
        self: Box<Self>,
        world: &mut World,
    ) -> (Vec<Box<dyn Task + Send>>, Vec<ChunkOutcome>);
}

/// The settled state of one scheduled chunk.
///
/// Every outcome carries the ticket the chunk was scheduled under, so results
/// of an earlier, abandoned request for the same coordinate can be told apart
/// from the current one.
#[derive(Debug)]
pub enum ChunkOutcome {
    /// Grid and mesh are installed.
    Built {
        coordinate: ChunkCoordinate,
        ticket: u64,
    },
    /// Generation or meshing failed.
    Failed {
        coordinate: ChunkCoordinate,
        ticket: u64,
        error: VoxelError,
    },
    /// The work was abandoned after its chunk was evicted.
    Cancelled {
        coordinate: ChunkCoordinate,
        ticket: u64,
    },
}

impl ChunkOutcome {
    pub fn coordinate(&self) -> ChunkCoordinate {
        match self {
            ChunkOutcome::Built { coordinate, .. }
            | ChunkOutcome::Failed { coordinate, .. }
            | ChunkOutcome::Cancelled { coordinate, .. } => *coordinate,
        }
    }

    pub fn ticket(&self) -> u64 {
        match self {
            ChunkOutcome::Built { ticket, .. }
            | ChunkOutcome::Failed { ticket, .. }
            | ChunkOutcome::Cancelled { ticket, .. } => *ticket,
        }
    }
}
