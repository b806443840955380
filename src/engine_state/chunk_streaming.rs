//! # Chunk Streaming
//!
//! Keeps the materialized world centred on the observer. Each tick the
//! manager applies finished background work; when the observer has crossed
//! into another chunk it also evicts chunks that fell out of range and
//! schedules the ones that came into range.
//!
//! ## Ranges
//!
//! With render distance `R` and the observer in chunk `C`:
//! - chunks with `|D.x - C.x| >= R` or `|D.z - C.z| >= R` are evicted
//! - chunks with both offsets in `-(R / 2)..=R / 2` are loaded
//!
//! ## Batches
//!
//! All chunks scheduled by one pass form a batch. Once every chunk of a batch
//! has been built, has failed or was cancelled, a single
//! [`StreamingEvent::BatchCompleted`] is reported.
//!
//! ## Failures
//!
//! A failed chunk is removed from the world again and reported. The next pass
//! that has the chunk in range, or an explicit [`ChunkStreamingManager::retry`],
//! requests it anew.
//!
//! ## Edits
//!
//! Built chunks whose grid was edited are re-meshed from a snapshot of the
//! edited grid. They stay `Built` and keep drawing their old mesh until the new
//! one is installed. A failed re-mesh is reported and leaves the old mesh in
//! place.

use std::{collections::HashMap, sync::Arc};

use log::{debug, info, warn};

use crate::{
    config::WorldConfig,
    core::CancellationToken,
    engine_state::{
        rendering::{tasks::chunk_mesh_generation_task::ChunkMeshGenerationTask, UvLookup},
        task_management::{task::ChunkOutcome, TaskManager},
        voxels::{
            block::{BlockCell, BlockRegistry},
            chunk::ChunkCoordinate,
            tasks::chunk_generation_task::{ChunkGenerationTask, ChunkJob},
            world::World,
        },
    },
    error::VoxelError,
};

/// Something collaborators may want to react to after a streaming pass.
#[derive(Debug)]
pub enum StreamingEvent {
    /// A chunk's grid and mesh are installed.
    ChunkBuilt(ChunkCoordinate),
    /// A chunk left the render distance and was destroyed.
    ChunkEvicted(ChunkCoordinate),
    /// An edited chunk's new mesh is installed.
    ChunkRemeshed(ChunkCoordinate),
    /// A chunk could not be built and was removed again, or could not be
    /// re-meshed and kept its old mesh.
    ChunkFailed {
        coordinate: ChunkCoordinate,
        error: VoxelError,
    },
    /// Every chunk of a batch has settled.
    BatchCompleted {
        batch: u64,
        built: usize,
        failed: usize,
        cancelled: usize,
    },
}

/// A chunk whose generation has been requested but has not settled.
struct InFlight {
    ticket: u64,
    batch: u64,
    token: CancellationToken,
}

/// An edited chunk waiting on its new mesh.
struct Remesh {
    ticket: u64,
    token: CancellationToken,
}

#[derive(Default)]
struct Batch {
    pending: usize,
    built: usize,
    failed: usize,
    cancelled: usize,
}

/// Loads and evicts chunks around a moving observer.
pub struct ChunkStreamingManager {
    task_manager: TaskManager,
    config: Arc<WorldConfig>,
    registry: Arc<BlockRegistry>,
    atlas: Arc<dyn UvLookup>,
    air: BlockCell,
    in_flight: HashMap<ChunkCoordinate, InFlight>,
    remeshing: HashMap<ChunkCoordinate, Remesh>,
    batches: HashMap<u64, Batch>,
    next_ticket: u64,
    next_batch: u64,
    last_observer: Option<ChunkCoordinate>,
}

impl ChunkStreamingManager {
    /// Creates a manager and its worker pool.
    ///
    /// # Arguments
    /// * `config` - World configuration; supplies the render distance and worker count
    /// * `registry` - Shared with every generation and meshing task
    /// * `atlas` - Shared with every meshing task
    pub fn new(
        config: Arc<WorldConfig>,
        registry: Arc<BlockRegistry>,
        atlas: Arc<dyn UvLookup>,
    ) -> Result<Self, VoxelError> {
        let air = registry.instantiate("air")?;
        let task_manager = TaskManager::new(config.worker_count)?;
        Ok(ChunkStreamingManager {
            task_manager,
            config,
            registry,
            atlas,
            air,
            in_flight: HashMap::new(),
            remeshing: HashMap::new(),
            batches: HashMap::new(),
            next_ticket: 0,
            next_batch: 0,
            last_observer: None,
        })
    }

    /// Runs one streaming pass.
    ///
    /// Finished work is always applied and edited chunks are always queued for
    /// re-meshing. Eviction and scheduling only happen when `observer` differs
    /// from the previous call's.
    ///
    /// # Arguments
    /// * `observer` - The chunk the observer is in
    /// * `world` - The world to stream into
    ///
    /// # Returns
    /// Everything that happened during the pass, in order
    pub fn update(&mut self, observer: ChunkCoordinate, world: &mut World) -> Vec<StreamingEvent> {
        let mut events = self.collect(world);

        if self.last_observer != Some(observer) {
            self.last_observer = Some(observer);
            self.evict(observer, world, &mut events);
            self.schedule_missing(observer, world);
        }
        self.schedule_remeshes(world);

        self.task_manager.process_queued_tasks();
        events
    }

    /// Requests a chunk again, typically after it failed.
    ///
    /// # Returns
    /// `false` if the chunk is already materialized or in flight
    pub fn retry(&mut self, coordinate: ChunkCoordinate, world: &mut World) -> bool {
        if world.contains(coordinate) || self.in_flight.contains_key(&coordinate) {
            return false;
        }
        let batch = self.open_batch();
        self.request(coordinate, batch, world);
        true
    }

    /// Whether no chunk is waiting on background work.
    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty() && self.remeshing.is_empty() && self.task_manager.is_idle()
    }

    /// Number of chunks waiting on background work.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// The observer chunk of the last pass.
    pub fn observer(&self) -> Option<ChunkCoordinate> {
        self.last_observer
    }

    fn collect(&mut self, world: &mut World) -> Vec<StreamingEvent> {
        let mut events = Vec::new();

        for outcome in self.task_manager.process_completed_tasks(world) {
            let coordinate = outcome.coordinate();
            if self
                .remeshing
                .get(&coordinate)
                .is_some_and(|entry| entry.ticket == outcome.ticket())
            {
                self.remeshing.remove(&coordinate);
                match outcome {
                    ChunkOutcome::Built { .. } => {
                        events.push(StreamingEvent::ChunkRemeshed(coordinate));
                    }
                    ChunkOutcome::Failed { error, .. } => {
                        warn!("Re-meshing chunk {coordinate} failed: {error}");
                        events.push(StreamingEvent::ChunkFailed { coordinate, error });
                    }
                    ChunkOutcome::Cancelled { .. } => {}
                }
                continue;
            }

            let current = self
                .in_flight
                .get(&coordinate)
                .is_some_and(|entry| entry.ticket == outcome.ticket());
            if !current {
                // A result for an evicted request; eviction already settled it.
                continue;
            }
            let Some(entry) = self.in_flight.remove(&coordinate) else {
                continue;
            };

            match outcome {
                ChunkOutcome::Built { .. } => {
                    self.settle(entry.batch, |batch| batch.built += 1, &mut events);
                    events.push(StreamingEvent::ChunkBuilt(coordinate));
                }
                ChunkOutcome::Failed { error, .. } => {
                    warn!("Chunk {coordinate} failed: {error}");
                    world.remove_chunk(coordinate);
                    events.push(StreamingEvent::ChunkFailed { coordinate, error });
                    self.settle(entry.batch, |batch| batch.failed += 1, &mut events);
                }
                ChunkOutcome::Cancelled { .. } => {
                    world.remove_chunk(coordinate);
                    self.settle(entry.batch, |batch| batch.cancelled += 1, &mut events);
                }
            }
        }

        events
    }

    fn evict(&mut self, observer: ChunkCoordinate, world: &mut World, events: &mut Vec<StreamingEvent>) {
        let distance = self.config.render_distance;
        let out_of_range: Vec<ChunkCoordinate> = world
            .coordinates()
            .filter(|chunk| {
                (chunk.x - observer.x).abs() >= distance || (chunk.z - observer.z).abs() >= distance
            })
            .collect();

        for coordinate in &out_of_range {
            world.remove_chunk(*coordinate);
            events.push(StreamingEvent::ChunkEvicted(*coordinate));

            if let Some(entry) = self.in_flight.remove(coordinate) {
                entry.token.cancel();
                self.settle(entry.batch, |batch| batch.cancelled += 1, events);
            }
            if let Some(entry) = self.remeshing.remove(coordinate) {
                entry.token.cancel();
            }
        }

        if !out_of_range.is_empty() {
            info!("Evicted {} chunks around {}", out_of_range.len(), observer);
        }
    }

    fn schedule_missing(&mut self, observer: ChunkCoordinate, world: &mut World) {
        let half = self.config.render_distance / 2;
        let missing: Vec<ChunkCoordinate> = (-half..=half)
            .flat_map(|dx| (-half..=half).map(move |dz| observer.offset(dx, dz)))
            .filter(|coordinate| !world.contains(*coordinate) && !self.in_flight.contains_key(coordinate))
            .collect();

        if missing.is_empty() {
            return;
        }

        let batch = self.open_batch();
        for coordinate in &missing {
            self.request(*coordinate, batch, world);
        }
        info!(
            "Scheduled {} chunks around {} as batch {}",
            missing.len(),
            observer,
            batch
        );
    }

    fn schedule_remeshes(&mut self, world: &mut World) {
        let stale: Vec<ChunkCoordinate> = world
            .stale_chunks()
            .filter(|coordinate| {
                !self.in_flight.contains_key(coordinate) && !self.remeshing.contains_key(coordinate)
            })
            .collect();

        for coordinate in stale {
            let Some(grid) = world.take_stale_grid(coordinate) else {
                continue;
            };
            let job = self.job(coordinate);
            self.remeshing.insert(
                coordinate,
                Remesh {
                    ticket: job.ticket,
                    token: job.token.clone(),
                },
            );
            debug!("Re-meshing chunk {coordinate} (ticket {})", job.ticket);
            self.task_manager
                .publish_task(Box::new(ChunkMeshGenerationTask::new(job, grid)));
        }
    }

    fn open_batch(&mut self) -> u64 {
        let batch = self.next_batch;
        self.next_batch += 1;
        self.batches.insert(batch, Batch::default());
        batch
    }

    /// Job data for a new request, under a fresh ticket and token.
    fn job(&mut self, coordinate: ChunkCoordinate) -> ChunkJob {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        ChunkJob {
            coordinate,
            ticket,
            token: CancellationToken::new(),
            config: Arc::clone(&self.config),
            registry: Arc::clone(&self.registry),
            atlas: Arc::clone(&self.atlas),
        }
    }

    fn request(&mut self, coordinate: ChunkCoordinate, batch: u64, world: &mut World) {
        let job = self.job(coordinate);
        let ticket = job.ticket;

        world.insert_placeholder(coordinate, self.air);
        if let Some(entry) = self.batches.get_mut(&batch) {
            entry.pending += 1;
        }
        self.in_flight.insert(
            coordinate,
            InFlight {
                ticket,
                batch,
                token: job.token.clone(),
            },
        );

        self.task_manager
            .publish_task(Box::new(ChunkGenerationTask::new(job)));
        debug!("Requested chunk {coordinate} (ticket {ticket})");
    }

    /// Records one settled chunk of a batch and reports the batch once it is
    /// complete.
    fn settle(&mut self, batch: u64, record: impl FnOnce(&mut Batch), events: &mut Vec<StreamingEvent>) {
        let Some(entry) = self.batches.get_mut(&batch) else {
            return;
        };
        record(entry);
        entry.pending = entry.pending.saturating_sub(1);

        if entry.pending == 0 {
            if let Some(done) = self.batches.remove(&batch) {
                info!(
                    "Batch {} completed: {} built, {} failed, {} cancelled",
                    batch, done.built, done.failed, done.cancelled
                );
                events.push(StreamingEvent::BatchCompleted {
                    batch,
                    built: done.built,
                    failed: done.failed,
                    cancelled: done.cancelled,
                });
            }
        }
    }
}
