//! # Chunk Pipeline
//!
//! Loads and analyzes many independent chunks on a pool of scoped worker
//! threads.
//!
//! Requests go out over a bounded `crossbeam-channel` queue; finished
//! chunks come back tagged with their request index so the batch is
//! returned in request order no matter which worker finished first. Each
//! chunk is loaded strictly before it is analyzed, and no chunk state is
//! shared between workers.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crossbeam_channel::{bounded, unbounded};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::chunk::{ChunkCoord, TerrainChunk};
use crate::config::TerrainConfig;
use crate::error::{TerrainError, TerrainResult};

/// Worker pool sizing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Worker threads. Clamped to `1..=requests`.
    pub workers: usize,
    /// Capacity of the job queue.
    pub queue_depth: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: thread::available_parallelism().map_or(4, NonZeroUsize::get),
            queue_depth: 64,
        }
    }
}

/// One chunk to build.
#[derive(Clone, Debug)]
pub struct ChunkRequest {
    /// Chunk grid position.
    pub coords: ChunkCoord,
    /// Edge length in world units.
    pub chunk_size: f32,
    /// Cells per side of the chunk.
    pub resolution: usize,
    /// Source elevations, `data_resolution²` samples.
    pub heightmap: Vec<f32>,
    /// Samples per side of `heightmap`.
    pub data_resolution: usize,
}

impl ChunkRequest {
    /// Request whose heightmap already matches the chunk resolution.
    #[must_use]
    pub fn native(coords: ChunkCoord, chunk_size: f32, resolution: usize, heightmap: Vec<f32>) -> Self {
        Self {
            coords,
            chunk_size,
            resolution,
            heightmap,
            data_resolution: resolution,
        }
    }
}

/// Running totals over every batch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStats {
    /// Batches that completed without error.
    pub batches: u64,
    /// Chunks loaded and analyzed.
    pub chunks_completed: u64,
    /// Cells analyzed.
    pub cells_analyzed: u64,
    /// Cliff cells found.
    pub cliff_cells: u64,
    /// Exit-zone cells found.
    pub exit_zone_cells: u64,
}

/// Parallel load + analyze for batches of chunks.
pub struct ChunkPipeline {
    config: PipelineConfig,
    terrain: Arc<TerrainConfig>,
    stats: Mutex<PipelineStats>,
}

impl ChunkPipeline {
    /// Pipeline classifying with the default terrain configuration.
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_terrain_config(config, Arc::new(TerrainConfig::default()))
    }

    /// Pipeline classifying with `terrain`.
    #[must_use]
    pub fn with_terrain_config(config: PipelineConfig, terrain: Arc<TerrainConfig>) -> Self {
        Self {
            config,
            terrain,
            stats: Mutex::new(PipelineStats::default()),
        }
    }

    /// Terrain configuration handed to every chunk.
    #[must_use]
    pub fn terrain_config(&self) -> &Arc<TerrainConfig> {
        &self.terrain
    }

    /// Snapshot of the running totals.
    #[must_use]
    pub fn stats(&self) -> PipelineStats {
        self.stats.lock().clone()
    }

    /// Loads and analyzes every request, returning chunks in request order.
    ///
    /// # Errors
    ///
    /// The first failing request (by index) aborts the batch with its load
    /// error. A panicking worker yields [`TerrainError::WorkerPanicked`].
    pub fn run(&self, requests: Vec<ChunkRequest>) -> TerrainResult<Vec<TerrainChunk>> {
        let total = requests.len();
        if total == 0 {
            return Ok(Vec::new());
        }

        let start = Instant::now();
        let workers = self.config.workers.clamp(1, total);
        let (job_tx, job_rx) = bounded::<(usize, ChunkRequest)>(self.config.queue_depth.max(1));
        let (result_tx, result_rx) = unbounded::<(usize, TerrainResult<TerrainChunk>)>();
        let failed = AtomicBool::new(false);

        let panicked = thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    let jobs = job_rx.clone();
                    let results = result_tx.clone();
                    let failed = &failed;
                    scope.spawn(move || {
                        for (index, request) in jobs {
                            if failed.load(Ordering::Relaxed) {
                                continue;
                            }
                            let outcome = self.build(request);
                            if outcome.is_err() {
                                failed.store(true, Ordering::Relaxed);
                            }
                            if results.send((index, outcome)).is_err() {
                                break;
                            }
                        }
                    })
                })
                .collect();
            drop(job_rx);
            drop(result_tx);

            for job in requests.into_iter().enumerate() {
                if job_tx.send(job).is_err() {
                    break;
                }
            }
            drop(job_tx);

            handles
                .into_iter()
                .map(thread::ScopedJoinHandle::join)
                .fold(false, |any, joined| any | joined.is_err())
        });
        if panicked {
            return Err(TerrainError::WorkerPanicked);
        }

        let mut slots: Vec<Option<TerrainChunk>> = (0..total).map(|_| None).collect();
        let mut first_error: Option<(usize, TerrainError)> = None;
        for (index, outcome) in result_rx {
            match outcome {
                Ok(chunk) => slots[index] = Some(chunk),
                Err(err) => {
                    if first_error.as_ref().map_or(true, |(i, _)| index < *i) {
                        first_error = Some((index, err));
                    }
                }
            }
        }
        if let Some((index, err)) = first_error {
            debug!(request = index, error = %err, "Chunk batch aborted");
            return Err(err);
        }

        let chunks: Vec<TerrainChunk> = slots.into_iter().flatten().collect();
        if chunks.len() != total {
            return Err(TerrainError::WorkerPanicked);
        }

        self.stats.lock().batches += 1;
        info!(
            chunks = total,
            workers,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Chunk batch complete"
        );
        Ok(chunks)
    }

    fn build(&self, request: ChunkRequest) -> TerrainResult<TerrainChunk> {
        let mut chunk = TerrainChunk::with_config(
            request.coords,
            request.chunk_size,
            request.resolution,
            Arc::clone(&self.terrain),
        );
        chunk.load_heightmap(&request.heightmap, request.data_resolution)?;
        chunk.analyze();

        let mut stats = self.stats.lock();
        stats.chunks_completed += 1;
        stats.cells_analyzed += chunk.heightmap().len() as u64;
        stats.cliff_cells += chunk.cliff_cells().len() as u64;
        stats.exit_zone_cells += chunk.exit_zone_cells().len() as u64;
        drop(stats);

        Ok(chunk)
    }
}

impl Default for ChunkPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
