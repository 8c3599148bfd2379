//! # Long Home Terrain
//!
//! Heightfield analysis for alpine terrain chunks.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: same heightmap + config = same analysis, bit for bit
//! 2. **Chunked**: every chunk is an independent unit of work
//! 3. **Lenient reads**: out-of-range grid access returns benign defaults
//! 4. **Injected tables**: thresholds and friction come from a
//!    [`TerrainConfig`] value, never from mutable globals
//!
//! ## Core Components
//!
//! - [`TerrainChunk`]: heightmap load/resample, slope + curvature analysis,
//!   cliff distances, membership lists
//! - [`TerrainCell`]: per-cell geometry and gameplay classification
//! - [`SlopeThresholds`] / [`FrictionTable`]: classification tables
//! - [`generators`]: flat, slope, cliff-band, mountain and ridged fixtures
//! - [`ChunkPipeline`]: parallel load + analyze for batches of chunks
//!
//! ## Example
//!
//! ```rust
//! use longhome_terrain::{generators, ChunkCoord, TerrainChunk};
//!
//! let mut chunk = TerrainChunk::new(ChunkCoord::new(0, 0), 64.0, 16);
//! let heights = generators::slope_heightmap(16, 3000.0, 30.0, 64.0);
//! chunk.load_heightmap(&heights, 16)?;
//! chunk.analyze();
//!
//! assert!((chunk.average_slope() - 30.0).abs() < 5.0);
//! # Ok::<(), longhome_terrain::TerrainError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]
#![allow(clippy::module_name_repetitions)]

pub mod cell;
pub mod chunk;
pub mod classification;
pub mod cliff;
pub mod config;
pub mod error;
pub mod generators;
pub mod noise;
pub mod pipeline;

pub use cell::{CellClassification, TerrainCell};
pub use chunk::{ChunkCoord, ChunkStats, TerrainChunk};
pub use classification::{
    surface_friction, zone_from_slope, FrictionTable, SlopeThresholds, SurfaceType, TerrainZone,
};
pub use config::{ChunkDefaults, HazardParams, TerrainConfig};
pub use error::{TerrainError, TerrainResult};
pub use generators::MountainParams;
pub use longhome_shared::{GridCoord, Vec3};
pub use noise::{SimplexNoise, TerrainSeed};
pub use pipeline::{ChunkPipeline, ChunkRequest, PipelineConfig, PipelineStats};
