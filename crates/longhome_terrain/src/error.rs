//! # Terrain Error Types
//!
//! Errors that can occur while loading heightmaps, loading configuration
//! or running the chunk pipeline.
//!
//! Out-of-range grid access is deliberately absent: reads return benign
//! defaults and writes are no-ops.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in the terrain system.
#[derive(Error, Debug)]
pub enum TerrainError {
    /// Heightmap buffer length does not match `data_resolution²`.
    #[error(
        "heightmap size mismatch: resolution {data_resolution} needs {expected} samples, got {actual}"
    )]
    HeightmapSizeMismatch {
        /// Samples required by the declared resolution.
        expected: usize,
        /// Samples actually supplied.
        actual: usize,
        /// Declared source resolution.
        data_resolution: usize,
    },

    /// Heightmap declared with zero resolution.
    #[error("heightmap has zero resolution")]
    EmptyHeightmap,

    /// Configuration file could not be read.
    #[error("failed to read terrain config {path}: {source}")]
    ConfigRead {
        /// Path that was read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for [`crate::TerrainConfig`].
    #[error("failed to parse terrain config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration parsed but holds unusable values.
    #[error("invalid terrain config: {0}")]
    InvalidConfig(String),

    /// A pipeline worker thread panicked.
    #[error("chunk pipeline worker panicked")]
    WorkerPanicked,
}

/// Result type for terrain operations.
pub type TerrainResult<T> = Result<T, TerrainError>;
