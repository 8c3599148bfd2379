//! # Terrain Configuration
//!
//! All tunable numbers of the analysis in one value.
//!
//! Loaded from TOML (see `data/schemas/terrain/thresholds.toml`); every
//! section is optional and missing keys keep their compiled-in default.
//! Chunks hold an `Arc<TerrainConfig>`, so alternate threshold sets can be
//! injected per chunk without any process-wide state.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classification::{FrictionTable, SlopeThresholds};
use crate::error::{TerrainError, TerrainResult};

/// Numeric constants of the hazard and exit-zone rules.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardParams {
    /// Exit zones need curvature strictly below this.
    pub exit_max_curvature: f32,
    /// Exit zones need a cliff distance strictly above this (world units).
    pub exit_min_cliff_distance: f32,
    /// Distance at which exit quality stops improving.
    pub exit_quality_falloff: f32,
    /// Degrees above `slide_min` that map to the full slope term.
    pub slide_slope_span: f32,
    /// Weight of the slope term in slide risk.
    pub slide_slope_weight: f32,
    /// Cliff proximity below this distance adds slide risk.
    pub slide_cliff_falloff: f32,
    /// Weight of the cliff proximity term in slide risk.
    pub slide_cliff_weight: f32,
    /// Weight of ice probability in slide risk.
    pub slide_ice_weight: f32,
    /// Drainage = clamp01(-curvature * gain).
    pub drainage_gain: f32,
    /// Cliff distance reported when a chunk has no cliff cells.
    pub no_cliff_distance: f32,
    /// Gradient magnitude below which a cell counts as flat.
    pub gradient_epsilon: f32,
}

impl HazardParams {
    /// Compiled-in hazard constants.
    pub const DEFAULT: Self = Self {
        exit_max_curvature: 0.2,
        exit_min_cliff_distance: 10.0,
        exit_quality_falloff: 50.0,
        slide_slope_span: 15.0,
        slide_slope_weight: 0.3,
        slide_cliff_falloff: 50.0,
        slide_cliff_weight: 0.5,
        slide_ice_weight: 0.2,
        drainage_gain: 10.0,
        no_cliff_distance: 1000.0,
        gradient_epsilon: 1e-3,
    };
}

impl Default for HazardParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Fallback chunk dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkDefaults {
    /// Chunk edge length in world units.
    pub chunk_size: f32,
    /// Cells per chunk side.
    pub resolution: usize,
}

impl ChunkDefaults {
    /// Compiled-in chunk dimensions.
    pub const DEFAULT: Self = Self {
        chunk_size: 64.0,
        resolution: 32,
    };
}

impl Default for ChunkDefaults {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Root configuration of the terrain analysis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Slope -> zone thresholds.
    pub thresholds: SlopeThresholds,
    /// Surface -> friction table.
    pub friction: FrictionTable,
    /// Hazard and exit-zone constants.
    pub hazards: HazardParams,
    /// Fallback chunk dimensions.
    pub chunk: ChunkDefaults,
}

impl TerrainConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::ConfigParse`] for malformed TOML and
    /// [`TerrainError::InvalidConfig`] if validation fails.
    pub fn from_toml_str(source: &str) -> TerrainResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::ConfigRead`] if the file cannot be read,
    /// otherwise the errors of [`TerrainConfig::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> TerrainResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| TerrainError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> TerrainResult<()> {
        let t = &self.thresholds;
        let named = [
            ("walkable_max", t.walkable_max),
            ("slide_min", t.slide_min),
            ("slide_max", t.slide_max),
            ("downclimb_min", t.downclimb_min),
            ("downclimb_max", t.downclimb_max),
            ("rappel_min", t.rappel_min),
            ("cliff_min", t.cliff_min),
        ];
        for (name, value) in named {
            if !value.is_finite() || !(0.0..=90.0).contains(&value) {
                return Err(TerrainError::InvalidConfig(format!(
                    "threshold {name} = {value} must lie in [0, 90] degrees"
                )));
            }
        }
        let ordered = [
            ("slide_min", t.slide_min, "slide_max", t.slide_max),
            ("downclimb_min", t.downclimb_min, "downclimb_max", t.downclimb_max),
            ("rappel_min", t.rappel_min, "cliff_min", t.cliff_min),
            ("downclimb_min", t.downclimb_min, "rappel_min", t.rappel_min),
            ("slide_min", t.slide_min, "downclimb_min", t.downclimb_min),
        ];
        for (low_name, low, high_name, high) in ordered {
            if low > high {
                return Err(TerrainError::InvalidConfig(format!(
                    "{low_name} ({low}) must not exceed {high_name} ({high})"
                )));
            }
        }

        for (surface, friction) in self.friction.entries() {
            if !friction.is_finite() || friction < 0.0 {
                return Err(TerrainError::InvalidConfig(format!(
                    "friction for {surface:?} = {friction} must be finite and non-negative"
                )));
            }
        }
        if !self.friction.fallback.is_finite() || self.friction.fallback < 0.0 {
            return Err(TerrainError::InvalidConfig(format!(
                "fallback friction {} must be finite and non-negative",
                self.friction.fallback
            )));
        }

        let h = &self.hazards;
        let hazards = [
            ("exit_min_cliff_distance", h.exit_min_cliff_distance),
            ("slide_slope_weight", h.slide_slope_weight),
            ("slide_cliff_weight", h.slide_cliff_weight),
            ("slide_ice_weight", h.slide_ice_weight),
            ("drainage_gain", h.drainage_gain),
            ("gradient_epsilon", h.gradient_epsilon),
        ];
        for (name, value) in hazards {
            if !value.is_finite() || value < 0.0 {
                return Err(TerrainError::InvalidConfig(format!(
                    "{name} = {value} must be finite and non-negative"
                )));
            }
        }
        let divisors = [
            ("exit_quality_falloff", h.exit_quality_falloff),
            ("slide_slope_span", h.slide_slope_span),
            ("slide_cliff_falloff", h.slide_cliff_falloff),
            ("no_cliff_distance", h.no_cliff_distance),
        ];
        for (name, value) in divisors {
            if !value.is_finite() || value <= 0.0 {
                return Err(TerrainError::InvalidConfig(format!(
                    "{name} = {value} must be finite and positive"
                )));
            }
        }
        if !h.exit_max_curvature.is_finite() {
            return Err(TerrainError::InvalidConfig(
                "exit_max_curvature must be finite".to_string(),
            ));
        }

        if !self.chunk.chunk_size.is_finite() || self.chunk.chunk_size <= 0.0 {
            return Err(TerrainError::InvalidConfig(format!(
                "default chunk_size {} must be finite and positive",
                self.chunk.chunk_size
            )));
        }
        if self.chunk.resolution == 0 {
            return Err(TerrainError::InvalidConfig(
                "default resolution must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
