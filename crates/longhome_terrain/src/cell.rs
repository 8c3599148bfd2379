//! # Terrain Cell
//!
//! One lattice point of a chunk and everything derived about it.
//!
//! Fields fall into three groups:
//!
//! 1. **Inputs**: elevation (from the heightmap), surface type, ice
//!    probability and sun exposure (from external world logic).
//! 2. **Geometry**: slope, normal, aspect, curvature, drainage and cliff
//!    proximity, written by the chunk's analysis passes.
//! 3. **Classification**: zone, friction and hazard flags. These live in a
//!    [`CellClassification`] that only
//!    [`TerrainCell::calculate_derived_properties`] can write, so they are
//!    always a pure function of the first two groups.

use longhome_shared::{GridCoord, Vec3};
use serde::{Deserialize, Serialize};

use crate::classification::{SurfaceType, TerrainZone};
use crate::config::TerrainConfig;

/// Cliff distance of a cell before any cliff pass has run.
pub const DEFAULT_CLIFF_DISTANCE: f32 = 1000.0;

/// Gameplay classification of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellClassification {
    /// Zone from the slope ladder.
    pub terrain_zone: TerrainZone,
    /// Friction coefficient of the surface.
    pub friction: f32,
    /// Slope at or above the cliff threshold.
    pub is_cliff: bool,
    /// Zone is walkable.
    pub is_walkable: bool,
    /// Zone needs a rope.
    pub requires_rope: bool,
    /// Slope inside the slide band on a slideable surface.
    pub is_slideable: bool,
    /// Safe place to end a descent.
    pub is_exit_zone: bool,
    /// Exit quality in `[0, 1]`, zero unless `is_exit_zone`.
    pub exit_zone_quality: f32,
    /// Slide hazard in `[0, 1]`, zero unless `is_slideable`.
    pub slide_risk: f32,
}

impl Default for CellClassification {
    fn default() -> Self {
        Self {
            terrain_zone: TerrainZone::Walkable,
            friction: 0.5,
            is_cliff: false,
            is_walkable: true,
            requires_rope: false,
            is_slideable: false,
            is_exit_zone: false,
            exit_zone_quality: 0.0,
            slide_risk: 0.0,
        }
    }
}

impl CellClassification {
    /// Classifies a cell's geometry under `config`.
    #[must_use]
    pub fn derive(cell: &TerrainCell, config: &TerrainConfig) -> Self {
        let t = &config.thresholds;
        let h = &config.hazards;
        let slope = cell.slope_angle;
        let distance = cell.distance_to_cliff;

        let terrain_zone = t.zone_for(slope);
        let is_cliff = slope >= t.cliff_min;
        let is_slideable = t.in_slide_band(slope) && cell.surface_type.supports_sliding();
        let is_exit_zone = slope < t.slide_min
            && cell.curvature < h.exit_max_curvature
            && !is_cliff
            && distance > h.exit_min_cliff_distance;

        let exit_zone_quality = if is_exit_zone {
            let flatness = (1.0 - slope / t.slide_min).clamp(0.0, 1.0);
            flatness * (distance / h.exit_quality_falloff).min(1.0)
        } else {
            0.0
        };

        let slide_risk = if is_slideable {
            let mut risk = (slope - t.slide_min) / h.slide_slope_span * h.slide_slope_weight;
            if distance < h.slide_cliff_falloff {
                risk += (1.0 - distance / h.slide_cliff_falloff) * h.slide_cliff_weight;
            }
            risk += cell.ice_probability * h.slide_ice_weight;
            risk.clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            terrain_zone,
            friction: config.friction.friction(cell.surface_type),
            is_cliff,
            is_walkable: terrain_zone.is_walkable(),
            requires_rope: terrain_zone.requires_rope(),
            is_slideable,
            is_exit_zone,
            exit_zone_quality,
            slide_risk,
        }
    }
}

/// Full analysis state of one grid position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainCell {
    grid_coords: GridCoord,
    /// World-space position; `y` is the elevation.
    pub position: Vec3,
    /// Elevation, mirrored in `position.y`.
    pub elevation: f32,
    /// Surface material.
    pub surface_type: SurfaceType,
    /// Externally supplied ice likelihood in `[0, 1]`.
    pub ice_probability: f32,
    /// Externally supplied sun exposure in `[0, 1]`. Not used by classification.
    pub sun_exposure: f32,
    /// Slope angle in degrees.
    pub slope_angle: f32,
    /// Downhill unit vector, zero on flat ground.
    pub slope_direction: Vec3,
    /// Compass bearing of the downhill direction, `[0, 360)`.
    pub aspect: f32,
    /// Unit surface normal.
    pub normal: Vec3,
    /// Discrete Laplacian of elevation; negative is concave.
    pub curvature: f32,
    /// Drainage in `[0, 1]` from negative curvature.
    pub drainage: f32,
    /// World distance to the nearest cliff cell.
    pub distance_to_cliff: f32,
    /// Unit vector toward the nearest cliff cell, or zero.
    pub cliff_direction: Vec3,
    classification: CellClassification,
}

impl TerrainCell {
    /// Creates a cell with default state at the given grid position.
    #[must_use]
    pub fn new(grid_coords: GridCoord, position: Vec3) -> Self {
        Self {
            grid_coords,
            position,
            elevation: position.y,
            surface_type: SurfaceType::SnowFirm,
            ice_probability: 0.0,
            sun_exposure: 0.5,
            slope_angle: 0.0,
            slope_direction: Vec3::ZERO,
            aspect: 0.0,
            normal: Vec3::Y,
            curvature: 0.0,
            drainage: 0.0,
            distance_to_cliff: DEFAULT_CLIFF_DISTANCE,
            cliff_direction: Vec3::ZERO,
            classification: CellClassification::default(),
        }
    }

    /// Grid position inside the owning chunk.
    #[inline]
    #[must_use]
    pub const fn grid_coords(&self) -> GridCoord {
        self.grid_coords
    }

    /// Recomputes every classification field from the current geometry.
    pub fn calculate_derived_properties(&mut self, config: &TerrainConfig) {
        self.classification = CellClassification::derive(self, config);
    }

    /// Current classification.
    #[inline]
    #[must_use]
    pub const fn classification(&self) -> &CellClassification {
        &self.classification
    }

    /// Zone from the slope ladder.
    #[inline]
    #[must_use]
    pub const fn terrain_zone(&self) -> TerrainZone {
        self.classification.terrain_zone
    }

    /// Friction coefficient.
    #[inline]
    #[must_use]
    pub const fn friction(&self) -> f32 {
        self.classification.friction
    }

    /// Cliff cell.
    #[inline]
    #[must_use]
    pub const fn is_cliff(&self) -> bool {
        self.classification.is_cliff
    }

    /// Walkable without technique.
    #[inline]
    #[must_use]
    pub const fn is_walkable(&self) -> bool {
        self.classification.is_walkable
    }

    /// Needs a rope to descend.
    #[inline]
    #[must_use]
    pub const fn requires_rope(&self) -> bool {
        self.classification.requires_rope
    }

    /// Controlled sliding possible.
    #[inline]
    #[must_use]
    pub const fn is_slideable(&self) -> bool {
        self.classification.is_slideable
    }

    /// Exit zone.
    #[inline]
    #[must_use]
    pub const fn is_exit_zone(&self) -> bool {
        self.classification.is_exit_zone
    }

    /// Exit zone quality in `[0, 1]`.
    #[inline]
    #[must_use]
    pub const fn exit_zone_quality(&self) -> f32 {
        self.classification.exit_zone_quality
    }

    /// Slide risk in `[0, 1]`.
    #[inline]
    #[must_use]
    pub const fn slide_risk(&self) -> f32 {
        self.classification.slide_risk
    }
}

impl Default for TerrainCell {
    fn default() -> Self {
        Self::new(GridCoord::default(), Vec3::ZERO)
    }
}
