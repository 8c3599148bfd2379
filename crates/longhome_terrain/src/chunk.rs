//! # Terrain Chunk
//!
//! A square patch of terrain: a `resolution x resolution` grid of
//! [`TerrainCell`]s plus the flat heightmap they were built from.
//!
//! ## Lifecycle
//!
//! 1. [`TerrainChunk::new`] fills the grid with default cells at their
//!    world positions.
//! 2. [`TerrainChunk::load_heightmap`] copies or bilinearly resamples an
//!    elevation buffer into the chunk.
//! 3. [`TerrainChunk::analyze`] derives geometry and classification for
//!    every cell and rebuilds the cliff / exit-zone / rope membership lists.
//!
//! Analysis is idempotent and always recomputes everything. Loading new
//! heights or editing a single height marks the chunk as not analyzed.
//!
//! ## Layout
//!
//! Cells and heights share one row-major index: `z * resolution + x`.
//! Membership lists are collected column by column (x outer, z inner).

use std::sync::Arc;

use longhome_shared::{GridCoord, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::cell::TerrainCell;
use crate::classification::{SurfaceType, TerrainZone};
use crate::cliff::nearest_cliff;
use crate::config::TerrainConfig;
use crate::error::{TerrainError, TerrainResult};

/// Position of a chunk in the world chunk grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    /// X coordinate (in chunks).
    pub x: i32,
    /// Z coordinate (in chunks).
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// World-space corner of a chunk of edge `chunk_size`.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn world_origin(self, chunk_size: f32) -> Vec3 {
        Vec3::new(self.x as f32 * chunk_size, 0.0, self.z as f32 * chunk_size)
    }
}

/// Summary counts of an analyzed chunk.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkStats {
    /// `resolution²`.
    pub total_cells: usize,
    /// Cells at or above the cliff threshold.
    pub cliff_cells: usize,
    /// Exit-zone cells.
    pub exit_zone_cells: usize,
    /// Cells needing a rope.
    pub rope_required_cells: usize,
    /// Slideable cells.
    pub slideable_cells: usize,
    /// Walkable cells.
    pub walkable_cells: usize,
    /// Lowest elevation.
    pub min_elevation: f32,
    /// Highest elevation.
    pub max_elevation: f32,
    /// `max_elevation - min_elevation`.
    pub elevation_range: f32,
    /// Mean slope in degrees.
    pub average_slope: f32,
    /// Cell count per zone, indexed by [`TerrainZone::index`].
    pub zone_counts: [usize; TerrainZone::COUNT],
}

/// Elevation grid with per-cell analysis.
#[derive(Clone, Debug)]
pub struct TerrainChunk {
    coords: ChunkCoord,
    chunk_size: f32,
    resolution: usize,
    cell_size: f32,
    world_origin: Vec3,
    cells: Vec<TerrainCell>,
    heightmap: Vec<f32>,
    cliff_cells: Vec<GridCoord>,
    exit_zone_cells: Vec<GridCoord>,
    rope_required_cells: Vec<GridCoord>,
    min_elevation: f32,
    max_elevation: f32,
    average_slope: f32,
    is_analyzed: bool,
    config: Arc<TerrainConfig>,
}

impl TerrainChunk {
    /// Creates a flat, unanalyzed chunk using the default configuration.
    #[must_use]
    pub fn new(coords: ChunkCoord, chunk_size: f32, resolution: usize) -> Self {
        Self::with_config(coords, chunk_size, resolution, Arc::new(TerrainConfig::default()))
    }

    /// Creates a flat, unanalyzed chunk that classifies with `config`.
    ///
    /// A non-finite or non-positive `chunk_size`, or a zero `resolution`,
    /// falls back to `config.chunk`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn with_config(
        coords: ChunkCoord,
        chunk_size: f32,
        resolution: usize,
        config: Arc<TerrainConfig>,
    ) -> Self {
        let chunk_size = if chunk_size.is_finite() && chunk_size > 0.0 {
            chunk_size
        } else {
            warn!(
                chunk_size,
                fallback = config.chunk.chunk_size,
                "Invalid chunk size, using default"
            );
            config.chunk.chunk_size
        };
        let resolution = if resolution > 0 {
            resolution
        } else {
            warn!(
                fallback = config.chunk.resolution,
                "Zero chunk resolution, using default"
            );
            config.chunk.resolution.max(1)
        };

        let cell_size = chunk_size / resolution as f32;
        let world_origin = coords.world_origin(chunk_size);

        let mut chunk = Self {
            coords,
            chunk_size,
            resolution,
            cell_size,
            world_origin,
            cells: Vec::with_capacity(resolution * resolution),
            heightmap: vec![0.0; resolution * resolution],
            cliff_cells: Vec::new(),
            exit_zone_cells: Vec::new(),
            rope_required_cells: Vec::new(),
            min_elevation: 0.0,
            max_elevation: 0.0,
            average_slope: 0.0,
            is_analyzed: false,
            config,
        };
        for index in 0..resolution * resolution {
            let coord = chunk.coord_of(index);
            let position = chunk.grid_to_world(coord);
            chunk.cells.push(TerrainCell::new(coord, position));
        }
        chunk
    }

    /// Chunk grid coordinate.
    #[inline]
    #[must_use]
    pub const fn coords(&self) -> ChunkCoord {
        self.coords
    }

    /// Edge length in world units.
    #[inline]
    #[must_use]
    pub const fn chunk_size(&self) -> f32 {
        self.chunk_size
    }

    /// Cells per side.
    #[inline]
    #[must_use]
    pub const fn resolution(&self) -> usize {
        self.resolution
    }

    /// Edge length of one cell.
    #[inline]
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// World-space corner of the chunk.
    #[inline]
    #[must_use]
    pub const fn world_origin(&self) -> Vec3 {
        self.world_origin
    }

    /// Configuration used for classification.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Lowest loaded elevation.
    #[inline]
    #[must_use]
    pub const fn min_elevation(&self) -> f32 {
        self.min_elevation
    }

    /// Highest loaded elevation.
    #[inline]
    #[must_use]
    pub const fn max_elevation(&self) -> f32 {
        self.max_elevation
    }

    /// Mean slope of the last analysis.
    #[inline]
    #[must_use]
    pub const fn average_slope(&self) -> f32 {
        self.average_slope
    }

    /// True once [`TerrainChunk::analyze`] has run on the current heights.
    #[inline]
    #[must_use]
    pub const fn is_analyzed(&self) -> bool {
        self.is_analyzed
    }

    /// Cliff cells of the last analysis.
    #[must_use]
    pub fn cliff_cells(&self) -> &[GridCoord] {
        &self.cliff_cells
    }

    /// Exit-zone cells of the last analysis.
    #[must_use]
    pub fn exit_zone_cells(&self) -> &[GridCoord] {
        &self.exit_zone_cells
    }

    /// Rope-required cells of the last analysis.
    #[must_use]
    pub fn rope_required_cells(&self) -> &[GridCoord] {
        &self.rope_required_cells
    }

    /// Flat heightmap, `z * resolution + x`.
    #[must_use]
    pub fn heightmap(&self) -> &[f32] {
        &self.heightmap
    }

    /// Every cell with its grid coordinate, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (GridCoord, &TerrainCell)> + '_ {
        self.cells.iter().map(|cell| (cell.grid_coords(), cell))
    }

    /// Cell at `coord`, or `None` out of range.
    #[must_use]
    pub fn get_cell(&self, coord: GridCoord) -> Option<&TerrainCell> {
        coord.index(self.resolution).map(|i| &self.cells[i])
    }

    /// Height at `coord`, or `0.0` out of range.
    #[must_use]
    pub fn get_height(&self, coord: GridCoord) -> f32 {
        coord
            .index(self.resolution)
            .map_or(0.0, |i| self.heightmap[i])
    }

    /// Writes one height. Out of range is a no-op.
    pub fn set_height(&mut self, coord: GridCoord, height: f32) {
        let Some(index) = coord.index(self.resolution) else {
            return;
        };
        self.heightmap[index] = height;
        let cell = &mut self.cells[index];
        cell.elevation = height;
        cell.position.y = height;
        self.update_elevation_bounds();
        self.is_analyzed = false;
    }

    /// Sets a cell's surface. Out of range is a no-op.
    pub fn set_surface_type(&mut self, coord: GridCoord, surface: SurfaceType) {
        self.edit_cell(coord, |cell| cell.surface_type = surface);
    }

    /// Sets a cell's ice probability, clamped to `[0, 1]`. Out of range is a no-op.
    pub fn set_ice_probability(&mut self, coord: GridCoord, probability: f32) {
        self.edit_cell(coord, |cell| cell.ice_probability = probability.clamp(0.0, 1.0));
    }

    /// Sets a cell's sun exposure, clamped to `[0, 1]`. Out of range is a no-op.
    pub fn set_sun_exposure(&mut self, coord: GridCoord, exposure: f32) {
        self.edit_cell(coord, |cell| cell.sun_exposure = exposure.clamp(0.0, 1.0));
    }

    /// Applies an input edit and re-derives the cell if the chunk is analyzed.
    ///
    /// Inputs edited here never change geometry, so membership lists stay valid.
    fn edit_cell(&mut self, coord: GridCoord, edit: impl FnOnce(&mut TerrainCell)) {
        let Some(index) = coord.index(self.resolution) else {
            return;
        };
        let cell = &mut self.cells[index];
        edit(cell);
        if self.is_analyzed {
            cell.calculate_derived_properties(&self.config);
        }
    }

    /// Centre of cell `coord` in world space, `y` = current elevation.
    ///
    /// Coordinates outside the grid are extrapolated with `y = 0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn grid_to_world(&self, coord: GridCoord) -> Vec3 {
        Vec3::new(
            self.world_origin.x + (coord.x as f32 + 0.5) * self.cell_size,
            self.get_height(coord),
            self.world_origin.z + (coord.z as f32 + 0.5) * self.cell_size,
        )
    }

    /// Cell containing world point `(x, z)`, or `None` outside the chunk.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn world_to_grid(&self, x: f32, z: f32) -> Option<GridCoord> {
        let gx = ((x - self.world_origin.x) / self.cell_size).floor();
        let gz = ((z - self.world_origin.z) / self.cell_size).floor();
        if !gx.is_finite() || !gz.is_finite() {
            return None;
        }
        let limit = self.resolution as f32;
        if gx < 0.0 || gz < 0.0 || gx >= limit || gz >= limit {
            return None;
        }
        Some(GridCoord::new(gx as i32, gz as i32))
    }

    /// Loads an elevation buffer of `data_resolution²` samples.
    ///
    /// Equal resolutions copy; anything else is bilinearly resampled with
    /// edge clamping. Does not analyze.
    ///
    /// # Errors
    ///
    /// [`TerrainError::EmptyHeightmap`] for a zero resolution and
    /// [`TerrainError::HeightmapSizeMismatch`] if the length is wrong. The
    /// chunk is unchanged on error.
    pub fn load_heightmap(&mut self, data: &[f32], data_resolution: usize) -> TerrainResult<()> {
        if data_resolution == 0 {
            return Err(TerrainError::EmptyHeightmap);
        }
        let expected = data_resolution * data_resolution;
        if data.len() != expected {
            return Err(TerrainError::HeightmapSizeMismatch {
                expected,
                actual: data.len(),
                data_resolution,
            });
        }

        if data_resolution == self.resolution {
            self.heightmap.copy_from_slice(data);
        } else {
            self.resample(data, data_resolution);
        }
        debug!(
            chunk_x = self.coords.x,
            chunk_z = self.coords.z,
            source = data_resolution,
            target = self.resolution,
            resampled = data_resolution != self.resolution,
            "Heightmap loaded"
        );

        for (cell, &height) in self.cells.iter_mut().zip(&self.heightmap) {
            cell.elevation = height;
            cell.position.y = height;
        }
        self.update_elevation_bounds();
        self.is_analyzed = false;
        Ok(())
    }

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn resample(&mut self, data: &[f32], data_res: usize) {
        let scale = data_res as f32 / self.resolution as f32;
        let last = data_res - 1;

        for z in 0..self.resolution {
            let src_z = z as f32 * scale;
            let z0 = (src_z.floor() as usize).min(last);
            let z1 = (z0 + 1).min(last);
            let fz = src_z - z0 as f32;

            for x in 0..self.resolution {
                let src_x = x as f32 * scale;
                let x0 = (src_x.floor() as usize).min(last);
                let x1 = (x0 + 1).min(last);
                let fx = src_x - x0 as f32;

                let h00 = data[z0 * data_res + x0];
                let h10 = data[z0 * data_res + x1];
                let h01 = data[z1 * data_res + x0];
                let h11 = data[z1 * data_res + x1];

                let h0 = h00 + (h10 - h00) * fx;
                let h1 = h01 + (h11 - h01) * fx;
                self.heightmap[z * self.resolution + x] = h0 + (h1 - h0) * fz;
            }
        }
    }

    fn update_elevation_bounds(&mut self) {
        let (min, max) = self
            .heightmap
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| {
                (lo.min(h), hi.max(h))
            });
        if min <= max {
            self.min_elevation = min;
            self.max_elevation = max;
        }
    }

    /// Runs the full analysis.
    ///
    /// 1. Per-cell gradient, slope, normal, aspect, curvature and drainage.
    /// 2. Nearest-cliff distance and direction for every cell.
    /// 3. Classification and membership lists.
    #[allow(clippy::cast_precision_loss)]
    pub fn analyze(&mut self) {
        let mut slope_sum = 0.0f32;
        for index in 0..self.cells.len() {
            self.analyze_cell(index);
            slope_sum += self.cells[index].slope_angle;
        }
        self.average_slope = slope_sum / self.cells.len() as f32;

        self.cliff_cells.clear();
        self.exit_zone_cells.clear();
        self.rope_required_cells.clear();

        self.calculate_cliff_distances();

        let res = self.resolution;
        for x in 0..res {
            for z in 0..res {
                let cell = &mut self.cells[z * res + x];
                cell.calculate_derived_properties(&self.config);

                let coord = cell.grid_coords();
                if cell.is_cliff() {
                    self.cliff_cells.push(coord);
                }
                if cell.is_exit_zone() {
                    self.exit_zone_cells.push(coord);
                }
                if cell.requires_rope() {
                    self.rope_required_cells.push(coord);
                }
            }
        }

        self.is_analyzed = true;
        debug!(
            chunk_x = self.coords.x,
            chunk_z = self.coords.z,
            average_slope = self.average_slope,
            cliffs = self.cliff_cells.len(),
            exit_zones = self.exit_zone_cells.len(),
            rope_required = self.rope_required_cells.len(),
            "Chunk analyzed"
        );
    }

    /// Height at an edge-clamped neighbor of `(x, z)`.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
    fn clamped_height(&self, x: usize, z: usize, dx: isize, dz: isize) -> f32 {
        let max = self.resolution as isize - 1;
        let nx = (x as isize + dx).clamp(0, max) as usize;
        let nz = (z as isize + dz).clamp(0, max) as usize;
        self.heightmap[nz * self.resolution + nx]
    }

    fn analyze_cell(&mut self, index: usize) {
        let (x, z) = (index % self.resolution, index / self.resolution);
        let hazards = self.config.hazards;

        let north = self.clamped_height(x, z, 0, -1);
        let south = self.clamped_height(x, z, 0, 1);
        let east = self.clamped_height(x, z, 1, 0);
        let west = self.clamped_height(x, z, -1, 0);
        let center = self.heightmap[index];
        let cs = self.cell_size;

        let dx = (east - west) / (2.0 * cs);
        let dz = (south - north) / (2.0 * cs);
        let gradient = (dx * dx + dz * dz).sqrt();

        let cell = &mut self.cells[index];
        cell.slope_angle = gradient.atan().to_degrees();
        cell.normal = Vec3::new(-dx, 1.0, -dz).normalized();

        if gradient > hazards.gradient_epsilon {
            cell.slope_direction = Vec3::new(dx, 0.0, dz).normalized();
            let mut aspect = dx.atan2(-dz).to_degrees();
            if aspect < 0.0 {
                aspect += 360.0;
            }
            // -tiny + 360 rounds up to 360 in f32
            cell.aspect = if aspect >= 360.0 { 0.0 } else { aspect };
        } else {
            // aspect keeps its previous value on flat ground
            cell.slope_direction = Vec3::ZERO;
        }

        let d2x = (east + west - 2.0 * center) / (cs * cs);
        let d2z = (north + south - 2.0 * center) / (cs * cs);
        cell.curvature = (d2x + d2z) * 0.5;
        cell.drainage = (-cell.curvature * hazards.drainage_gain).clamp(0.0, 1.0);
    }

    fn calculate_cliff_distances(&mut self) {
        let cliff_min = self.config.thresholds.cliff_min;
        let no_cliff = self.config.hazards.no_cliff_distance;

        let res = self.resolution;
        let mut cliff_points = Vec::new();
        for x in 0..res {
            for z in 0..res {
                let cell = &self.cells[z * res + x];
                if cell.slope_angle >= cliff_min {
                    cliff_points.push(cell.position);
                }
            }
        }
        trace!(candidates = cliff_points.len(), "Cliff distance pass");

        for cell in &mut self.cells {
            let nearest = nearest_cliff(cell.position, &cliff_points, no_cliff);
            cell.distance_to_cliff = nearest.distance;
            cell.cliff_direction = nearest.direction;
        }
    }

    /// Summary of the current state.
    #[must_use]
    pub fn stats(&self) -> ChunkStats {
        let mut stats = ChunkStats {
            total_cells: self.cells.len(),
            cliff_cells: self.cliff_cells.len(),
            exit_zone_cells: self.exit_zone_cells.len(),
            rope_required_cells: self.rope_required_cells.len(),
            min_elevation: self.min_elevation,
            max_elevation: self.max_elevation,
            elevation_range: self.max_elevation - self.min_elevation,
            average_slope: self.average_slope,
            ..ChunkStats::default()
        };
        for cell in &self.cells {
            stats.zone_counts[cell.terrain_zone().index()] += 1;
            if cell.is_slideable() {
                stats.slideable_cells += 1;
            }
            if cell.is_walkable() {
                stats.walkable_cells += 1;
            }
        }
        stats
    }

    /// Exit-zone cell with the highest quality; ties keep the first listed.
    #[must_use]
    pub fn best_exit_zone(&self) -> Option<GridCoord> {
        let mut best: Option<(GridCoord, f32)> = None;
        for &coord in &self.exit_zone_cells {
            let quality = self.get_cell(coord).map_or(0.0, TerrainCell::exit_zone_quality);
            match best {
                Some((_, q)) if quality <= q => {}
                _ => best = Some((coord, quality)),
            }
        }
        best.map(|(coord, _)| coord)
    }

    /// Index to grid coordinate.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    const fn coord_of(&self, index: usize) -> GridCoord {
        GridCoord::new(
            (index % self.resolution) as i32,
            (index / self.resolution) as i32,
        )
    }
}

impl Default for TerrainChunk {
    fn default() -> Self {
        let defaults = TerrainConfig::default().chunk;
        Self::new(ChunkCoord::default(), defaults.chunk_size, defaults.resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::DEFAULT_CLIFF_DISTANCE;
    use crate::generators::{cliff_heightmap, flat_heightmap, slope_heightmap};

    fn analyzed(heights: &[f32], resolution: usize) -> TerrainChunk {
        let mut chunk = TerrainChunk::new(ChunkCoord::new(0, 0), 64.0, resolution);
        chunk.load_heightmap(heights, resolution).unwrap();
        chunk.analyze();
        chunk
    }

    #[test]
    fn test_new_chunk_layout() {
        let chunk = TerrainChunk::new(ChunkCoord::new(1, -2), 64.0, 16);
        assert!((chunk.cell_size() - 4.0).abs() < f32::EPSILON);
        assert_eq!(chunk.world_origin(), Vec3::new(64.0, 0.0, -128.0));
        assert_eq!(chunk.heightmap().len(), 256);
        assert!(!chunk.is_analyzed());

        let cell = chunk.get_cell(GridCoord::new(3, 5)).unwrap();
        assert_eq!(cell.grid_coords(), GridCoord::new(3, 5));
        assert!((cell.position.x - (64.0 + 3.5 * 4.0)).abs() < 1e-5);
        assert!((cell.position.z - (-128.0 + 5.5 * 4.0)).abs() < 1e-5);
    }

    #[test]
    fn test_invalid_dimensions_fall_back() {
        let chunk = TerrainChunk::new(ChunkCoord::default(), -5.0, 0);
        assert!((chunk.chunk_size() - 64.0).abs() < f32::EPSILON);
        assert_eq!(chunk.resolution(), 32);

        let chunk = TerrainChunk::new(ChunkCoord::default(), f32::NAN, 8);
        assert!((chunk.chunk_size() - 64.0).abs() < f32::EPSILON);
        assert_eq!(chunk.resolution(), 8);
    }

    #[test]
    fn test_out_of_range_access_is_lenient() {
        let mut chunk = TerrainChunk::new(ChunkCoord::default(), 64.0, 8);
        assert!(chunk.get_cell(GridCoord::new(8, 0)).is_none());
        assert!(chunk.get_cell(GridCoord::new(-1, 0)).is_none());
        assert!(chunk.get_height(GridCoord::new(0, 99)).abs() < f32::EPSILON);

        let before = chunk.heightmap().to_vec();
        chunk.set_height(GridCoord::new(8, 8), 10.0);
        chunk.set_surface_type(GridCoord::new(-1, 3), SurfaceType::Ice);
        assert_eq!(chunk.heightmap(), before.as_slice());
    }

    #[test]
    fn test_set_height_syncs_cell() {
        let mut chunk = analyzed(&flat_heightmap(8, 100.0), 8);
        assert!(chunk.is_analyzed());

        let coord = GridCoord::new(2, 3);
        chunk.set_height(coord, 150.0);
        let cell = chunk.get_cell(coord).unwrap();
        assert!((cell.elevation - 150.0).abs() < f32::EPSILON);
        assert!((cell.position.y - 150.0).abs() < f32::EPSILON);
        assert!((chunk.get_height(coord) - 150.0).abs() < f32::EPSILON);
        assert!((chunk.max_elevation() - 150.0).abs() < f32::EPSILON);
        assert!(!chunk.is_analyzed());
    }

    #[test]
    fn test_load_rejects_wrong_size() {
        let mut chunk = TerrainChunk::new(ChunkCoord::default(), 64.0, 8);
        let err = chunk.load_heightmap(&[0.0; 10], 4).unwrap_err();
        assert!(matches!(
            err,
            TerrainError::HeightmapSizeMismatch {
                expected: 16,
                actual: 10,
                data_resolution: 4
            }
        ));
        assert!(matches!(
            chunk.load_heightmap(&[], 0),
            Err(TerrainError::EmptyHeightmap)
        ));
    }

    #[test]
    fn test_load_syncs_elevation() {
        let mut chunk = TerrainChunk::new(ChunkCoord::default(), 64.0, 4);
        let data: Vec<f32> = (0..16u8).map(f32::from).collect();
        chunk.load_heightmap(&data, 4).unwrap();

        for (coord, cell) in chunk.cells() {
            let h = chunk.get_height(coord);
            assert!((cell.elevation - h).abs() < f32::EPSILON);
            assert!((cell.position.y - h).abs() < f32::EPSILON);
        }
        assert!((chunk.get_height(GridCoord::new(1, 2)) - 9.0).abs() < f32::EPSILON);
        assert!(chunk.min_elevation().abs() < f32::EPSILON);
        assert!((chunk.max_elevation() - 15.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_upsample_is_edge_clamped() {
        let mut chunk = TerrainChunk::new(ChunkCoord::default(), 64.0, 4);
        chunk.load_heightmap(&[0.0, 10.0, 20.0, 30.0], 2).unwrap();
        // src = 1.5 on the last column clamps to the last sample
        assert!((chunk.get_height(GridCoord::new(3, 0)) - 10.0).abs() < 1e-5);
        assert!((chunk.get_height(GridCoord::new(1, 0)) - 5.0).abs() < 1e-5);
        assert!((chunk.get_height(GridCoord::new(1, 1)) - 15.0).abs() < 1e-5);
    }

    #[test]
    fn test_flat_chunk() {
        let chunk = analyzed(&flat_heightmap(16, 3000.0), 16);
        assert!(chunk.average_slope() < 1.0);
        assert!(chunk.cliff_cells().is_empty());
        assert_eq!(chunk.exit_zone_cells().len(), 256);
        for (_, cell) in chunk.cells() {
            assert!(cell.slope_angle < 1.0);
            assert!(cell.slope_direction.is_zero());
            assert_eq!(cell.normal, Vec3::Y);
            assert!((cell.distance_to_cliff - DEFAULT_CLIFF_DISTANCE).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_slope_geometry() {
        let chunk = analyzed(&slope_heightmap(16, 3000.0, 30.0, 64.0), 16);
        let cell = chunk.get_cell(GridCoord::new(8, 8)).unwrap();
        assert!((cell.slope_angle - 30.0).abs() < 0.01, "{}", cell.slope_angle);
        assert_eq!(cell.terrain_zone(), TerrainZone::Slideable);
        // Gradient points toward -z (heights rise to the north)
        assert!((cell.slope_direction.z + 1.0).abs() < 1e-5);
        assert!(cell.aspect.abs() < 1e-3);
        assert!((cell.normal.length() - 1.0).abs() < 1e-5);
        assert!(cell.curvature.abs() < 1e-3);
    }

    #[test]
    fn test_cliff_membership_and_distance() {
        let chunk = analyzed(&cliff_heightmap(16, 3000.0, 0.5), 16);
        assert!(!chunk.cliff_cells().is_empty());
        for coord in chunk.cliff_cells() {
            assert!((7..=9).contains(&coord.z), "{coord:?}");
        }
        assert!(chunk.get_cell(GridCoord::new(8, 7)).unwrap().distance_to_cliff < 20.0);
        assert!(chunk.get_cell(GridCoord::new(8, 0)).unwrap().distance_to_cliff > 20.0);
        for coord in chunk.cliff_cells() {
            let cell = chunk.get_cell(*coord).unwrap();
            assert!(cell.distance_to_cliff.abs() < f32::EPSILON);
            assert!(cell.cliff_direction.is_zero());
        }
    }

    /// Flat 8x8 chunk (cell size 8) with one sample at (4, 4) offset by `delta`.
    fn bump(delta: f32) -> TerrainChunk {
        let mut heights = flat_heightmap(8, 100.0);
        heights[4 * 8 + 4] += delta;
        analyzed(&heights, 8)
    }

    #[test]
    fn test_curvature_and_drainage() {
        // Peak: d2x = d2z = -2 / 64
        let chunk = bump(1.0);
        let peak = chunk.get_cell(GridCoord::new(4, 4)).unwrap();
        assert!((peak.curvature + 0.031_25).abs() < 1e-6, "{}", peak.curvature);
        assert!((peak.drainage - 0.312_5).abs() < 1e-5, "{}", peak.drainage);
        assert!(peak.is_exit_zone());

        // Neighbor sees half the Laplacian along one axis only
        let side = chunk.get_cell(GridCoord::new(5, 4)).unwrap();
        assert!((side.curvature - 1.0 / 128.0).abs() < 1e-6, "{}", side.curvature);
        assert!(side.drainage.abs() < f32::EPSILON);

        // Drainage saturates at 1
        let chunk = bump(4.0);
        let peak = chunk.get_cell(GridCoord::new(4, 4)).unwrap();
        assert!((peak.curvature + 0.125).abs() < 1e-6);
        assert!((peak.drainage - 1.0).abs() < f32::EPSILON);

        // Pit: positive curvature, no drainage
        let chunk = bump(-1.0);
        let pit = chunk.get_cell(GridCoord::new(4, 4)).unwrap();
        assert!((pit.curvature - 0.031_25).abs() < 1e-6);
        assert!(pit.drainage.abs() < f32::EPSILON);
        assert!(pit.is_exit_zone());
    }

    #[test]
    fn test_concave_cell_is_not_exit_zone() {
        // curvature = 16 / 64 = 0.25, slope 0 at the pit itself
        let chunk = bump(-8.0);
        let pit = chunk.get_cell(GridCoord::new(4, 4)).unwrap();
        assert!(pit.slope_angle < 1e-3);
        assert!((pit.curvature - 0.25).abs() < 1e-6);
        assert!(!pit.is_exit_zone());
        assert!(pit.exit_zone_quality().abs() < f32::EPSILON);
        assert!(!chunk.exit_zone_cells().contains(&GridCoord::new(4, 4)));

        // Just under the limit: 12 / 64 = 0.1875
        let chunk = bump(-6.0);
        let pit = chunk.get_cell(GridCoord::new(4, 4)).unwrap();
        assert!(pit.curvature < 0.2);
        assert!(pit.is_exit_zone());
    }

    #[test]
    fn test_membership_order_is_column_major() {
        let chunk = analyzed(&flat_heightmap(4, 0.0), 4);
        let exits = chunk.exit_zone_cells();
        assert_eq!(exits[0], GridCoord::new(0, 0));
        assert_eq!(exits[1], GridCoord::new(0, 1));
        assert_eq!(exits[4], GridCoord::new(1, 0));
        // Every cell ties at quality 1, so the first listed wins
        assert_eq!(chunk.best_exit_zone(), Some(GridCoord::new(0, 0)));
    }

    #[test]
    fn test_reanalysis_is_idempotent() {
        let mut chunk = analyzed(&cliff_heightmap(16, 3000.0, 0.5), 16);
        let cliffs = chunk.cliff_cells().to_vec();
        let exits = chunk.exit_zone_cells().to_vec();
        chunk.analyze();
        assert_eq!(chunk.cliff_cells(), cliffs.as_slice());
        assert_eq!(chunk.exit_zone_cells(), exits.as_slice());

        chunk.load_heightmap(&flat_heightmap(16, 3000.0), 16).unwrap();
        chunk.analyze();
        assert!(chunk.cliff_cells().is_empty());
        assert!(chunk.rope_required_cells().is_empty());
    }

    #[test]
    fn test_aspect_kept_on_flat_ground() {
        // Rises toward +x
        let ramp: Vec<f32> = (0..64u8).map(|i| f32::from(i % 8) * 4.0).collect();
        let mut chunk = analyzed(&ramp, 8);
        let before = chunk.get_cell(GridCoord::new(4, 4)).unwrap().aspect;
        assert!((before - 90.0).abs() < 1e-3, "{before}");
        chunk.load_heightmap(&flat_heightmap(8, 100.0), 8).unwrap();
        chunk.analyze();
        let cell = chunk.get_cell(GridCoord::new(4, 4)).unwrap();
        assert!((cell.aspect - before).abs() < f32::EPSILON);
        assert!(cell.slope_direction.is_zero());
    }

    #[test]
    fn test_surface_edit_reclassifies() {
        let mut chunk = analyzed(&slope_heightmap(16, 3000.0, 30.0, 64.0), 16);
        let coord = GridCoord::new(8, 8);
        assert!(chunk.get_cell(coord).unwrap().is_slideable());

        chunk.set_surface_type(coord, SurfaceType::Ice);
        let cell = chunk.get_cell(coord).unwrap();
        assert!(!cell.is_slideable());
        assert!((cell.friction() - 0.1).abs() < f32::EPSILON);
        assert!(chunk.is_analyzed());

        chunk.set_ice_probability(coord, 3.0);
        assert!((chunk.get_cell(coord).unwrap().ice_probability - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_world_grid_round_trip() {
        let chunk = TerrainChunk::new(ChunkCoord::new(-1, 2), 64.0, 16);
        let coord = GridCoord::new(5, 11);
        let world = chunk.grid_to_world(coord);
        assert_eq!(chunk.world_to_grid(world.x, world.z), Some(coord));
        assert_eq!(chunk.world_to_grid(1.0, 130.0), None);
        assert_eq!(chunk.world_to_grid(-64.0, 128.0), Some(GridCoord::new(0, 0)));
    }

    #[test]
    fn test_stats_and_best_exit() {
        let chunk = analyzed(&cliff_heightmap(16, 3000.0, 0.5), 16);
        let stats = chunk.stats();
        assert_eq!(stats.total_cells, 256);
        assert_eq!(stats.zone_counts.iter().sum::<usize>(), 256);
        assert_eq!(stats.cliff_cells, chunk.cliff_cells().len());
        assert!((stats.elevation_range - (stats.max_elevation - stats.min_elevation)).abs() < 1e-3);

        let best = chunk.best_exit_zone().unwrap();
        let best_quality = chunk.get_cell(best).unwrap().exit_zone_quality();
        for coord in chunk.exit_zone_cells() {
            assert!(chunk.get_cell(*coord).unwrap().exit_zone_quality() <= best_quality);
        }
        assert!(TerrainChunk::new(ChunkCoord::default(), 64.0, 4).best_exit_zone().is_none());
    }
}
