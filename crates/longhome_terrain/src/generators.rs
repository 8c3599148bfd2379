//! # Synthetic Heightmaps
//!
//! Deterministic elevation buffers for driving the analysis in tests,
//! benchmarks and the report binary.
//!
//! Every generator returns a row-major `resolution x resolution` buffer
//! (`z * resolution + x`). Same inputs give bit-identical outputs.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::noise::{SimplexNoise, TerrainSeed};

/// Constant elevation everywhere.
#[must_use]
pub fn flat_heightmap(resolution: usize, base_height: f32) -> Vec<f32> {
    vec![base_height; resolution * resolution]
}

/// Uniform slope descending toward +z.
///
/// Each row drops `tan(slope_degrees) * chunk_size / resolution`, so a chunk
/// of that size analyses to `slope_degrees` away from its edges.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn slope_heightmap(
    resolution: usize,
    base_height: f32,
    slope_degrees: f32,
    chunk_size: f32,
) -> Vec<f32> {
    if resolution == 0 {
        return Vec::new();
    }
    let drop_per_row = slope_degrees.to_radians().tan() * (chunk_size / resolution as f32);

    let mut heightmap = Vec::with_capacity(resolution * resolution);
    for z in 0..resolution {
        let height = base_height - z as f32 * drop_per_row;
        heightmap.extend(std::iter::repeat(height).take(resolution));
    }
    heightmap
}

/// Upper plateau, one transition row, lower plateau.
///
/// The transition row sits at `floor(resolution * cliff_position)` and is
/// 100 units below the top; the lower plateau is 200 below. Every sample
/// gets a cosmetic `sin(0.3 x) * 5` ripple.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn cliff_heightmap(resolution: usize, base_height: f32, cliff_position: f32) -> Vec<f32> {
    const CLIFF_DROP: f32 = 200.0;

    let cliff_row = (resolution as f32 * cliff_position).floor().max(0.0) as usize;

    let mut heightmap = Vec::with_capacity(resolution * resolution);
    for z in 0..resolution {
        let plateau = match z.cmp(&cliff_row) {
            std::cmp::Ordering::Less => base_height,
            std::cmp::Ordering::Equal => base_height - CLIFF_DROP * 0.5,
            std::cmp::Ordering::Greater => base_height - CLIFF_DROP,
        };
        for x in 0..resolution {
            heightmap.push(plateau + (x as f32 * 0.3).sin() * 5.0);
        }
    }
    heightmap
}

/// Parameters of [`mountain_heightmap`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MountainParams {
    /// Samples per side.
    pub resolution: usize,
    /// Elevation at the rim.
    pub base_height: f32,
    /// Hard cap on every sample.
    pub peak_height: f32,
    /// Noise seed.
    pub seed: TerrainSeed,
    /// World size the buffer will be loaded into; sets the steepness.
    pub chunk_size: f32,
}

impl Default for MountainParams {
    fn default() -> Self {
        Self {
            resolution: 32,
            base_height: 2500.0,
            peak_height: 4000.0,
            seed: TerrainSeed::new(42),
            chunk_size: 64.0,
        }
    }
}

/// Radial mountain section with seeded ridges and jitter.
///
/// Relief is `0.6 * d_max` where `d_max` is the world distance from centre
/// to corner, which puts the average slope in the slide/downclimb range.
/// The centre sample is the summit; nothing exceeds `peak_height`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mountain_heightmap(params: &MountainParams) -> Vec<f32> {
    const RELIEF_GRADIENT: f64 = 0.6;
    const JITTER: f64 = 0.08;

    let size = params.resolution;
    if size < 2 {
        return flat_heightmap(size, params.base_height.min(params.peak_height));
    }

    let center = size / 2;
    let c = center as f64;
    let cell_size = f64::from(params.chunk_size) / size as f64;
    let max_dist_cells = (2.0 * c * c).sqrt();
    let max_height_diff = RELIEF_GRADIENT * max_dist_cells * cell_size;
    let base = f64::from(params.base_height);
    let phase = params.seed.value() as f64;

    let mut rng = params.seed.rng();
    let mut heightmap = Vec::with_capacity(size * size);

    for z in 0..size {
        for x in 0..size {
            let (fx, fz) = (x as f64, z as f64);
            let dist = ((fx - c).powi(2) + (fz - c).powi(2)).sqrt() / max_dist_cells;

            let angle = (fz - c).atan2(fx - c);
            let ridge = 0.3 * (angle * 3.0 + phase * 0.1).sin();
            let variation = (fx * 0.3 + phase).sin() * (fz * 0.25).cos() * 0.2;
            let falloff = (1.0 - dist + variation + ridge * (1.0 - dist)).max(0.0);

            let jitter: f64 = rng.gen_range(-JITTER..JITTER);
            let height = base + max_height_diff * (falloff + jitter).max(0.0);
            heightmap.push(height as f32);
        }
    }

    let summit = heightmap
        .iter()
        .copied()
        .fold((base + max_height_diff) as f32, f32::max);
    heightmap[center * size + center] = summit;

    for h in &mut heightmap {
        *h = h.min(params.peak_height);
    }
    heightmap
}

/// Ridged simplex terrain: `base + relief * ridged_fbm`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn ridged_heightmap(
    resolution: usize,
    base_height: f32,
    relief: f32,
    seed: TerrainSeed,
) -> Vec<f32> {
    const FREQUENCY: f64 = 0.07;

    let noise = SimplexNoise::new(seed.derive(0x5249_4447));
    let mut heightmap = Vec::with_capacity(resolution * resolution);
    for z in 0..resolution {
        for x in 0..resolution {
            let r = noise.ridged(x as f64 * FREQUENCY, z as f64 * FREQUENCY, 5, 0.5, 2.0);
            heightmap.push(base_height + relief * r as f32);
        }
    }
    heightmap
}
