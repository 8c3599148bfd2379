//! # Seeded Simplex Noise
//!
//! 2D simplex noise used by the ridged heightmap fixture.
//!
//! The permutation table is shuffled with a `ChaCha8Rng` seeded from a
//! [`TerrainSeed`], so one seed gives the same field on every platform.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Seed for every generator in this crate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TerrainSeed(pub u64);

impl TerrainSeed {
    /// Wraps a raw seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Mixes in `purpose` to get an independent sub-seed.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0 ^ purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }

    /// Deterministic RNG stream for this seed.
    #[must_use]
    pub fn rng(self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.0)
    }
}

impl From<u64> for TerrainSeed {
    fn from(seed: u64) -> Self {
        Self(seed)
    }
}

const GRADIENTS: [[f64; 2]; 8] = [
    [1.0, 0.0],
    [1.0, 1.0],
    [0.0, 1.0],
    [-1.0, 1.0],
    [-1.0, 0.0],
    [-1.0, -1.0],
    [0.0, -1.0],
    [1.0, -1.0],
];

/// 2D simplex noise generator with values in `[-1, 1]`.
#[derive(Clone)]
pub struct SimplexNoise {
    /// 256 shuffled entries, doubled to skip index wrapping.
    perm: [u8; 512],
}

impl SimplexNoise {
    /// (sqrt(3) - 1) / 2
    const F2: f64 = 0.366_025_403_784_438_6;
    /// (3 - sqrt(3)) / 6
    const G2: f64 = 0.211_324_865_405_187_1;

    /// Builds the permutation table for `seed`.
    #[must_use]
    pub fn new(seed: TerrainSeed) -> Self {
        let mut table: Vec<u8> = (0..=255).collect();
        table.shuffle(&mut seed.rng());

        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = table[i & 255];
        }
        Self { perm }
    }

    #[inline]
    fn hash(&self, i: i64, j: i64) -> usize {
        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;
        usize::from(self.perm[ii + usize::from(self.perm[jj])])
    }

    #[inline]
    fn corner(x: f64, y: f64, hash: usize) -> f64 {
        let t = 0.5 - x * x - y * y;
        if t < 0.0 {
            return 0.0;
        }
        let [gx, gy] = GRADIENTS[hash & 7];
        let t2 = t * t;
        t2 * t2 * (gx * x + gy * y)
    }

    /// Noise at `(x, y)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let skew = (x + y) * Self::F2;
        let i = (x + skew).floor() as i64;
        let j = (y + skew).floor() as i64;

        let unskew = (i + j) as f64 * Self::G2;
        let x0 = x - (i as f64 - unskew);
        let y0 = y - (j as f64 - unskew);

        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - i1 as f64 + Self::G2;
        let y1 = y0 - j1 as f64 + Self::G2;
        let x2 = x0 - 1.0 + 2.0 * Self::G2;
        let y2 = y0 - 1.0 + 2.0 * Self::G2;

        let n0 = Self::corner(x0, y0, self.hash(i, j));
        let n1 = Self::corner(x1, y1, self.hash(i + i1, j + j1));
        let n2 = Self::corner(x2, y2, self.hash(i + 1, j + 1));

        (70.0 * (n0 + n1 + n2)).clamp(-1.0, 1.0)
    }

    /// Fractal sum of `octaves` layers, normalized by total amplitude.
    #[must_use]
    pub fn octaved(&self, x: f64, y: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64 {
        self.accumulate(x, y, octaves, persistence, lacunarity, |n| n)
    }

    /// Ridged fractal noise in `[0, 1]`: sharp crests where the base noise crosses zero.
    #[must_use]
    pub fn ridged(&self, x: f64, y: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64 {
        self.accumulate(x, y, octaves, persistence, lacunarity, |n| {
            let ridge = 1.0 - n.abs();
            ridge * ridge
        })
    }

    fn accumulate(
        &self,
        x: f64,
        y: f64,
        octaves: u32,
        persistence: f64,
        lacunarity: f64,
        shape: impl Fn(f64) -> f64,
    ) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_amplitude = 0.0;

        for _ in 0..octaves.max(1) {
            total += shape(self.sample(x * frequency, y * frequency)) * amplitude;
            max_amplitude += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }

        total / max_amplitude
    }
}
