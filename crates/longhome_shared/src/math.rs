//! Mathematical types shared by the terrain core and its consumers.
//!
//! These are the canonical representations handed across crate boundaries.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Below this magnitude a vector normalizes to [`Vec3::ZERO`].
pub const NORMALIZE_EPSILON: f32 = 1e-4;

/// 3D Vector - position, normal, direction
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component (elevation axis)
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Unit X vector (east)
    pub const X: Self = Self::new(1.0, 0.0, 0.0);

    /// Unit Y vector (up)
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);

    /// Unit Z vector (south)
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Length squared (avoids sqrt)
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Unit-length copy of this vector.
    ///
    /// Vectors shorter than [`NORMALIZE_EPSILON`] come back as [`Vec3::ZERO`]
    /// instead of blowing up into NaN/Inf.
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len < NORMALIZE_EPSILON {
            return Self::ZERO;
        }
        Self::new(self.x / len, self.y / len, self.z / len)
    }

    /// Distance to another point
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    /// Distance squared (avoids sqrt)
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f32 {
        (self - other).length_squared()
    }

    /// Returns true if every component is exactly zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl std::ops::Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// Integer lattice coordinate of a cell inside a chunk's local grid.
///
/// Signed so that neighbor arithmetic can step off the grid; lookups
/// treat anything outside `0..resolution` as out of range.
#[repr(C)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Pod, Zeroable, Serialize,
    Deserialize,
)]
pub struct GridCoord {
    /// Column (east-west).
    pub x: i32,
    /// Row (north-south).
    pub z: i32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Returns this coordinate shifted by `(dx, dz)`.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.z + dz)
    }

    /// Returns true if the coordinate lies inside a `resolution x resolution` grid.
    #[inline]
    #[must_use]
    pub const fn in_bounds(self, resolution: usize) -> bool {
        self.x >= 0 && self.z >= 0 && (self.x as usize) < resolution && (self.z as usize) < resolution
    }

    /// Flat row-major index (`z * resolution + x`), or `None` when out of range.
    #[inline]
    #[must_use]
    pub const fn index(self, resolution: usize) -> Option<usize> {
        if self.in_bounds(resolution) {
            Some(self.z as usize * resolution + self.x as usize)
        } else {
            None
        }
    }
}
