//! Nearest-cliff search.
//!
//! Brute force: every query scans every cliff point. Chunks are at most a
//! few thousand cells, so `cells x cliffs` stays small. A spatial index can
//! replace the scan as long as distances and directions are unchanged.

use longhome_shared::Vec3;

/// Below this distance the direction to a cliff is the zero vector.
pub const CLIFF_DIRECTION_EPSILON: f32 = 1e-3;

/// Distance and direction from a point to its nearest cliff.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NearestCliff {
    /// Euclidean 3D distance, or the "no cliff" sentinel.
    pub distance: f32,
    /// Unit vector toward the cliff, zero when on top of it or none found.
    pub direction: Vec3,
}

/// Finds the nearest of `cliffs` to `position`.
///
/// Starts from `no_cliff_distance`, so cliffs further away than the
/// sentinel are ignored. Ties keep the first cliff in slice order.
#[must_use]
pub fn nearest_cliff(position: Vec3, cliffs: &[Vec3], no_cliff_distance: f32) -> NearestCliff {
    let mut nearest = NearestCliff {
        distance: no_cliff_distance,
        direction: Vec3::ZERO,
    };

    for &cliff in cliffs {
        let distance = position.distance(cliff);
        if distance < nearest.distance {
            nearest.distance = distance;
            nearest.direction = if distance > CLIFF_DIRECTION_EPSILON {
                (cliff - position).normalized()
            } else {
                Vec3::ZERO
            };
        }
    }

    nearest
}
