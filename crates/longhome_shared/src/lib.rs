//! # Long Home Shared
//!
//! Common math types used by the terrain core and its consumers
//! (movement, hazard, rendering).
//!
//! Everything here is plain data: `Copy`, `Pod`, serializable.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod math;

pub use math::{GridCoord, Vec3, NORMALIZE_EPSILON};
