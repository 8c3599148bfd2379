//! # Classification Tables
//!
//! Static lookups that turn geometry into gameplay categories:
//!
//! - Slope angle -> [`TerrainZone`] via a threshold ladder
//! - [`SurfaceType`] -> friction coefficient
//!
//! Both tables are read-only values. The compiled-in defaults live in
//! [`SlopeThresholds::DEFAULT`] and [`FrictionTable::DEFAULT`]; alternate
//! sets are injected through [`crate::TerrainConfig`].
//!
//! Lookups are exact threshold comparisons. There is no interpolation.

use serde::{Deserialize, Serialize};

/// Movement/hazard zone derived from slope angle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum TerrainZone {
    /// Normal walking.
    #[default]
    Walkable = 0,
    /// Steep but walkable.
    Steep = 1,
    /// Controlled sliding is possible.
    Slideable = 2,
    /// Must face the slope and downclimb.
    Downclimb = 3,
    /// Rope descent required.
    RappelRequired = 4,
    /// Sheer face.
    Cliff = 5,
}

impl TerrainZone {
    /// Number of zones.
    pub const COUNT: usize = 6;

    /// Every zone, in ascending severity.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Walkable,
        Self::Steep,
        Self::Slideable,
        Self::Downclimb,
        Self::RappelRequired,
        Self::Cliff,
    ];

    /// Dense index in `0..COUNT`.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Zones a climber can simply walk on.
    #[inline]
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        matches!(self, Self::Walkable | Self::Steep)
    }

    /// Zones that can only be descended on a rope.
    #[inline]
    #[must_use]
    pub const fn requires_rope(self) -> bool {
        matches!(self, Self::RappelRequired | Self::Cliff)
    }
}

/// Surface material of a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum SurfaceType {
    /// Wind-packed snow.
    #[default]
    SnowFirm = 0,
    /// Soft snow.
    SnowSoft = 1,
    /// Fresh powder.
    SnowPowder = 2,
    /// Water ice.
    Ice = 3,
    /// Generic rock.
    Rock = 4,
    /// Dry rock.
    RockDry = 5,
    /// Wet rock.
    RockWet = 6,
    /// Loose scree.
    Scree = 7,
    /// Mixed rock and snow.
    Mixed = 8,
}

impl SurfaceType {
    /// Every surface, in id order.
    pub const ALL: [Self; 9] = [
        Self::SnowFirm,
        Self::SnowSoft,
        Self::SnowPowder,
        Self::Ice,
        Self::Rock,
        Self::RockDry,
        Self::RockWet,
        Self::Scree,
        Self::Mixed,
    ];

    /// Converts from a raw surface id. Unknown ids return `None`.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::SnowFirm),
            1 => Some(Self::SnowSoft),
            2 => Some(Self::SnowPowder),
            3 => Some(Self::Ice),
            4 => Some(Self::Rock),
            5 => Some(Self::RockDry),
            6 => Some(Self::RockWet),
            7 => Some(Self::Scree),
            8 => Some(Self::Mixed),
            _ => None,
        }
    }

    /// Surfaces that support the sliding mechanic.
    ///
    /// Ice is excluded: it has its own hazard mechanic.
    #[inline]
    #[must_use]
    pub const fn supports_sliding(self) -> bool {
        matches!(
            self,
            Self::SnowFirm | Self::SnowSoft | Self::SnowPowder | Self::Scree
        )
    }
}

/// Slope thresholds in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlopeThresholds {
    /// Upper bound of plain walking.
    pub walkable_max: f32,
    /// Lower bound of the slide band.
    pub slide_min: f32,
    /// Upper bound of the slide band.
    pub slide_max: f32,
    /// Lower bound of downclimbing.
    pub downclimb_min: f32,
    /// Upper bound of downclimbing.
    pub downclimb_max: f32,
    /// Lower bound of rope descent.
    pub rappel_min: f32,
    /// Lower bound of cliff faces.
    pub cliff_min: f32,
}

impl SlopeThresholds {
    /// Compiled-in threshold set.
    pub const DEFAULT: Self = Self {
        walkable_max: 25.0,
        slide_min: 25.0,
        slide_max: 40.0,
        downclimb_min: 35.0,
        downclimb_max: 50.0,
        rappel_min: 50.0,
        cliff_min: 70.0,
    };

    /// Classifies a slope angle.
    ///
    /// Evaluated from the most severe threshold down, so boundary ties go to
    /// the more severe zone. With the default set `slide_min == walkable_max`,
    /// which leaves [`TerrainZone::Steep`] unreachable.
    #[must_use]
    pub fn zone_for(&self, slope_angle: f32) -> TerrainZone {
        if slope_angle >= self.cliff_min {
            TerrainZone::Cliff
        } else if slope_angle >= self.rappel_min {
            TerrainZone::RappelRequired
        } else if slope_angle >= self.downclimb_min {
            TerrainZone::Downclimb
        } else if slope_angle >= self.slide_min {
            TerrainZone::Slideable
        } else if slope_angle >= self.walkable_max {
            TerrainZone::Steep
        } else {
            TerrainZone::Walkable
        }
    }

    /// Returns true if `slope_angle` lies in the inclusive slide band.
    #[inline]
    #[must_use]
    pub fn in_slide_band(&self, slope_angle: f32) -> bool {
        slope_angle >= self.slide_min && slope_angle <= self.slide_max
    }
}

impl Default for SlopeThresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Friction coefficient per surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrictionTable {
    /// Wind-packed snow.
    pub snow_firm: f32,
    /// Soft snow.
    pub snow_soft: f32,
    /// Fresh powder.
    pub snow_powder: f32,
    /// Water ice.
    pub ice: f32,
    /// Generic rock.
    pub rock: f32,
    /// Dry rock.
    pub rock_dry: f32,
    /// Wet rock.
    pub rock_wet: f32,
    /// Loose scree.
    pub scree: f32,
    /// Mixed rock and snow.
    pub mixed: f32,
    /// Used for surface ids with no known [`SurfaceType`].
    pub fallback: f32,
}

impl FrictionTable {
    /// Compiled-in friction table.
    pub const DEFAULT: Self = Self {
        snow_firm: 0.3,
        snow_soft: 0.5,
        snow_powder: 0.6,
        ice: 0.1,
        rock: 0.6,
        rock_dry: 0.7,
        rock_wet: 0.2,
        scree: 0.6,
        mixed: 0.4,
        fallback: 0.5,
    };

    /// Friction for a known surface.
    #[must_use]
    pub const fn friction(&self, surface: SurfaceType) -> f32 {
        match surface {
            SurfaceType::SnowFirm => self.snow_firm,
            SurfaceType::SnowSoft => self.snow_soft,
            SurfaceType::SnowPowder => self.snow_powder,
            SurfaceType::Ice => self.ice,
            SurfaceType::Rock => self.rock,
            SurfaceType::RockDry => self.rock_dry,
            SurfaceType::RockWet => self.rock_wet,
            SurfaceType::Scree => self.scree,
            SurfaceType::Mixed => self.mixed,
        }
    }

    /// Friction for a raw surface id, falling back for unknown ids.
    #[must_use]
    pub const fn friction_for_id(&self, id: u8) -> f32 {
        match SurfaceType::from_u8(id) {
            Some(surface) => self.friction(surface),
            None => self.fallback,
        }
    }

    /// All coefficients with their surfaces, for validation.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (SurfaceType, f32)> + '_ {
        SurfaceType::ALL.into_iter().map(|s| (s, self.friction(s)))
    }
}

impl Default for FrictionTable {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Classifies a slope angle with the default thresholds.
#[must_use]
pub fn zone_from_slope(slope_angle: f32) -> TerrainZone {
    SlopeThresholds::DEFAULT.zone_for(slope_angle)
}

/// Friction of a surface from the default table.
#[must_use]
pub const fn surface_friction(surface: SurfaceType) -> f32 {
    FrictionTable::DEFAULT.friction(surface)
}
