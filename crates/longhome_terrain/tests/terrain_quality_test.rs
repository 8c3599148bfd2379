//! # Terrain Quality Tests
//!
//! Checks the analysis against terrain with known shape: flat ground,
//! uniform slopes, a cliff band, resampled buffers and mountain sections.

use longhome_terrain::generators::{
    cliff_heightmap, flat_heightmap, mountain_heightmap, slope_heightmap,
};
use longhome_terrain::{
    surface_friction, zone_from_slope, ChunkCoord, GridCoord, MountainParams, SurfaceType,
    TerrainCell, TerrainChunk, TerrainConfig, TerrainSeed, TerrainZone,
};

fn analyzed(chunk_size: f32, resolution: usize, heights: &[f32]) -> TerrainChunk {
    let mut chunk = TerrainChunk::new(ChunkCoord::new(0, 0), chunk_size, resolution);
    chunk
        .load_heightmap(heights, resolution)
        .expect("heightmap matches resolution");
    chunk.analyze();
    chunk
}

/// Flat ground has no slope and is one big exit zone.
#[test]
fn test_flat_terrain() {
    let chunk = analyzed(64.0, 16, &flat_heightmap(16, 3000.0));

    for (coord, cell) in chunk.cells() {
        assert!(cell.slope_angle < 1.0, "slope {} at {coord:?}", cell.slope_angle);
        assert!(cell.is_walkable());
    }
    assert!(chunk.average_slope() < 1.0);
    assert!(
        chunk.exit_zone_cells().len() >= 10,
        "expected many exit zones, found {}",
        chunk.exit_zone_cells().len()
    );
}

/// A generated 30° slope analyzes to 30° away from the clamped edges.
#[test]
fn test_uniform_slope() {
    let target = 30.0;
    let chunk = analyzed(64.0, 16, &slope_heightmap(16, 3000.0, target, 64.0));

    assert!(
        (chunk.average_slope() - target).abs() < 5.0,
        "average slope {:.1}",
        chunk.average_slope()
    );
    for x in 2..14 {
        for z in 2..14 {
            let cell = chunk.get_cell(GridCoord::new(x, z)).expect("interior cell");
            assert!(
                (cell.slope_angle - target).abs() < 5.0,
                "cell ({x},{z}) slope {:.1}",
                cell.slope_angle
            );
        }
    }
    let sample = chunk.get_cell(GridCoord::new(8, 8)).expect("centre cell");
    assert_eq!(sample.terrain_zone(), TerrainZone::Slideable);
}

/// Several slope angles land in the expected zones.
#[test]
fn test_slopes_classify_by_angle() {
    let cases = [
        (10.0, TerrainZone::Walkable),
        (30.0, TerrainZone::Slideable),
        (45.0, TerrainZone::Downclimb),
        (60.0, TerrainZone::RappelRequired),
        (80.0, TerrainZone::Cliff),
    ];
    for (angle, zone) in cases {
        let chunk = analyzed(64.0, 16, &slope_heightmap(16, 3000.0, angle, 64.0));
        let cell = chunk.get_cell(GridCoord::new(8, 8)).expect("centre cell");
        assert_eq!(cell.terrain_zone(), zone, "angle {angle}");
    }
}

#[test]
fn test_zone_ladder() {
    assert_eq!(zone_from_slope(10.0), TerrainZone::Walkable);
    assert_eq!(zone_from_slope(25.0), TerrainZone::Slideable);
    assert_eq!(zone_from_slope(30.0), TerrainZone::Slideable);
    assert_eq!(zone_from_slope(40.0), TerrainZone::Downclimb);
    assert_eq!(zone_from_slope(55.0), TerrainZone::RappelRequired);
    assert_eq!(zone_from_slope(75.0), TerrainZone::Cliff);
}

/// Cliff cells sit on the band; distance grows away from it.
#[test]
fn test_cliff_detection() {
    let chunk = analyzed(64.0, 16, &cliff_heightmap(16, 3000.0, 0.5));

    let cliffs = chunk.cliff_cells();
    assert!(!cliffs.is_empty(), "no cliff cells detected");
    let avg_z = cliffs.iter().map(|c| c.z as f32).sum::<f32>() / cliffs.len() as f32;
    assert!((avg_z - 8.0).abs() <= 2.0, "cliff rows average {avg_z:.1}");

    let near = chunk.get_cell(GridCoord::new(8, 7)).expect("near cell");
    assert!(near.distance_to_cliff < 20.0, "near distance {}", near.distance_to_cliff);
    let far = chunk.get_cell(GridCoord::new(8, 0)).expect("far cell");
    assert!(far.distance_to_cliff > 20.0, "far distance {}", far.distance_to_cliff);

    // Direction from the top row points down the chunk toward the band
    assert!(far.cliff_direction.z > 0.0);
    assert!((far.cliff_direction.length() - 1.0).abs() < 1e-4);

    for coord in chunk.rope_required_cells() {
        assert!(chunk.get_cell(*coord).expect("rope cell").requires_rope());
    }
}

/// Exit zones only appear on the flat shelves around a steep band.
#[test]
fn test_exit_zones() {
    let mut heights = Vec::with_capacity(256);
    for z in 0..16 {
        for _ in 0..16 {
            let h = if (4..=12).contains(&z) {
                3000.0 - (z - 4) as f32 * 15.0
            } else {
                3000.0
            };
            heights.push(h);
        }
    }
    let chunk = analyzed(64.0, 16, &heights);

    assert!(!chunk.exit_zone_cells().is_empty(), "no exit zones detected");
    let slide_min = chunk.config().thresholds.slide_min;
    for coord in chunk.exit_zone_cells() {
        let cell = chunk.get_cell(*coord).expect("exit cell");
        assert!(cell.slope_angle < slide_min, "exit at {coord:?} slope {}", cell.slope_angle);
        assert!(cell.exit_zone_quality() > 0.0 && cell.exit_zone_quality() <= 1.0);
    }
    assert!(chunk.best_exit_zone().is_some());
}

/// Downsampling 64 -> 16 keeps the corners close to the source.
#[test]
fn test_heightmap_resampling() {
    let (high, low) = (64usize, 16usize);
    let mut source = Vec::with_capacity(high * high);
    for z in 0..high {
        for x in 0..high {
            source.push(3000.0 + (x as f32 * 0.1).sin() * 50.0 + z as f32 * 5.0);
        }
    }

    let mut chunk = TerrainChunk::new(ChunkCoord::new(0, 0), 64.0, low);
    chunk.load_heightmap(&source, high).expect("valid source");
    assert_eq!(chunk.heightmap().len(), low * low);

    for (x, z) in [(0, 0), (low - 1, 0), (0, low - 1), (low - 1, low - 1)] {
        let resampled = chunk.get_height(GridCoord::new(x as i32, z as i32));
        let (sx, sz) = (x * high / low, z * high / low);
        let original = source[sz * high + sx];
        assert!(
            (resampled - original).abs() <= 50.0,
            "corner ({x},{z}): expected ~{original:.0}, got {resampled:.0}"
        );
    }
    for (_, cell) in chunk.cells() {
        assert!((cell.elevation - cell.position.y).abs() < f32::EPSILON);
    }
}

/// Ice never slides; snow near a cliff carries slide risk.
#[test]
fn test_surface_classification() {
    assert!(surface_friction(SurfaceType::Ice) <= 0.2);
    assert!(surface_friction(SurfaceType::RockDry) >= 0.5);

    let config = TerrainConfig::default();

    let mut ice = TerrainCell::default();
    ice.surface_type = SurfaceType::Ice;
    ice.slope_angle = 35.0;
    ice.distance_to_cliff = 30.0;
    ice.ice_probability = 0.8;
    ice.calculate_derived_properties(&config);
    assert!(!ice.is_slideable());
    assert!(ice.friction() <= 0.2);

    let mut snow = TerrainCell::default();
    snow.surface_type = SurfaceType::SnowFirm;
    snow.slope_angle = 32.0;
    snow.distance_to_cliff = 25.0;
    snow.calculate_derived_properties(&config);
    assert!(snow.is_slideable());
    assert!(snow.slide_risk() >= 0.2, "slide risk {}", snow.slide_risk());
    assert!(!snow.requires_rope());
}

/// Every ice cell on a slideable slope stays non-slideable after analysis.
#[test]
fn test_ice_never_slideable_on_slopes() {
    let mut chunk = TerrainChunk::new(ChunkCoord::new(0, 0), 64.0, 16);
    chunk
        .load_heightmap(&slope_heightmap(16, 3000.0, 32.0, 64.0), 16)
        .expect("valid heightmap");
    for x in 0..16 {
        chunk.set_surface_type(GridCoord::new(x, 8), SurfaceType::Ice);
    }
    chunk.analyze();

    for (coord, cell) in chunk.cells() {
        if coord.z == 8 {
            assert!(!cell.is_slideable(), "ice slid at {coord:?}");
        } else if (2..14).contains(&coord.z) {
            assert!(cell.is_slideable(), "snow did not slide at {coord:?}");
        }
    }
}

/// A 256m mountain section has relief, zone variety and its summit centred.
#[test]
fn test_mountain_generation() {
    let params = MountainParams {
        resolution: 32,
        base_height: 2500.0,
        peak_height: 4000.0,
        seed: TerrainSeed::new(42),
        chunk_size: 256.0,
    };
    let chunk = analyzed(256.0, 32, &mountain_heightmap(&params));

    let range = chunk.max_elevation() - chunk.min_elevation();
    assert!(range >= 20.0, "mountain too flat: {range:.0}m");

    let zones = chunk.stats().zone_counts.iter().filter(|&&n| n > 0).count();
    assert!(zones >= 2, "only {zones} zones present");

    let peak = chunk.get_cell(GridCoord::new(16, 16)).expect("centre cell");
    assert!(
        peak.elevation >= chunk.max_elevation() - range * 0.3,
        "centre {:.0}, max {:.0}",
        peak.elevation,
        chunk.max_elevation()
    );
}
