//! # Terrain Report
//!
//! Generates a grid of mountain chunks, runs them through the chunk
//! pipeline and prints per-chunk hazard statistics.
//!
//! ```text
//! terrain_report [--config <thresholds.toml>] [--seed <n>] [--grid <n>] [--toml]
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use longhome_terrain::generators::mountain_heightmap;
use longhome_terrain::{
    ChunkCoord, ChunkPipeline, ChunkRequest, MountainParams, PipelineConfig, TerrainConfig,
    TerrainSeed, TerrainZone,
};

const CHUNK_SIZE: f32 = 256.0;
const RESOLUTION: usize = 32;

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("Usage: terrain_report [--config <file>] [--seed <n>] [--grid <n>] [--toml]");
        return ExitCode::SUCCESS;
    }

    let config = match arg_value(&args, "--config") {
        Some(path) => match TerrainConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => TerrainConfig::default(),
    };
    let seed: u64 = arg_value(&args, "--seed").and_then(|s| s.parse().ok()).unwrap_or(123);
    let grid: i32 = arg_value(&args, "--grid")
        .and_then(|s| s.parse().ok())
        .unwrap_or(2)
        .clamp(1, 16);
    let as_toml = args.iter().any(|a| a == "--toml");

    let base = TerrainSeed::new(seed);
    let mut requests = Vec::new();
    for z in 0..grid {
        for x in 0..grid {
            let purpose = (u64::from(x.unsigned_abs()) << 32) | u64::from(z.unsigned_abs());
            let heights = mountain_heightmap(&MountainParams {
                resolution: RESOLUTION,
                base_height: 2800.0,
                peak_height: 3800.0,
                seed: base.derive(purpose),
                chunk_size: CHUNK_SIZE,
            });
            requests.push(ChunkRequest::native(
                ChunkCoord::new(x, z),
                CHUNK_SIZE,
                RESOLUTION,
                heights,
            ));
        }
    }

    let pipeline = ChunkPipeline::with_terrain_config(PipelineConfig::default(), Arc::new(config));
    let chunks = match pipeline.run(requests) {
        Ok(chunks) => chunks,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if as_toml {
        for chunk in &chunks {
            let coords = chunk.coords();
            match toml::to_string(&chunk.stats()) {
                Ok(text) => println!("# chunk ({}, {})\n{text}", coords.x, coords.z),
                Err(e) => {
                    eprintln!("Error: {e}");
                    return ExitCode::FAILURE;
                }
            }
        }
        return ExitCode::SUCCESS;
    }

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         LONG HOME TERRAIN REPORT                                 ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();
    println!("Seed: {seed}   Grid: {grid}x{grid}   Chunk: {CHUNK_SIZE}m @ {RESOLUTION}");
    println!();

    for chunk in &chunks {
        let stats = chunk.stats();
        let coords = chunk.coords();
        println!(
            "┌─ CHUNK ({}, {}) ─────────────────────────────────────────────┐",
            coords.x, coords.z
        );
        println!(
            "│ Elevation range:    {:.0}m ({:.0} - {:.0})",
            stats.elevation_range, stats.min_elevation, stats.max_elevation
        );
        println!("│ Average slope:      {:.1}°", stats.average_slope);
        println!("│ Cliff cells:        {}", stats.cliff_cells);
        println!("│ Exit zones:         {}", stats.exit_zone_cells);
        println!("│ Rope required:      {}", stats.rope_required_cells);
        println!("│ Slideable:          {}", stats.slideable_cells);
        for zone in TerrainZone::ALL {
            println!(
                "│   {:<16} {}",
                format!("{zone:?}"),
                stats.zone_counts[zone.index()]
            );
        }
        if let Some(best) = chunk.best_exit_zone() {
            println!("│ Best exit zone:     ({}, {})", best.x, best.z);
        }
        println!("└──────────────────────────────────────────────────────────────────┘");
    }

    let totals = pipeline.stats();
    println!();
    println!(
        "Analyzed {} chunks / {} cells: {} cliff cells, {} exit zones",
        totals.chunks_completed, totals.cells_analyzed, totals.cliff_cells, totals.exit_zone_cells
    );
    ExitCode::SUCCESS
}
