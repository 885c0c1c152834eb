//! Info command - show the effective settings and the zoom layout.

use uristmaps::config::ConfigFile;
use uristmaps::coord::MapProjection;
use uristmaps::render::{zoom_offset, LevelParams};
use uristmaps::world::WorldGrid;

use crate::error::CliError;

/// Run the info command.
pub fn run(config: &ConfigFile) -> Result<(), CliError> {
    let paths = &config.paths;
    let render = &config.render;

    println!("Configuration");
    println!("=============");
    println!();
    println!("[Paths]");
    println!("  build       = {}", paths.build.display());
    println!("  output      = {}", paths.output.display());
    println!("  tilesets    = {}", paths.tilesets.display());
    println!("  biome_tiles = {}", paths.biome_tiles.display());
    println!();
    println!("[Render]");
    println!("  zoom    = {}-{}", render.min_zoom, render.max_zoom);
    println!("  workers = {}", render.workers);
    println!();
    println!("[Grouping]");
    println!(
        "  blacklist     = {}",
        config.grouping.blacklist.entries().collect::<Vec<_>>().join(", ")
    );
    println!("  search_radius = {}", config.grouping.search_radius);

    let biomes = paths.biomes_json();
    if !biomes.exists() {
        println!();
        println!("No world found at {}", biomes.display());
        return Ok(());
    }

    let world_size = WorldGrid::read_world_size(&biomes)?;
    let projection = MapProjection::for_world(world_size);
    println!();
    println!("World");
    println!("=====");
    println!();
    println!("  size         = {}x{}", world_size, world_size);
    println!("  zoom offset  = {}", zoom_offset(world_size));
    println!(
        "  projection   = zoom {}, {}px map, offset {}",
        projection.zoom, projection.map_size, projection.offset
    );
    println!();
    println!("  zoom  tiles     sprite  step  border");
    for level in render.min_zoom..=render.max_zoom {
        match LevelParams::new(world_size, level) {
            Ok(params) => println!(
                "  {:>4}  {:>8}  {:>5}px  {:>4}  {:>6}",
                level,
                params.tile_count(),
                params.graphic_size,
                params.step_size,
                params.clear_tiles
            ),
            Err(e) => println!("  {:>4}  {}", level, e),
        }
    }
    Ok(())
}
