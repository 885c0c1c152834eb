//! Tileset command - pack sprite directories into atlases.

use uristmaps::atlas::{pack_all, pack_atlas, PackedAtlas};
use uristmaps::config::ConfigFile;

use crate::error::CliError;

/// Run the tileset command.
///
/// Packs `{biome_tiles}/{size}` for one size, or every size directory when
/// `size` is `None`.
pub fn run(config: &ConfigFile, size: Option<u32>) -> Result<(), CliError> {
    let paths = &config.paths;
    let packed = match size {
        Some(size) => vec![pack_atlas(
            &paths.biome_tiles.join(size.to_string()),
            size,
            &paths.tilesets,
        )?],
        None => pack_all(&paths.biome_tiles, &paths.tilesets)?,
    };

    if packed.is_empty() {
        println!("No sprite directories found in {}", paths.biome_tiles.display());
        return Ok(());
    }

    println!("Packed {} tilesets into {}", packed.len(), paths.tilesets.display());
    for atlas in &packed {
        print_atlas(atlas);
    }
    Ok(())
}

fn print_atlas(atlas: &PackedAtlas) {
    println!(
        "  {:>3}px: {:>4} sprites, {}x{} grid -> {}",
        atlas.size,
        atlas.sprites,
        atlas.grid,
        atlas.grid,
        atlas.image.display()
    );
}
