//! Packing sprite directories into atlases.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use image::{imageops, RgbaImage};
use tracing::{debug, info, warn};

use super::{check_size, image_path, index_path, AtlasError, AtlasIndex};
use crate::world::save_json;

/// Result of packing one sprite directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedAtlas {
    /// Pixel size of each sprite.
    pub size: u32,
    /// Number of sprites packed.
    pub sprites: usize,
    /// Sprites per atlas row and column.
    pub grid: u32,
    /// Written sprite sheet.
    pub image: PathBuf,
    /// Written offset index.
    pub index: PathBuf,
}

/// Side length of the smallest square grid holding `count` cells.
pub fn grid_side(count: usize) -> u32 {
    let mut side = (count as f64).sqrt().ceil() as u32;
    // Guard against float rounding on large counts
    while (side as usize) * (side as usize) < count {
        side += 1;
    }
    side
}

/// Pack every image in `sprite_dir` into `{tilesets_dir}/{size}.png` with
/// the offset index `{tilesets_dir}/{size}.json`.
///
/// Sprites are laid out row by row in file name order, so the output is
/// deterministic. The index key is the file stem, which is the category
/// name. Sprites of the wrong size are clipped or padded with transparency.
pub fn pack_atlas(sprite_dir: &Path, size: u32, tilesets_dir: &Path) -> Result<PackedAtlas, AtlasError> {
    check_size(size)?;

    let pattern = format!("{}/*.*", sprite_dir.display());
    let mut files = glob::glob(&pattern)
        .map_err(|source| AtlasError::Pattern {
            pattern: pattern.clone(),
            source,
        })?
        .collect::<Result<Vec<_>, _>>()?;
    files.retain(|path| path.is_file());
    files.sort();

    if files.is_empty() {
        return Err(AtlasError::NoSprites(sprite_dir.to_path_buf()));
    }

    let grid = grid_side(files.len());
    let mut sheet = RgbaImage::new(grid * size, grid * size);
    let mut index = AtlasIndex::new();

    for (i, file) in files.iter().enumerate() {
        let Some(name) = file.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };
        let sprite = image::open(file)
            .map_err(|source| AtlasError::Image {
                path: file.clone(),
                source,
            })?
            .to_rgba8();

        if sprite.dimensions() != (size, size) {
            warn!(
                path = %file.display(),
                expected = size,
                width = sprite.width(),
                height = sprite.height(),
                "Sprite has unexpected dimensions"
            );
        }

        let x = (i as u32 % grid) * size;
        let y = (i as u32 / grid) * size;
        let cell = fit_to_cell(&sprite, size);
        imageops::replace(&mut sheet, &cell, x as i64, y as i64);

        if index.insert(name.clone(), (x, y)).is_some() {
            warn!(name = %name, path = %file.display(), "Duplicate sprite name, keeping the last one");
        }
    }

    fs::create_dir_all(tilesets_dir).map_err(|source| AtlasError::Io {
        path: tilesets_dir.to_path_buf(),
        source,
    })?;

    let image = image_path(tilesets_dir, size);
    let index_file = index_path(tilesets_dir, size);
    sheet.save(&image).map_err(|source| AtlasError::Image {
        path: image.clone(),
        source,
    })?;
    save_json(&index_file, &index)?;

    debug!(size, grid, path = %image.display(), "Wrote atlas sheet");
    info!(size, sprites = index.len(), "Packed sprite atlas");

    Ok(PackedAtlas {
        size,
        sprites: index.len(),
        grid,
        image,
        index: index_file,
    })
}

/// Pack every size directory below `sprites_root` (`res/tiles/{size}/`).
///
/// Directories whose name is not a supported size are ignored.
pub fn pack_all(sprites_root: &Path, tilesets_dir: &Path) -> Result<Vec<PackedAtlas>, AtlasError> {
    let sizes: BTreeMap<u32, PathBuf> = fs::read_dir(sprites_root)
        .map_err(|source| AtlasError::Io {
            path: sprites_root.to_path_buf(),
            source,
        })?
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            let size: u32 = entry.file_name().to_str()?.parse().ok()?;
            check_size(size).ok()?;
            Some((size, entry.path()))
        })
        .collect();

    sizes
        .iter()
        .map(|(&size, dir)| pack_atlas(dir, size, tilesets_dir))
        .collect()
}

fn fit_to_cell(sprite: &RgbaImage, size: u32) -> RgbaImage {
    if sprite.dimensions() == (size, size) {
        return sprite.clone();
    }
    let mut cell = RgbaImage::new(size, size);
    imageops::replace(&mut cell, sprite, 0, 0);
    cell
}
