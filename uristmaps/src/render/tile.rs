//! Single tile rendering and output.

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};

use super::painter::CellPainter;
use super::params::{LevelParams, TILE_SIZE};
use super::{RenderError, RenderResult};

/// Background of every tile.
pub const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Render tile `(tile_x, tile_y)` of a level.
///
/// The result depends only on the arguments, so rendering the same tile
/// twice produces the same pixels.
pub fn render_tile<P>(params: &LevelParams, painter: &P, tile_x: u32, tile_y: u32) -> RgbaImage
where
    P: CellPainter + ?Sized,
{
    let mut tile = RgbaImage::from_pixel(TILE_SIZE, TILE_SIZE, BACKGROUND);
    for cell in params.cells(tile_x, tile_y) {
        painter.paint(&mut tile, cell, params.graphic_size);
    }
    tile
}

/// Output path of a tile: `{root}/{level}/{x}/{y}.png`.
pub fn tile_path(root: &Path, level: u32, tile_x: u32, tile_y: u32) -> PathBuf {
    root.join(level.to_string())
        .join(tile_x.to_string())
        .join(format!("{}.png", tile_y))
}

/// Write a tile as PNG, creating its directory.
pub fn write_tile(tile: &RgbaImage, path: &Path) -> RenderResult<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| RenderError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    tile.save(path).map_err(|source| RenderError::Encode {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::{SpriteAtlas, FALLBACK_SPRITE};
    use crate::render::BiomePainter;
    use crate::world::WorldGrid;
    use tempfile::TempDir;

    const FOREST: Rgba<u8> = Rgba([0, 128, 0, 255]);
    const OCEAN: Rgba<u8> = Rgba([0, 0, 64, 255]);

    fn forest_atlas(size: u32) -> SpriteAtlas {
        SpriteAtlas::from_sprites(
            size,
            [
                ("forest".to_string(), RgbaImage::from_pixel(size, size, FOREST)),
                (FALLBACK_SPRITE.to_string(), RgbaImage::from_pixel(size, size, OCEAN)),
            ],
        )
    }

    #[test]
    fn test_tile_path_layout() {
        let path = tile_path(Path::new("/out/tiles"), 3, 5, 7);
        assert_eq!(path, PathBuf::from("/out/tiles/3/5/7.png"));
    }

    #[test]
    fn test_small_world_tiles() {
        let grid = WorldGrid::filled(4, "forest");
        let atlas = forest_atlas(2);
        let painter = BiomePainter::new(&grid, &atlas);
        let params = LevelParams::new(4, 1).unwrap();

        // 2px sprites draw every biome with the fallback sprite
        let top_left = render_tile(&params, &painter, 0, 0);
        assert_eq!(*top_left.get_pixel(252, 252), OCEAN);
        assert_eq!(*top_left.get_pixel(255, 255), OCEAN);
        assert_eq!(*top_left.get_pixel(251, 251), BACKGROUND);
        assert_eq!(*top_left.get_pixel(0, 0), BACKGROUND);

        let bottom_right = render_tile(&params, &painter, 1, 1);
        assert_eq!(*bottom_right.get_pixel(0, 0), OCEAN);
        assert_eq!(*bottom_right.get_pixel(3, 3), OCEAN);
        assert_eq!(*bottom_right.get_pixel(4, 4), BACKGROUND);

        let top_right = render_tile(&params, &painter, 1, 0);
        assert_eq!(*top_right.get_pixel(0, 252), OCEAN);
        assert_eq!(*top_right.get_pixel(0, 251), BACKGROUND);
    }

    #[test]
    fn test_write_tile_creates_directories() {
        let temp = TempDir::new().unwrap();
        let path = tile_path(temp.path(), 2, 1, 3);
        let tile = RgbaImage::from_pixel(TILE_SIZE, TILE_SIZE, BACKGROUND);

        write_tile(&tile, &path).unwrap();
        let read = image::open(&path).unwrap().to_rgba8();
        assert_eq!(read, tile);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let grid = WorldGrid::from_fn(9, |x, y| if (x + y) % 3 == 0 { "forest" } else { "" });
        let atlas = forest_atlas(8);
        let painter = BiomePainter::new(&grid, &atlas);
        let params = LevelParams::new(9, 3).unwrap();

        assert_eq!(render_tile(&params, &painter, 3, 4), render_tile(&params, &painter, 3, 4));
    }

    #[test]
    fn test_larger_sprites_use_biome() {
        let grid = WorldGrid::filled(4, "forest");
        let atlas = forest_atlas(4);
        let painter = BiomePainter::new(&grid, &atlas);
        let params = LevelParams::new(4, 2).unwrap();

        // Level 2: clear_tiles 126, world starts at pixel 504 = tile 1, pixel 248
        let tile = render_tile(&params, &painter, 1, 1);
        assert_eq!(*tile.get_pixel(248, 248), FOREST);
        assert_eq!(*tile.get_pixel(255, 255), FOREST);
        assert_eq!(*tile.get_pixel(247, 247), BACKGROUND);
    }
}
