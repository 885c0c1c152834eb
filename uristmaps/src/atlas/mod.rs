//! Sprite atlases.
//!
//! One atlas exists per sprite pixel size. It is a square sprite sheet
//! (`{size}.png`) plus an index of each sprite's pixel offset in the sheet
//! (`{size}.json`, `{name: [x, y]}`):
//!
//! ```text
//! res/tiles/32/*.png ──► pack_atlas ──► tilesets/32.png
//!                                       tilesets/32.json
//!                                              │
//!                                              ▼
//!                                 SpriteAtlas::load(tilesets, 32)
//! ```
//!
//! A loaded [`SpriteAtlas`] is immutable and is shared by reference between
//! render workers.

mod error;
mod pack;

pub use error::AtlasError;
pub use pack::{grid_side, pack_all, pack_atlas, PackedAtlas};

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use image::{imageops, RgbaImage};
use tracing::debug;

use crate::world::load_json;

/// Largest supported sprite size, equal to the output tile size.
pub const MAX_SPRITE_SIZE: u32 = 256;

/// Sprite used for every biome at sizes where detail is not visible.
pub const FALLBACK_SPRITE: &str = "arctic_ocean";

/// Sprite sizes up to and including this one always use [`FALLBACK_SPRITE`].
pub const FALLBACK_MAX_SIZE: u32 = 2;

/// Sprite offsets keyed by name, the `{size}.json` artifact.
pub type AtlasIndex = BTreeMap<String, (u32, u32)>;

/// All supported sprite sizes: powers of two from 1 to 256.
pub fn supported_sizes() -> impl Iterator<Item = u32> {
    (0..=MAX_SPRITE_SIZE.trailing_zeros()).map(|shift| 1 << shift)
}

fn check_size(size: u32) -> Result<(), AtlasError> {
    if size.is_power_of_two() && size <= MAX_SPRITE_SIZE {
        Ok(())
    } else {
        Err(AtlasError::UnsupportedSize(size))
    }
}

fn image_path(tilesets_dir: &Path, size: u32) -> PathBuf {
    tilesets_dir.join(format!("{}.png", size))
}

fn index_path(tilesets_dir: &Path, size: u32) -> PathBuf {
    tilesets_dir.join(format!("{}.json", size))
}

/// Loaded sprites of one pixel size.
#[derive(Debug, Clone)]
pub struct SpriteAtlas {
    size: u32,
    sprites: HashMap<String, RgbaImage>,
}

impl SpriteAtlas {
    /// Build an atlas from already decoded sprites.
    pub fn from_sprites(size: u32, sprites: impl IntoIterator<Item = (String, RgbaImage)>) -> Self {
        Self {
            size,
            sprites: sprites.into_iter().collect(),
        }
    }

    /// Load `{size}.png` and `{size}.json` from the tilesets directory and
    /// cut out every indexed sprite.
    pub fn load(tilesets_dir: &Path, size: u32) -> Result<Self, AtlasError> {
        check_size(size)?;

        let index: AtlasIndex = load_json(&index_path(tilesets_dir, size))?;
        let sheet_path = image_path(tilesets_dir, size);
        let sheet = image::open(&sheet_path)
            .map_err(|source| AtlasError::Image {
                path: sheet_path.clone(),
                source,
            })?
            .to_rgba8();

        let mut sprites = HashMap::with_capacity(index.len());
        for (name, (x, y)) in index {
            if x.saturating_add(size) > sheet.width() || y.saturating_add(size) > sheet.height() {
                return Err(AtlasError::OutOfBounds {
                    path: sheet_path,
                    name,
                    x,
                    y,
                    width: sheet.width(),
                    height: sheet.height(),
                });
            }
            let sprite = imageops::crop_imm(&sheet, x, y, size, size).to_image();
            sprites.insert(name, sprite);
        }

        debug!(size, sprites = sprites.len(), path = %sheet_path.display(), "Loaded sprite atlas");
        Ok(Self { size, sprites })
    }

    /// Pixel size of the sprites.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Sprite stored under `name`.
    pub fn sprite(&self, name: &str) -> Option<&RgbaImage> {
        self.sprites.get(name)
    }

    /// Sprite for a biome category.
    ///
    /// At sizes of [`FALLBACK_MAX_SIZE`] pixels and below every biome is
    /// drawn with [`FALLBACK_SPRITE`].
    pub fn biome_sprite(&self, category: &str) -> Option<&RgbaImage> {
        if self.size <= FALLBACK_MAX_SIZE {
            self.sprite(FALLBACK_SPRITE)
        } else {
            self.sprite(category)
        }
    }

    /// Number of sprites.
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    /// True when the atlas holds no sprite.
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::fs;
    use tempfile::TempDir;

    fn write_sprite(dir: &Path, name: &str, size: u32, color: [u8; 4]) {
        fs::create_dir_all(dir).unwrap();
        RgbaImage::from_pixel(size, size, Rgba(color))
            .save(dir.join(format!("{}.png", name)))
            .unwrap();
    }

    #[test]
    fn test_supported_sizes() {
        let sizes: Vec<u32> = supported_sizes().collect();
        assert_eq!(sizes, vec![1, 2, 4, 8, 16, 32, 64, 128, 256]);
        assert!(check_size(64).is_ok());
        assert!(check_size(0).is_err());
        assert!(check_size(512).is_err());
    }

    #[test]
    fn test_pack_then_load_preserves_pixels() {
        let temp = TempDir::new().unwrap();
        let sprites = temp.path().join("res").join("8");
        let tilesets = temp.path().join("tilesets");

        let mut gradient = RgbaImage::new(8, 8);
        for (x, y, pixel) in gradient.enumerate_pixels_mut() {
            *pixel = Rgba([x as u8 * 30, y as u8 * 30, 7, 255]);
        }
        fs::create_dir_all(&sprites).unwrap();
        gradient.save(sprites.join("grassland.png")).unwrap();
        write_sprite(&sprites, "desert", 8, [200, 180, 0, 255]);
        write_sprite(&sprites, "lake", 8, [0, 0, 200, 128]);

        pack_atlas(&sprites, 8, &tilesets).unwrap();
        let atlas = SpriteAtlas::load(&tilesets, 8).unwrap();

        assert_eq!(atlas.size(), 8);
        assert_eq!(atlas.len(), 3);
        assert_eq!(atlas.sprite("grassland"), Some(&gradient));
        assert_eq!(atlas.sprite("lake").unwrap().get_pixel(3, 3), &Rgba([0, 0, 200, 128]));
        assert!(atlas.sprite("volcano").is_none());
    }

    #[test]
    fn test_small_sizes_use_fallback() {
        let atlas = SpriteAtlas::from_sprites(
            2,
            [
                (FALLBACK_SPRITE.to_string(), RgbaImage::from_pixel(2, 2, Rgba([1, 1, 1, 255]))),
                ("desert".to_string(), RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255]))),
            ],
        );
        assert_eq!(atlas.biome_sprite("desert"), atlas.sprite(FALLBACK_SPRITE));
        assert_eq!(atlas.biome_sprite("anything"), atlas.sprite(FALLBACK_SPRITE));
        assert_eq!(atlas.sprite("desert").unwrap().get_pixel(0, 0), &Rgba([9, 9, 9, 255]));
    }

    #[test]
    fn test_larger_sizes_use_category() {
        let atlas = SpriteAtlas::from_sprites(
            4,
            [("desert".to_string(), RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255])))],
        );
        assert!(atlas.biome_sprite("desert").is_some());
        assert!(atlas.biome_sprite(FALLBACK_SPRITE).is_none());
    }

    #[test]
    fn test_load_missing_atlas() {
        let temp = TempDir::new().unwrap();
        let result = SpriteAtlas::load(temp.path(), 16);
        assert!(matches!(result, Err(AtlasError::Index(_))));
    }

    #[test]
    fn test_load_rejects_out_of_bounds_index() {
        let temp = TempDir::new().unwrap();
        RgbaImage::new(4, 4).save(temp.path().join("4.png")).unwrap();
        fs::write(temp.path().join("4.json"), r#"{"desert": [4, 0]}"#).unwrap();

        let result = SpriteAtlas::load(temp.path(), 4);
        assert!(matches!(result, Err(AtlasError::OutOfBounds { .. })));
    }
}
