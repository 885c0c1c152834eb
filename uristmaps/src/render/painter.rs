//! Painting world cells into tiles.
//!
//! The tile loop is shared by all layers; a [`CellPainter`] decides what a
//! single world cell looks like.

use std::collections::HashSet;

use image::{imageops, Rgba, RgbaImage};
use parking_lot::Mutex;
use tracing::warn;

use super::params::CellPlacement;
use crate::atlas::SpriteAtlas;
use crate::world::{base_category, CategoryGrid, RegionIndex};

/// Draws one world cell into a tile.
///
/// Painters are shared between render threads and must not mutate shared
/// state beyond diagnostics.
pub trait CellPainter: Sync {
    /// Paint the cell at `cell` as a square of `size` pixels.
    fn paint(&self, tile: &mut RgbaImage, cell: CellPlacement, size: u32);
}

/// Remembers which missing sprites were already reported.
#[derive(Debug, Default)]
struct MissingSprites(Mutex<HashSet<String>>);

impl MissingSprites {
    fn report(&self, layer: &'static str, name: &str, cell: CellPlacement) {
        if self.0.lock().insert(name.to_string()) {
            warn!(
                layer,
                sprite = name,
                world_x = cell.world_x,
                world_y = cell.world_y,
                "Missing sprite, leaving cell unpainted"
            );
        }
    }
}

/// Biome sprites with structure sprites composited on top.
pub struct BiomePainter<'a> {
    biomes: &'a dyn CategoryGrid,
    structures: Option<&'a dyn CategoryGrid>,
    atlas: &'a SpriteAtlas,
    missing: MissingSprites,
}

impl<'a> BiomePainter<'a> {
    pub fn new(biomes: &'a dyn CategoryGrid, atlas: &'a SpriteAtlas) -> Self {
        Self {
            biomes,
            structures: None,
            atlas,
            missing: MissingSprites::default(),
        }
    }

    /// Draw structure sprites from the overlay on top of the biomes.
    pub fn with_structures(mut self, structures: &'a dyn CategoryGrid) -> Self {
        self.structures = Some(structures);
        self
    }

    fn structure_sprite(&self, name: &str) -> Option<&RgbaImage> {
        self.atlas
            .sprite(name)
            .or_else(|| self.atlas.sprite(base_category(name)))
    }
}

impl CellPainter for BiomePainter<'_> {
    fn paint(&self, tile: &mut RgbaImage, cell: CellPlacement, _size: u32) {
        let (x, y) = (cell.px as i64, cell.py as i64);

        if let Some(biome) = self.biomes.category(cell.world_x, cell.world_y) {
            match self.atlas.biome_sprite(biome) {
                Some(sprite) => imageops::replace(tile, sprite, x, y),
                None => self.missing.report("biomes", biome, cell),
            }
        }

        let Some(structure) = self
            .structures
            .and_then(|overlay| overlay.category(cell.world_x, cell.world_y))
        else {
            return;
        };
        match self.structure_sprite(structure) {
            Some(sprite) => imageops::overlay(tile, sprite, x, y),
            None => self.missing.report("structures", structure, cell),
        }
    }
}

/// Translucent region colours.
pub struct RegionPainter<'a> {
    regions: &'a RegionIndex,
}

impl<'a> RegionPainter<'a> {
    pub fn new(regions: &'a RegionIndex) -> Self {
        Self { regions }
    }

    /// Overlay colour of a region.
    pub fn color(region_id: u32) -> Rgba<u8> {
        let shade = (region_id % 255) as u8;
        Rgba([shade, 255 - shade, 10, 128])
    }
}

impl CellPainter for RegionPainter<'_> {
    fn paint(&self, tile: &mut RgbaImage, cell: CellPlacement, size: u32) {
        let Some(id) = self.regions.region_at_cell(cell.world_x, cell.world_y) else {
            return;
        };
        let color = Self::color(id);
        let x_end = (cell.px + size).min(tile.width());
        let y_end = (cell.py + size).min(tile.height());
        for y in cell.py..y_end {
            for x in cell.px..x_end {
                blend_over(tile.get_pixel_mut(x, y), color);
            }
        }
    }
}

/// Source-over compositing in integer arithmetic.
///
/// An opaque destination stays opaque.
fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let sa = src[3] as u32;
    let da = dst[3] as u32;
    // Output alpha scaled by 255
    let out = sa * 255 + da * (255 - sa);
    if out == 0 {
        return;
    }
    for c in 0..3 {
        let value = src[c] as u32 * sa * 255 + dst[c] as u32 * da * (255 - sa);
        dst[c] = ((value + out / 2) / out) as u8;
    }
    dst[3] = ((out + 127) / 255) as u8;
}
