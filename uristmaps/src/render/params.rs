//! Per-level scaling arithmetic.
//!
//! At zoom level `L` the map is `2^L × 2^L` tiles of 256 px. The world is
//! centered on that map; each world cell is drawn as a square sprite of
//! `graphic_size` pixels:
//!
//! ```text
//!           zoom_offset = smallest z with 256 · 2^z >= world_size
//!
//!   L >= zoom_offset:   graphic_size = 2^(L - zoom_offset)   step_size = 1
//!   L <  zoom_offset:   graphic_size = 1                     step_size = 2^(zoom_offset - L)
//!
//!   clear_tiles = (256 · 2^zoom_offset - world_size) / step_size / 2
//! ```
//!
//! `clear_tiles` is the number of empty sprite cells left and above the
//! world. In stepping mode only every `step_size`-th world cell is drawn.

use super::{RenderError, RenderResult};

/// Output tile side length in pixels.
pub const TILE_SIZE: u32 = 256;

/// Smallest `z` such that a `256 · 2^z` pixel map holds one pixel per cell.
pub fn zoom_offset(world_size: u32) -> u32 {
    let mut offset = 0;
    let mut map_size = TILE_SIZE as u64;
    while map_size < world_size as u64 {
        map_size *= 2;
        offset += 1;
    }
    offset
}

/// Scaling parameters of one zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelParams {
    pub level: u32,
    pub world_size: u32,
    pub zoom_offset: u32,
    /// Sprite side length in pixels.
    pub graphic_size: u32,
    /// Distance between sampled world cells.
    pub step_size: u32,
    /// Empty sprite cells before the world starts, on both axes.
    pub clear_tiles: u64,
    /// Tiles per axis, `2^level`.
    pub tile_amount: u32,
}

/// A world cell drawn into a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPlacement {
    pub world_x: u32,
    pub world_y: u32,
    /// Top-left pixel of the sprite inside the tile.
    pub px: u32,
    pub py: u32,
}

impl LevelParams {
    /// Derive the parameters of `level` for a world of side `world_size`.
    ///
    /// Fails for an empty world and for levels that would need sprites
    /// larger than a tile.
    pub fn new(world_size: u32, level: u32) -> RenderResult<Self> {
        if world_size == 0 {
            return Err(RenderError::EmptyWorld);
        }

        let zoom_offset = zoom_offset(world_size);
        let (graphic_size, step_size) = if level >= zoom_offset {
            let shift = level - zoom_offset;
            if shift > TILE_SIZE.trailing_zeros() {
                return Err(RenderError::LevelTooDeep {
                    level,
                    zoom_offset,
                    graphic_size: 1u64.checked_shl(shift).unwrap_or(u64::MAX),
                });
            }
            (1u32 << shift, 1u32)
        } else {
            (1u32, 1u32 << (zoom_offset - level))
        };

        let map_pixels = (TILE_SIZE as u64) << zoom_offset;
        let clear_tiles = (map_pixels - world_size as u64) / step_size as u64 / 2;

        Ok(Self {
            level,
            world_size,
            zoom_offset,
            graphic_size,
            step_size,
            clear_tiles,
            tile_amount: 1 << level,
        })
    }

    /// Sprite cells per tile along one axis.
    pub fn tiles_per_block(&self) -> u32 {
        TILE_SIZE / self.graphic_size
    }

    /// Total number of tiles in the level.
    pub fn tile_count(&self) -> u64 {
        self.tile_amount as u64 * self.tile_amount as u64
    }

    /// World cell drawn at sprite cell `global` of the level, on one axis.
    fn world_index(&self, global: u64) -> Option<u32> {
        let local = global.checked_sub(self.clear_tiles)?;
        let world = local * self.step_size as u64;
        (world < self.world_size as u64).then_some(world as u32)
    }

    /// The world cells drawn into tile `(tile_x, tile_y)`, column by column.
    pub fn cells(&self, tile_x: u32, tile_y: u32) -> impl Iterator<Item = CellPlacement> + '_ {
        let per_block = self.tiles_per_block();
        let graphic = self.graphic_size;
        let xs = self.axis(tile_x, per_block);
        xs.into_iter().flat_map(move |(sub_x, world_x)| {
            self.axis(tile_y, per_block)
                .into_iter()
                .map(move |(sub_y, world_y)| CellPlacement {
                    world_x,
                    world_y,
                    px: sub_x * graphic,
                    py: sub_y * graphic,
                })
        })
    }

    fn axis(&self, tile: u32, per_block: u32) -> Vec<(u32, u32)> {
        (0..per_block)
            .filter_map(|sub| {
                let global = sub as u64 + tile as u64 * per_block as u64;
                self.world_index(global).map(|world| (sub, world))
            })
            .collect()
    }
}
