//! Tile pyramid renderer.
//!
//! Renders the world into 256×256 PNG tiles for a slippy map, one directory
//! tree per zoom level:
//!
//! ```text
//!   LevelParams ── which world cell lands where in which tile
//!        │
//!        ▼
//!   render_tile ── white tile + CellPainter per visible cell
//!        │
//!        ▼
//!   render_level ── every tile of the level on a rayon pool
//!        │          {root}/{level}/{x}/{y}.png
//!        ▼
//!   render_pyramid ── levels min..=max of a layer
//! ```
//!
//! Tiles are pure functions of the grid, overlay and atlas. Re-rendering a
//! level overwrites each file with identical bytes.

mod dispatch;
mod error;
mod layer;
mod painter;
mod params;
mod tile;

pub use dispatch::{
    pool_layout, render_and_write, render_level, LevelJob, LevelReport, NoProgress, ProgressSink,
    TileFailure, TileOutcome, MAX_CHUNK,
};
pub use error::{RenderError, RenderResult};
pub use layer::{render_configured, render_pyramid, BiomeLayer, Layer, RegionLayer};
pub use painter::{BiomePainter, CellPainter, RegionPainter};
pub use params::{zoom_offset, CellPlacement, LevelParams, TILE_SIZE};
pub use tile::{render_tile, tile_path, write_tile, BACKGROUND};
