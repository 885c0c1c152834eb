//! World artifacts produced by the external classifiers.
//!
//! The classifiers turn the exported world bitmaps into JSON grids. This
//! module loads them and provides read-only, bounds-checked access:
//!
//! - [`WorldGrid`]: dense `worldsize × worldsize` biome grid (`biomes.json`)
//! - [`StructureOverlay`]: sparse structure grid (`structs.json`)
//! - [`RegionIndex`]: region membership per coarse unit (`regions.json`)
//!
//! Both grids implement [`CategoryGrid`], which is what the grouper and the
//! renderer consume.

mod error;
mod grid;
mod json;
mod overlay;
mod regions;

pub use error::{WorldError, WorldResult};
pub use grid::WorldGrid;
pub use json::{load_json, save_json};
pub use overlay::{base_category, StructureOverlay};
pub use regions::{Region, RegionIndex, REGION_UNIT};

/// Read access to a square grid of category labels.
pub trait CategoryGrid: Send + Sync {
    /// Side length of the grid.
    fn world_size(&self) -> u32;

    /// Category at `(x, y)`, or `None` for empty and out-of-range cells.
    fn category(&self, x: u32, y: u32) -> Option<&str>;
}
