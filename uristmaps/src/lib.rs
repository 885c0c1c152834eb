//! Uristmaps - web slippy maps for Dwarf Fortress worlds
//!
//! This library turns a classified world grid (one biome or structure
//! category per cell) into the artifacts a Leaflet map needs:
//!
//! - [`grouping`] clusters contiguous structures and snaps site markers onto them
//! - [`coord`] projects world coordinates onto the slippy-map lon/lat space
//! - [`atlas`] packs and loads the per-size category sprite sheets
//! - [`render`] renders the tile pyramid in parallel
//! - [`markers`] exports GeoJSON for the site and region markers
//! - [`logging`] installs the `tracing` subscriber used by the binaries
//!
//! ```text
//! biomes.json ──┬──────────────────────────────► render ──► tiles/{z}/{x}/{y}.png
//! structs.json ─┼──► grouping ──► groups.json      ▲
//!               │        │        centers.json     │
//! sites.json ───┴────────┴──► sites.json ─► markers ─► sitesgeo.json
//!                                                  │
//! sprites/{size}/*.png ──► atlas ──────────────────┘
//! ```

pub mod atlas;
pub mod config;
pub mod coord;
pub mod grouping;
pub mod logging;
pub mod markers;
pub mod render;
pub mod world;

/// Library version, used in CLI banners.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
