//! Configuration for the uristmaps pipeline.
//!
//! Settings are read from an INI file (`config.cfg` by default) and turned
//! into plain structs that are handed to each component explicitly. There is
//! no process-wide configuration state.
//!
//! ```ini
//! [Paths]
//! build = build
//! output = output
//! tilesets = tilesets
//! biome_tiles = res/tiles
//!
//! [Performance]
//! processes = 8
//!
//! [Map]
//! min_zoom = 1
//! max_zoom = 8
//!
//! [Grouping]
//! blacklist = river, meadow, crops, orchard, pasture, road
//! search_radius = 16
//! ```

mod file;

pub use file::{ConfigError, ConfigFile, DEFAULT_CONFIG_FILE};

use std::path::{Path, PathBuf};

use crate::grouping::{Blacklist, DEFAULT_SEARCH_RADIUS};

/// Default lowest zoom level rendered.
pub const DEFAULT_MIN_ZOOM: u32 = 1;

/// Default highest zoom level rendered.
pub const DEFAULT_MAX_ZOOM: u32 = 8;

/// Default marker cluster radius handed to the web frontend.
pub const DEFAULT_MAX_CLUSTER_RADIUS: u32 = 50;

/// Filesystem locations of the pipeline's inputs and outputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathsConfig {
    /// Directory holding the intermediate JSON artifacts.
    pub build: PathBuf,
    /// Root of the rendered web map.
    pub output: PathBuf,
    /// Directory of packed sprite atlases (`{size}.png` + `{size}.json`).
    pub tilesets: PathBuf,
    /// Directory with one sub-directory of sprites per pixel size.
    pub biome_tiles: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self::rooted_at(Path::new("."))
    }
}

impl PathsConfig {
    /// Default layout below the given root directory.
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            build: root.join("build"),
            output: root.join("output"),
            tilesets: root.join("tilesets"),
            biome_tiles: root.join("res").join("tiles"),
        }
    }

    /// Classified biome grid.
    pub fn biomes_json(&self) -> PathBuf {
        self.build.join("biomes.json")
    }

    /// Structure overlay grid.
    pub fn structs_json(&self) -> PathBuf {
        self.build.join("structs.json")
    }

    /// Grouping result.
    pub fn groups_json(&self) -> PathBuf {
        self.build.join("groups.json")
    }

    /// Group centers.
    pub fn centers_json(&self) -> PathBuf {
        self.build.join("centers.json")
    }

    /// Site list, rewritten in place by site placement.
    pub fn sites_json(&self) -> PathBuf {
        self.build.join("sites.json")
    }

    /// Region definitions.
    pub fn regions_json(&self) -> PathBuf {
        self.build.join("regions.json")
    }

    /// Site markers as GeoJSON.
    pub fn sites_geojson(&self) -> PathBuf {
        self.build.join("sitesgeo.json")
    }

    /// Region label markers as GeoJSON.
    pub fn regions_geojson(&self) -> PathBuf {
        self.build.join("regionsgeo.json")
    }

    /// Output root of the biome tile layer.
    pub fn tiles_dir(&self) -> PathBuf {
        self.output.join("tiles")
    }

    /// Output root of the region overlay layer.
    pub fn regions_dir(&self) -> PathBuf {
        self.output.join("regions")
    }
}

/// Settings of the tile renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    /// Lowest zoom level to render.
    pub min_zoom: u32,
    /// Highest zoom level to render.
    pub max_zoom: u32,
    /// Upper bound of the worker pool size.
    pub workers: usize,
    /// Marker cluster radius for the web frontend.
    pub max_cluster_radius: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            workers: default_workers(),
            max_cluster_radius: DEFAULT_MAX_CLUSTER_RADIUS,
        }
    }
}

impl RenderConfig {
    /// Set the zoom range.
    pub fn with_zoom_range(mut self, min_zoom: u32, max_zoom: u32) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    /// Set the worker pool size. Zero is clamped to one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }
}

/// Settings of the structure grouper and site placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupingConfig {
    /// Categories that never form groups.
    pub blacklist: Blacklist,
    /// Number of rings searched around a site.
    pub search_radius: u32,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            blacklist: Blacklist::default(),
            search_radius: DEFAULT_SEARCH_RADIUS,
        }
    }
}

impl GroupingConfig {
    /// Replace the blacklist.
    pub fn with_blacklist(mut self, blacklist: Blacklist) -> Self {
        self.blacklist = blacklist;
        self
    }

    /// Set the site search radius.
    pub fn with_search_radius(mut self, radius: u32) -> Self {
        self.search_radius = radius;
        self
    }
}

/// Number of hardware threads, or one if it cannot be determined.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_rooted_at() {
        let paths = PathsConfig::rooted_at(Path::new("/world"));
        assert_eq!(paths.build, PathBuf::from("/world/build"));
        assert_eq!(paths.groups_json(), PathBuf::from("/world/build/groups.json"));
        assert_eq!(paths.tiles_dir(), PathBuf::from("/world/output/tiles"));
        assert_eq!(paths.regions_dir(), PathBuf::from("/world/output/regions"));
    }

    #[test]
    fn test_render_config_builder() {
        let config = RenderConfig::default()
            .with_zoom_range(2, 6)
            .with_workers(0);

        assert_eq!(config.min_zoom, 2);
        assert_eq!(config.max_zoom, 6);
        assert_eq!(config.workers, 1);
    }

    #[test]
    fn test_grouping_config_default() {
        let config = GroupingConfig::default();
        assert_eq!(config.search_radius, DEFAULT_SEARCH_RADIUS);
        assert!(config.blacklist.contains("river"));
    }
}
