//! Render layers and the pyramid driver.
//!
//! A layer loads its inputs once, then renders level after level through
//! the shared dispatcher. Inputs are read-only while a level renders.

use std::fmt;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, info};

use super::dispatch::{render_level, LevelJob, LevelReport, ProgressSink};
use super::painter::{BiomePainter, CellPainter, RegionPainter};
use super::params::LevelParams;
use super::RenderResult;
use crate::atlas::SpriteAtlas;
use crate::config::{PathsConfig, RenderConfig};
use crate::world::{CategoryGrid, RegionIndex, StructureOverlay, WorldGrid};

/// Tile layers of the web map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Biome sprites with structures on top, `{output}/tiles`.
    Biomes,
    /// Translucent region colours, `{output}/regions`.
    Regions,
}

impl Layer {
    pub fn name(&self) -> &'static str {
        match self {
            Layer::Biomes => "biomes",
            Layer::Regions => "regions",
        }
    }

    /// Root directory of the layer's tiles.
    pub fn output_root(&self, paths: &PathsConfig) -> PathBuf {
        match self {
            Layer::Biomes => paths.tiles_dir(),
            Layer::Regions => paths.regions_dir(),
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Layer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "biomes" | "tiles" => Ok(Layer::Biomes),
            "regions" => Ok(Layer::Regions),
            other => Err(format!("unknown layer '{}' (expected biomes or regions)", other)),
        }
    }
}

/// Inputs of the biome layer.
pub struct BiomeLayer {
    grid: WorldGrid,
    structures: Option<StructureOverlay>,
    tilesets: PathBuf,
}

impl BiomeLayer {
    pub fn new(grid: WorldGrid, tilesets: impl Into<PathBuf>) -> Self {
        Self {
            grid,
            structures: None,
            tilesets: tilesets.into(),
        }
    }

    pub fn with_structures(mut self, structures: StructureOverlay) -> Self {
        self.structures = Some(structures);
        self
    }

    /// Load `biomes.json` and, when present, `structs.json`.
    pub fn load(paths: &PathsConfig) -> RenderResult<Self> {
        let grid = WorldGrid::load(&paths.biomes_json())?;
        let mut layer = Self::new(grid, &paths.tilesets);

        let structs = paths.structs_json();
        if structs.exists() {
            layer = layer.with_structures(StructureOverlay::load(&structs)?);
        } else {
            debug!(path = %structs.display(), "No structure overlay, rendering biomes only");
        }
        Ok(layer)
    }

    pub fn world_size(&self) -> u32 {
        self.grid.world_size()
    }

    /// Render one level into `output_root`.
    ///
    /// The atlas for the level's sprite size is loaded before any tile is
    /// scheduled.
    pub fn render_level(
        &self,
        level: u32,
        output_root: &Path,
        workers: usize,
        progress: &dyn ProgressSink,
    ) -> RenderResult<LevelReport> {
        let params = LevelParams::new(self.world_size(), level)?;
        let atlas = SpriteAtlas::load(&self.tilesets, params.graphic_size)?;

        let mut painter = BiomePainter::new(&self.grid, &atlas);
        if let Some(structures) = &self.structures {
            painter = painter.with_structures(structures);
        }
        run_level(params, &painter, output_root, workers, progress)
    }
}

/// Inputs of the region layer.
pub struct RegionLayer {
    world_size: u32,
    regions: RegionIndex,
}

impl RegionLayer {
    pub fn new(world_size: u32, regions: RegionIndex) -> Self {
        Self {
            world_size,
            regions,
        }
    }

    /// Load `regions.json` and the world size from `biomes.json`.
    pub fn load(paths: &PathsConfig) -> RenderResult<Self> {
        let world_size = WorldGrid::read_world_size(&paths.biomes_json())?;
        let regions = RegionIndex::load(&paths.regions_json())?;
        Ok(Self::new(world_size, regions))
    }

    pub fn world_size(&self) -> u32 {
        self.world_size
    }

    /// Render one level into `output_root`.
    pub fn render_level(
        &self,
        level: u32,
        output_root: &Path,
        workers: usize,
        progress: &dyn ProgressSink,
    ) -> RenderResult<LevelReport> {
        let params = LevelParams::new(self.world_size, level)?;
        let painter = RegionPainter::new(&self.regions);
        run_level(params, &painter, output_root, workers, progress)
    }
}

fn run_level(
    params: LevelParams,
    painter: &dyn CellPainter,
    output_root: &Path,
    workers: usize,
    progress: &dyn ProgressSink,
) -> RenderResult<LevelReport> {
    let job = LevelJob {
        params,
        painter,
        output_root,
        workers,
    };
    render_level(&job, progress)
}

/// Render `levels` of a layer, lowest level first.
///
/// Inputs are loaded once. Setup errors abort the run; tile failures are
/// collected in the per-level reports.
pub fn render_pyramid(
    layer: Layer,
    paths: &PathsConfig,
    levels: RangeInclusive<u32>,
    workers: usize,
    progress: &dyn ProgressSink,
) -> RenderResult<Vec<LevelReport>> {
    let output_root = layer.output_root(paths);
    info!(
        layer = layer.name(),
        min_level = *levels.start(),
        max_level = *levels.end(),
        workers,
        output = %output_root.display(),
        "Rendering tile pyramid"
    );

    match layer {
        Layer::Biomes => {
            let inputs = BiomeLayer::load(paths)?;
            levels
                .map(|level| inputs.render_level(level, &output_root, workers, progress))
                .collect()
        }
        Layer::Regions => {
            let inputs = RegionLayer::load(paths)?;
            levels
                .map(|level| inputs.render_level(level, &output_root, workers, progress))
                .collect()
        }
    }
}

/// Render the configured zoom range of a layer.
pub fn render_configured(
    layer: Layer,
    paths: &PathsConfig,
    config: &RenderConfig,
    progress: &dyn ProgressSink,
) -> RenderResult<Vec<LevelReport>> {
    render_pyramid(
        layer,
        paths,
        config.min_zoom..=config.max_zoom,
        config.workers,
        progress,
    )
}
