//! Common types and utilities shared across CLI commands.

use std::path::Path;

use clap::ValueEnum;
use uristmaps::config::{ConfigError, ConfigFile, RenderConfig};
use uristmaps::render::Layer;

use crate::error::CliError;

/// Tile layer selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum LayerArg {
    /// Biome sprites with structures on top
    Biomes,
    /// Translucent region overlay
    Regions,
}

impl From<LayerArg> for Layer {
    fn from(arg: LayerArg) -> Self {
        match arg {
            LayerArg::Biomes => Layer::Biomes,
            LayerArg::Regions => Layer::Regions,
        }
    }
}

/// Load the configuration file.
///
/// A missing file falls back to the defaults so a fresh checkout works
/// without one; any other problem is an error.
pub fn load_config(path: &Path) -> Result<ConfigFile, CliError> {
    match ConfigFile::load(path) {
        Ok(config) => Ok(config),
        Err(ConfigError::NotFound(path)) => {
            tracing::warn!(path = %path.display(), "Config file not found, using defaults");
            Ok(ConfigFile::default())
        }
        Err(e) => Err(e.into()),
    }
}

/// Apply command line zoom and worker overrides to the render settings.
///
/// `--level` selects a single level and wins over `--min-zoom`/`--max-zoom`.
pub fn resolve_render_config(
    config: &RenderConfig,
    level: Option<u32>,
    min_zoom: Option<u32>,
    max_zoom: Option<u32>,
    workers: Option<usize>,
) -> Result<RenderConfig, CliError> {
    let (min, max) = match level {
        Some(level) => (level, level),
        None => (
            min_zoom.unwrap_or(config.min_zoom),
            max_zoom.unwrap_or(config.max_zoom),
        ),
    };

    if min > max {
        return Err(CliError::Config(format!(
            "min zoom {} is greater than max zoom {}",
            min, max
        )));
    }

    Ok(config
        .clone()
        .with_zoom_range(min, max)
        .with_workers(workers.unwrap_or(config.workers)))
}
