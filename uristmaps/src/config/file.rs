//! INI configuration file loading.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::{Ini, Properties};
use thiserror::Error;
use tracing::debug;

use super::{default_workers, GroupingConfig, PathsConfig, RenderConfig};
use crate::grouping::Blacklist;

/// File name looked up when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.cfg";

/// Errors that can occur while loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("Config file '{}' not found", .0.display())]
    NotFound(PathBuf),

    /// The file could not be read or is not valid INI.
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    /// A value could not be parsed into the expected type.
    #[error("Invalid value for [{section}] {key}: '{value}'")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
    },

    /// The zoom range is empty.
    #[error("Invalid zoom range: min_zoom {min} is greater than max_zoom {max}")]
    InvalidZoomRange { min: u32, max: u32 },
}

/// Parsed configuration file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigFile {
    /// `[Paths]` section.
    pub paths: PathsConfig,
    /// `[Performance]` and `[Map]` sections.
    pub render: RenderConfig,
    /// `[Grouping]` section.
    pub grouping: GroupingConfig,
}

impl ConfigFile {
    /// Load and validate the configuration at `path`.
    ///
    /// Missing keys fall back to their defaults; a missing file, malformed
    /// INI or unparseable number is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_ini(&ini)?;
        debug!(path = %path.display(), ?config, "Loaded configuration");
        Ok(config)
    }

    /// Parse configuration from INI text.
    pub fn from_str_contents(contents: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(contents).map_err(|e| ConfigError::Read {
            path: PathBuf::from("<string>"),
            source: ini::Error::Parse(e),
        })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = ConfigFile::default();

        if let Some(section) = ini.section(Some("Paths")) {
            let paths = &mut config.paths;
            for (key, target) in [
                ("build", &mut paths.build),
                ("output", &mut paths.output),
                ("tilesets", &mut paths.tilesets),
                ("biome_tiles", &mut paths.biome_tiles),
            ] {
                if let Some(value) = section.get(key) {
                    *target = PathBuf::from(value.trim());
                }
            }
        }

        if let Some(section) = ini.section(Some("Performance")) {
            let workers: usize = parse_or(section, "Performance", "processes", default_workers())?;
            config.render.workers = workers.max(1);
        }

        if let Some(section) = ini.section(Some("Map")) {
            let render = &mut config.render;
            render.min_zoom = parse_or(section, "Map", "min_zoom", render.min_zoom)?;
            render.max_zoom = parse_or(section, "Map", "max_zoom", render.max_zoom)?;
            render.max_cluster_radius = parse_or(
                section,
                "Map",
                "max_cluster_radius",
                render.max_cluster_radius,
            )?;
        }

        if config.render.min_zoom > config.render.max_zoom {
            return Err(ConfigError::InvalidZoomRange {
                min: config.render.min_zoom,
                max: config.render.max_zoom,
            });
        }

        if let Some(section) = ini.section(Some("Grouping")) {
            let grouping = &mut config.grouping;
            if let Some(list) = section.get("blacklist") {
                grouping.blacklist = Blacklist::from_list(list);
            }
            grouping.search_radius =
                parse_or(section, "Grouping", "search_radius", grouping.search_radius)?;
        }

        Ok(config)
    }
}

fn parse_or<T: FromStr>(
    section: &Properties,
    section_name: &str,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match section.get(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            section: section_name.to_string(),
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}
