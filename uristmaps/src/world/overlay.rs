//! Sparse structure overlay grid.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{load_json, CategoryGrid, WorldError, WorldResult};

/// Structure categories on top of the biome grid.
///
/// Only occupied cells are stored, keyed `x -> y -> category`. Categories may
/// carry an adjacency suffix (`village_nesw`, `stone_wall_ns`) that selects
/// the edge or corner sprite variant; [`base_category`] strips it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StructureOverlay {
    #[serde(rename = "worldsize")]
    world_size: u32,
    map: BTreeMap<u32, BTreeMap<u32, String>>,
}

#[derive(Deserialize)]
struct RawOverlay {
    worldsize: u32,
    map: RawMap,
}

/// `structs.json` comes either sparse (`{x: {y: name}}`) or dense
/// (`[[name, ...], ...]`, row-major with empty strings for free cells).
#[derive(Deserialize)]
#[serde(untagged)]
enum RawMap {
    Sparse(BTreeMap<String, BTreeMap<String, String>>),
    Dense(Vec<Vec<String>>),
}

impl StructureOverlay {
    /// Create an empty overlay.
    pub fn new(world_size: u32) -> Self {
        Self {
            world_size,
            map: BTreeMap::new(),
        }
    }

    /// Place a structure at `(x, y)`, replacing any previous one.
    pub fn insert(&mut self, x: u32, y: u32, category: impl Into<String>) {
        self.map.entry(x).or_default().insert(y, category.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, x: u32, y: u32, category: impl Into<String>) -> Self {
        self.insert(x, y, category);
        self
    }

    /// Structure name at `(x, y)` including its adjacency suffix.
    pub fn get(&self, x: u32, y: u32) -> Option<&str> {
        self.map
            .get(&x)
            .and_then(|column| column.get(&y))
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.map.values().map(BTreeMap::len).sum()
    }

    /// True when no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load `structs.json` in either its sparse or dense layout.
    pub fn load(path: &Path) -> WorldResult<Self> {
        let raw: RawOverlay = load_json(path)?;
        let malformed = |msg: String| WorldError::Malformed {
            path: path.to_path_buf(),
            source: serde::de::Error::custom(msg),
        };

        let mut overlay = StructureOverlay::new(raw.worldsize);
        match raw.map {
            RawMap::Sparse(columns) => {
                for (x, column) in columns {
                    let x: u32 = x
                        .parse()
                        .map_err(|_| malformed(format!("invalid x key '{}'", x)))?;
                    for (y, name) in column {
                        let y: u32 = y
                            .parse()
                            .map_err(|_| malformed(format!("invalid y key '{}'", y)))?;
                        if !name.is_empty() {
                            overlay.insert(x, y, name);
                        }
                    }
                }
            }
            RawMap::Dense(rows) => {
                for (y, row) in rows.into_iter().enumerate() {
                    for (x, name) in row.into_iter().enumerate() {
                        if !name.is_empty() {
                            overlay.insert(x as u32, y as u32, name);
                        }
                    }
                }
            }
        }

        debug!(
            path = %path.display(),
            world_size = overlay.world_size,
            structures = overlay.len(),
            "Loaded structure overlay"
        );
        Ok(overlay)
    }
}

impl CategoryGrid for StructureOverlay {
    fn world_size(&self) -> u32 {
        self.world_size
    }

    fn category(&self, x: u32, y: u32) -> Option<&str> {
        if x >= self.world_size || y >= self.world_size {
            return None;
        }
        self.get(x, y)
    }
}

/// Strip the adjacency suffix from a structure name.
///
/// The suffix is the last `_`-separated segment when it only consists of
/// compass letters: `village_nesw` → `village`, `stone_wall_ns` →
/// `stone_wall`, while `stone_wall` stays unchanged.
pub fn base_category(name: &str) -> &str {
    match name.rsplit_once('_') {
        Some((base, suffix))
            if !base.is_empty()
                && !suffix.is_empty()
                && suffix.chars().all(|c| matches!(c, 'n' | 'e' | 's' | 'w')) =>
        {
            base
        }
        _ => name,
    }
}
