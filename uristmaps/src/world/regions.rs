//! Region definitions from the legends export.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{load_json, WorldResult};

/// Number of world grid cells along one side of a region unit.
///
/// Region and site coordinates from the legends are expressed in these
/// coarse units; the biome grid is 16 times finer.
pub const REGION_UNIT: u32 = 16;

/// A named region covering a set of region units.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub region_type: String,
    /// Number of region units covered.
    #[serde(default)]
    pub size: u32,
    /// Covered region units as `[x, y]` pairs.
    pub coords: Vec<(u32, u32)>,
}

/// All regions with a lookup by region-unit coordinate.
#[derive(Clone, Debug, Default)]
pub struct RegionIndex {
    regions: BTreeMap<u32, Region>,
    by_unit: HashMap<(u32, u32), u32>,
}

impl RegionIndex {
    /// Build the index from region definitions.
    ///
    /// When two regions claim the same unit, the one with the higher id wins.
    pub fn new(regions: impl IntoIterator<Item = Region>) -> Self {
        let regions: BTreeMap<u32, Region> = regions.into_iter().map(|r| (r.id, r)).collect();
        let by_unit = regions
            .values()
            .flat_map(|region| region.coords.iter().map(move |&unit| (unit, region.id)))
            .collect();
        Self { regions, by_unit }
    }

    /// Load `regions.json` (`{id: region}`).
    pub fn load(path: &Path) -> WorldResult<Self> {
        let raw: BTreeMap<String, Region> = load_json(path)?;
        let index = Self::new(raw.into_values());
        debug!(path = %path.display(), regions = index.len(), "Loaded regions");
        Ok(index)
    }

    /// Region id covering the given world grid cell.
    pub fn region_at_cell(&self, x: u32, y: u32) -> Option<u32> {
        self.region_at_unit(x / REGION_UNIT, y / REGION_UNIT)
    }

    /// Region id covering the given region unit.
    pub fn region_at_unit(&self, ux: u32, uy: u32) -> Option<u32> {
        self.by_unit.get(&(ux, uy)).copied()
    }

    /// Region by id.
    pub fn get(&self, id: u32) -> Option<&Region> {
        self.regions.get(&id)
    }

    /// All regions ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    /// Number of regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// True when there are no regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
