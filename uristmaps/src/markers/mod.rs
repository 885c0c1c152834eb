//! GeoJSON marker layers.
//!
//! The web map shows sites and region names as point markers. Both are
//! written as GeoJSON `FeatureCollection`s with `[lon, lat]` coordinates
//! from the same projection the tiles use, so markers stay on their cells
//! at every zoom level.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::info;

use crate::config::PathsConfig;
use crate::coord::MapProjection;
use crate::grouping::Site;
use crate::world::{load_json, save_json, Region, RegionIndex, WorldGrid, WorldResult};

/// GeoJSON point geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[lon, lat]`
    pub coordinates: [f64; 2],
}

impl Point {
    pub fn new((lon, lat): (f64, f64)) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: [lon, lat],
        }
    }
}

/// GeoJSON feature with a point geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: Map<String, Value>,
    pub geometry: Point,
}

impl Feature {
    pub fn point(position: (f64, f64), properties: Map<String, Value>) -> Self {
        Self {
            kind: "Feature".to_string(),
            properties,
            geometry: Point::new(position),
        }
    }
}

/// GeoJSON feature collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }
}

/// Icon path of a site type on the web map.
pub fn site_icon(site_type: &str) -> String {
    format!("/assets/icons/{}.png", site_type.replace(' ', "_"))
}

fn properties(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Point features for sites.
///
/// Site coordinates are world cells; markers sit at the cell center.
pub fn site_features(sites: &[Site], projection: &MapProjection) -> FeatureCollection {
    let features = sites
        .iter()
        .map(|site| {
            let (x, y) = site.coords;
            Feature::point(
                projection.cell_center_to_lon_lat(x, y),
                properties(json!({
                    "id": site.id,
                    "name": site.name,
                    "type": site.site_type,
                    "img": site_icon(&site.site_type),
                    "accurate": site.coords_accurate,
                })),
            )
        })
        .collect();
    FeatureCollection::new(features)
}

/// Region unit that carries the region's name label.
///
/// A single-unit region uses that unit. Larger regions use the member
/// unit closest to the mean of all units, so the label lies inside the
/// region even when it is concave.
pub fn label_unit(region: &Region) -> Option<(u32, u32)> {
    let count = region.coords.len() as f64;
    if count == 0.0 {
        return None;
    }
    let mean_x = region.coords.iter().map(|&(x, _)| x as f64).sum::<f64>() / count;
    let mean_y = region.coords.iter().map(|&(_, y)| y as f64).sum::<f64>() / count;

    region.coords.iter().copied().min_by(|&(ax, ay), &(bx, by)| {
        let da = (ax as f64 - mean_x).powi(2) + (ay as f64 - mean_y).powi(2);
        let db = (bx as f64 - mean_x).powi(2) + (by as f64 - mean_y).powi(2);
        da.total_cmp(&db)
    })
}

/// Point features for region name labels. Regions without units are
/// skipped.
pub fn region_features(regions: &RegionIndex, projection: &MapProjection) -> FeatureCollection {
    let features = regions
        .iter()
        .filter_map(|region| {
            let (ux, uy) = label_unit(region)?;
            Some(Feature::point(
                projection.unit_to_lon_lat(ux as i64, uy as i64),
                properties(json!({
                    "id": region.id,
                    "name": region.name,
                    "type": region.region_type,
                    "size": region.size,
                })),
            ))
        })
        .collect();
    FeatureCollection::new(features)
}

/// Write `sitesgeo.json` from `sites.json`. Returns the number of markers.
pub fn write_sites_geojson(paths: &PathsConfig) -> WorldResult<usize> {
    let projection = MapProjection::for_world(WorldGrid::read_world_size(&paths.biomes_json())?);
    let sites: Vec<Site> = load_json(&paths.sites_json())?;
    let collection = site_features(&sites, &projection);

    save_json(&paths.sites_geojson(), &collection)?;
    info!(markers = collection.features.len(), path = %paths.sites_geojson().display(), "Wrote site markers");
    Ok(collection.features.len())
}

/// Write `regionsgeo.json` from `regions.json`. Returns the number of
/// markers.
pub fn write_regions_geojson(paths: &PathsConfig) -> WorldResult<usize> {
    let projection = MapProjection::for_world(WorldGrid::read_world_size(&paths.biomes_json())?);
    let regions = RegionIndex::load(&paths.regions_json())?;
    let collection = region_features(&regions, &projection);

    save_json(&paths.regions_geojson(), &collection)?;
    info!(markers = collection.features.len(), path = %paths.regions_geojson().display(), "Wrote region markers");
    Ok(collection.features.len())
}
