//! Snapping site markers onto structure groups.
//!
//! Site coordinates from the legends only locate a site roughly. When a
//! matching structure group lies close by, the site is moved onto the
//! group's center and flagged as accurate.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::types::{GroupCenters, GroupId, Groups};

/// Number of rings searched around a site by default.
pub const DEFAULT_SEARCH_RADIUS: u32 = 16;

/// A point of interest from the legends export (`sites.json`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub site_type: String,
    /// Position in world cells, `[x, y]`.
    pub coords: (i64, i64),
    /// Set once the position was snapped onto a structure group.
    #[serde(default)]
    pub coords_accurate: bool,
    /// Any further fields, written back untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Site {
    /// Create a site with no extra fields.
    pub fn new(id: u32, name: impl Into<String>, site_type: impl Into<String>, coords: (i64, i64)) -> Self {
        Self {
            id,
            name: name.into(),
            site_type: site_type.into(),
            coords,
            coords_accurate: false,
            extra: serde_json::Map::new(),
        }
    }
}

/// Fixed mapping from site type to the structure category that marks it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteTypeTable(BTreeMap<String, String>);

impl Default for SiteTypeTable {
    fn default() -> Self {
        Self::empty()
            .with_entry("hamlet", "village")
            .with_entry("town", "village")
            .with_entry("forest retreat", "village")
            .with_entry("castle", "castle")
            .with_entry("dark fortress", "castle")
            .with_entry("fortress", "mountain")
            .with_entry("mountain halls", "mountain")
            .with_entry("tower", "tower")
    }
}

impl SiteTypeTable {
    /// Table without entries.
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Add or replace an entry. Site types are matched case-insensitively.
    pub fn with_entry(mut self, site_type: &str, category: &str) -> Self {
        self.0.insert(site_type.to_lowercase(), category.to_string());
        self
    }

    /// Structure category expected for the site type, if any.
    pub fn category_for(&self, site_type: &str) -> Option<&str> {
        self.0.get(&site_type.to_lowercase()).map(String::as_str)
    }
}

/// Outcome counts of a placement run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementReport {
    /// Sites moved onto a group center.
    pub matched: usize,
    /// Sites with a mapped type but no free matching group in range.
    pub unmatched: usize,
    /// Sites whose type has no structure category.
    pub skipped: usize,
    /// `(site id, group)` for every matched site, in site order.
    pub assignments: Vec<(u32, GroupId)>,
}

/// Offsets sampled at ring `r`: the four corners of the square ring.
///
/// Only the corners are sampled, so a group lying straight north, south,
/// east or west of the site at that distance is not seen from this ring.
fn ring_corners(r: i64) -> [(i64, i64); 4] {
    [(-r, -r), (r, -r), (-r, r), (r, r)]
}

/// Move sites onto the center of a nearby group of the expected category.
///
/// Rings `0..radius` around each site's current position are searched in
/// order. The first group found that has the expected category and has not
/// been claimed by an earlier site wins: the site takes its center, is
/// flagged accurate, and the group is claimed. Sites without a match keep
/// their coordinates and flags.
pub fn place_sites(
    sites: &mut [Site],
    groups: &Groups,
    centers: &GroupCenters,
    table: &SiteTypeTable,
    radius: u32,
) -> PlacementReport {
    let mut claimed: HashSet<GroupId> = HashSet::new();
    let mut report = PlacementReport::default();

    for site in sites.iter_mut() {
        let Some(expected) = table.category_for(&site.site_type) else {
            report.skipped += 1;
            continue;
        };

        match find_group(site.coords, expected, groups, &claimed, radius) {
            Some(id) => {
                let Some(&(cx, cy)) = centers.get(&id) else {
                    report.unmatched += 1;
                    continue;
                };
                trace!(
                    site = site.id,
                    group = %id,
                    from = ?site.coords,
                    to = ?(cx, cy),
                    "Snapped site onto group"
                );
                site.coords = (cx as i64, cy as i64);
                site.coords_accurate = true;
                claimed.insert(id);
                report.assignments.push((site.id, id));
                report.matched += 1;
            }
            None => report.unmatched += 1,
        }
    }

    debug!(
        matched = report.matched,
        unmatched = report.unmatched,
        skipped = report.skipped,
        "Placed sites"
    );
    report
}

fn find_group(
    (sx, sy): (i64, i64),
    expected: &str,
    groups: &Groups,
    claimed: &HashSet<GroupId>,
    radius: u32,
) -> Option<GroupId> {
    for r in 0..radius as i64 {
        for (dx, dy) in ring_corners(r) {
            let (x, y) = (sx + dx, sy + dy);
            if x < 0 || y < 0 || x > u32::MAX as i64 || y > u32::MAX as i64 {
                continue;
            }
            let Some(id) = groups.groups.get(x as u32, y as u32) else {
                continue;
            };
            if claimed.contains(&id) {
                continue;
            }
            if groups.defs.get(&id).map(String::as_str) == Some(expected) {
                return Some(id);
            }
        }
    }
    None
}
