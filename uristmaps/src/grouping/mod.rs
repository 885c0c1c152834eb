//! Region grouper.
//!
//! Clusters contiguous structure cells of the same category into groups,
//! derives a representative center for each group and snaps site markers
//! onto matching groups nearby.
//!
//! ```text
//! structs.json ──► make_groups ──► groups.json
//!                      │
//!                      └──► group_centers ──► centers.json
//!                                  │
//! sites.json ─────────────────► place_sites ──► sites.json (rewritten)
//! ```
//!
//! The grid-level functions are pure; [`run_grouping`] and
//! [`run_site_placement`] wrap them with the artifact files.

mod centers;
mod cluster;
mod sites;
mod types;

pub use centers::{group_bounds, group_centers};
pub use cluster::make_groups;
pub use sites::{place_sites, PlacementReport, Site, SiteTypeTable, DEFAULT_SEARCH_RADIUS};
pub use types::{Blacklist, Bounds, GroupCenters, GroupDefs, GroupId, GroupMap, Groups, DEFAULT_BLACKLIST};

use thiserror::Error;
use tracing::info;

use crate::config::{GroupingConfig, PathsConfig};
use crate::world::{load_json, save_json, CategoryGrid, StructureOverlay, WorldError};

/// Errors from the file-level grouping steps.
#[derive(Debug, Error)]
pub enum GroupingError {
    /// An input artifact could not be loaded or an output written.
    #[error(transparent)]
    World(#[from] WorldError),
}

/// Summary of a grouping run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupingSummary {
    /// Side length of the grouped world.
    pub world_size: u32,
    /// Number of structure groups found.
    pub groups: usize,
    /// Number of cells assigned to a group.
    pub cells: usize,
}

/// Group the structure overlay and write `groups.json` and `centers.json`.
pub fn run_grouping(
    paths: &PathsConfig,
    config: &GroupingConfig,
) -> Result<GroupingSummary, GroupingError> {
    let overlay = StructureOverlay::load(&paths.structs_json())?;
    let groups = make_groups(&overlay, &config.blacklist);
    let centers = group_centers(&groups);

    save_json(&paths.groups_json(), &groups)?;
    save_json(&paths.centers_json(), &centers)?;

    let summary = GroupingSummary {
        world_size: overlay.world_size(),
        groups: groups.defs.len(),
        cells: groups.groups.len(),
    };
    info!(
        world_size = summary.world_size,
        groups = summary.groups,
        cells = summary.cells,
        "Wrote structure groups"
    );
    Ok(summary)
}

/// Snap the sites in `sites.json` onto the groups and rewrite the file.
///
/// Requires the output of [`run_grouping`].
pub fn run_site_placement(
    paths: &PathsConfig,
    config: &GroupingConfig,
    table: &SiteTypeTable,
) -> Result<PlacementReport, GroupingError> {
    let groups: Groups = load_json(&paths.groups_json())?;
    let centers: GroupCenters = load_json(&paths.centers_json())?;
    let mut sites: Vec<Site> = load_json(&paths.sites_json())?;

    let report = place_sites(&mut sites, &groups, &centers, table, config.search_radius);
    save_json(&paths.sites_json(), &sites)?;

    info!(
        sites = sites.len(),
        matched = report.matched,
        unmatched = report.unmatched,
        skipped = report.skipped,
        "Placed sites"
    );
    Ok(report)
}
