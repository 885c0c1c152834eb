//! Group command - cluster structures and snap sites onto them.

use uristmaps::config::ConfigFile;
use uristmaps::grouping::{run_grouping, run_site_placement, SiteTypeTable};

use crate::error::CliError;

/// Run the group command.
///
/// Writes `groups.json` and `centers.json`. With `place_sites`, the sites
/// in `sites.json` are snapped onto the new groups afterwards.
pub fn run(config: &ConfigFile, place_sites: bool) -> Result<(), CliError> {
    let summary = run_grouping(&config.paths, &config.grouping)?;
    println!(
        "Grouped {} structure cells into {} groups (world {}x{})",
        summary.cells, summary.groups, summary.world_size, summary.world_size
    );
    println!("  Groups:  {}", config.paths.groups_json().display());
    println!("  Centers: {}", config.paths.centers_json().display());

    if place_sites {
        run_sites(config)?;
    }
    Ok(())
}

/// Snap sites onto existing groups.
pub fn run_sites(config: &ConfigFile) -> Result<(), CliError> {
    let report = run_site_placement(&config.paths, &config.grouping, &SiteTypeTable::default())?;
    println!(
        "Placed sites: {} snapped, {} not found within {} cells, {} without a structure type",
        report.matched, report.unmatched, config.grouping.search_radius, report.skipped
    );
    Ok(())
}
