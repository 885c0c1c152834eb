//! Markers command - export sites and regions as GeoJSON.

use uristmaps::config::ConfigFile;
use uristmaps::markers::{write_regions_geojson, write_sites_geojson};

use crate::error::CliError;

/// Run the markers command.
pub fn run(config: &ConfigFile) -> Result<(), CliError> {
    let paths = &config.paths;

    let sites = write_sites_geojson(paths)?;
    println!("Wrote {} site markers to {}", sites, paths.sites_geojson().display());

    let regions = write_regions_geojson(paths)?;
    println!(
        "Wrote {} region labels to {}",
        regions,
        paths.regions_geojson().display()
    );
    Ok(())
}
