//! Uristmaps CLI - Command-line interface
//!
//! Runs the map pipeline steps of the uristmaps library against the paths
//! of a `config.cfg` file.

mod commands;
mod error;
mod progress;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use uristmaps::config::DEFAULT_CONFIG_FILE;
use uristmaps::logging::{init_logging, LogConfig};

use commands::common::{load_config, resolve_render_config, LayerArg};
use error::CliError;

#[derive(Parser)]
#[command(name = "uristmaps")]
#[command(version = uristmaps::VERSION)]
#[command(about = "Render Dwarf Fortress world exports into a web slippy map", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log debug output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Also write log output to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Group contiguous structures and write groups.json and centers.json
    Group {
        /// Snap sites onto the groups afterwards
        #[arg(long)]
        place_sites: bool,
    },

    /// Snap sites in sites.json onto existing structure groups
    PlaceSites,

    /// Pack sprite directories into tileset atlases
    Tileset {
        /// Sprite size to pack (packs every size directory when omitted)
        #[arg(long)]
        size: Option<u32>,
    },

    /// Render the tile pyramid of a layer
    Render {
        /// Layer to render
        #[arg(long, value_enum, default_value = "biomes")]
        layer: LayerArg,

        /// Render only this zoom level
        #[arg(long, conflicts_with_all = ["min_zoom", "max_zoom"])]
        level: Option<u32>,

        /// Lowest zoom level (overrides config)
        #[arg(long)]
        min_zoom: Option<u32>,

        /// Highest zoom level (overrides config)
        #[arg(long)]
        max_zoom: Option<u32>,

        /// Worker threads (overrides config)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Hide the progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Export sites and regions as GeoJSON markers
    Markers,

    /// Show the effective configuration and zoom layout
    Info,
}

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig::default()
        .with_verbose(cli.verbose > 0)
        .with_file(cli.log_file.clone());
    let _guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {}", CliError::from(e));
            process::exit(1);
        }
    };

    if let Err(e) = run(cli) {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Group { place_sites } => commands::group::run(&config, place_sites),
        Commands::PlaceSites => commands::group::run_sites(&config),
        Commands::Tileset { size } => commands::tileset::run(&config, size),
        Commands::Render {
            layer,
            level,
            min_zoom,
            max_zoom,
            workers,
            quiet,
        } => {
            let render = resolve_render_config(&config.render, level, min_zoom, max_zoom, workers)?;
            commands::render::run(
                &config,
                commands::render::RenderArgs {
                    layer: layer.into(),
                    render,
                    quiet,
                },
            )
        }
        Commands::Markers => commands::markers::run(&config),
        Commands::Info => commands::info::run(&config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_render_arguments() {
        let cli = Cli::try_parse_from([
            "uristmaps", "-vv", "--config", "world.cfg", "render", "--layer", "regions", "--level", "3",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, PathBuf::from("world.cfg"));
        match cli.command {
            Commands::Render { layer, level, .. } => {
                assert_eq!(layer, LayerArg::Regions);
                assert_eq!(level, Some(3));
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn test_level_conflicts_with_range() {
        let result = Cli::try_parse_from(["uristmaps", "render", "--level", "2", "--max-zoom", "4"]);
        assert!(result.is_err());
    }
}
