//! Render command - render the tile pyramid of a layer.

use uristmaps::config::{ConfigFile, RenderConfig};
use uristmaps::render::{render_configured, Layer, LevelReport};

use crate::error::CliError;
use crate::progress::LevelProgress;

/// Failed tiles listed per level before the list is cut short.
const MAX_LISTED_FAILURES: usize = 10;

/// Arguments for the render command.
pub struct RenderArgs {
    pub layer: Layer,
    pub render: RenderConfig,
    pub quiet: bool,
}

/// Run the render command.
///
/// Setup errors fail the command. Individual tile failures are listed but
/// do not, so a rerun only has to fix the affected tiles.
pub fn run(config: &ConfigFile, args: RenderArgs) -> Result<(), CliError> {
    let output_root = args.layer.output_root(&config.paths);
    println!(
        "Rendering {} layer, zoom {}-{} with {} workers",
        args.layer, args.render.min_zoom, args.render.max_zoom, args.render.workers
    );
    println!("  Output: {}", output_root.display());

    let progress = if args.quiet {
        LevelProgress::hidden()
    } else {
        LevelProgress::new()
    };
    let reports = render_configured(args.layer, &config.paths, &args.render, &progress)?;

    println!();
    for report in &reports {
        print_report(report);
    }

    let failed: usize = reports.iter().map(|r| r.failures.len()).sum();
    if failed > 0 {
        println!();
        println!("{} tiles failed; rerun the affected levels to retry them.", failed);
    }
    Ok(())
}

fn print_report(report: &LevelReport) {
    println!(
        "  zoom {:>2}: {}/{} tiles in {:.1}s",
        report.level,
        report.written,
        report.tiles,
        report.elapsed.as_secs_f64()
    );
    for failure in report.failures.iter().take(MAX_LISTED_FAILURES) {
        println!(
            "    failed {}/{}/{}: {}",
            report.level, failure.tile_x, failure.tile_y, failure.error
        );
    }
    if report.failures.len() > MAX_LISTED_FAILURES {
        println!(
            "    ... and {} more",
            report.failures.len() - MAX_LISTED_FAILURES
        );
    }
}
