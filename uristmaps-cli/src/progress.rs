//! Terminal progress bar for tile rendering.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use parking_lot::Mutex;
use uristmaps::render::{LevelReport, ProgressSink};

const BAR_TEMPLATE: &str =
    "{prefix:>9} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} tiles ({per_sec}, eta {eta})";

/// Shows one progress bar per rendered level.
pub struct LevelProgress {
    bar: Mutex<Option<ProgressBar>>,
    hidden: bool,
}

impl LevelProgress {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
            hidden: false,
        }
    }

    /// Progress sink that draws nothing, for `--quiet` and non-terminals.
    pub fn hidden() -> Self {
        Self {
            bar: Mutex::new(None),
            hidden: true,
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ")
    }
}

impl Default for LevelProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for LevelProgress {
    fn level_started(&self, level: u32, tiles: u64) {
        let bar = ProgressBar::new(tiles);
        if self.hidden {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        bar.set_style(Self::style());
        bar.set_prefix(format!("zoom {}", level));
        *self.bar.lock() = Some(bar);
    }

    fn tile_finished(&self, _level: u32) {
        if let Some(bar) = self.bar.lock().as_ref() {
            bar.inc(1);
        }
    }

    fn level_finished(&self, report: &LevelReport) {
        if let Some(bar) = self.bar.lock().take() {
            if report.is_complete() {
                bar.finish();
            } else {
                bar.abandon_with_message(format!("{} tiles failed", report.failures.len()));
            }
        }
    }
}
