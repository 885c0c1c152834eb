//! Parallel dispatch of a level's tiles.
//!
//! Every tile of a level is an independent task writing its own file. Tasks
//! run on a dedicated rayon pool that lives for one level:
//!
//! ```text
//!   tiles = 4^level
//!   chunk = min(tiles, 2048)
//!   pool  = min(workers, chunk) threads
//!   tasks are split in runs of at least chunk / pool tiles
//! ```
//!
//! A failing or panicking tile is logged and reported; it never stops the
//! other tiles.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, error, info};

use super::painter::CellPainter;
use super::params::LevelParams;
use super::tile::{render_tile, tile_path, write_tile};
use super::RenderResult;

/// Upper bound of the task chunk used to size the pool.
pub const MAX_CHUNK: u64 = 2048;

/// Receives progress while a level renders.
///
/// Called from render threads.
pub trait ProgressSink: Sync {
    /// A level with `tiles` tiles is about to start.
    fn level_started(&self, _level: u32, _tiles: u64) {}

    /// One tile finished, successfully or not.
    fn tile_finished(&self, level: u32);

    /// All tiles of the level are done.
    fn level_finished(&self, _report: &LevelReport) {}
}

/// Progress sink that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn tile_finished(&self, _level: u32) {}
}

/// A tile that could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileFailure {
    pub tile_x: u32,
    pub tile_y: u32,
    pub error: String,
}

/// Result of one tile task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileOutcome {
    Written(PathBuf),
    Failed(TileFailure),
}

/// Summary of a rendered level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelReport {
    pub level: u32,
    /// Tiles in the level.
    pub tiles: u64,
    /// Tiles written successfully.
    pub written: u64,
    /// Tiles that failed, in no particular order.
    pub failures: Vec<TileFailure>,
    pub elapsed: Duration,
}

impl LevelReport {
    /// True when every tile was written.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Pool and chunk sizes for a level of `tiles` tiles.
///
/// Returns `(threads, min_run)`.
pub fn pool_layout(tiles: u64, workers: usize) -> (usize, usize) {
    let chunk = tiles.clamp(1, MAX_CHUNK) as usize;
    let threads = workers.clamp(1, chunk);
    (threads, (chunk / threads).max(1))
}

/// Everything needed to render one level of one layer.
pub struct LevelJob<'a> {
    pub params: LevelParams,
    pub painter: &'a dyn CellPainter,
    /// Layer output root; tiles go to `{root}/{level}/{x}/{y}.png`.
    pub output_root: &'a Path,
    pub workers: usize,
}

/// Render and write a single tile, turning errors and panics into a
/// [`TileFailure`].
pub fn render_and_write(job: &LevelJob<'_>, tile_x: u32, tile_y: u32) -> TileOutcome {
    let path = tile_path(job.output_root, job.params.level, tile_x, tile_y);
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let tile = render_tile(&job.params, job.painter, tile_x, tile_y);
        write_tile(&tile, &path)
    }));

    let error = match result {
        Ok(Ok(())) => return TileOutcome::Written(path),
        Ok(Err(e)) => e.to_string(),
        Err(payload) => format!("panic: {}", panic_message(payload.as_ref())),
    };

    error!(
        level = job.params.level,
        tile_x,
        tile_y,
        error = %error,
        "Tile render failed"
    );
    TileOutcome::Failed(TileFailure {
        tile_x,
        tile_y,
        error,
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic payload"
    }
}

/// Render every tile of the level on a dedicated pool.
///
/// Only pool creation can fail; tile failures end up in the report.
pub fn render_level(job: &LevelJob<'_>, progress: &dyn ProgressSink) -> RenderResult<LevelReport> {
    let params = &job.params;
    let tiles = params.tile_count();
    let (threads, min_run) = pool_layout(tiles, job.workers);
    let side = params.tile_amount as usize;

    info!(
        level = params.level,
        tiles,
        graphic_size = params.graphic_size,
        step_size = params.step_size,
        threads,
        "Rendering level"
    );
    debug!(
        level = params.level,
        zoom_offset = params.zoom_offset,
        clear_tiles = params.clear_tiles,
        min_run,
        output = %job.output_root.display(),
        "Level layout"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("render-{}", i))
        .build()?;

    progress.level_started(params.level, tiles);
    let started = Instant::now();

    let failures: Vec<TileFailure> = pool.install(|| {
        (0..side * side)
            .into_par_iter()
            .with_min_len(min_run)
            .filter_map(|i| {
                let (tile_x, tile_y) = ((i / side) as u32, (i % side) as u32);
                let outcome = render_and_write(job, tile_x, tile_y);
                progress.tile_finished(params.level);
                match outcome {
                    TileOutcome::Written(_) => None,
                    TileOutcome::Failed(failure) => Some(failure),
                }
            })
            .collect()
    });

    let report = LevelReport {
        level: params.level,
        tiles,
        written: tiles - failures.len() as u64,
        failures,
        elapsed: started.elapsed(),
    };
    progress.level_finished(&report);

    info!(
        level = report.level,
        written = report.written,
        failed = report.failures.len(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        "Level rendered"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::SpriteAtlas;
    use crate::render::params::CellPlacement;
    use crate::render::BiomePainter;
    use crate::world::WorldGrid;
    use image::{Rgba, RgbaImage};
    use std::sync::atomic::{AtomicU64, Ordering};
    use tempfile::TempDir;

    struct Counter(AtomicU64);

    impl ProgressSink for Counter {
        fn tile_finished(&self, _level: u32) {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Panics on the tile holding world cell (0, 0).
    struct Exploding;

    impl CellPainter for Exploding {
        fn paint(&self, _tile: &mut RgbaImage, cell: CellPlacement, _size: u32) {
            if cell.world_x == 0 && cell.world_y == 0 {
                panic!("sprite decoder exploded");
            }
        }
    }

    fn forest() -> (WorldGrid, SpriteAtlas) {
        let grid = WorldGrid::filled(4, "forest");
        let atlas = SpriteAtlas::from_sprites(
            2,
            [("arctic_ocean".to_string(), RgbaImage::from_pixel(2, 2, Rgba([0, 0, 64, 255])))],
        );
        (grid, atlas)
    }

    #[test]
    fn test_pool_layout() {
        assert_eq!(pool_layout(1, 8), (1, 1));
        assert_eq!(pool_layout(4, 8), (4, 1));
        assert_eq!(pool_layout(16, 4), (4, 4));
        assert_eq!(pool_layout(65536, 8), (8, 256));
        assert_eq!(pool_layout(65536, 0), (1, 2048));
    }

    #[test]
    fn test_render_level_writes_every_tile() {
        let temp = TempDir::new().unwrap();
        let (grid, atlas) = forest();
        let painter = BiomePainter::new(&grid, &atlas);
        let job = LevelJob {
            params: LevelParams::new(4, 1).unwrap(),
            painter: &painter,
            output_root: temp.path(),
            workers: 3,
        };
        let counter = Counter(AtomicU64::new(0));

        let report = render_level(&job, &counter).unwrap();
        assert_eq!(report.tiles, 4);
        assert_eq!(report.written, 4);
        assert!(report.is_complete());
        assert_eq!(counter.0.load(Ordering::Relaxed), 4);

        for x in 0..2 {
            for y in 0..2 {
                assert!(tile_path(temp.path(), 1, x, y).exists());
            }
        }
    }

    #[test]
    fn test_rerender_is_byte_identical() {
        let temp = TempDir::new().unwrap();
        let (grid, atlas) = forest();
        let painter = BiomePainter::new(&grid, &atlas);
        let job = LevelJob {
            params: LevelParams::new(4, 1).unwrap(),
            painter: &painter,
            output_root: temp.path(),
            workers: 2,
        };

        render_level(&job, &NoProgress).unwrap();
        let first = std::fs::read(tile_path(temp.path(), 1, 0, 0)).unwrap();
        render_level(&job, &NoProgress).unwrap();
        let second = std::fs::read(tile_path(temp.path(), 1, 0, 0)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_panicking_tile_does_not_stop_level() {
        let temp = TempDir::new().unwrap();
        let job = LevelJob {
            params: LevelParams::new(4, 1).unwrap(),
            painter: &Exploding,
            output_root: temp.path(),
            workers: 2,
        };

        let report = render_level(&job, &NoProgress).unwrap();
        assert_eq!(report.written, 3);
        assert_eq!(report.failures.len(), 1);

        let failure = &report.failures[0];
        assert_eq!((failure.tile_x, failure.tile_y), (0, 0));
        assert!(failure.error.contains("sprite decoder exploded"));
        assert!(!tile_path(temp.path(), 1, 0, 0).exists());
        assert!(tile_path(temp.path(), 1, 1, 1).exists());
    }
}
