//! Render errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::atlas::AtlasError;
use crate::world::WorldError;

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while rendering tile levels.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The level would need sprites larger than a tile.
    #[error("level {level} needs {graphic_size}px sprites, the maximum is 256px (zoom offset {zoom_offset})")]
    LevelTooDeep {
        level: u32,
        zoom_offset: u32,
        graphic_size: u64,
    },

    /// The world has no cells.
    #[error("cannot render an empty world")]
    EmptyWorld,

    /// A world artifact could not be loaded.
    #[error(transparent)]
    World(#[from] WorldError),

    /// The sprite atlas for the level could not be loaded.
    #[error(transparent)]
    Atlas(#[from] AtlasError),

    /// The worker pool could not be started.
    #[error("failed to build render pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    /// The tile directory could not be created.
    #[error("failed to create {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The tile could not be encoded or written.
    #[error("failed to write tile {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
