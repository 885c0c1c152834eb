//! Sprite atlas errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::world::WorldError;

/// Errors that can occur while packing or loading sprite atlases.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// The sprite size is not a power of two between 1 and 256.
    #[error("unsupported sprite size {0} (expected a power of two from 1 to 256)")]
    UnsupportedSize(u32),

    /// The sprite directory contains no images.
    #[error("no sprites found in {}", .0.display())]
    NoSprites(PathBuf),

    /// The directory listing pattern could not be built.
    #[error("invalid sprite pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// A directory entry could not be read.
    #[error("failed to list sprites: {0}")]
    Listing(#[from] glob::GlobError),

    /// An image could not be decoded or encoded.
    #[error("image error for {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A directory could not be listed or created.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The offset index could not be read or written.
    #[error(transparent)]
    Index(#[from] WorldError),

    /// An index entry points outside the packed image.
    #[error("sprite '{name}' at ({x}, {y}) lies outside the {width}x{height} atlas {}", path.display())]
    OutOfBounds {
        path: PathBuf,
        name: String,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}
