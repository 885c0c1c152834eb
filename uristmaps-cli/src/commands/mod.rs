//! CLI command implementations.

pub mod common;
pub mod group;
pub mod info;
pub mod markers;
pub mod render;
pub mod tileset;
