//! CLI error type.

use std::fmt;

use uristmaps::atlas::AtlasError;
use uristmaps::config::ConfigError;
use uristmaps::grouping::GroupingError;
use uristmaps::logging::LoggingError;
use uristmaps::render::RenderError;
use uristmaps::world::WorldError;

/// Errors reported by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Configuration file or command line settings are invalid.
    Config(String),

    /// Failed to read or write a world artifact.
    World(WorldError),

    /// Structure grouping or site placement failed.
    Grouping(GroupingError),

    /// Packing or loading a sprite atlas failed.
    Atlas(AtlasError),

    /// Rendering could not start or was aborted.
    Render(RenderError),

    /// The logger could not be installed.
    Logging(LoggingError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::World(e) => write!(f, "World data error: {}", e),
            CliError::Grouping(e) => write!(f, "Grouping failed: {}", e),
            CliError::Atlas(e) => write!(f, "Tileset error: {}", e),
            CliError::Render(e) => write!(f, "Render failed: {}", e),
            CliError::Logging(e) => write!(f, "Logging setup failed: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(_) => None,
            CliError::World(e) => Some(e),
            CliError::Grouping(e) => Some(e),
            CliError::Atlas(e) => Some(e),
            CliError::Render(e) => Some(e),
            CliError::Logging(e) => Some(e),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<WorldError> for CliError {
    fn from(e: WorldError) -> Self {
        CliError::World(e)
    }
}

impl From<GroupingError> for CliError {
    fn from(e: GroupingError) -> Self {
        CliError::Grouping(e)
    }
}

impl From<AtlasError> for CliError {
    fn from(e: AtlasError) -> Self {
        CliError::Atlas(e)
    }
}

impl From<RenderError> for CliError {
    fn from(e: RenderError) -> Self {
        CliError::Render(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_config_error_display() {
        let err = CliError::Config("max_zoom must be at least min_zoom".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("max_zoom"));
        assert!(err.source().is_none());
    }

    #[test]
    fn test_from_config_error() {
        let err: CliError = ConfigError::InvalidZoomRange { min: 4, max: 2 }.into();
        assert!(matches!(err, CliError::Config(ref msg) if msg.contains("min_zoom 4")));
    }

    #[test]
    fn test_from_render_error_keeps_source() {
        let err: CliError = RenderError::EmptyWorld.into();
        assert!(matches!(err, CliError::Render(_)));
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("Render failed"));
    }
}
