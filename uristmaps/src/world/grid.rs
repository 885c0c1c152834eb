//! Dense biome grid.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{load_json, CategoryGrid, WorldError, WorldResult};

/// Square grid with one category label per cell.
///
/// Stored row-major as `map[y][x]`, matching `biomes.json`. Empty strings
/// mark cells without a category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldGrid {
    #[serde(rename = "worldsize")]
    world_size: u32,
    map: Vec<Vec<String>>,
}

impl WorldGrid {
    /// Create a grid from rows, checking that it is square.
    ///
    /// Returns `None` when the rows do not form a `world_size × world_size`
    /// grid.
    pub fn new(world_size: u32, map: Vec<Vec<String>>) -> Option<Self> {
        let grid = Self { world_size, map };
        grid.check_dimensions().is_none().then_some(grid)
    }

    /// Create a grid by evaluating `f(x, y)` for every cell.
    pub fn from_fn<F, S>(world_size: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> S,
        S: Into<String>,
    {
        let map = (0..world_size)
            .map(|y| (0..world_size).map(|x| f(x, y).into()).collect())
            .collect();
        Self { world_size, map }
    }

    /// Create a grid where every cell has the same category.
    pub fn filled(world_size: u32, category: &str) -> Self {
        Self::from_fn(world_size, |_, _| category)
    }

    /// Load and validate `biomes.json`.
    pub fn load(path: &Path) -> WorldResult<Self> {
        let grid: WorldGrid = load_json(path)?;

        if grid.world_size == 0 {
            return Err(WorldError::EmptyWorld {
                path: path.to_path_buf(),
            });
        }
        if let Some(short_row) = grid.check_dimensions() {
            return Err(WorldError::Dimensions {
                path: path.to_path_buf(),
                expected: grid.world_size,
                rows: grid.map.len(),
                short_row: (short_row < grid.map.len()).then_some(short_row),
            });
        }

        debug!(path = %path.display(), world_size = grid.world_size, "Loaded world grid");
        Ok(grid)
    }

    /// Read only the declared world size of `biomes.json`.
    pub fn read_world_size(path: &Path) -> WorldResult<u32> {
        #[derive(Deserialize)]
        struct Header {
            worldsize: u32,
        }

        let header: Header = load_json(path)?;
        if header.worldsize == 0 {
            return Err(WorldError::EmptyWorld {
                path: path.to_path_buf(),
            });
        }
        Ok(header.worldsize)
    }

    /// Index of the first row with the wrong length, or the row count when
    /// the number of rows is wrong. `None` if the grid is square.
    fn check_dimensions(&self) -> Option<usize> {
        let size = self.world_size as usize;
        if self.map.len() != size {
            return Some(self.map.len());
        }
        self.map.iter().position(|row| row.len() != size)
    }
}

impl CategoryGrid for WorldGrid {
    fn world_size(&self) -> u32 {
        self.world_size
    }

    fn category(&self, x: u32, y: u32) -> Option<&str> {
        self.map
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .map(String::as_str)
            .filter(|category| !category.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_indexing() {
        let grid = WorldGrid::from_fn(3, |x, y| format!("{}-{}", x, y));
        assert_eq!(grid.category(2, 0), Some("2-0"));
        assert_eq!(grid.category(0, 2), Some("0-2"));
    }

    #[test]
    fn test_out_of_range_and_empty() {
        let grid = WorldGrid::from_fn(2, |x, _| if x == 0 { "" } else { "forest" });
        assert_eq!(grid.category(0, 0), None);
        assert_eq!(grid.category(1, 1), Some("forest"));
        assert_eq!(grid.category(2, 0), None);
        assert_eq!(grid.category(0, 5), None);
    }

    #[test]
    fn test_new_rejects_ragged_rows() {
        let rows = vec![vec!["a".to_string(), "b".to_string()], vec!["c".to_string()]];
        assert!(WorldGrid::new(2, rows).is_none());
    }

    #[test]
    fn test_load_validates_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("biomes.json");
        std::fs::write(&path, r#"{"worldsize": 2, "map": [["a", "b"]]}"#).unwrap();

        let err = WorldGrid::load(&path).unwrap_err();
        assert!(matches!(err, WorldError::Dimensions { expected: 2, rows: 1, .. }));
    }

    #[test]
    fn test_load_valid_grid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("biomes.json");
        std::fs::write(
            &path,
            r#"{"worldsize": 2, "map": [["glacier", "tundra"], ["taiga_forest", "glacier"]]}"#,
        )
        .unwrap();

        let grid = WorldGrid::load(&path).unwrap();
        assert_eq!(grid.world_size(), 2);
        assert_eq!(grid.category(1, 0), Some("tundra"));
        assert_eq!(grid.category(0, 1), Some("taiga_forest"));
    }

    #[test]
    fn test_load_rejects_empty_world() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("biomes.json");
        std::fs::write(&path, r#"{"worldsize": 0, "map": []}"#).unwrap();

        assert!(matches!(
            WorldGrid::load(&path),
            Err(WorldError::EmptyWorld { .. })
        ));
    }
}
