//! JSON artifact helpers.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::{WorldError, WorldResult};

/// Read and deserialize a JSON artifact.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> WorldResult<T> {
    let contents = fs::read_to_string(path).map_err(|source| WorldError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|source| WorldError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize a value and write it as a JSON artifact, creating parent
/// directories as needed.
pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> WorldResult<()> {
    let write_err = |source| WorldError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
    }

    let contents = serde_json::to_string(value).map_err(|source| WorldError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, contents).map_err(write_err)?;

    debug!(path = %path.display(), "Wrote JSON artifact");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_save_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("data.json");

        let mut value = BTreeMap::new();
        value.insert("answer".to_string(), 42u32);
        save_json(&path, &value).unwrap();

        let loaded: BTreeMap<String, u32> = load_json(&path).unwrap();
        assert_eq!(loaded, value);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result: WorldResult<Vec<u32>> = load_json(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(WorldError::Read { .. })));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();

        let result: WorldResult<Vec<u32>> = load_json(&path);
        assert!(matches!(result, Err(WorldError::Malformed { .. })));
    }
}
