use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonFileError {
    #[error("could not read {path}: {source}")]
    Io { path: String, source: io::Error },
    #[error("could not decode {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

/// Replaces the file at `path` with `content`. The data is written to a
/// temporary file next to the target and renamed over it, so a failed write
/// never leaves a half written file behind.
pub fn write_atomically(path: &Path, content: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut file = NamedTempFile::new_in(parent)?;
    file.write_all(content)?;
    file.flush()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub fn save_to_file<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let json = serde_json::to_vec_pretty(data).map_err(io::Error::other)?;
    write_atomically(path, &json)
}

pub fn load_from_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, JsonFileError> {
    let content = fs::read(path).map_err(|source| JsonFileError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_slice(&content).map_err(|source| JsonFileError::Json {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    #[test]
    fn test_save_creates_parent_dirs_and_overwrites() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested/dir/data.json");

        let first: BTreeMap<String, u32> = BTreeMap::from([("a".to_string(), 1)]);
        save_to_file(&path, &first).unwrap();
        let second: BTreeMap<String, u32> = BTreeMap::from([("b".to_string(), 2)]);
        save_to_file(&path, &second).unwrap();

        let loaded: BTreeMap<String, u32> = load_from_json_file(&path).unwrap();
        assert_eq!(loaded, second);
        // Only the target file is left, no temp files.
        assert_eq!(fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn test_load_distinguishes_missing_and_broken_files() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("missing.json");
        let broken = temp_dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        let binary = temp_dir.path().join("binary.pkl");
        fs::write(&binary, [0x80, 0x04, 0x95, 0xff, 0xfe, 0x00]).unwrap();

        assert!(matches!(
            load_from_json_file::<BTreeMap<String, u32>>(&missing),
            Err(JsonFileError::Io { .. })
        ));
        assert!(matches!(
            load_from_json_file::<BTreeMap<String, u32>>(&broken),
            Err(JsonFileError::Json { .. })
        ));
        // Readable but not utf-8 is a decoding problem, not an io one.
        assert!(matches!(
            load_from_json_file::<BTreeMap<String, u32>>(&binary),
            Err(JsonFileError::Json { .. })
        ));
    }
}
