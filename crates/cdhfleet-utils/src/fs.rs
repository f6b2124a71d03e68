use cdhfleet_types::{Result, Status, StatusCode};
use std::path::Path;

/// Create a directory and any missing parents. Succeeds if the directory
/// already exists.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| {
        Status::with_message(
            StatusCode::IO_ERROR,
            format!("mkdir {}: {}", path.display(), e),
        )
    })
}

/// List the names of entries directly under `path`, sorted.
pub fn dir_entry_names(path: &Path) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(path).map_err(|e| {
        Status::with_message(
            StatusCode::IO_ERROR,
            format!("read_dir {}: {}", path.display(), e),
        )
    })?;
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_dir_creates_and_is_idempotent() {
        let dir = std::env::temp_dir().join("cdhfleet-test-ensure-dir/a/b");
        let _ = std::fs::remove_dir_all(&dir);

        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
        // Second call is a no-op.
        ensure_dir(&dir).unwrap();

        let _ = std::fs::remove_dir_all(std::env::temp_dir().join("cdhfleet-test-ensure-dir"));
    }

    #[test]
    fn test_dir_entry_names_sorted() {
        let dir = std::env::temp_dir().join("cdhfleet-test-entries");
        let _ = std::fs::remove_dir_all(&dir);
        ensure_dir(&dir.join("b")).unwrap();
        ensure_dir(&dir.join("a")).unwrap();

        let names = dir_entry_names(&dir).unwrap();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_dir_entry_names_missing_dir() {
        let missing = std::env::temp_dir().join("cdhfleet-test-no-such-dir");
        let r = dir_entry_names(&missing);
        assert!(r.is_err());
        assert_eq!(r.unwrap_err().code(), StatusCode::IO_ERROR);
    }
}
