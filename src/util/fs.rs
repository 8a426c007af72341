//! Filesystem utilities.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Write a string to a file, creating parent directories if needed.
///
/// Returns `false` when the file already held exactly `contents` and was
/// left untouched.
pub fn write_string(path: &Path, contents: &str) -> Result<bool> {
    if let Ok(existing) = fs::read_to_string(path) {
        if existing == contents {
            return Ok(false);
        }
    }

    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents)
        .with_context(|| format!("failed to write file: {}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_string_creates_parents_and_skips_unchanged() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("rust").join("lib.rs");

        assert!(write_string(&path, "fn main() {}\n").unwrap());
        assert_eq!(read_to_string(&path).unwrap(), "fn main() {}\n");
        assert!(!write_string(&path, "fn main() {}\n").unwrap());
        assert!(write_string(&path, "// changed\n").unwrap());
    }
}
