//! Common types and utilities for spant commands.
//!
//! This module provides shared constants and the file-writing helper used by
//! command implementations.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Result, SpantError};

// ============================================================================
// File Output
// ============================================================================

/// Write `contents` to `path`; readers see either the old file or the
/// complete new one.
///
/// The data goes to a temporary file in the destination directory, which is
/// then renamed over `path`. Missing parent directories are created.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    fs::create_dir_all(parent).map_err(|e| {
        SpantError::FileOperation(format!(
            "{} {}: {}",
            error_messages::CREATE_DIR_FAILED,
            parent.display(),
            e
        ))
    })?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(contents.as_bytes())?;
    temp.as_file().sync_all()?;

    // NamedTempFile is created 0600
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))?;
    }

    temp.persist(path).map_err(|e| {
        SpantError::FileOperation(format!(
            "{} {}: {}",
            error_messages::PERSIST_FAILED,
            path.display(),
            e.error
        ))
    })?;
    Ok(())
}

// ============================================================================
// Error Messages
// ============================================================================

/// Standard error message templates.
///
/// These constants provide consistent error messages across all commands.
pub mod error_messages {
    /// Error when the output path names a directory.
    pub const OUTPUT_PATH_IS_DIR: &str = "Output path is a directory:";

    /// Error when the output path has no usable file name.
    pub const INVALID_OUTPUT_PATH: &str = "Output path has no file name:";

    /// Error when the output directory cannot be created.
    pub const CREATE_DIR_FAILED: &str = "Cannot create output directory";

    /// Error when the finished file cannot be moved into place.
    pub const PERSIST_FAILED: &str = "Cannot replace";
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a").join("b").join("table.h");

        write_atomic(&path, "contents\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "contents\n");
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("table.h");
        fs::write(&path, "old").unwrap();

        write_atomic(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        // only the destination remains, no stray temporary file
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomic_onto_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("taken");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("inner"), "x").unwrap();

        assert!(matches!(
            write_atomic(&path, "new"),
            Err(SpantError::FileOperation(_))
        ));
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }
}
