//! Utility functions for common operations.
//!
//! This module provides shared utilities used across the crate:
//! - Atomic file writes for configuration
//! - Reading render input from a file or stdin
//! - Clamping byte offsets onto char boundaries

use std::io::{self, Read, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Result, ViewError};

/// Atomically write content to a file.
///
/// The content goes to a temporary file in the same directory, is flushed, and
/// is then renamed over the target. If any step fails the original file (if
/// it exists) is left unchanged. Missing parent directories are created.
pub fn atomic_write(path: impl AsRef<Path>, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    let parent = path.parent().ok_or_else(|| ViewError::IoError {
        context: format!("Cannot determine parent directory for: {}", path.display()),
        source: io::Error::new(io::ErrorKind::InvalidInput, "No parent directory"),
    })?;

    if !parent.as_os_str().is_empty() && !parent.exists() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ViewError::io(format!("Failed to create directory: {}", parent.display()), e)
        })?;
    }

    // Same directory keeps the final rename on one filesystem.
    let dir = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    let mut temp_file = NamedTempFile::new_in(dir).map_err(|e| {
        ViewError::io(
            format!("Failed to create temporary file in: {}", dir.display()),
            e,
        )
    })?;

    temp_file.write_all(content).map_err(|e| {
        ViewError::io(
            format!("Failed to write to temporary file for: {}", path.display()),
            e,
        )
    })?;

    temp_file.flush().map_err(|e| {
        ViewError::io(
            format!("Failed to flush temporary file for: {}", path.display()),
            e,
        )
    })?;

    temp_file.persist(path).map_err(|e| {
        ViewError::io(
            format!("Failed to atomically write file: {}", path.display()),
            e.error,
        )
    })?;

    Ok(())
}

/// Read UTF-8 text from `path`, or from stdin when `path` is `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| ViewError::from_io_at("<stdin>", e))?;
        return Ok(buf);
    }

    std::fs::read_to_string(path).map_err(|e| ViewError::from_io_at(path, e))
}

/// Largest char boundary of `text` that is `<= offset`.
#[must_use]
pub fn floor_char_boundary(text: &str, offset: usize) -> usize {
    if offset >= text.len() {
        return text.len();
    }
    let mut offset = offset;
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Clamp a byte range onto `text`, snapping both ends to char boundaries.
#[must_use]
pub fn clamp_range(text: &str, range: std::ops::Range<usize>) -> std::ops::Range<usize> {
    let end = floor_char_boundary(text, range.end);
    let start = floor_char_boundary(text, range.start.min(end));
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_write_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("out.txt");
        atomic_write(&path, b"hello").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");

        atomic_write(&path, b"again").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "again");
    }

    #[test]
    fn test_read_input_missing_file() {
        let err = read_input(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, ViewError::FileNotFound { .. }));
    }

    #[test]
    fn test_floor_char_boundary() {
        let text = "aé";
        assert_eq!(floor_char_boundary(text, 0), 0);
        assert_eq!(floor_char_boundary(text, 2), 1);
        assert_eq!(floor_char_boundary(text, 3), 3);
        assert_eq!(floor_char_boundary(text, 99), 3);
    }

    #[test]
    fn test_clamp_range() {
        let text = "aéb";
        assert_eq!(clamp_range(text, 2..10), 1..4);
        assert_eq!(clamp_range(text, 9..12), 4..4);
    }
}
