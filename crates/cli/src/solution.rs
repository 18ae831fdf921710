// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reference transcript loading.

use std::fs::File;
use std::path::Path;

use autograde_capture::{drain, LineSequence};

use crate::grade::GradeError;

/// Read the expected output, split the same way as captured output.
pub fn load(path: &Path) -> Result<LineSequence, GradeError> {
    if !path.is_file() {
        return Err(GradeError::MissingFile(path.to_path_buf()));
    }
    let read_error = |source| GradeError::SolutionRead {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(read_error)?;
    let lines = drain(file).map_err(read_error)?;
    log::debug!("loaded {} reference lines from {}", lines.len(), path.display());
    Ok(lines)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn loads_lines_without_trailing_blank() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "Hello\nWorld\n").unwrap();
        let lines = load(file.path()).unwrap();
        assert_eq!(lines.as_slice(), ["Hello", "World"]);
    }

    #[test]
    fn keeps_unterminated_last_line() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "Hello\nWorld").unwrap();
        assert_eq!(load(file.path()).unwrap().as_slice(), ["Hello", "World"]);
    }

    #[test]
    fn empty_file_is_empty_sequence() {
        let file = NamedTempFile::new().unwrap();
        assert!(load(file.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("expected.txt");
        match load(&path) {
            Err(GradeError::MissingFile(missing)) => assert_eq!(missing, path),
            other => panic!("expected MissingFile, got {other:?}"),
        }
    }

    #[test]
    fn directory_is_not_a_solution_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(load(dir.path()), Err(GradeError::MissingFile(_))));
    }
}
