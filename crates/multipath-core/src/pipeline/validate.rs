//! Input validation before a load is attempted.

use std::path::{Path, PathBuf};

use super::discovery::DirectoryScanner;
use crate::error::PipelineError;

/// Message returned to the host when no slot is usable.
pub const NO_VALID_DIRECTORY: &str = "At least one valid directory must be specified.";

/// Checks directories before the host schedules a load.
pub struct Validator {
    scanner: DirectoryScanner,
}

impl Validator {
    /// Create a new validator using the loader's extension filter.
    pub fn new(scanner: DirectoryScanner) -> Self {
        Self { scanner }
    }

    /// Check that `directory` exists and holds at least one matching file.
    pub fn validate_directory(&self, directory: &Path) -> Result<(), PipelineError> {
        if !directory.is_dir() {
            return Err(PipelineError::DirectoryNotFound(directory.to_path_buf()));
        }
        if self.scanner.scan(directory, 0, 1)?.is_empty() {
            return Err(PipelineError::EmptyDirectory(directory.to_path_buf()));
        }
        Ok(())
    }

    /// Succeeds when at least one configured directory is loadable.
    pub fn validate_any(&self, directories: &[Option<PathBuf>]) -> Result<(), String> {
        let valid = directories
            .iter()
            .flatten()
            .filter(|dir| match self.validate_directory(dir) {
                Ok(()) => true,
                Err(e) => {
                    tracing::debug!("{}", e);
                    false
                }
            })
            .count();

        if valid == 0 {
            Err(NO_VALID_DIRECTORY.to_string())
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoadingConfig;

    fn validator() -> Validator {
        Validator::new(DirectoryScanner::new(&LoadingConfig::default()))
    }

    #[test]
    fn test_validate_directory_states() {
        let dir = tempfile::tempdir().unwrap();
        let v = validator();

        let missing = v.validate_directory(&dir.path().join("gone")).unwrap_err();
        assert!(matches!(missing, PipelineError::DirectoryNotFound(_)));

        // Files exist but none match the extension filter
        std::fs::write(dir.path().join("readme.md"), b"hi").unwrap();
        let empty = v.validate_directory(dir.path()).unwrap_err();
        assert!(matches!(empty, PipelineError::EmptyDirectory(_)));

        std::fs::write(dir.path().join("0.png"), b"x").unwrap();
        assert!(v.validate_directory(dir.path()).is_ok());
    }

    #[test]
    fn test_validate_any() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("0.jpg"), b"x").unwrap();
        let v = validator();

        assert_eq!(
            v.validate_any(&[None, Some(PathBuf::from("/nonexistent"))]),
            Err(NO_VALID_DIRECTORY.to_string())
        );
        assert!(v
            .validate_any(&[None, Some(dir.path().to_path_buf())])
            .is_ok());
    }
}
