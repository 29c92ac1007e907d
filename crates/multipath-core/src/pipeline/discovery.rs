//! File discovery for one input directory.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::LoadingConfig;
use crate::error::PipelineError;

/// Lists, filters, orders, and subsamples the image files of a directory.
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    extensions: Vec<String>,
}

impl DirectoryScanner {
    /// Create a scanner accepting the configured extensions.
    pub fn new(config: &LoadingConfig) -> Self {
        Self::with_extensions(config.supported_formats.iter().map(String::as_str))
    }

    /// Create a scanner for an explicit extension set (without leading dots).
    pub fn with_extensions<'a>(extensions: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    /// Scan the direct children of `directory`.
    ///
    /// Files are sorted by path in plain lexicographic order, then the first
    /// `skip_first` are dropped and every `stride`-th of the remainder is kept,
    /// starting with the first.
    pub fn scan(
        &self,
        directory: &Path,
        skip_first: usize,
        stride: usize,
    ) -> Result<Vec<PathBuf>, PipelineError> {
        if !directory.is_dir() {
            return Err(PipelineError::DirectoryNotFound(directory.to_path_buf()));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(directory).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                PipelineError::Io(e.into_io_error().unwrap_or_else(|| {
                    std::io::Error::other(format!("cannot list {}", directory.display()))
                }))
            })?;
            let path = entry.path();
            // Follow symlinks so a linked frame still counts as a regular file
            if path.is_file() && self.is_supported(path) {
                files.push(entry.into_path());
            }
        }

        files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        Ok(subsample(files, skip_first, stride))
    }

    /// Check if a file has a supported extension.
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext_lower = ext.to_lowercase();
                self.extensions.contains(&ext_lower)
            })
            .unwrap_or(false)
    }
}

/// Drop `skip_first` entries, then keep indices 0, stride, 2*stride, ...
fn subsample(files: Vec<PathBuf>, skip_first: usize, stride: usize) -> Vec<PathBuf> {
    let stride = stride.max(1);
    files.into_iter().skip(skip_first).step_by(stride).collect()
}

/// Keep at most `cap` entries; a cap of 0 means unlimited.
pub fn apply_cap(mut files: Vec<PathBuf>, cap: usize) -> Vec<PathBuf> {
    if cap > 0 {
        files.truncate(cap);
    }
    files
}
