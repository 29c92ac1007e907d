//! Content fingerprinting for change detection.

use blake3::Hasher as Blake3Hasher;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::discovery::{apply_cap, DirectoryScanner};
use crate::error::PipelineError;

/// Computes the content fingerprint the host uses to decide whether a cached
/// load is still valid.
pub struct Fingerprinter {
    scanner: DirectoryScanner,
}

impl Fingerprinter {
    pub fn new(scanner: DirectoryScanner) -> Self {
        Self { scanner }
    }

    /// Hash the selected files of every existing directory, in order.
    ///
    /// Each file is hashed in full; its hex digest is folded into one running
    /// BLAKE3 hasher. After each directory's files, its selected-file count is
    /// folded in as a boundary, so moving a file from one directory to the
    /// next changes the digest. Directories that do not exist are skipped.
    pub fn fingerprint<P: AsRef<Path>>(
        &self,
        directories: &[P],
        cap: usize,
        skip_first: usize,
        stride: usize,
    ) -> Result<String, PipelineError> {
        let mut running = Blake3Hasher::new();

        for directory in directories {
            let directory = directory.as_ref();
            if directory.as_os_str().is_empty() || !directory.is_dir() {
                continue;
            }
            let files = apply_cap(self.scanner.scan(directory, skip_first, stride)?, cap);
            for file in &files {
                let digest = content_hash(file)?;
                running.update(digest.as_bytes());
            }
            running.update(&(files.len() as u64).to_le_bytes());
        }

        Ok(running.finalize().to_hex().to_string())
    }
}

/// Generate a BLAKE3 hash of file contents.
///
/// Uses streaming to handle large files efficiently without loading
/// the entire file into memory.
pub fn content_hash(path: &Path) -> std::io::Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Blake3Hasher::new();

    // Use 64KB buffer for efficient reading
    let mut buffer = [0u8; 65536];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize().to_hex().to_string())
}
