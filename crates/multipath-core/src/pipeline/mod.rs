//! Directory-batch loading pipeline.
//!
//! This module contains every stage between a list of directory slots and a
//! combined batch, and the inverse split:
//! - **path**: Clean user-supplied path strings and output names
//! - **discovery**: List, sort, and subsample image files in one directory
//! - **hash**: Content fingerprint for change detection
//! - **metadata**: EXIF orientation
//! - **decode**: Decode one file into RGB and mask tensors
//! - **resize**: Resample frames and masks to a target geometry
//! - **loader**: Load one directory into a uniform batch
//! - **aggregate**: Load many directories and concatenate them
//! - **split**: Slice a combined batch back into per-directory segments
//! - **validate**: Pre-load validation

pub mod aggregate;
pub mod decode;
pub mod discovery;
pub mod hash;
pub mod loader;
pub mod metadata;
pub mod path;
pub mod resize;
pub mod split;
pub mod validate;

// Re-exports for convenient access
pub use aggregate::Aggregator;
pub use decode::{ImageNormalizer, NormalizedImage};
pub use discovery::DirectoryScanner;
pub use hash::{content_hash, Fingerprinter};
pub use loader::{DirectoryLoader, LoadOptions, LoadProgress};
pub use metadata::Orientation;
pub use path::{leaf_name, sanitize_filename, strip_path};
pub use split::{split, LengthMismatch, Segment};
pub use validate::Validator;
