//! Error types for the multipath loading and saving pipeline.
//!
//! Errors are organized by concern so that every failure surfaced to the host
//! carries the offending directory, file, or size set.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::Geometry;

/// Top-level error type for multipath operations.
#[derive(Error, Debug)]
pub enum MultipathError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pipeline errors for the load, split, and save stages.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Directory does not exist or is not a directory
    #[error("Directory '{}' cannot be found.", .0.display())]
    DirectoryNotFound(PathBuf),

    /// Directory exists but yields no matching image files
    #[error("No image files in directory '{}'.", .0.display())]
    EmptyDirectory(PathBuf),

    /// Image could not be decoded
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Image dimensions exceed limit
    #[error("Image too large: {path} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Frames of differing geometry reached a stacking step
    #[error("Images in {context} have different sizes: {}", format_sizes(.sizes))]
    ShapeMismatch {
        context: String,
        sizes: Vec<Geometry>,
    },

    /// None of the configured directories produced any frames
    #[error("No images could be loaded from any of the specified directories.")]
    NoValidDirectories,

    /// Manifest arrays are malformed
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    /// Manifest frame total disagrees with the batch handed to the save side
    #[error("Manifest expects {expected} frames but the batch has {actual}")]
    ManifestMismatch { expected: usize, actual: usize },

    /// External video encoder binary could not be located
    #[error("ffmpeg not found. Please install ffmpeg to export MP4 videos.")]
    EncoderNotFound,

    /// External video encoder exited unsuccessfully
    #[error("ffmpeg failed for {output}: {stderr}")]
    EncodeFailed { output: PathBuf, stderr: String },

    /// Writing an output frame failed
    #[error("Failed to save {path}: {message}")]
    Save { path: PathBuf, message: String },

    /// Node inputs out of range or inconsistent
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Filesystem errors outside of decode
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_sizes(sizes: &[Geometry]) -> String {
    sizes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenience type alias for multipath results.
pub type Result<T> = std::result::Result<T, MultipathError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
