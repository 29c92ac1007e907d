//! Sub-configuration structs with defaults matching the node defaults.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Root under which upload-style directory names are resolved
    pub input_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./input"),
        }
    }
}

/// How a directory's target geometry is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizePolicy {
    /// Size of the first file in sort order; other files are resampled to it.
    #[default]
    FirstFile,
    /// Most frequent size among the selected files; ties go to the earliest.
    MostCommon,
    /// Never resample; differing sizes are an error.
    Strict,
}

impl SizePolicy {
    /// Map the host's boolean "resize to reconcile sizes" toggle.
    pub fn from_size_check(size_check: bool) -> Self {
        if size_check {
            Self::FirstFile
        } else {
            Self::Strict
        }
    }

    pub fn resamples(self) -> bool {
        !matches!(self, Self::Strict)
    }
}

impl fmt::Display for SizePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizePolicy::FirstFile => write!(f, "first-file"),
            SizePolicy::MostCommon => write!(f, "most-common"),
            SizePolicy::Strict => write!(f, "strict"),
        }
    }
}

/// Loader settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingConfig {
    /// Accepted file extensions (compared lowercase)
    pub supported_formats: Vec<String>,

    /// Target geometry policy
    pub size_policy: SizePolicy,

    /// Maximum files per directory, 0 = unlimited
    pub image_load_cap: usize,

    /// Files dropped from the start of each directory
    pub skip_first_images: usize,

    /// Keep every Nth file after skipping
    pub select_every_nth: usize,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            supported_formats: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "webp".to_string(),
                "bmp".to_string(),
                "tif".to_string(),
                "tiff".to_string(),
                "gif".to_string(),
            ],
            size_policy: SizePolicy::FirstFile,
            image_load_cap: 0,
            skip_first_images: 0,
            select_every_nth: 1,
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum image dimension (width or height)
    pub max_image_dimension: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_image_dimension: 16384,
        }
    }
}

/// Still-image codec for image-sequence output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StillFormat {
    #[default]
    Png,
    Jpg,
    Webp,
}

impl StillFormat {
    pub fn extension(self) -> &'static str {
        match self {
            StillFormat::Png => "png",
            StillFormat::Jpg => "jpg",
            StillFormat::Webp => "webp",
        }
    }

    /// Parse from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpg),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }
}

/// Save-side settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    /// Default output location when a node gives no override
    pub output_dir: PathBuf,

    /// Codec for image-sequence output
    pub image_format: StillFormat,

    /// Still-image quality, 1-100
    pub quality: u8,

    /// Video frame rate, 1-120
    pub frame_rate: u32,

    /// Video constant rate factor, 0-51
    pub video_quality: u8,

    /// Clamp instead of failing when the batch and manifest disagree
    pub allow_length_mismatch: bool,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./output"),
            image_format: StillFormat::Png,
            quality: 95,
            frame_rate: 24,
            video_quality: 23,
            allow_length_mismatch: false,
        }
    }
}

/// External video encoder settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Explicit encoder binary; searched on PATH when unset
    pub binary: Option<PathBuf>,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
