//! Value enums for command-line flags.

use clap::ValueEnum;
use multipath_core::{SizePolicy, StillFormat};

/// Size reconciliation policy.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SizePolicyArg {
    /// Resample to the first image's size (default)
    FirstFile,
    /// Resample to the most frequent size
    MostCommon,
    /// Fail on mixed sizes
    Strict,
}

impl From<SizePolicyArg> for SizePolicy {
    fn from(arg: SizePolicyArg) -> Self {
        match arg {
            SizePolicyArg::FirstFile => SizePolicy::FirstFile,
            SizePolicyArg::MostCommon => SizePolicy::MostCommon,
            SizePolicyArg::Strict => SizePolicy::Strict,
        }
    }
}

/// What `run` writes per segment.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum SaveFormat {
    /// A folder of numbered frames
    #[default]
    Images,
    /// An H.264 MP4 via ffmpeg
    Mp4,
}

impl std::fmt::Display for SaveFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveFormat::Images => write!(f, "images"),
            SaveFormat::Mp4 => write!(f, "mp4"),
        }
    }
}

/// Still-image codec for image output.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ImageFormatArg {
    Png,
    Jpg,
    Webp,
}

impl From<ImageFormatArg> for StillFormat {
    fn from(arg: ImageFormatArg) -> Self {
        match arg {
            ImageFormatArg::Png => StillFormat::Png,
            ImageFormatArg::Jpg => StillFormat::Jpg,
            ImageFormatArg::Webp => StillFormat::Webp,
        }
    }
}
