//! The save node: write a batch as image sequences or videos.

use ndarray::Array4;
use std::path::PathBuf;

use crate::config::{Config, EncoderConfig, SaveConfig};
use crate::error::PipelineError;
use crate::output::{OutputMode, SaveOutput, SaveWriter};
use crate::pipeline::{split, LengthMismatch};
use crate::types::Manifest;

/// Prefix used when the host gives none.
pub const DEFAULT_PREFIX: &str = "output";

/// Save node inputs.
#[derive(Debug, Clone)]
pub struct SaveInputs {
    pub filename_prefix: String,
    /// Overrides the configured output directory when set
    pub output_directory: Option<PathBuf>,
    pub mode: OutputMode,
}

impl SaveInputs {
    /// Image-sequence output with the configured codec and quality.
    pub fn images(filename_prefix: impl Into<String>, config: &SaveConfig) -> Self {
        Self {
            filename_prefix: filename_prefix.into(),
            output_directory: None,
            mode: OutputMode::Images {
                format: config.image_format,
                quality: config.quality,
            },
        }
    }

    /// Video output with the configured frame rate and quality.
    pub fn video(filename_prefix: impl Into<String>, config: &SaveConfig) -> Self {
        Self {
            filename_prefix: filename_prefix.into(),
            output_directory: None,
            mode: OutputMode::Video {
                frame_rate: config.frame_rate,
                crf: config.video_quality,
            },
        }
    }
}

/// Writes batches to disk, split per directory when a manifest is given.
pub struct SaveImagesNode {
    output_dir: PathBuf,
    encoder: EncoderConfig,
    length_mismatch: LengthMismatch,
}

impl SaveImagesNode {
    pub fn new(config: &Config) -> Self {
        Self {
            output_dir: config.output_dir(),
            encoder: config.encoder.clone(),
            length_mismatch: LengthMismatch::from_allow(config.save.allow_length_mismatch),
        }
    }

    /// Save `images`, one output per manifest entry or a single output
    /// without one.
    pub fn execute(
        &self,
        images: &Array4<f32>,
        manifest: Option<&Manifest>,
        inputs: &SaveInputs,
    ) -> Result<SaveOutput, PipelineError> {
        let output_dir = inputs
            .output_directory
            .clone()
            .unwrap_or_else(|| self.output_dir.clone());
        let prefix = match inputs.filename_prefix.trim() {
            "" => DEFAULT_PREFIX,
            prefix => prefix,
        };
        let writer = SaveWriter::new(output_dir, inputs.mode, self.encoder.clone());

        match manifest {
            Some(manifest) => {
                let segments = split(images, manifest, self.length_mismatch)?;
                writer.save_segments(prefix, &segments)
            }
            None => writer.save_all(prefix, images),
        }
    }

    /// Saving always has side effects, so it is never cached.
    pub fn is_changed(&self) -> Option<String> {
        None
    }
}
