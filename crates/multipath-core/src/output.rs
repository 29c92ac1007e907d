//! Writing batches back to disk as image sequences or videos.
//!
//! A [`SaveWriter`] turns each output segment into either a folder of
//! numbered frames or a single encoded video file, and reports the produced
//! paths in order.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ImageEncoder, RgbImage};
use ndarray::{Array4, ArrayView3, Axis};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::config::{EncoderConfig, StillFormat};
use crate::encoder::VideoEncoder;
use crate::error::PipelineError;
use crate::pipeline::{sanitize_filename, Segment};

/// How each output segment is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// One file per frame inside a folder named after the segment
    Images { format: StillFormat, quality: u8 },
    /// One video per segment, encoded by the external encoder
    Video { frame_rate: u32, crf: u8 },
}

impl OutputMode {
    /// Check the host's numeric ranges.
    pub fn check(&self) -> Result<(), PipelineError> {
        match *self {
            OutputMode::Images { quality, .. } if !(1..=100).contains(&quality) => Err(
                PipelineError::InvalidInput(format!("quality {quality} is outside 1-100")),
            ),
            OutputMode::Video { frame_rate, .. } if !(1..=120).contains(&frame_rate) => Err(
                PipelineError::InvalidInput(format!("frame rate {frame_rate} is outside 1-120")),
            ),
            OutputMode::Video { crf, .. } if crf > 51 => Err(PipelineError::InvalidInput(
                format!("video quality {crf} is outside 0-51"),
            )),
            _ => Ok(()),
        }
    }
}

/// Paths produced by one save invocation, in segment order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOutput {
    pub paths: Vec<PathBuf>,
}

impl SaveOutput {
    /// Newline-joined paths, as returned to the host.
    pub fn joined(&self) -> String {
        self.paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Writes segments under one output directory.
pub struct SaveWriter {
    output_dir: PathBuf,
    mode: OutputMode,
    encoder: EncoderConfig,
}

impl SaveWriter {
    pub fn new(output_dir: PathBuf, mode: OutputMode, encoder: EncoderConfig) -> Self {
        Self {
            output_dir,
            mode,
            encoder,
        }
    }

    /// Write each segment as `{prefix}_{directory name}`.
    ///
    /// Two segments that resolve to the same output name are rejected before
    /// anything is written.
    pub fn save_segments(
        &self,
        prefix: &str,
        segments: &[Segment],
    ) -> Result<SaveOutput, PipelineError> {
        let bases: Vec<String> = segments
            .iter()
            .map(|segment| format!("{}_{}", prefix, sanitize_filename(&segment.directory_name)))
            .collect();
        let mut seen = HashSet::with_capacity(bases.len());
        if let Some(duplicate) = bases.iter().find(|base| !seen.insert(base.as_str())) {
            return Err(PipelineError::InvalidInput(format!(
                "Several directories would be saved as '{duplicate}'"
            )));
        }

        let encoder = self.prepare()?;
        let mut paths = Vec::with_capacity(segments.len());
        for (segment, base) in segments.iter().zip(&bases) {
            tracing::info!(
                "Saving {} frames for '{}' as '{}'",
                segment.frame_count(),
                segment.directory_name,
                base
            );
            paths.push(self.write_output(base, &segment.images, encoder.as_ref())?);
        }
        Ok(SaveOutput { paths })
    }

    /// Write the whole batch as one output named after `prefix`.
    pub fn save_all(&self, prefix: &str, images: &Array4<f32>) -> Result<SaveOutput, PipelineError> {
        let encoder = self.prepare()?;
        let base = sanitize_filename(prefix);
        tracing::info!("Saving {} frames as '{}'", images.len_of(Axis(0)), base);
        let path = self.write_output(&base, images, encoder.as_ref())?;
        Ok(SaveOutput { paths: vec![path] })
    }

    /// Validate the mode, create the output directory, and locate the encoder
    /// before anything is written.
    fn prepare(&self) -> Result<Option<VideoEncoder>, PipelineError> {
        self.mode.check()?;
        std::fs::create_dir_all(&self.output_dir)?;
        match self.mode {
            OutputMode::Video { .. } => Ok(Some(VideoEncoder::locate(&self.encoder)?)),
            OutputMode::Images { .. } => Ok(None),
        }
    }

    fn write_output(
        &self,
        base: &str,
        images: &Array4<f32>,
        encoder: Option<&VideoEncoder>,
    ) -> Result<PathBuf, PipelineError> {
        match (self.mode, encoder) {
            (OutputMode::Video { frame_rate, crf }, Some(encoder)) => {
                let output = self.output_dir.join(format!("{base}.mp4"));
                encoder.encode(images, &output, frame_rate, crf)?;
                tracing::info!("Saved video to: {:?}", output);
                Ok(output)
            }
            (OutputMode::Video { .. }, None) => Err(PipelineError::EncoderNotFound),
            (OutputMode::Images { format, quality }, _) => {
                let folder = self.output_dir.join(base);
                std::fs::create_dir_all(&folder)?;
                for (j, frame) in images.axis_iter(Axis(0)).enumerate() {
                    let path = folder.join(format!("{base}_{j:05}.{}", format.extension()));
                    write_frame(&frame_to_rgb(frame), &path, format, quality)?;
                }
                tracing::info!(
                    "Saved {} images to: {:?}",
                    images.len_of(Axis(0)),
                    folder
                );
                Ok(folder)
            }
        }
    }
}

/// Convert a `(h, w, 3)` frame in `[0, 1]` to 8-bit RGB.
///
/// Samples are clamped, scaled by 255, and truncated.
pub fn frame_to_rgb(frame: ArrayView3<'_, f32>) -> RgbImage {
    let (h, w, _) = frame.dim();
    RgbImage::from_fn(w as u32, h as u32, |x, y| {
        let (x, y) = (x as usize, y as usize);
        image::Rgb([0, 1, 2].map(|c| (frame[[y, x, c]].clamp(0.0, 1.0) * 255.0) as u8))
    })
}

/// Encode one frame to `path` in the requested still format.
pub fn write_frame(
    image: &RgbImage,
    path: &Path,
    format: StillFormat,
    quality: u8,
) -> Result<(), PipelineError> {
    let save_err = |message: String| PipelineError::Save {
        path: path.to_path_buf(),
        message,
    };
    let file = File::create(path).map_err(|e| save_err(e.to_string()))?;
    let writer = BufWriter::new(file);
    let (w, h) = image.dimensions();

    let result = match format {
        StillFormat::Png => {
            PngEncoder::new(writer).write_image(image.as_raw(), w, h, image::ExtendedColorType::Rgb8)
        }
        StillFormat::Jpg => JpegEncoder::new_with_quality(writer, quality).write_image(
            image.as_raw(),
            w,
            h,
            image::ExtendedColorType::Rgb8,
        ),
        StillFormat::Webp => {
            tracing::debug!("WebP output is lossless; quality {} ignored", quality);
            WebPEncoder::new_lossless(writer).write_image(
                image.as_raw(),
                w,
                h,
                image::ExtendedColorType::Rgb8,
            )
        }
    };
    result.map_err(|e| save_err(e.to_string()))
}
