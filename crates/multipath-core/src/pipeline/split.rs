//! Reversing a combined batch into per-directory segments.

use ndarray::{s, Array4, Axis};

use crate::error::PipelineError;
use crate::types::Manifest;

/// What to do when the batch length disagrees with the manifest total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LengthMismatch {
    /// Refuse to split.
    #[default]
    Fail,
    /// Warn, clamp every slice to the batch, and drop segments left empty.
    Clamp,
}

impl LengthMismatch {
    pub fn from_allow(allow_length_mismatch: bool) -> Self {
        if allow_length_mismatch {
            Self::Clamp
        } else {
            Self::Fail
        }
    }
}

/// One directory's share of a combined batch.
#[derive(Debug, Clone)]
pub struct Segment {
    pub images: Array4<f32>,
    pub directory_name: String,
}

impl Segment {
    pub fn frame_count(&self) -> usize {
        self.images.len_of(Axis(0))
    }
}

/// Slice `images` into contiguous runs following `manifest.frame_counts`.
pub fn split(
    images: &Array4<f32>,
    manifest: &Manifest,
    mode: LengthMismatch,
) -> Result<Vec<Segment>, PipelineError> {
    manifest.check()?;

    let actual = images.len_of(Axis(0));
    let expected = manifest.total_frames();
    if expected != actual {
        match mode {
            LengthMismatch::Fail => {
                return Err(PipelineError::ManifestMismatch { expected, actual })
            }
            LengthMismatch::Clamp => {
                tracing::warn!("Expected {} frames but got {}", expected, actual);
            }
        }
    }

    let mut segments = Vec::with_capacity(manifest.len());
    let mut cursor = 0usize;
    for (name, count) in manifest.entries() {
        let start = cursor.min(actual);
        let end = (cursor + count).min(actual);
        cursor += count;

        if start == end && count > 0 {
            tracing::warn!("No frames left for '{}', skipping", name);
            continue;
        }
        segments.push(Segment {
            images: images.slice(s![start..end, .., .., ..]).to_owned(),
            directory_name: name.to_string(),
        });
    }
    Ok(segments)
}
