//! Core data types for the multipath pipeline.
//!
//! Tensors follow the host's layout: images are `(frames, height, width, 3)`
//! with samples in `[0, 1]`, masks are `(frames, height, width)`.

use ndarray::{Array2, Array3, Array4, Axis};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{PipelineError, PipelineResult};

/// A single RGB frame, axes `(height, width, channel)`.
pub type ImageTensor = Array3<f32>;

/// A single mask frame, axes `(height, width)`.
pub type MaskTensor = Array2<f32>;

/// Number of color channels in an image tensor.
pub const RGB_CHANNELS: usize = 3;

/// Image size as `(width, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
}

impl Geometry {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Geometry of an image tensor (any leading batch axis excluded).
    pub fn of_image(image: &ImageTensor) -> Self {
        let (h, w, _) = image.dim();
        Self::new(w as u32, h as u32)
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// All frames loaded from one directory, at one geometry.
#[derive(Debug, Clone)]
pub struct DirectoryBatch {
    /// Stacked frames, `(n, h, w, 3)`
    pub images: Array4<f32>,

    /// Stacked masks, `(n, h, w)`
    pub masks: Array3<f32>,

    /// Leaf folder name only, never the full path
    pub directory_name: String,

    /// Geometry shared by every frame
    pub geometry: Geometry,

    /// Whether any source file carried an alpha channel
    pub has_alpha: bool,
}

impl DirectoryBatch {
    /// Number of frames in the batch.
    pub fn frame_count(&self) -> usize {
        self.images.len_of(Axis(0))
    }
}

/// Concatenation of every directory's frames, in slot order.
#[derive(Debug, Clone)]
pub struct CombinedBatch {
    pub images: Array4<f32>,
    pub masks: Array3<f32>,
}

impl CombinedBatch {
    /// Number of frames in the batch.
    pub fn frame_count(&self) -> usize {
        self.images.len_of(Axis(0))
    }

    /// Geometry shared by every frame, or `None` for an empty batch.
    pub fn geometry(&self) -> Option<Geometry> {
        let (n, h, w, _) = self.images.dim();
        (n > 0).then(|| Geometry::new(w as u32, h as u32))
    }
}

/// Bookkeeping that makes a [`CombinedBatch`] reversible.
///
/// One entry per directory that yielded at least one frame. Serializes to
/// `{"frame_counts": [...], "directory_names": [...]}` so the host can carry
/// it between nodes opaquely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Frames contributed by each directory
    pub frame_counts: Vec<usize>,

    /// Leaf directory name of each entry
    pub directory_names: Vec<String>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one directory's entry, keeping the arrays parallel.
    pub fn push(&mut self, directory_name: impl Into<String>, frame_count: usize) {
        self.directory_names.push(directory_name.into());
        self.frame_counts.push(frame_count);
    }

    /// Number of directory entries.
    pub fn len(&self) -> usize {
        self.frame_counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame_counts.is_empty()
    }

    /// Sum of all frame counts.
    pub fn total_frames(&self) -> usize {
        self.frame_counts.iter().sum()
    }

    /// Check that both arrays have one entry per directory.
    pub fn check(&self) -> PipelineResult<()> {
        if self.frame_counts.len() != self.directory_names.len() {
            return Err(PipelineError::InvalidManifest(format!(
                "{} frame counts but {} directory names",
                self.frame_counts.len(),
                self.directory_names.len()
            )));
        }
        Ok(())
    }

    /// Iterate `(directory_name, frame_count)` pairs in order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, usize)> {
        self.directory_names
            .iter()
            .map(String::as_str)
            .zip(self.frame_counts.iter().copied())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        let manifest: Manifest = serde_json::from_str(json)?;
        manifest.check()?;
        Ok(manifest)
    }
}

/// What a loader node hands back to the host.
#[derive(Debug, Clone)]
pub struct LoadOutput {
    pub batch: CombinedBatch,
    pub manifest: Manifest,
    pub frame_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_display() {
        assert_eq!(Geometry::new(640, 480).to_string(), "640x480");
    }

    #[test]
    fn test_manifest_json_shape() {
        let mut manifest = Manifest::new();
        manifest.push("a", 3);
        manifest.push("b", 5);
        let json = manifest.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"frame_counts":[3,5],"directory_names":["a","b"]}"#
        );
        assert_eq!(Manifest::from_json(&json).unwrap(), manifest);
        assert_eq!(manifest.total_frames(), 8);
    }

    #[test]
    fn test_manifest_rejects_ragged_arrays() {
        let json = r#"{"frame_counts":[3,5],"directory_names":["a"]}"#;
        assert!(Manifest::from_json(json).is_err());
    }

    #[test]
    fn test_combined_geometry() {
        let batch = CombinedBatch {
            images: Array4::zeros((2, 4, 6, 3)),
            masks: Array3::zeros((2, 4, 6)),
        };
        assert_eq!(batch.frame_count(), 2);
        assert_eq!(batch.geometry(), Some(Geometry::new(6, 4)));
    }
}
