//! Loading one directory into a uniform batch.

use ndarray::{Array3, Array4, Axis};
use std::collections::HashMap;
use std::path::Path;

use super::decode::{ImageNormalizer, NormalizedImage};
use super::discovery::{apply_cap, DirectoryScanner};
use super::path::leaf_name;
use super::resize::{resize_image, resize_mask};
use crate::config::{Config, LoadingConfig, SizePolicy};
use crate::error::PipelineError;
use crate::types::{DirectoryBatch, Geometry, RGB_CHANNELS};

/// Selection and sizing options shared by every directory of one load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Maximum files per directory, 0 = unlimited
    pub cap: usize,
    /// Files dropped from the start of the sorted listing
    pub skip_first: usize,
    /// Keep every Nth file after skipping
    pub stride: usize,
    /// How each directory's target geometry is chosen
    pub size_policy: SizePolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::from(&LoadingConfig::default())
    }
}

impl From<&LoadingConfig> for LoadOptions {
    fn from(config: &LoadingConfig) -> Self {
        Self {
            cap: config.image_load_cap,
            skip_first: config.skip_first_images,
            stride: config.select_every_nth,
            size_policy: config.size_policy,
        }
    }
}

/// Receives per-file progress during long loads.
pub trait LoadProgress {
    /// Called after each file; `loaded` increases by one per call.
    fn on_file(&self, directory: &Path, loaded: usize, total: usize);
}

/// Progress sink that ignores updates.
impl LoadProgress for () {
    fn on_file(&self, _directory: &Path, _loaded: usize, _total: usize) {}
}

/// Loads every selected file of a directory into one [`DirectoryBatch`].
pub struct DirectoryLoader {
    scanner: DirectoryScanner,
    normalizer: ImageNormalizer,
}

impl DirectoryLoader {
    /// Create a loader with the given configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            scanner: DirectoryScanner::new(&config.loading),
            normalizer: ImageNormalizer::new(config.limits.clone()),
        }
    }

    /// The scanner used to select files.
    pub fn scanner(&self) -> &DirectoryScanner {
        &self.scanner
    }

    /// Load `directory` into a batch of uniform geometry.
    ///
    /// Any file that fails to decode aborts the whole directory, so frame
    /// counts always match what was scanned.
    pub fn load(
        &self,
        directory: &Path,
        options: &LoadOptions,
        progress: &dyn LoadProgress,
    ) -> Result<DirectoryBatch, PipelineError> {
        let start = std::time::Instant::now();
        if !directory.is_dir() {
            return Err(PipelineError::DirectoryNotFound(directory.to_path_buf()));
        }

        let files = self
            .scanner
            .scan(directory, options.skip_first, options.stride)?;
        if files.is_empty() {
            return Err(PipelineError::EmptyDirectory(directory.to_path_buf()));
        }
        let files = apply_cap(files, options.cap);
        let total = files.len();
        tracing::debug!(
            "Loading {} file(s) from {:?} (size policy: {})",
            total,
            directory,
            options.size_policy
        );

        let mut target = match options.size_policy {
            SizePolicy::MostCommon => Some(self.most_common_geometry(&files)?),
            SizePolicy::FirstFile | SizePolicy::Strict => None,
        };

        let mut frames: Vec<NormalizedImage> = Vec::with_capacity(total);
        let mut sizes: Vec<Geometry> = Vec::new();
        for (idx, file) in files.iter().enumerate() {
            let mut frame = self.normalizer.normalize(file)?;
            let target_geometry = *target.get_or_insert(frame.geometry);

            if frame.geometry != target_geometry {
                if options.size_policy.resamples() {
                    tracing::debug!(
                        "Resizing {:?} from {} to {}",
                        file,
                        frame.geometry,
                        target_geometry
                    );
                    frame = NormalizedImage {
                        image: resize_image(&frame.image, target_geometry),
                        mask: resize_mask(&frame.mask, target_geometry),
                        geometry: target_geometry,
                        has_alpha: frame.has_alpha,
                    };
                } else if !sizes.contains(&frame.geometry) {
                    sizes.push(frame.geometry);
                }
            }
            if idx == 0 {
                sizes.push(frame.geometry);
            }

            frames.push(frame);
            progress.on_file(directory, idx + 1, total);
        }

        if sizes.len() > 1 {
            return Err(PipelineError::ShapeMismatch {
                context: format!("directory '{}'", directory.display()),
                sizes,
            });
        }

        let geometry = target.unwrap_or(frames[0].geometry);
        let batch = stack(frames, geometry, leaf_name(directory));
        tracing::trace!("  Load {:?}: {:?}", directory, start.elapsed());
        Ok(batch)
    }

    /// Most frequent oriented size among `files`; ties go to the earliest.
    fn most_common_geometry(&self, files: &[std::path::PathBuf]) -> Result<Geometry, PipelineError> {
        let mut counts: HashMap<Geometry, (usize, usize)> = HashMap::new();
        for (order, file) in files.iter().enumerate() {
            let geometry = self.normalizer.probe_geometry(file)?;
            counts.entry(geometry).or_insert((0, order)).0 += 1;
        }
        counts
            .into_iter()
            .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
                count_a.cmp(count_b).then(first_b.cmp(first_a))
            })
            .map(|(geometry, _)| geometry)
            .ok_or_else(|| PipelineError::InvalidInput("no files to size".into()))
    }
}

/// Stack same-geometry frames into batch tensors, preserving order.
fn stack(frames: Vec<NormalizedImage>, geometry: Geometry, directory_name: String) -> DirectoryBatch {
    let (h, w) = (geometry.height as usize, geometry.width as usize);
    let n = frames.len();
    let mut images = Array4::<f32>::zeros((n, h, w, RGB_CHANNELS));
    let mut masks = Array3::<f32>::zeros((n, h, w));
    let mut has_alpha = false;

    for (i, frame) in frames.into_iter().enumerate() {
        images.index_axis_mut(Axis(0), i).assign(&frame.image);
        masks.index_axis_mut(Axis(0), i).assign(&frame.mask);
        has_alpha |= frame.has_alpha;
    }

    DirectoryBatch {
        images,
        masks,
        directory_name,
        geometry,
        has_alpha,
    }
}
