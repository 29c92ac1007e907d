//! Loading many directories into one combined batch plus its manifest.

use ndarray::{concatenate, Axis};
use std::path::PathBuf;

use super::loader::{DirectoryLoader, LoadOptions, LoadProgress};
use super::path::strip_path;
use super::resize::{resize_image_batch, resize_mask_batch};
use crate::error::PipelineError;
use crate::types::{CombinedBatch, DirectoryBatch, Geometry, Manifest};

/// Runs the [`DirectoryLoader`] over an ordered list of directory slots.
pub struct Aggregator<'a> {
    loader: &'a DirectoryLoader,
}

impl<'a> Aggregator<'a> {
    pub fn new(loader: &'a DirectoryLoader) -> Self {
        Self { loader }
    }

    /// Load every configured slot in order and concatenate the results.
    ///
    /// Empty slots and paths that do not exist are skipped with a log line.
    /// A directory that exists but cannot be loaded fails the whole call.
    /// The first directory that loads fixes the geometry every later
    /// directory is resampled to.
    pub fn aggregate<S: AsRef<str>>(
        &self,
        slots: &[Option<S>],
        options: &LoadOptions,
        progress: &dyn LoadProgress,
    ) -> Result<(CombinedBatch, Manifest), PipelineError> {
        let directories: Vec<Option<PathBuf>> = slots
            .iter()
            .map(|slot| strip_path(slot.as_ref().map(|s| s.as_ref())).map(PathBuf::from))
            .collect();
        self.aggregate_paths(&directories, options, progress)
    }

    /// Same as [`aggregate`](Self::aggregate) for already-resolved paths.
    pub fn aggregate_paths(
        &self,
        directories: &[Option<PathBuf>],
        options: &LoadOptions,
        progress: &dyn LoadProgress,
    ) -> Result<(CombinedBatch, Manifest), PipelineError> {
        let slot_count = directories.len();
        let mut batches: Vec<DirectoryBatch> = Vec::new();
        let mut manifest = Manifest::new();
        let mut target: Option<Geometry> = None;

        for (i, directory) in directories.iter().enumerate() {
            let slot = i + 1;
            let Some(directory) = directory else {
                tracing::info!("Directory {} is empty, skipping", slot);
                continue;
            };
            if !directory.is_dir() {
                tracing::warn!("Directory {:?} not found, skipping", directory);
                continue;
            }

            tracing::info!(
                "Processing directory {}/{}: {:?}",
                slot,
                slot_count,
                directory
            );
            let batch = self.loader.load(directory, options, progress)?;
            let target_geometry = *target.get_or_insert(batch.geometry);
            let batch = reconcile(batch, target_geometry);
            tracing::info!(
                "{}: {} images ({})",
                batch.directory_name,
                batch.frame_count(),
                batch.geometry
            );

            manifest.push(batch.directory_name.clone(), batch.frame_count());
            batches.push(batch);
        }

        if batches.is_empty() {
            return Err(PipelineError::NoValidDirectories);
        }

        let combined = concat(&batches)?;
        tracing::info!(
            "Total images loaded: {} from {} directories",
            combined.frame_count(),
            batches.len()
        );
        Ok((combined, manifest))
    }
}

/// Resample `batch` to `target` unless it already matches.
fn reconcile(batch: DirectoryBatch, target: Geometry) -> DirectoryBatch {
    if batch.geometry == target {
        return batch;
    }
    tracing::info!(
        "Resizing '{}' from {} to {}",
        batch.directory_name,
        batch.geometry,
        target
    );
    DirectoryBatch {
        images: resize_image_batch(&batch.images, target),
        masks: resize_mask_batch(&batch.masks, target),
        geometry: target,
        ..batch
    }
}

/// Concatenate batches along the frame axis after checking their geometry.
fn concat(batches: &[DirectoryBatch]) -> Result<CombinedBatch, PipelineError> {
    let mut sizes: Vec<Geometry> = Vec::new();
    for batch in batches {
        if !sizes.contains(&batch.geometry) {
            sizes.push(batch.geometry);
        }
    }
    let mismatch = || PipelineError::ShapeMismatch {
        context: "combined batch".to_string(),
        sizes: sizes.clone(),
    };
    if sizes.len() > 1 {
        return Err(mismatch());
    }

    let image_views: Vec<_> = batches.iter().map(|b| b.images.view()).collect();
    let mask_views: Vec<_> = batches.iter().map(|b| b.masks.view()).collect();
    let images = concatenate(Axis(0), &image_views).map_err(|_| mismatch())?;
    let masks = concatenate(Axis(0), &mask_views).map_err(|_| mismatch())?;
    Ok(CombinedBatch { images, masks })
}
