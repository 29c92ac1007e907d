//! The directory-batch loader node.

use std::path::PathBuf;

use crate::config::{Config, SizePolicy};
use crate::error::PipelineError;
use crate::pipeline::{
    strip_path, Aggregator, DirectoryLoader, Fingerprinter, LoadOptions, LoadProgress, Validator,
};
use crate::types::LoadOutput;

/// Maximum number of directory slots a loader node exposes.
pub const MAX_PATH_COUNT: usize = 50;

/// Upload subfolder reserved by the host for clipboard images.
const CLIPSPACE: &str = "clipspace";

/// Ordered directory slots, 1 to [`MAX_PATH_COUNT`] long.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectorySlots {
    slots: Vec<Option<String>>,
}

impl DirectorySlots {
    /// Build `path_count` slots from the given values.
    ///
    /// Values beyond `path_count` are ignored and missing ones become empty
    /// slots.
    pub fn new(path_count: usize, values: Vec<String>) -> Result<Self, PipelineError> {
        if !(1..=MAX_PATH_COUNT).contains(&path_count) {
            return Err(PipelineError::InvalidInput(format!(
                "path count {path_count} is outside 1-{MAX_PATH_COUNT}"
            )));
        }
        let mut values = values.into_iter();
        let slots = (0..path_count)
            .map(|_| values.next().and_then(|v| strip_path(Some(v.as_str()))))
            .collect();
        Ok(Self { slots })
    }

    /// One slot per value.
    pub fn from_values(values: Vec<String>) -> Result<Self, PipelineError> {
        Self::new(values.len(), values)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&str>> {
        self.slots.iter().map(|s| s.as_deref())
    }
}

/// Where slot values point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectorySource {
    /// Slot values are filesystem paths.
    Path,
    /// Slot values name subdirectories of the host's upload area.
    Upload { input_root: PathBuf },
}

impl DirectorySource {
    /// Resolve one slot value to a directory path.
    pub fn resolve(&self, value: Option<&str>) -> Option<PathBuf> {
        let value = strip_path(value)?;
        match self {
            DirectorySource::Path => Some(PathBuf::from(value)),
            DirectorySource::Upload { input_root } => Some(input_root.join(value)),
        }
    }

    /// Subdirectories available for selection, sorted by name.
    ///
    /// Always empty for [`DirectorySource::Path`].
    pub fn list_input_directories(&self) -> Result<Vec<String>, PipelineError> {
        let DirectorySource::Upload { input_root } = self else {
            return Ok(Vec::new());
        };
        if !input_root.is_dir() {
            return Err(PipelineError::DirectoryNotFound(input_root.clone()));
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(input_root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name != CLIPSPACE {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Loader node inputs.
#[derive(Debug, Clone)]
pub struct LoadInputs {
    pub slots: DirectorySlots,
    pub image_load_cap: usize,
    pub skip_first_images: usize,
    pub select_every_nth: usize,
    pub size_policy: SizePolicy,
}

impl LoadInputs {
    /// Inputs for `slots` with selection settings from `config`.
    pub fn new(slots: DirectorySlots, config: &Config) -> Self {
        let options = LoadOptions::from(&config.loading);
        Self {
            slots,
            image_load_cap: options.cap,
            skip_first_images: options.skip_first,
            select_every_nth: options.stride,
            size_policy: options.size_policy,
        }
    }

    pub fn options(&self) -> Result<LoadOptions, PipelineError> {
        if self.select_every_nth == 0 {
            return Err(PipelineError::InvalidInput(
                "select_every_nth must be at least 1".to_string(),
            ));
        }
        Ok(LoadOptions {
            cap: self.image_load_cap,
            skip_first: self.skip_first_images,
            stride: self.select_every_nth,
            size_policy: self.size_policy,
        })
    }
}

/// Loads the directories named by its slots into one combined batch.
pub struct LoadImagesNode {
    source: DirectorySource,
    loader: DirectoryLoader,
}

impl LoadImagesNode {
    pub fn new(config: &Config, source: DirectorySource) -> Self {
        Self {
            source,
            loader: DirectoryLoader::new(config),
        }
    }

    /// Node reading from the configured upload area.
    pub fn upload(config: &Config) -> Self {
        Self::new(
            config,
            DirectorySource::Upload {
                input_root: config.input_dir(),
            },
        )
    }

    pub fn source(&self) -> &DirectorySource {
        &self.source
    }

    /// Resolved directory per slot, `None` for empty slots.
    pub fn resolve(&self, slots: &DirectorySlots) -> Vec<Option<PathBuf>> {
        slots.iter().map(|slot| self.source.resolve(slot)).collect()
    }

    /// Load every configured directory and return the batch with its manifest.
    pub fn execute(
        &self,
        inputs: &LoadInputs,
        progress: &dyn LoadProgress,
    ) -> Result<LoadOutput, PipelineError> {
        let options = inputs.options()?;
        let directories = self.resolve(&inputs.slots);
        let (batch, manifest) =
            Aggregator::new(&self.loader).aggregate_paths(&directories, &options, progress)?;
        let frame_count = batch.frame_count();
        Ok(LoadOutput {
            batch,
            manifest,
            frame_count,
        })
    }

    /// `Ok` when at least one slot resolves to a loadable directory.
    pub fn validate_inputs(&self, inputs: &LoadInputs) -> Result<(), String> {
        Validator::new(self.loader.scanner().clone()).validate_any(&self.resolve(&inputs.slots))
    }

    /// Fingerprint of everything a load with these inputs would read.
    pub fn is_changed(&self, inputs: &LoadInputs) -> Result<String, PipelineError> {
        let directories: Vec<PathBuf> = self.resolve(&inputs.slots).into_iter().flatten().collect();
        Fingerprinter::new(self.loader.scanner().clone()).fingerprint(
            &directories,
            inputs.image_load_cap,
            inputs.skip_first_images,
            inputs.select_every_nth.max(1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::path::Path;

    fn write_frames(dir: &Path, count: usize, size: u32) {
        std::fs::create_dir_all(dir).unwrap();
        for i in 0..count {
            RgbImage::from_pixel(size, size, Rgb([40, 80, 120]))
                .save(dir.join(format!("f{i}.png")))
                .unwrap();
        }
    }

    fn inputs(values: Vec<String>) -> LoadInputs {
        LoadInputs::new(
            DirectorySlots::from_values(values).unwrap(),
            &Config::default(),
        )
    }

    #[test]
    fn test_slots_bounds() {
        assert!(DirectorySlots::new(0, vec![]).is_err());
        assert!(DirectorySlots::new(MAX_PATH_COUNT + 1, vec![]).is_err());

        let slots = DirectorySlots::new(2, vec!["a".into(), " ".into(), "c".into()]).unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots.iter().collect::<Vec<_>>(), vec![Some("a"), None]);
    }

    #[test]
    fn test_upload_source_resolves_and_lists() {
        let root = tempfile::tempdir().unwrap();
        for name in ["shots", "clipspace", "alpha"] {
            std::fs::create_dir(root.path().join(name)).unwrap();
        }
        std::fs::write(root.path().join("loose.png"), b"x").unwrap();

        let source = DirectorySource::Upload {
            input_root: root.path().to_path_buf(),
        };
        assert_eq!(
            source.list_input_directories().unwrap(),
            vec!["alpha".to_string(), "shots".to_string()]
        );
        assert_eq!(
            source.resolve(Some("\"shots\"")),
            Some(root.path().join("shots"))
        );
        assert_eq!(source.resolve(Some("")), None);
        assert!(DirectorySource::Path.list_input_directories().unwrap().is_empty());
    }

    #[test]
    fn test_execute_returns_manifest_and_total() {
        let root = tempfile::tempdir().unwrap();
        write_frames(&root.path().join("one"), 2, 8);
        write_frames(&root.path().join("two"), 3, 8);

        let node = LoadImagesNode::new(&Config::default(), DirectorySource::Path);
        let output = node
            .execute(
                &inputs(vec![
                    root.path().join("one").display().to_string(),
                    String::new(),
                    root.path().join("two").display().to_string(),
                ]),
                &(),
            )
            .unwrap();

        assert_eq!(output.frame_count, 5);
        assert_eq!(output.manifest.frame_counts, vec![2, 3]);
        assert_eq!(output.manifest.directory_names, vec!["one", "two"]);
    }

    #[test]
    fn test_validate_and_fingerprint() {
        let root = tempfile::tempdir().unwrap();
        write_frames(&root.path().join("a"), 1, 4);
        let node = LoadImagesNode::new(
            &Config::default(),
            DirectorySource::Upload {
                input_root: root.path().to_path_buf(),
            },
        );

        let good = inputs(vec!["a".into()]);
        let bad = inputs(vec!["".into(), "missing".into()]);
        assert!(node.validate_inputs(&good).is_ok());
        assert_eq!(
            node.validate_inputs(&bad),
            Err("At least one valid directory must be specified.".to_string())
        );

        let first = node.is_changed(&good).unwrap();
        assert_eq!(first, node.is_changed(&good).unwrap());
        write_frames(&root.path().join("a"), 2, 4);
        assert_ne!(first, node.is_changed(&good).unwrap());
    }

    #[test]
    fn test_zero_stride_rejected() {
        let mut bad = inputs(vec!["x".into()]);
        bad.select_every_nth = 0;
        let node = LoadImagesNode::new(&Config::default(), DirectorySource::Path);
        assert!(matches!(
            node.execute(&bad, &()),
            Err(PipelineError::InvalidInput(_))
        ));
    }
}
