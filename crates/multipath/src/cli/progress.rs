//! Terminal progress for directory loads.

use indicatif::{ProgressBar, ProgressStyle};
use multipath_core::pipeline::leaf_name;
use multipath_core::LoadProgress;
use std::path::Path;

/// Progress bar that tracks the directory currently being loaded.
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        ) {
            bar.set_style(style.progress_chars("##-"));
        }
        bar.set_message("starting...");
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl LoadProgress for BarProgress {
    fn on_file(&self, directory: &Path, loaded: usize, total: usize) {
        if loaded <= 1 {
            self.bar.reset();
            self.bar.set_length(total as u64);
            self.bar.set_message(leaf_name(directory));
        }
        self.bar.set_position(loaded as u64);
    }
}
