//! Multipath Core - multi-directory image batch library.
//!
//! Multipath loads several folders of image frames into one uniform batch,
//! remembers which frames came from which folder, and later splits a
//! processed batch back apart to write one image sequence or video per
//! source folder.
//!
//! # Architecture
//!
//! ```text
//! Slots → Scan → Decode/Orient → Resize → Concatenate (+ Manifest)
//!                                                   ↓
//!                  Images / MP4 ← Write ← Split per Manifest
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use multipath_core::{Config, DirectorySlots, DirectorySource, LoadImagesNode, LoadInputs};
//!
//! fn main() -> multipath_core::Result<()> {
//!     let config = Config::load()?;
//!     let node = LoadImagesNode::new(&config, DirectorySource::Path);
//!     let slots = DirectorySlots::from_values(vec!["./shot_a".into(), "./shot_b".into()])?;
//!
//!     let output = node.execute(&LoadInputs::new(slots, &config), &())?;
//!     println!("Loaded {} frames", output.frame_count);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod encoder;
pub mod error;
pub mod nodes;
pub mod output;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use config::{Config, SizePolicy, StillFormat};
pub use encoder::VideoEncoder;
pub use error::{ConfigError, MultipathError, PipelineError, PipelineResult, Result};
pub use nodes::{
    DirectorySlots, DirectorySource, LoadImagesNode, LoadInputs, NodeDescriptor, NodeRegistry,
    SaveImagesNode, SaveInputs, MAX_PATH_COUNT,
};
pub use output::{OutputMode, SaveOutput, SaveWriter};
pub use pipeline::{Aggregator, DirectoryLoader, LengthMismatch, LoadOptions, LoadProgress};
pub use types::{CombinedBatch, DirectoryBatch, Geometry, LoadOutput, Manifest};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
