//! Command handlers for the `multipath` binary.

pub mod config;
pub mod hash;
pub mod load;
pub mod nodes;
mod progress;
pub mod run;
pub mod types;
pub mod validate;

use clap::Args;
use multipath_core::{Config, DirectorySlots, LoadImagesNode, LoadInputs};

use types::SizePolicyArg;

/// Directory selection shared by every command that reads directories.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Directories to load, in order (at most 50)
    #[arg(required = true, value_name = "DIR")]
    pub dirs: Vec<String>,

    /// Treat DIR values as folder names under the configured input directory
    #[arg(long)]
    pub upload: bool,

    /// Maximum images per directory (0 = unlimited)
    #[arg(long)]
    pub cap: Option<usize>,

    /// Images skipped at the start of each directory
    #[arg(long)]
    pub skip: Option<usize>,

    /// Keep every Nth image after skipping
    #[arg(long)]
    pub every: Option<usize>,

    /// How mixed image sizes inside one directory are reconciled
    #[arg(long, value_enum)]
    pub size_policy: Option<SizePolicyArg>,
}

impl SelectionArgs {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut Config) -> anyhow::Result<()> {
        if let Some(cap) = self.cap {
            config.loading.image_load_cap = cap;
        }
        if let Some(skip) = self.skip {
            config.loading.skip_first_images = skip;
        }
        if let Some(every) = self.every {
            config.loading.select_every_nth = every;
        }
        if let Some(policy) = self.size_policy {
            config.loading.size_policy = policy.into();
        }
        config.validate()?;
        Ok(())
    }

    /// Loader node matching `--upload`.
    pub fn node(&self, config: &Config) -> LoadImagesNode {
        if self.upload {
            LoadImagesNode::upload(config)
        } else {
            LoadImagesNode::new(config, multipath_core::DirectorySource::Path)
        }
    }

    /// Expand `~` in path arguments and build the slot list.
    pub fn inputs(&self, config: &Config) -> anyhow::Result<LoadInputs> {
        let values = self
            .dirs
            .iter()
            .map(|dir| {
                if self.upload {
                    dir.clone()
                } else {
                    shellexpand::tilde(dir).into_owned()
                }
            })
            .collect();
        let slots = DirectorySlots::from_values(values)?;
        Ok(LoadInputs::new(slots, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multipath_core::SizePolicy;

    #[test]
    fn selection_overrides_config() {
        let args = SelectionArgs {
            dirs: vec!["a".into()],
            cap: Some(10),
            every: Some(3),
            size_policy: Some(SizePolicyArg::Strict),
            ..Default::default()
        };
        let mut config = Config::default();
        args.apply(&mut config).unwrap();

        assert_eq!(config.loading.image_load_cap, 10);
        assert_eq!(config.loading.skip_first_images, 0);
        assert_eq!(config.loading.select_every_nth, 3);
        assert_eq!(config.loading.size_policy, SizePolicy::Strict);
    }

    #[test]
    fn selection_rejects_zero_stride() {
        let args = SelectionArgs {
            dirs: vec!["a".into()],
            every: Some(0),
            ..Default::default()
        };
        assert!(args.apply(&mut Config::default()).is_err());
    }

    #[test]
    fn selection_rejects_too_many_dirs() {
        let args = SelectionArgs {
            dirs: (0..51).map(|i| i.to_string()).collect(),
            ..Default::default()
        };
        assert!(args.inputs(&Config::default()).is_err());
    }
}
