//! The `multipath run` command: load directories, then save them back split
//! per directory.

use clap::Args;
use multipath_core::{Config, OutputMode, SaveImagesNode, SaveInputs};
use std::path::PathBuf;

use super::load::load_batch;
use super::types::{ImageFormatArg, SaveFormat};
use super::SelectionArgs;

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output name prefix
    #[arg(short, long, default_value = "output")]
    pub prefix: String,

    /// Output kind
    #[arg(short, long, value_enum, default_value = "images")]
    pub format: SaveFormat,

    /// Still-image codec (defaults to config)
    #[arg(long, value_enum)]
    pub image_format: Option<ImageFormatArg>,

    /// Still-image quality 1-100 (defaults to config)
    #[arg(long)]
    pub quality: Option<u8>,

    /// Video frame rate 1-120 (defaults to config)
    #[arg(long)]
    pub frame_rate: Option<u32>,

    /// Video CRF 0-51 (defaults to config)
    #[arg(long)]
    pub crf: Option<u8>,

    /// Output directory (defaults to config)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Save everything as one output instead of one per directory
    #[arg(long)]
    pub simple: bool,

    /// Clamp instead of failing when frame counts disagree
    #[arg(long)]
    pub allow_length_mismatch: bool,
}

impl RunArgs {
    /// Save inputs with command-line overrides applied over `config`.
    fn save_inputs(&self, config: &mut Config) -> anyhow::Result<SaveInputs> {
        if let Some(format) = self.image_format {
            config.save.image_format = format.into();
        }
        if let Some(quality) = self.quality {
            config.save.quality = quality;
        }
        if let Some(frame_rate) = self.frame_rate {
            config.save.frame_rate = frame_rate;
        }
        if let Some(crf) = self.crf {
            config.save.video_quality = crf;
        }
        if self.allow_length_mismatch {
            config.save.allow_length_mismatch = true;
        }
        config.validate()?;

        let mut inputs = match self.format {
            SaveFormat::Images => SaveInputs::images(self.prefix.clone(), &config.save),
            SaveFormat::Mp4 => SaveInputs::video(self.prefix.clone(), &config.save),
        };
        inputs.output_directory = self
            .output_dir
            .as_ref()
            .map(|dir| PathBuf::from(shellexpand::tilde(&dir.to_string_lossy()).into_owned()));
        Ok(inputs)
    }
}

/// Execute the run command.
pub async fn execute(args: RunArgs, mut config: Config) -> anyhow::Result<()> {
    args.selection.apply(&mut config)?;
    let inputs = args.save_inputs(&mut config)?;
    if let OutputMode::Video { .. } = inputs.mode {
        // Fail before loading anything when the encoder is missing
        multipath_core::VideoEncoder::locate(&config.encoder)?;
    }

    let output = load_batch(args.selection.clone(), config.clone()).await?;

    let simple = args.simple;
    tracing::info!(
        "Saving {} frames as {} ({})",
        output.frame_count,
        args.format,
        if simple { "single output" } else { "per directory" }
    );
    let saved = tokio::task::spawn_blocking(move || {
        let node = SaveImagesNode::new(&config);
        let manifest = (!simple).then_some(&output.manifest);
        node.execute(&output.batch.images, manifest, &inputs)
    })
    .await??;

    println!("{}", saved.joined());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use multipath_core::StillFormat;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        run: RunArgs,
    }

    #[test]
    fn run_args_defaults() {
        let cli = TestCli::parse_from(["multipath", "./a"]);
        assert_eq!(cli.run.prefix, "output");
        assert!(matches!(cli.run.format, SaveFormat::Images));
        assert!(!cli.run.simple);

        let mut config = Config::default();
        let inputs = cli.run.save_inputs(&mut config).unwrap();
        assert_eq!(
            inputs.mode,
            OutputMode::Images {
                format: StillFormat::Png,
                quality: 95
            }
        );
        assert!(inputs.output_directory.is_none());
    }

    #[test]
    fn run_args_video_overrides() {
        let cli = TestCli::parse_from([
            "multipath",
            "./a",
            "./b",
            "--format",
            "mp4",
            "--frame-rate",
            "30",
            "--crf",
            "18",
        ]);
        assert_eq!(cli.run.selection.dirs, vec!["./a", "./b"]);

        let mut config = Config::default();
        let inputs = cli.run.save_inputs(&mut config).unwrap();
        assert_eq!(
            inputs.mode,
            OutputMode::Video {
                frame_rate: 30,
                crf: 18
            }
        );
    }

    #[test]
    fn run_args_reject_out_of_range_crf() {
        let cli = TestCli::parse_from(["multipath", "./a", "--crf", "60"]);
        assert!(cli.run.save_inputs(&mut Config::default()).is_err());
    }
}
