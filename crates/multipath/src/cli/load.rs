//! The `multipath load` command: load directories and report the batch.

use clap::Args;
use multipath_core::{Config, LoadOutput};
use std::path::PathBuf;

use super::progress::BarProgress;
use super::SelectionArgs;

/// Arguments for the `load` command.
#[derive(Args, Debug)]
pub struct LoadArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Write the manifest as JSON to this file
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,
}

/// Execute the load command.
pub async fn execute(args: LoadArgs, mut config: Config) -> anyhow::Result<()> {
    args.selection.apply(&mut config)?;
    let output = load_batch(args.selection.clone(), config).await?;

    print_summary(&output);
    if let Some(path) = &args.manifest {
        std::fs::write(path, output.manifest.to_json()?)?;
        tracing::info!("Manifest written to {:?}", path);
    }
    Ok(())
}

/// Run a load off the async runtime with a progress bar.
pub(crate) async fn load_batch(
    selection: SelectionArgs,
    config: Config,
) -> anyhow::Result<LoadOutput> {
    let start = std::time::Instant::now();
    let output = tokio::task::spawn_blocking(move || -> anyhow::Result<LoadOutput> {
        let node = selection.node(&config);
        let inputs = selection.inputs(&config)?;
        let progress = BarProgress::new();
        let result = node.execute(&inputs, &progress);
        progress.finish();
        Ok(result?)
    })
    .await??;

    tracing::info!(
        "Loaded {} frames in {:.1}s",
        output.frame_count,
        start.elapsed().as_secs_f64()
    );
    Ok(output)
}

fn print_summary(output: &LoadOutput) {
    let geometry = output
        .batch
        .geometry()
        .map(|g| g.to_string())
        .unwrap_or_else(|| "-".to_string());

    println!();
    println!("  ====================================");
    println!("               Loaded");
    println!("  ====================================");
    for (name, count) in output.manifest.entries() {
        println!("    {:<20} {:>8}", name, count);
    }
    println!("  ------------------------------------");
    println!("    Total frames:        {:>8}", output.frame_count);
    println!("    Geometry:            {:>8}", geometry);
    println!("  ====================================");
}
