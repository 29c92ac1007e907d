//! Multipath CLI - load image folders as one batch and save them back per folder.
//!
//! Multipath loads frames from several directories into one uniform batch,
//! records which frames came from which directory, and writes processed
//! batches back out as one image sequence or video per source directory.
//!
//! # Usage
//!
//! ```bash
//! # Load two folders and write the manifest
//! multipath load ./shot_a ./shot_b --manifest manifest.json
//!
//! # Load and save back as one MP4 per folder
//! multipath run ./shot_a ./shot_b --prefix take --format mp4
//!
//! # Fingerprint for change detection
//! multipath hash ./shot_a ./shot_b
//!
//! # View configuration
//! multipath config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Multipath - multi-directory image batch loading and saving.
#[derive(Parser, Debug)]
#[command(name = "multipath")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Load directories into one batch and print a summary
    Load(cli::load::LoadArgs),

    /// Load directories and save them back, split per directory
    Run(cli::run::RunArgs),

    /// Print the content fingerprint of the selected images
    Hash(cli::hash::HashArgs),

    /// Check that at least one directory can be loaded
    Validate(cli::validate::ValidateArgs),

    /// List the registered nodes
    Nodes(cli::nodes::NodesArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match multipath_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `multipath config path`."
            );
            multipath_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Multipath v{}", multipath_core::VERSION);

    match cli.command {
        Commands::Load(args) => cli::load::execute(args, config).await,
        Commands::Run(args) => cli::run::execute(args, config).await,
        Commands::Hash(args) => cli::hash::execute(args, config).await,
        Commands::Validate(args) => cli::validate::execute(args, config).await,
        Commands::Nodes(args) => cli::nodes::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
