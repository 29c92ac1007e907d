//! The `multipath nodes` command: list registered nodes.

use clap::Args;
use multipath_core::nodes::DirectorySource;
use multipath_core::{Config, NodeRegistry};

/// Arguments for the `nodes` command.
#[derive(Args, Debug)]
pub struct NodesArgs {
    /// Print descriptors as JSON
    #[arg(long)]
    pub json: bool,

    /// Also list folders available to the upload loader
    #[arg(long)]
    pub uploads: bool,
}

/// Execute the nodes command.
pub async fn execute(args: NodesArgs, config: Config) -> anyhow::Result<()> {
    let registry = NodeRegistry::builtin();

    if args.json {
        let nodes: Vec<_> = registry.iter().collect();
        println!("{}", serde_json::to_string_pretty(&nodes)?);
    } else {
        for node in registry.iter() {
            let marker = if node.output_node { " [output]" } else { "" };
            println!("{:<28} {}{}", node.id, node.display_name, marker);
            println!("{:<28} {}", "", node.description);
        }
    }

    if args.uploads {
        let source = DirectorySource::Upload {
            input_root: config.input_dir(),
        };
        println!();
        println!("Upload folders in {}:", config.input_dir().display());
        for name in source.list_input_directories()? {
            println!("  {}", name);
        }
    }
    Ok(())
}
