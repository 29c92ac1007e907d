//! The `multipath hash` command: print the content fingerprint.

use clap::Args;
use multipath_core::Config;

use super::SelectionArgs;

/// Arguments for the `hash` command.
#[derive(Args, Debug)]
pub struct HashArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,
}

/// Execute the hash command.
pub async fn execute(args: HashArgs, mut config: Config) -> anyhow::Result<()> {
    args.selection.apply(&mut config)?;
    let selection = args.selection;
    let fingerprint = tokio::task::spawn_blocking(move || -> anyhow::Result<String> {
        let node = selection.node(&config);
        let inputs = selection.inputs(&config)?;
        Ok(node.is_changed(&inputs)?)
    })
    .await??;

    println!("{}", fingerprint);
    Ok(())
}
