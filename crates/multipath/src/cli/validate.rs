//! The `multipath validate` command: check that a load would find images.

use clap::Args;
use multipath_core::Config;

use super::SelectionArgs;

/// Arguments for the `validate` command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,
}

/// Execute the validate command. Fails when no directory is usable.
pub async fn execute(args: ValidateArgs, mut config: Config) -> anyhow::Result<()> {
    args.selection.apply(&mut config)?;
    let node = args.selection.node(&config);
    let inputs = args.selection.inputs(&config)?;

    match node.validate_inputs(&inputs) {
        Ok(()) => {
            println!("ok");
            Ok(())
        }
        Err(message) => anyhow::bail!(message),
    }
}
