//! Command dispatch: bridges CLI args -> providers -> output formatting.

pub mod applications;
pub mod apply;
pub mod config_cmd;
pub mod drafts;
pub mod flows;
pub mod util;

use std::sync::Arc;

use abflow_core::{Context, Device};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a device-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    device: &Arc<Device>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let ctx = Context::new(Arc::clone(device));
    match cmd {
        Command::Applications(args) => applications::handle(&ctx, args, global).await,
        Command::Flows(args) => flows::handle(&ctx, args, global).await,
        Command::Drafts(args) => drafts::handle(&ctx, args, global).await,
        Command::Apply(args) => apply::handle(&ctx, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
