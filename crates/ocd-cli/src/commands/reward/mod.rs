mod compute;
mod pending;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::RewardCommands;
use crate::context::AppContext;

/// Handle `ocd reward`.
pub async fn handle(
    action: &RewardCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        RewardCommands::Compute { id } => compute::run(id, ctx, flags).await,
        RewardCommands::Pending { page_size } => pending::run(*page_size, ctx, flags).await,
    }
}
