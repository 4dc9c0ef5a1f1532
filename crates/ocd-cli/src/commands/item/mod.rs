mod create;
mod get;
mod transition;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ItemCommands;
use crate::context::AppContext;

/// Handle `ocd item`.
pub async fn handle(
    action: &ItemCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ItemCommands::Create {
            title,
            user,
            status,
            swimlane,
            priority,
            labels,
        } => {
            create::run(
                title,
                user,
                status.as_deref(),
                swimlane.as_deref(),
                priority.as_deref(),
                labels,
                ctx,
                flags,
            )
            .await
        }
        ItemCommands::Move { id, status } => transition::run(id, status, ctx, flags).await,
        ItemCommands::Get { id } => get::run(id, ctx, flags).await,
    }
}
