mod feedback;
mod get;
mod list;
mod outcome;
mod record;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::DecisionCommands;
use crate::context::AppContext;

/// Handle `ocd decision`.
pub async fn handle(
    action: &DecisionCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        DecisionCommands::Record(args) => record::run(args, ctx, flags).await,
        DecisionCommands::Feedback {
            id,
            value,
            correction,
        } => feedback::run(id, value, correction.as_deref(), ctx, flags).await,
        DecisionCommands::Outcome { id, metrics } => outcome::run(id, metrics, ctx, flags).await,
        DecisionCommands::Get { id } => get::run(id, ctx, flags).await,
        DecisionCommands::List {
            agent,
            item,
            user,
            rewarded,
            reviewed,
            oldest_first,
            limit,
        } => {
            list::run(
                list::ListArgs {
                    agent: agent.as_deref(),
                    item: item.as_deref(),
                    user: user.as_deref(),
                    rewarded: *rewarded,
                    reviewed: *reviewed,
                    oldest_first: *oldest_first,
                    limit: *limit,
                },
                ctx,
                flags,
            )
            .await
        }
    }
}
