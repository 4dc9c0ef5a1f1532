use std::io::BufWriter;
use std::path::Path;

use ocd_config::OcdConfig;
use ocd_core::enums::AgentType;
use ocd_core::responses::ExportResponse;
use ocd_reward::export::{ExportFilter, ExportOrder, ExportSplit};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ExportArgs;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `ocd export`.
pub async fn handle(args: &ExportArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let filter = build_filter(args, &ctx.config, flags)?;

    match &args.output {
        Some(path) => {
            let written = ctx.service.export_to_file(&filter, Path::new(path)).await?;
            let response = ExportResponse {
                path: path.clone(),
                written: u32::try_from(written)?,
            };
            output(&response, flags.format)
        }
        None => {
            let written = ctx
                .service
                .export_to_writer(&filter, BufWriter::new(std::io::stdout()))
                .await?;
            tracing::info!(written, "Exported training data to stdout");
            Ok(())
        }
    }
}

/// Flags override the `[export]` config section.
fn build_filter(
    args: &ExportArgs,
    config: &OcdConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<ExportFilter> {
    let min_reward = args.min_reward.unwrap_or(config.export.min_reward);
    if !min_reward.is_finite() {
        anyhow::bail!("--min-reward must be a finite number");
    }
    Ok(ExportFilter {
        agent_type: args
            .agent
            .as_deref()
            .map(|raw| parse_enum::<AgentType>(raw, "agent"))
            .transpose()?,
        user_id: args.user.clone(),
        min_reward,
        require_reward: args.require_reward,
        require_feedback: args.require_feedback,
        split: parse_enum::<ExportSplit>(&args.split, "split")?,
        order: parse_enum::<ExportOrder>(&args.order, "order")?,
        limit: flags.limit.unwrap_or(config.export.limit),
    })
}
